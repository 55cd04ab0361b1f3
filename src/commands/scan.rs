use crate::commands::AppState;
use crate::models::candidate::{PriceCandidate, ResolvedEntry};
use crate::models::session::{ItemId, SessionId};
use crate::services::ocr::{extract_candidates, load_frame, try_resolve, ReplaySource};
use crate::services::scan_cycle::{FrameVerdict, ReviewDraft, ScanCycle, ScanPhase};
use crate::services::scanner::Scanner;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Result of scanning one recorded frame
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub candidates: Vec<PriceCandidate>,
    pub entry: Option<ResolvedEntry>,
    pub rejection: Option<String>,
    pub saved: Option<SavedItem>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SavedItem {
    pub session_id: SessionId,
    pub item_id: ItemId,
}

/// Result of replaying a directory of recorded frames
#[derive(Debug, Clone, Serialize, Default)]
pub struct ReplayReport {
    pub reviewed: Vec<ReviewDraft>,
    pub saved: Vec<SavedItem>,
}

/// Persist the reviewed draft into the current session, starting one if needed
pub fn save_review(state: &AppState, cycle: &ScanCycle) -> Result<SavedItem, String> {
    let request = cycle
        .save_request(&state.config.session.default_item_label)
        .map_err(|e| e.to_string())?;

    let session_id = state
        .store
        .ensure_current_session()
        .map_err(|e| e.to_string())?;

    let item_id = state
        .store
        .add_line_item(session_id, Some(&request.name), request.price, request.quantity)
        .map_err(|e| e.to_string())?;

    tracing::info!(session_id, item_id, name = %request.name, price = request.price, "item saved");

    Ok(SavedItem {
        session_id,
        item_id,
    })
}

/// Resolve a single recorded frame, optionally saving the entry
pub fn scan_file(state: &AppState, path: &Path, save: bool) -> Result<ScanReport, String> {
    let frame = load_frame(path)?;

    let candidates = if frame.result.is_empty() {
        Vec::new()
    } else {
        extract_candidates(&frame.result, frame.height)
    };

    let (entry, rejection) = match try_resolve(&candidates, &frame.result) {
        Ok(entry) => (Some(entry), None),
        Err(rejection) => (None, Some(rejection.to_string())),
    };

    let saved = match (&entry, save) {
        (Some(entry), true) => {
            let (cycle, verdict) = ScanCycle::new().on_frame(0, Some(entry.clone()));
            debug_assert_eq!(verdict, FrameVerdict::Accepted);
            Some(save_review(state, &cycle)?)
        }
        _ => None,
    };

    Ok(ScanReport {
        candidates,
        entry,
        rejection,
        saved,
    })
}

/// Run the throttled scanner over recorded frames. Every review is accepted
/// as-is (and saved when asked), then scanning resumes until the frames run out.
pub async fn replay_dir(state: &AppState, dir: &Path, save: bool) -> Result<ReplayReport, String> {
    let source = Arc::new(ReplaySource::from_dir(dir)?);
    let scanner = Scanner::from_config(&state.config.scan);
    let mut phase_rx = scanner.subscribe();
    let mut handle = scanner.start(source).await;

    let mut report = ReplayReport::default();

    loop {
        tokio::select! {
            changed = phase_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if *phase_rx.borrow_and_update() != ScanPhase::PausedForReview {
                    continue;
                }

                let cycle = scanner.snapshot().await;
                report.reviewed.push(cycle.draft().clone());

                if save {
                    match save_review(state, &cycle) {
                        Ok(saved) => report.saved.push(saved),
                        Err(e) => tracing::warn!(error = %e, "failed to save reviewed item"),
                    }
                }

                scanner.update(|c| c.retry()).await;
            }
            finished = &mut handle => {
                finished.map_err(|e| format!("Scan loop failed: {}", e))?;
                break;
            }
        }
    }

    Ok(report)
}
