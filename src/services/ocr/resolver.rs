use crate::models::candidate::{PriceCandidate, ResolvedEntry};
use crate::models::recognition::{CapturedFrame, RecognitionResult};
use crate::services::ocr::parser::extract_candidates;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Prices must lie strictly inside (0, MAX_PRICE)
pub const MAX_PRICE: f64 = 100_000.0;
/// A name line must end less than this many pixels above the price
pub const MAX_NAME_GAP: f64 = 100.0;
pub const MIN_NAME_LEN: usize = 3;

// Barcodes and SKUs, not product names
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4,}").expect("valid digit run pattern"));

/// Why a frame produced no entry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("no price candidate in the central band")]
    NoCandidate,
    #[error("'{raw}' is not a price in (0, 100000)")]
    UnparsablePrice { raw: String },
}

/// Normalize a raw numeric match ("12,50" -> "12.50") and parse it.
/// Returns None unless the value is finite and inside (0, MAX_PRICE).
pub fn normalize_price(raw: &str) -> Option<(f64, String)> {
    let normalized: String = raw
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value >= MAX_PRICE {
        return None;
    }

    Some((value, normalized))
}

/// Drop name candidates that contain a 4+ digit run or are too short
pub fn clean_name(candidate: &str) -> Option<String> {
    if DIGIT_RUN.is_match(candidate) {
        return None;
    }
    if candidate.chars().count() < MIN_NAME_LEN {
        return None;
    }
    Some(candidate.to_string())
}

/// Nearest line strictly above the chosen price line, within MAX_NAME_GAP.
/// Lines whose trimmed text equals the price line's text are never used.
fn nearest_line_above<'a>(chosen: &PriceCandidate, result: &'a RecognitionResult) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;

    for line in result.lines() {
        let Some(frame) = line.frame else {
            continue;
        };
        if line.text.trim() == chosen.text || frame.top >= chosen.frame.top {
            continue;
        }

        let distance = frame.gap_above(&chosen.frame);
        if distance > 0.0
            && distance < MAX_NAME_GAP
            && best.map_or(true, |(_, min)| distance < min)
        {
            best = Some((line.text.as_str(), distance));
        }
    }

    best.map(|(text, _)| text)
}

fn find_name(chosen: &PriceCandidate, result: &RecognitionResult) -> Option<String> {
    let potential = nearest_line_above(chosen, result)
        .filter(|text| !text.is_empty())
        .or_else(|| {
            // Fall back to the very first recognized line
            result
                .first_line()
                .map(|line| line.text.as_str())
                .filter(|text| text.trim() != chosen.text)
        })?;

    clean_name(potential)
}

/// Pick the top candidate as the price and search the result for its name
pub fn try_resolve(
    candidates: &[PriceCandidate],
    result: &RecognitionResult,
) -> Result<ResolvedEntry, Rejection> {
    let chosen = candidates.first().ok_or(Rejection::NoCandidate)?;

    let (price, price_text) =
        normalize_price(&chosen.raw).ok_or_else(|| Rejection::UnparsablePrice {
            raw: chosen.raw.clone(),
        })?;

    let name = find_name(chosen, result);

    Ok(ResolvedEntry {
        price,
        price_text,
        name,
    })
}

pub fn resolve(candidates: &[PriceCandidate], result: &RecognitionResult) -> Option<ResolvedEntry> {
    try_resolve(candidates, result).ok()
}

/// Run extraction and resolution over one captured frame
pub fn scan_frame(frame: &CapturedFrame) -> Option<ResolvedEntry> {
    if frame.result.is_empty() {
        return None;
    }

    let candidates = extract_candidates(&frame.result, frame.height);

    match try_resolve(&candidates, &frame.result) {
        Ok(entry) => {
            tracing::debug!(
                price = entry.price,
                name = entry.name.as_deref().unwrap_or(""),
                candidates = candidates.len(),
                "price resolved"
            );
            Some(entry)
        }
        Err(rejection) => {
            tracing::trace!(%rejection, "frame skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frame::Frame;
    use crate::models::recognition::{Block, Line};

    fn line(text: &str, top: f64, height: f64) -> Line {
        Line::new(text, Some(Frame::new(top, 0.0, 100.0, height)))
    }

    fn result_of(lines: Vec<Line>) -> RecognitionResult {
        RecognitionResult::new(vec![Block::from_lines(lines)])
    }

    fn resolve_lines(lines: Vec<Line>, image_height: f64) -> Option<ResolvedEntry> {
        scan_frame(&CapturedFrame::new(720.0, image_height, result_of(lines)))
    }

    // ============================================================
    // Price normalization
    // ============================================================

    #[test]
    fn test_normalize_comma_decimal() {
        let (value, text) = normalize_price("12,50").unwrap();
        assert_eq!(value, 12.50);
        assert_eq!(text, "12.50");
    }

    #[test]
    fn test_normalize_trailing_separator() {
        let (value, text) = normalize_price("12.").unwrap();
        assert_eq!(value, 12.0);
        assert_eq!(text, "12.");
    }

    #[test]
    fn test_normalize_bounds() {
        assert!(normalize_price("0").is_none(), "0 is not a price");
        assert!(normalize_price("0,00").is_none(), "0.00 is not a price");
        assert!(normalize_price("100000").is_none(), "Upper bound is exclusive");
        assert!(normalize_price("250000").is_none());
        assert_eq!(normalize_price("99999.99").unwrap().0, 99999.99);
        assert_eq!(normalize_price("0.01").unwrap().0, 0.01);
    }

    // ============================================================
    // Name cleanup
    // ============================================================

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("NUTELLA 400GR"), Some("NUTELLA 400GR".to_string()));
        assert_eq!(clean_name("8901234567890"), None);
        assert_eq!(clean_name("SKU 1234 A"), None);
        assert_eq!(clean_name("AB"), None);
        assert_eq!(clean_name("SÜT"), Some("SÜT".to_string()));
    }

    // ============================================================
    // Resolution
    // ============================================================

    #[test]
    fn test_resolve_empty_candidates() {
        let result = result_of(vec![line("SUT", 100.0, 20.0)]);
        assert_eq!(try_resolve(&[], &result), Err(Rejection::NoCandidate));
        assert!(resolve(&[], &result).is_none());
    }

    #[test]
    fn test_resolve_name_above_price() {
        let entry = resolve_lines(
            vec![line("NUTELLA 400GR", 100.0, 20.0), line("45,90 TL", 140.0, 40.0)],
            320.0,
        )
        .unwrap();

        assert_eq!(entry.price, 45.90);
        assert_eq!(entry.price_text, "45.90");
        assert_eq!(entry.name.as_deref(), Some("NUTELLA 400GR"));
    }

    #[test]
    fn test_resolve_weight_line_may_still_name_the_price() {
        let entry = resolve_lines(
            vec![line("500 GR", 100.0, 20.0), line("12.99", 140.0, 30.0)],
            310.0,
        )
        .unwrap();

        assert_eq!(entry.price, 12.99);
        // The weight penalty applies to price scoring only
        assert_eq!(entry.name.as_deref(), Some("500 GR"));
    }

    #[test]
    fn test_resolve_rejects_barcode_name() {
        let entry = resolve_lines(
            vec![line("8901234567890", 100.0, 20.0), line("45,90 TL", 140.0, 40.0)],
            320.0,
        )
        .unwrap();

        assert_eq!(entry.price, 45.90);
        assert!(entry.name.is_none(), "Barcode must not become the name");
    }

    #[test]
    fn test_resolve_picks_nearest_line_above() {
        let entry = resolve_lines(
            vec![
                line("FAR NAME", 40.0, 20.0),
                line("NEAR NAME", 100.0, 20.0),
                line("45,90 TL", 140.0, 40.0),
            ],
            320.0,
        )
        .unwrap();

        assert_eq!(entry.name.as_deref(), Some("NEAR NAME"));
    }

    #[test]
    fn test_resolve_gap_limits() {
        // Price first so the first-line fallback cannot kick in
        let touching = resolve_lines(
            vec![line("45,90 TL", 140.0, 40.0), line("TOUCHING", 120.0, 20.0)],
            320.0,
        )
        .unwrap();
        assert!(touching.name.is_none(), "Zero gap is not strictly above");

        let too_far = resolve_lines(
            vec![line("45,90 TL", 140.0, 40.0), line("TOO FAR", 20.0, 20.0)],
            320.0,
        )
        .unwrap();
        assert!(too_far.name.is_none(), "A 100px gap is too far");

        let just_inside = resolve_lines(
            vec![line("45,90 TL", 140.0, 40.0), line("JUST INSIDE", 21.0, 20.0)],
            320.0,
        )
        .unwrap();
        assert_eq!(just_inside.name.as_deref(), Some("JUST INSIDE"));
    }

    #[test]
    fn test_resolve_ignores_lines_below() {
        let entry = resolve_lines(
            vec![line("45,90 TL", 140.0, 40.0), line("BELOW", 200.0, 20.0)],
            320.0,
        )
        .unwrap();

        assert!(entry.name.is_none());
    }

    #[test]
    fn test_resolve_never_names_price_with_its_own_text() {
        // A duplicate of the price text sits right above it
        let entry = resolve_lines(
            vec![line("12.99", 100.0, 20.0), line("12.99", 140.0, 30.0)],
            310.0,
        )
        .unwrap();

        assert_eq!(entry.price, 12.99);
        assert!(entry.name.is_none());
    }

    #[test]
    fn test_resolve_padded_price_line_is_not_its_own_name() {
        let entry = resolve_lines(vec![line(" 45,90 TL ", 140.0, 40.0)], 320.0).unwrap();

        assert_eq!(entry.price, 45.90);
        assert!(entry.name.is_none(), "Fallback must not return the price line");
    }

    #[test]
    fn test_resolve_padded_duplicate_above_price() {
        let entry = resolve_lines(
            vec![line(" 12.99", 100.0, 20.0), line("12.99", 140.0, 30.0)],
            310.0,
        )
        .unwrap();

        assert_eq!(entry.price, 12.99);
        assert!(entry.name.is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_first_line() {
        let result = RecognitionResult::new(vec![
            Block::from_lines(vec![line("MARKET BRAND", 0.0, 20.0)]),
            Block::from_lines(vec![line("45,90 TL", 140.0, 40.0)]),
        ]);
        let entry = scan_frame(&CapturedFrame::new(720.0, 320.0, result)).unwrap();

        assert_eq!(entry.name.as_deref(), Some("MARKET BRAND"));
    }

    #[test]
    fn test_resolve_fallback_uses_first_block_only() {
        let result = RecognitionResult::new(vec![
            Block::from_lines(vec![]),
            Block::from_lines(vec![line("45,90 TL", 140.0, 40.0), line("BELOW", 200.0, 20.0)]),
        ]);
        let entry = scan_frame(&CapturedFrame::new(720.0, 320.0, result)).unwrap();

        assert!(entry.name.is_none());
    }

    #[test]
    fn test_resolve_fallback_is_cleaned_too() {
        let entry = resolve_lines(
            vec![line("AB", 0.0, 20.0), line("45,90 TL", 140.0, 40.0)],
            320.0,
        )
        .unwrap();

        assert!(entry.name.is_none(), "Short fallback names are discarded");
    }

    #[test]
    fn test_resolve_unparsable_top_candidate() {
        let result = result_of(vec![line("00", 150.0, 20.0)]);
        let candidates = extract_candidates(&result, 320.0);

        assert_eq!(
            try_resolve(&candidates, &result),
            Err(Rejection::UnparsablePrice {
                raw: "00".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_only_considers_top_candidate() {
        // "100000 TL" outranks "12.99" but is out of range
        let result = result_of(vec![line("100000 TL", 140.0, 40.0), line("12.99", 150.0, 20.0)]);
        let candidates = extract_candidates(&result, 320.0);

        assert_eq!(candidates[0].raw, "100000");
        assert!(resolve(&candidates, &result).is_none());
    }

    #[test]
    fn test_resolve_upper_boundary_accepted() {
        let entry = resolve_lines(vec![line("99999.99", 140.0, 40.0)], 320.0).unwrap();
        assert_eq!(entry.price, 99999.99);
    }

    #[test]
    fn test_scan_frame_empty_result() {
        let frame = CapturedFrame::new(720.0, 1280.0, RecognitionResult::default());
        assert!(scan_frame(&frame).is_none());
    }

    #[test]
    fn test_scan_frame_no_digits_in_band() {
        assert!(resolve_lines(
            vec![line("FRESH MILK", 140.0, 40.0), line("12.99", 0.0, 20.0)],
            320.0
        )
        .is_none());
    }
}
