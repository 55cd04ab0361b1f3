use crate::models::recognition::CapturedFrame;
use crate::services::ocr::engine::FrameSource;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Load one recorded frame (`{ "width", "height", "result" }` JSON)
pub fn load_frame(path: &Path) -> Result<CapturedFrame, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read frame {}: {}", path.display(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse frame {}: {}", path.display(), e))
}

/// Replays recorded frames from a directory, in file name order
pub struct ReplaySource {
    pending: Mutex<VecDeque<PathBuf>>,
}

impl ReplaySource {
    pub fn from_dir(dir: &Path) -> Result<Self, String> {
        let entries = fs::read_dir(dir)
            .map_err(|e| format!("Failed to read replay directory {}: {}", dir.display(), e))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
            .collect();
        paths.sort();

        tracing::info!(dir = %dir.display(), frames = paths.len(), "replay source opened");

        Ok(Self {
            pending: Mutex::new(paths.into()),
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.lock().len()
    }
}

impl FrameSource for ReplaySource {
    fn capture(&self) -> Result<Option<CapturedFrame>, String> {
        let Some(path) = self.pending.lock().pop_front() else {
            return Ok(None);
        };

        load_frame(&path).map(Some)
    }

    fn is_exhausted(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
