use crate::models::candidate::ResolvedEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("'{0}' is not a valid price")]
    InvalidPrice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Scanning,
    PausedForReview,
}

/// Name and price fields as the user sees and edits them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub name: String,
    pub price: String,
}

/// What happened to a resolved frame handed to the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    /// Entry taken; the cycle is now paused for review
    Accepted,
    /// Frame produced no entry; keep scanning
    NoResult,
    /// Frame was captured before the last pause/retry and is discarded
    Stale,
}

/// Line item ready to be handed to the session store
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemRequest {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Scan/review state for one capture screen.
///
/// Scanning -> (frame resolved) -> PausedForReview -> (save or retry) -> Scanning.
/// Every frame is stamped with the generation it was captured under; a retry
/// bumps the generation so results still in flight are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCycle {
    phase: ScanPhase,
    draft: ReviewDraft,
    generation: u64,
}

impl Default for ScanCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanCycle {
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Scanning,
            draft: ReviewDraft::default(),
            generation: 0,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_paused(&self) -> bool {
        self.phase == ScanPhase::PausedForReview
    }

    /// Generation to stamp on a frame about to be captured, or None while paused
    pub fn begin_frame(&self) -> Option<u64> {
        match self.phase {
            ScanPhase::Scanning => Some(self.generation),
            ScanPhase::PausedForReview => None,
        }
    }

    /// Feed the resolution of a frame captured under `generation`
    pub fn on_frame(mut self, generation: u64, entry: Option<ResolvedEntry>) -> (Self, FrameVerdict) {
        if self.phase != ScanPhase::Scanning || generation != self.generation {
            return (self, FrameVerdict::Stale);
        }

        let Some(entry) = entry else {
            return (self, FrameVerdict::NoResult);
        };

        // A name the user already typed wins over the recognized one
        if self.draft.name.is_empty() {
            if let Some(name) = entry.name {
                self.draft.name = name;
            }
        }
        self.draft.price = entry.price_text;
        self.phase = ScanPhase::PausedForReview;

        (self, FrameVerdict::Accepted)
    }

    pub fn edit_name(mut self, name: impl Into<String>) -> Self {
        self.draft.name = name.into();
        self
    }

    pub fn edit_price(mut self, price: impl Into<String>) -> Self {
        self.draft.price = price.into();
        self
    }

    /// Clear the draft and resume scanning
    pub fn retry(self) -> Self {
        Self {
            phase: ScanPhase::Scanning,
            draft: ReviewDraft::default(),
            generation: self.generation.wrapping_add(1),
        }
    }

    /// Build the line item the current draft describes
    pub fn save_request(&self, default_label: &str) -> Result<LineItemRequest, ScanError> {
        let price_text = self.draft.price.trim().replace(',', ".");
        let price: f64 = price_text
            .parse()
            .map_err(|_| ScanError::InvalidPrice(self.draft.price.clone()))?;

        if !price.is_finite() || price <= 0.0 {
            return Err(ScanError::InvalidPrice(self.draft.price.clone()));
        }

        let name = match self.draft.name.trim() {
            "" => default_label.to_string(),
            name => name.to_string(),
        };

        Ok(LineItemRequest {
            name,
            price,
            quantity: 1,
        })
    }
}
