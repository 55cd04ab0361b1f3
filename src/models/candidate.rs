use crate::models::frame::Frame;
use serde::{Deserialize, Serialize};

/// Scored, provisional price reading derived from one recognized line.
/// Lives only for the duration of one frame's processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceCandidate {
    /// First numeric substring of the trimmed line text
    pub raw: String,
    pub score: f64,
    /// Trimmed line text
    pub text: String,
    pub frame: Frame,
}

/// Price and provisional product name resolved from one frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedEntry {
    pub price: f64,
    /// Normalized numeric text the price was parsed from ("45.90")
    pub price_text: String,
    pub name: Option<String>,
}
