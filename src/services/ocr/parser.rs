use crate::models::candidate::PriceCandidate;
use crate::models::frame::Frame;
use crate::models::recognition::{Line, RecognitionResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Half-height of the central band, as a fraction of the image height.
/// Price tags are expected inside the capture guide, so lines outside
/// `center ± 20%` are never candidates.
pub const CENTER_BAND_RATIO: f64 = 0.20;

pub const CURRENCY_BONUS: f64 = 20.0;
pub const DECIMAL_BONUS: f64 = 10.0;
pub const BARE_INTEGER_BONUS: f64 = 5.0;
pub const MAX_POSITION_SCORE: f64 = 10.0;
/// Glyph height contributes `height / HEIGHT_DIVISOR` (40px -> +4)
pub const HEIGHT_DIVISOR: f64 = 10.0;
/// Soft exclusion for weight/quantity annotations ("400 gr", "6 adet")
pub const WEIGHT_PENALTY: f64 = 50.0;

static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)₺|tl").expect("valid currency pattern"));
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+[.,][0-9]{2}(?-u:\b)").expect("valid decimal pattern"));
static BARE_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,4}$").expect("valid integer pattern"));
static WEIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?-u:\b)[0-9]+\s*(g|gr|kg|adet|x)(?-u:\b)").expect("valid weight pattern")
});
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+[.,]?[0-9]*").expect("valid number pattern"));

/// Vertical strip around the image center in which prices are searched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterBand {
    pub center_y: f64,
    pub half_height: f64,
}

impl CenterBand {
    pub fn for_image_height(image_height: f64) -> Self {
        Self {
            center_y: image_height / 2.0,
            half_height: image_height * CENTER_BAND_RATIO,
        }
    }

    /// Distance from the band center to the frame's center line, or None
    /// when the frame lies outside the band
    pub fn distance(&self, frame: &Frame) -> Option<f64> {
        let dist = (self.center_y - frame.center_y()).abs();
        if !dist.is_finite() || dist > self.half_height {
            return None;
        }
        Some(dist)
    }

    /// Linear decay from MAX_POSITION_SCORE at the center to 0 at the band edge
    pub fn position_score(&self, dist: f64) -> f64 {
        (MAX_POSITION_SCORE * (1.0 - dist / self.half_height)).max(0.0)
    }
}

/// Score contribution of the line text alone (currency, decimals, bare
/// integers, weight penalty)
pub fn text_score(text: &str) -> f64 {
    let mut score = 0.0;

    if CURRENCY.is_match(text) {
        score += CURRENCY_BONUS;
    }
    if DECIMAL.is_match(text) {
        score += DECIMAL_BONUS;
    }
    if BARE_INTEGER.is_match(text) {
        score += BARE_INTEGER_BONUS;
    }
    if is_weight_annotation(text) {
        score -= WEIGHT_PENALTY;
    }

    score
}

/// True when the text looks like a weight or quantity annotation
pub fn is_weight_annotation(text: &str) -> bool {
    WEIGHT.is_match(text)
}

/// First numeric substring (`12`, `12,50`, `12.`)
pub fn first_number(text: &str) -> Option<&str> {
    NUMBER.find(text).map(|m| m.as_str())
}

fn score_line(line: &Line, band: &CenterBand) -> Option<PriceCandidate> {
    let frame = line.frame?;
    let dist = band.distance(&frame)?;

    let text = line.text.trim();
    if text.chars().count() < 2 || !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let score = text_score(text) + band.position_score(dist) + frame.height / HEIGHT_DIVISOR;
    let raw = first_number(text)?;

    tracing::trace!(text, raw, score, "price candidate");

    Some(PriceCandidate {
        raw: raw.to_string(),
        score,
        text: text.to_string(),
        frame,
    })
}

/// Extract price candidates from a recognition result, best first.
///
/// Only lines with geometry, inside the central band, with at least two
/// characters and one digit are considered. Equal scores keep block/line
/// order.
pub fn extract_candidates(result: &RecognitionResult, image_height: f64) -> Vec<PriceCandidate> {
    if !image_height.is_finite() || image_height <= 0.0 {
        return Vec::new();
    }

    let band = CenterBand::for_image_height(image_height);

    let mut candidates: Vec<PriceCandidate> = result
        .lines()
        .filter_map(|line| score_line(line, &band))
        .collect();

    // Stable: ties keep recognition order
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}
