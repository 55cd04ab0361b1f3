use crate::models::frame::Frame;
use serde::{Deserialize, Serialize};

/// One recognized row of text. Geometry is optional: the recognizer omits it
/// for degenerate lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Line {
    pub text: String,
    #[serde(default)]
    pub frame: Option<Frame>,
}

impl Line {
    pub fn new(text: impl Into<String>, frame: Option<Frame>) -> Self {
        Self {
            text: text.into(),
            frame,
        }
    }
}

/// Recognizer-defined group of adjacent lines (paragraph, tag region, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Block {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub frame: Option<Frame>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Block {
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            text,
            frame: None,
            lines,
        }
    }
}

/// Text recognition output for one photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecognitionResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl RecognitionResult {
    pub fn new(blocks: Vec<Block>) -> Self {
        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self { text, blocks }
    }

    /// Every line of every block, in block/line order
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// First line of the first block, if that block has any lines
    pub fn first_line(&self) -> Option<&Line> {
        self.blocks.first().and_then(|b| b.lines.first())
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A recognition result together with the size of the photo it was read from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapturedFrame {
    pub width: f64,
    pub height: f64,
    pub result: RecognitionResult,
}

impl CapturedFrame {
    pub fn new(width: f64, height: f64, result: RecognitionResult) -> Self {
        Self {
            width,
            height,
            result,
        }
    }
}
