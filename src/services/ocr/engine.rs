use crate::models::recognition::CapturedFrame;

/// Frame source abstraction - camera + text recognizer, or recorded frames
pub trait FrameSource: Send + Sync {
    /// Capture one photo and recognize its text.
    ///
    /// `Ok(None)` means there is nothing new to process right now.
    fn capture(&self) -> Result<Option<CapturedFrame>, String>;

    /// True once the source will never yield another frame
    fn is_exhausted(&self) -> bool {
        false
    }
}
