pub mod engine;
pub mod parser;
pub mod replay;
pub mod resolver;

// Re-export main types
pub use engine::FrameSource;
pub use parser::extract_candidates;
pub use replay::{load_frame, ReplaySource};
pub use resolver::{resolve, scan_frame, try_resolve, Rejection};
