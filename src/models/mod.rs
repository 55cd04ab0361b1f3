pub mod candidate;
pub mod config;
pub mod frame;
pub mod recognition;
pub mod session;
