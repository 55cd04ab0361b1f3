pub mod config;
pub mod ocr;
pub mod scan_cycle;
pub mod scanner;
pub mod session_store;
