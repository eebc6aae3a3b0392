pub mod decoder;
pub mod hasher;
pub mod scanner;

pub use decoder::Decoded;
pub use scanner::{ScanReport, Scanner};
