pub mod processed;
pub mod scanner;

pub use processed::ProcessedSet;
pub use scanner::DirectoryScanner;
