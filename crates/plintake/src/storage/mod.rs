pub mod relocator;

pub use relocator::FileRelocator;
