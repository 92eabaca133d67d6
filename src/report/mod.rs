//! Report module - evaluation metrics and dataset summaries

pub mod classification;
pub mod describe;
pub mod summary;

pub use classification::*;
pub use describe::*;
pub use summary::*;
