//! Report module - assembling and presenting dashboard views

pub mod dashboard;
pub mod export;
pub mod summary;

pub use dashboard::*;
pub use export::*;
pub use summary::*;
