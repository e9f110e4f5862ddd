//! Pipeline module - load, filter and aggregate the credit dataset

pub mod aggregate;
pub mod binning;
pub mod correlation;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod metrics;
pub mod schema;

pub use aggregate::*;
pub use binning::*;
pub use correlation::*;
pub use filter::*;
pub use histogram::*;
pub use loader::*;
pub use metrics::*;
pub use schema::*;
