//! Credlens: German Credit dashboard core
//!
//! Loads the pre-cleaned German Credit dataset once, filters it by risk
//! label, age and credit amount, and computes the distributions, risk
//! crosstabs, histograms and correlations a dashboard renders.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
