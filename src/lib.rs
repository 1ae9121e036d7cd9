//! docvisits: Insurance Lottery Survey Analysis Library
//!
//! Loads the survey table, recodes its categorical columns, and runs the
//! descriptive statistics, histogram, subgroup comparison and OLS regressions
//! of the doctor-visits analysis.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
