//! Rebuilds the family of small-boat crossing tables (daily, weekly, monthly,
//! yearly and the wide cumulative views) from one published daily sheet.

pub mod calendar;
pub mod error;
pub mod loader;
pub mod output;
pub mod policy;
pub mod reports;
pub mod types;
pub mod util;
pub mod wide;

pub use error::{CrossingsError, Result};
