// src/filings/mod.rs
pub mod locator;

pub use locator::{DocumentLocator, FilingSelector};
