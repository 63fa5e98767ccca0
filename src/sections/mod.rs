// src/sections/mod.rs
pub mod catalog;

#[allow(unused_imports)]
pub use catalog::{SectionCatalog, SectionLabel, SectionRange};
