// src/batch/mod.rs
pub mod runner;
pub mod table;

pub use runner::BatchRunner;
pub use table::ResultTable;
