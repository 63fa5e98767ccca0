// src/extractors/mod.rs
pub mod normalize;
pub mod section;
pub mod templates;
pub mod text;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use normalize::{normalize, NormalizedDocument};
#[allow(unused_imports)]
pub use section::{ExtractedSection, SectionExtractor};
