// mod.rs - Data structures module

pub mod location;
pub mod qualifiers;
pub mod record;

// Re-export main types for convenience
pub use location::FeatureLocation;
pub use qualifiers::Qualifiers;
pub use record::{value_kind, LetterAnnotations, Record, SeqFeature};
