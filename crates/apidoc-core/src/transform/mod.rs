pub mod heuristics;
pub mod model_extractor;
pub mod name_normalizer;
pub mod operation_builder;
pub mod property_extractor;
pub mod synthesizer;
pub mod type_mapper;

pub use heuristics::Heuristics;
pub use synthesizer::{SynthesisOptions, synthesize, synthesize_with_options};
