pub mod config;
pub mod docs;
pub mod error;
pub mod parse;
pub mod transform;

pub use docs::Documentation;
pub use transform::{SynthesisOptions, synthesize, synthesize_with_options};
