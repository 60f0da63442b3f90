pub mod grouping;
pub mod integrity;
pub mod records;
pub mod types;

use serde::Serialize;

pub use integrity::DocumentationDefect;
pub use records::*;
pub use types::NormalizedName;

/// The two record sets produced by one synthesis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Documentation {
    pub apis: Vec<ApiDocumentation>,
    pub models: Vec<ModelDocumentation>,
}
