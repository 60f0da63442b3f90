use std::collections::HashSet;
use std::fmt;

use super::Documentation;

/// A broken documentation invariant. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentationDefect {
    DuplicateOperationId(String),
    DuplicateModelName(String),
    UnknownOperation { model: String, operation_id: String },
}

impl fmt::Display for DocumentationDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentationDefect::DuplicateOperationId(id) => {
                write!(f, "operationId `{id}` is used by more than one operation")
            }
            DocumentationDefect::DuplicateModelName(name) => {
                write!(f, "model name `{name}` is emitted more than once")
            }
            DocumentationDefect::UnknownOperation {
                model,
                operation_id,
            } => write!(
                f,
                "model `{model}` lists unknown operation `{operation_id}`"
            ),
        }
    }
}

impl Documentation {
    /// Check operationId and model name uniqueness, and that every
    /// `usedInOperations` entry names a documented operation.
    pub fn integrity_defects(&self) -> Vec<DocumentationDefect> {
        let mut defects = Vec::new();

        let mut operation_ids = HashSet::new();
        for api in &self.apis {
            if !operation_ids.insert(api.operation_id.as_str()) {
                defects.push(DocumentationDefect::DuplicateOperationId(
                    api.operation_id.clone(),
                ));
            }
        }

        let mut model_names = HashSet::new();
        for model in &self.models {
            if !model_names.insert(model.model_name.as_str()) {
                defects.push(DocumentationDefect::DuplicateModelName(
                    model.model_name.clone(),
                ));
            }
            for op in model.operations() {
                if !operation_ids.contains(op) {
                    defects.push(DocumentationDefect::UnknownOperation {
                        model: model.model_name.clone(),
                        operation_id: op.to_string(),
                    });
                }
            }
        }

        defects
    }
}
