use crate::diagnostic::Diagnostic;

use super::r#type::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    pub name: String,
    pub ret_ty: Type,
    pub params: Vec<Parameter>,
    pub line: usize,
}

impl FunctionEntry {
    /// Parameter lists match when their types match position by position;
    /// names do not take part.
    pub fn has_same_parameters(&self, other: &[Parameter]) -> bool {
        self.params.len() == other.len()
            && self
                .params
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.ty == b.ty)
    }
}

/// Every function declaration in order, duplicates included.
#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: Vec<FunctionEntry>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports one diagnostic per earlier entry sharing the new entry's
    /// signature, then appends the entry regardless.
    pub fn declare(&mut self, entry: FunctionEntry) -> Vec<Diagnostic> {
        let diagnostics = self
            .functions
            .iter()
            .filter(|existing| existing.name == entry.name)
            .filter(|existing| existing.has_same_parameters(&entry.params))
            .map(|_| {
                Diagnostic::semantic(
                    entry.line,
                    format!(
                        "function '{}' with this parameter list already exists",
                        entry.name
                    ),
                )
            })
            .collect();

        self.functions.push(entry);
        diagnostics
    }

    pub fn all_functions(&self) -> &[FunctionEntry] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
