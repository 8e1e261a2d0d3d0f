use ordermap::OrderMap;

use crate::diagnostic::Diagnostic;

use super::r#type::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVariable {
    pub ty: Type,
    /// Initializer source text, whitespace removed.
    pub initializer: Option<String>,
    pub line: usize,
}

/// Global variables keyed by name, in declaration order. The first
/// declaration of a name wins.
#[derive(Debug, Default)]
pub struct GlobalTable {
    entries: OrderMap<String, GlobalVariable>,
}

impl GlobalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the diagnostic raised by the declaration, if any. A redeclared
    /// name leaves the table untouched; an `int` initialized with a string is
    /// reported but still inserted.
    pub fn declare(
        &mut self,
        name: &str,
        ty: Type,
        initializer: Option<String>,
        line: usize,
    ) -> Option<Diagnostic> {
        if self.entries.contains_key(name) {
            return Some(Diagnostic::semantic(
                line,
                format!("global variable '{}' already declared", name),
            ));
        }

        let mismatch = match initializer {
            Some(ref init) if ty == Type::Int && init.starts_with('"') => Some(
                Diagnostic::semantic(line, format!("variable '{}' (int) cannot receive a string", name)),
            ),
            _ => None,
        };

        self.entries.insert(
            name.to_string(),
            GlobalVariable {
                ty,
                initializer,
                line,
            },
        );
        mismatch
    }

    pub fn get(&self, name: &str) -> Option<&GlobalVariable> {
        self.entries.get(name)
    }

    pub fn all_entries(&self) -> impl Iterator<Item = (&str, &GlobalVariable)> {
        self.entries.iter().map(|(name, var)| (name.as_str(), var))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_declaration_wins() {
        let mut table = GlobalTable::new();
        assert_eq!(table.declare("x", Type::Int, Some("5".to_string()), 1), None);

        let diag = table
            .declare("x", Type::Float, Some("6.0".to_string()), 2)
            .unwrap();
        assert_eq!(diag.message, "global variable 'x' already declared");
        assert_eq!(diag.line, Some(2));

        assert_eq!(table.len(), 1);
        let x = table.get("x").unwrap();
        assert_eq!(x.ty, Type::Int);
        assert_eq!(x.initializer.as_deref(), Some("5"));
    }

    #[test]
    fn test_int_from_string_is_reported_and_inserted() {
        let mut table = GlobalTable::new();
        let diag = table
            .declare("x", Type::Int, Some("\"hello\"".to_string()), 3)
            .unwrap();
        assert_eq!(diag.message, "variable 'x' (int) cannot receive a string");
        assert_eq!(
            table.get("x").unwrap().initializer.as_deref(),
            Some("\"hello\"")
        );
    }

    #[test]
    fn test_other_types_are_not_checked() {
        let mut table = GlobalTable::new();
        assert_eq!(
            table.declare("s", Type::String, Some("\"ok\"".to_string()), 1),
            None
        );
        assert_eq!(
            table.declare("f", Type::Float, Some("\"odd\"".to_string()), 2),
            None
        );
        assert_eq!(table.declare("n", Type::Int, None, 3), None);
    }

    #[test]
    fn test_entries_keep_declaration_order() {
        let mut table = GlobalTable::new();
        for name in ["zeta", "alpha", "mid"] {
            table.declare(name, Type::Bool, None, 1);
        }
        let names = table.all_entries().map(|(n, _)| n).collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
