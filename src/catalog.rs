//! Variable catalog
//!
//! The static, ordered list of variables the editor can insert. Entries are
//! created once at startup and never mutated; suggestion filtering and token
//! insertion both resolve against this list.

use lazy_static::lazy_static;

/// A named variable that can be inserted into a document as a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Unique identifier, referenced by inserted tokens
    pub id: String,
    /// Human-searchable display label
    pub label: String,
    /// Literal substitution text captured into the token at insertion time
    pub value: String,
}

impl Variable {
    pub fn new(id: &str, label: &str, value: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

lazy_static! {
    /// Built-in variable table
    pub static ref DEFAULT_VARIABLES: Vec<Variable> = vec![
        Variable::new("name", "Name", "{{name}}"),
        Variable::new("email", "Email", "{{email}}"),
        Variable::new("company", "Company", "{{company}}"),
        Variable::new("date", "Date", "{{date}}"),
    ];
}

/// Ordered collection of known variables.
///
/// Catalog order is significant: suggestion lists preserve it among matches.
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    variables: Vec<Variable>,
}

impl VariableCatalog {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Look up a variable by id
    pub fn find(&self, id: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_VARIABLES.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id() {
        let catalog = VariableCatalog::default();
        let var = catalog.find("email").unwrap();
        assert_eq!(var.label, "Email");
        assert_eq!(var.value, "{{email}}");
    }

    #[test]
    fn test_find_missing() {
        let catalog = VariableCatalog::default();
        assert!(catalog.find("nonexistent").is_none());
    }

    #[test]
    fn test_default_order_is_stable() {
        let catalog = VariableCatalog::default();
        let ids: Vec<&str> = catalog.variables().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "email", "company", "date"]);
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = VariableCatalog::new(vec![Variable::new("x", "X", "{{x}}")]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("name").is_none());
    }
}
