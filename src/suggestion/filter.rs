//! Candidate filtering
//!
//! Pure function of the live query and the catalog. Matches are
//! case-insensitive substring matches on the label; catalog order is
//! preserved among matches, with no re-ranking by match quality.

use crate::catalog::{Variable, VariableCatalog};

/// Filter the catalog to entries whose label contains `query`
/// case-insensitively, in catalog order.
pub fn filter_candidates<'a>(query: &str, catalog: &'a VariableCatalog) -> Vec<&'a Variable> {
    let needle = query.to_lowercase();
    catalog
        .variables()
        .iter()
        .filter(|v| v.label.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VariableCatalog {
        VariableCatalog::new(vec![
            Variable::new("name", "Name", "{{name}}"),
            Variable::new("email", "Email", "{{email}}"),
            Variable::new("nickname", "Nickname", "{{nickname}}"),
        ])
    }

    #[test]
    fn test_empty_query_matches_all() {
        let catalog = catalog();
        let matches = filter_candidates("", &catalog);
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let catalog = catalog();
        let matches = filter_candidates("NA", &catalog);
        let ids: Vec<&str> = matches.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "nickname"]);
    }

    #[test]
    fn test_catalog_order_preserved() {
        let catalog = catalog();
        // "name" matches at offset 0, "nickname" at offset 4; no re-ranking,
        // catalog order wins.
        let matches = filter_candidates("name", &catalog);
        let ids: Vec<&str> = matches.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "nickname"]);
    }

    #[test]
    fn test_no_matches() {
        let catalog = catalog();
        assert!(filter_candidates("zzz", &catalog).is_empty());
    }

    #[test]
    fn test_matches_middle_of_label() {
        let catalog = catalog();
        let matches = filter_candidates("mai", &catalog);
        let ids: Vec<&str> = matches.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["email"]);
    }
}
