use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::field::LogicalField;
use super::table::ColumnSchema;

/// Name-to-index lookup built once per fetched table.
#[derive(Clone, Debug, Default)]
pub struct FieldResolver {
    index_by_name: HashMap<String, usize>,
}

impl FieldResolver {
    pub fn new(schema: &ColumnSchema) -> Self {
        let mut index_by_name = HashMap::with_capacity(schema.len());
        for (index, column) in schema.columns().iter().enumerate() {
            let key = column.to_lowercase();
            if index_by_name.contains_key(&key) {
                debug!(column = %column, index, "Duplicate column in schema; keeping first");
                continue;
            }
            index_by_name.insert(key, index);
        }
        Self { index_by_name }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(&name.to_lowercase()).copied()
    }

    pub fn field_index(&self, field: LogicalField) -> Option<usize> {
        field
            .column_names()
            .iter()
            .find_map(|name| self.column_index(name))
    }

    pub fn get<'a>(&self, row: &'a [Value], field: LogicalField) -> Option<&'a Value> {
        self.field_index(field).and_then(|index| row.get(index))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transcript::field::{Dimension, Facet};

    fn schema(cols: &[&str]) -> ColumnSchema {
        ColumnSchema::new(cols.iter().copied())
    }

    // Linear scan the indexed lookup must agree with.
    fn resolve<'a>(row: &'a [Value], schema: &ColumnSchema, name: &str) -> Option<&'a Value> {
        let wanted = name.to_lowercase();
        let index = schema
            .columns()
            .iter()
            .position(|column| column.to_lowercase() == wanted)?;
        row.get(index)
    }

    #[test]
    fn indexed_lookup_agrees_with_linear_scan() {
        let cols = schema(&["ID", "name", "Name", "time", "strengths"]);
        let resolver = FieldResolver::new(&cols);
        let row = vec![json!(1), json!("a"), json!("b"), json!("t")];
        for name in ["id", "NAME", "Time", "strengths", "missing"] {
            let indexed = resolver.column_index(name).and_then(|i| row.get(i));
            assert_eq!(indexed, resolve(&row, &cols, name), "{name}");
        }
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let row = vec![json!("Acme")];
        let cols = schema(&["Name"]);
        assert_eq!(resolve(&row, &cols, "name"), Some(&json!("Acme")));
        assert_eq!(resolve(&row, &cols, "name"), resolve(&row, &cols, "NAME"));
    }

    #[test]
    fn resolve_requires_exact_match() {
        let row = vec![json!("x")];
        let cols = schema(&["name_full"]);
        assert_eq!(resolve(&row, &cols, "name"), None);
    }

    #[test]
    fn resolve_short_row_is_not_found() {
        let row = vec![json!(1)];
        let cols = schema(&["id", "name"]);
        assert_eq!(resolve(&row, &cols, "name"), None);
        assert_eq!(resolve(&[], &cols, "id"), None);
    }

    #[test]
    fn resolve_prefers_leftmost_duplicate() {
        let row = vec![json!("first"), json!("second")];
        let cols = schema(&["Name", "NAME"]);
        assert_eq!(resolve(&row, &cols, "name"), Some(&json!("first")));
        let resolver = FieldResolver::new(&cols);
        assert_eq!(resolver.get(&row, LogicalField::Name), Some(&json!("first")));
    }

    #[test]
    fn typed_resolver_matches_backend_headers() {
        let cols = schema(&["ID", "Name", "Time", "Transcription", "pitch_followed_score"]);
        let resolver = FieldResolver::new(&cols);
        let row = vec![json!(7), json!("Call"), json!("2024-01-01 00:00:00"), json!("hi"), json!(9)];
        assert_eq!(resolver.get(&row, LogicalField::Id), Some(&json!(7)));
        assert_eq!(resolver.get(&row, LogicalField::Transcription), Some(&json!("hi")));
        assert_eq!(
            resolver.get(&row, LogicalField::Dimension(Dimension::Pitch, Facet::Score)),
            Some(&json!(9))
        );
        assert_eq!(resolver.get(&row, LogicalField::Strengths), None);
        assert_eq!(resolver.column_index("TIME"), Some(2));
    }

    #[test]
    fn typed_resolver_falls_back_to_plain_pitch_prefix() {
        let cols = schema(&["pitch_score"]);
        let resolver = FieldResolver::new(&cols);
        let row = vec![json!("6")];
        assert_eq!(
            resolver.get(&row, LogicalField::Dimension(Dimension::Pitch, Facet::Score)),
            Some(&json!("6"))
        );
    }
}
