use serde_json::Value;

use super::content::content_text;
use super::field::LogicalField;
use super::resolver::FieldResolver;
use super::timefmt::{format_timestamp, PLACEHOLDER};

pub struct SummaryColumn {
    pub field: LogicalField,
    pub label: &'static str,
    formatter: fn(Option<&Value>) -> String,
}

impl SummaryColumn {
    pub fn render(&self, value: Option<&Value>) -> String {
        (self.formatter)(value)
    }
}

pub const SUMMARY_COLUMNS: [SummaryColumn; 3] = [
    SummaryColumn {
        field: LogicalField::Id,
        label: "ID",
        formatter: display_raw,
    },
    SummaryColumn {
        field: LogicalField::Name,
        label: "Name",
        formatter: display_raw,
    },
    SummaryColumn {
        field: LogicalField::Time,
        label: "Time",
        formatter: format_timestamp,
    },
];

fn display_raw(value: Option<&Value>) -> String {
    content_text(value).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn project_summary(row: &[Value], resolver: &FieldResolver) -> [String; 3] {
    SUMMARY_COLUMNS.each_ref().map(|column| column.render(resolver.get(row, column.field)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transcript::table::ColumnSchema;

    #[test]
    fn projects_id_name_and_formatted_time() {
        let schema = ColumnSchema::new(["id", "name", "time", "pitch_followed_score"]);
        let resolver = FieldResolver::new(&schema);
        let row = vec![
            json!("7"),
            json!("Acme Call"),
            json!("2024-03-01 09:00:00"),
            json!("9"),
        ];
        assert_eq!(
            project_summary(&row, &resolver),
            [
                "7".to_string(),
                "Acme Call".to_string(),
                "Mar 1, 2024, 09:00 AM".to_string()
            ]
        );
    }

    #[test]
    fn missing_columns_use_placeholder() {
        let schema = ColumnSchema::new(["Name"]);
        let resolver = FieldResolver::new(&schema);
        let row = vec![json!("null")];
        assert_eq!(
            project_summary(&row, &resolver),
            ["-".to_string(), "-".to_string(), "-".to_string()]
        );
    }

    #[test]
    fn numeric_ids_are_displayed_raw() {
        let schema = ColumnSchema::new(["ID", "Name", "Time"]);
        let resolver = FieldResolver::new(&schema);
        let row = vec![json!(0), json!("Call"), json!("garbled")];
        assert_eq!(
            project_summary(&row, &resolver),
            ["0".to_string(), "Call".to_string(), "garbled".to_string()]
        );
    }

    #[test]
    fn labels_are_fixed() {
        let labels: Vec<_> = SUMMARY_COLUMNS.iter().map(|c| c.label).collect();
        assert_eq!(labels, ["ID", "Name", "Time"]);
    }
}
