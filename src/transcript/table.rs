use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Row = Vec<Value>;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ColumnSchema(pub Vec<String>);

impl ColumnSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub schema: ColumnSchema,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// One page of `/api/transcriptions` exactly as it arrives on the wire.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionPage {
    #[serde(default)]
    pub headers: ColumnSchema,
    #[serde(default)]
    pub table_data: Vec<Row>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl TranscriptionPage {
    pub fn into_parts(self) -> (Table, PageMeta) {
        let meta = PageMeta {
            total_count: self.total_count,
            current_page: self.current_page,
            total_pages: self.total_pages,
        };
        let table = Table {
            schema: self.headers,
            rows: self.table_data,
        };
        (table, meta)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub total_count: Option<u64>,
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
}
