use tracing::debug;

use crate::pagination::PageNumber;
use crate::transcript::{
    assemble, has_analysis, project_summary, AnalysisRecord, FieldResolver, Table,
};

/// Pre-rendered list row. Computed once when a table arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRow {
    pub cells: [String; 3],
    pub has_analysis: bool,
}

#[derive(Clone, Debug)]
pub struct LoadedTable {
    pub page: PageNumber,
    pub table: Table,
    resolver: FieldResolver,
    summaries: Vec<SummaryRow>,
}

impl LoadedTable {
    pub fn new(page: PageNumber, table: Table) -> Self {
        let resolver = FieldResolver::new(&table.schema);
        let summaries = table
            .rows
            .iter()
            .map(|row| SummaryRow {
                cells: project_summary(row, &resolver),
                has_analysis: has_analysis(row, &resolver),
            })
            .collect();
        Self {
            page,
            table,
            resolver,
            summaries,
        }
    }

    pub fn summaries(&self) -> &[SummaryRow] {
        &self.summaries
    }

    pub fn analysis(&self, index: usize) -> Option<AnalysisRecord> {
        let row = self.table.row(index)?;
        Some(assemble(row, &self.resolver))
    }
}

#[derive(Clone, Debug)]
pub struct TranscriptionsPanel {
    pub table: Option<LoadedTable>,
    pub error: Option<String>,
    pub cursor: usize,
    pub expanded: Option<usize>,
    pub analysis_scroll: u16,
    pub show_transcription: bool,
}

impl Default for TranscriptionsPanel {
    fn default() -> Self {
        Self {
            table: None,
            error: None,
            cursor: 0,
            expanded: None,
            analysis_scroll: 0,
            show_transcription: true,
        }
    }
}

impl TranscriptionsPanel {
    /// Swap in a freshly fetched page. Nothing from the previous table
    /// survives, including the selection.
    pub fn replace(&mut self, page: PageNumber, table: Table) {
        debug!(page = page.get(), rows = table.len(), "Replacing transcription table");
        self.table = Some(LoadedTable::new(page, table));
        self.error = None;
        self.cursor = 0;
        self.expanded = None;
        self.analysis_scroll = 0;
    }

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.summaries().len())
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let count = self.row_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let max_index = count.saturating_sub(1) as i64;
        let next = (self.cursor as i64 + i64::from(delta)).clamp(0, max_index);
        self.cursor = next as usize;
    }

    pub fn cursor_has_analysis(&self) -> bool {
        self.table
            .as_ref()
            .and_then(|t| t.summaries().get(self.cursor))
            .is_some_and(|row| row.has_analysis)
    }

    pub fn toggle_analysis(&mut self) {
        self.analysis_scroll = 0;
        if self.expanded == Some(self.cursor) {
            self.expanded = None;
        } else if self.cursor_has_analysis() {
            self.expanded = Some(self.cursor);
        }
    }

    pub fn scroll_analysis(&mut self, delta: i32) {
        if self.expanded.is_none() {
            return;
        }
        let next = (i32::from(self.analysis_scroll) + delta).clamp(0, i32::from(u16::MAX));
        self.analysis_scroll = next as u16;
    }

    pub fn close_analysis(&mut self) -> bool {
        self.expanded.take().is_some()
    }

    pub fn selected_analysis(&self) -> Option<AnalysisRecord> {
        let index = self.expanded?;
        let loaded = self.table.as_ref()?;
        if !loaded.summaries().get(index)?.has_analysis {
            return None;
        }
        loaded.analysis(index)
    }
}
