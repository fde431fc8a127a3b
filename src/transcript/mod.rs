pub mod analysis;
pub mod content;
pub mod field;
pub mod projector;
pub mod resolver;
pub mod table;
pub mod timefmt;

pub use analysis::{assemble, has_analysis, AnalysisRecord, DimensionSection, ScoreBand};
pub use field::{Dimension, LogicalField};
pub use projector::{project_summary, SUMMARY_COLUMNS};
pub use resolver::FieldResolver;
pub use table::{ColumnSchema, PageMeta, Table, TranscriptionPage};
