use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{content_text, has_content};
use super::field::{Dimension, Facet, LogicalField};
use super::resolver::FieldResolver;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Moderate,
    NeedsAttention,
}

impl ScoreBand {
    pub fn from_value(value: f64) -> Self {
        if value >= 8.0 {
            ScoreBand::Strong
        } else if value >= 6.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::NeedsAttention
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Moderate => "moderate",
            ScoreBand::NeedsAttention => "needs attention",
        }
    }
}

/// A score cell that has content. `value` is `None` when the text is not a
/// finite number, in which case the raw text is still shown.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub raw: String,
    pub value: Option<f64>,
}

impl Score {
    pub fn from_cell(value: Option<&Value>) -> Option<Self> {
        let raw = content_text(value)?;
        let parsed = match value {
            Some(Value::Number(n)) => n.as_f64(),
            _ => raw.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite());
        Some(Self { raw, value: parsed })
    }

    pub fn band(&self) -> Option<ScoreBand> {
        self.value.map(ScoreBand::from_value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.raw.trim())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DimensionSection {
    pub dimension: Dimension,
    pub detail: Option<String>,
    pub positive: Option<String>,
    pub negative: Option<String>,
    pub suggestions: Option<String>,
    pub score: Option<Score>,
}

impl DimensionSection {
    fn assemble(row: &[Value], resolver: &FieldResolver, dimension: Dimension) -> Self {
        let text = |facet| content_text(resolver.get(row, LogicalField::Dimension(dimension, facet)));
        Self {
            dimension,
            detail: text(Facet::Analysis),
            positive: text(Facet::PositiveExample),
            negative: text(Facet::NegativeExample),
            suggestions: text(Facet::Suggestions),
            score: Score::from_cell(
                resolver.get(row, LogicalField::Dimension(dimension, Facet::Score)),
            ),
        }
    }

    /// A section is worth showing when any of its five fields has content;
    /// a score alone is enough.
    pub fn is_offerable(&self) -> bool {
        self.detail.is_some()
            || self.positive.is_some()
            || self.negative.is_some()
            || self.suggestions.is_some()
            || self.score.is_some()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OverallSummary {
    pub overall_score: Option<Score>,
    pub strengths: Option<String>,
    pub areas_for_improvement: Option<String>,
}

impl OverallSummary {
    pub fn is_offerable(&self) -> bool {
        self.overall_score.is_some()
            || self.strengths.is_some()
            || self.areas_for_improvement.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRecord {
    pub sections: [DimensionSection; 5],
    pub overall: OverallSummary,
    pub transcription: Option<String>,
}

impl AnalysisRecord {
    #[allow(dead_code)]
    pub fn section(&self, dimension: Dimension) -> &DimensionSection {
        let index = Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .unwrap_or_default();
        &self.sections[index]
    }

    pub fn offerable_sections(&self) -> impl Iterator<Item = &DimensionSection> {
        self.sections.iter().filter(|section| section.is_offerable())
    }

    pub fn has_any_content(&self) -> bool {
        self.overall.is_offerable()
            || self.transcription.is_some()
            || self.sections.iter().any(DimensionSection::is_offerable)
    }
}

pub fn assemble(row: &[Value], resolver: &FieldResolver) -> AnalysisRecord {
    let top = |field| content_text(resolver.get(row, field));
    AnalysisRecord {
        sections: Dimension::ALL.map(|dim| DimensionSection::assemble(row, resolver, dim)),
        overall: OverallSummary {
            overall_score: Score::from_cell(resolver.get(row, LogicalField::OverallScore)),
            strengths: top(LogicalField::Strengths),
            areas_for_improvement: top(LogicalField::AreasForImprovement),
        },
        transcription: top(LogicalField::Transcription),
    }
}

pub fn has_analysis(row: &[Value], resolver: &FieldResolver) -> bool {
    LogicalField::analysis_fields().any(|field| has_content(resolver.get(row, field)))
}
