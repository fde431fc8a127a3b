use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Dimension {
    Pitch,
    Confidence,
    Tonality,
    Energy,
    ObjectionHandling,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Pitch,
        Dimension::Confidence,
        Dimension::Tonality,
        Dimension::Energy,
        Dimension::ObjectionHandling,
    ];

    /// Column prefixes in lookup order. The backend names the pitch columns
    /// `pitch_followed_*`; plain `pitch_*` is accepted as a fallback.
    pub fn column_prefixes(self) -> &'static [&'static str] {
        match self {
            Dimension::Pitch => &["pitch_followed", "pitch"],
            Dimension::Confidence => &["confidence"],
            Dimension::Tonality => &["tonality"],
            Dimension::Energy => &["energy"],
            Dimension::ObjectionHandling => &["objection_handling"],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Pitch => "Pitch Quality",
            Dimension::Confidence => "Confidence Level",
            Dimension::Tonality => "Tonality",
            Dimension::Energy => "Energy Level",
            Dimension::ObjectionHandling => "Objection Handling",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Facet {
    Analysis,
    PositiveExample,
    NegativeExample,
    Suggestions,
    Score,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Analysis,
        Facet::PositiveExample,
        Facet::NegativeExample,
        Facet::Suggestions,
        Facet::Score,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Facet::Analysis => "analysis",
            Facet::PositiveExample => "positive_example",
            Facet::NegativeExample => "negative_example",
            Facet::Suggestions => "suggestions",
            Facet::Score => "score",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Id,
    Name,
    Time,
    Strengths,
    AreasForImprovement,
    OverallScore,
    Transcription,
    Dimension(Dimension, Facet),
}

impl LogicalField {
    pub const TOP_LEVEL: [LogicalField; 4] = [
        LogicalField::Strengths,
        LogicalField::AreasForImprovement,
        LogicalField::OverallScore,
        LogicalField::Transcription,
    ];

    /// Every field that counts towards "this row has analysis": the 25
    /// dimension fields followed by the 4 top-level fields.
    pub fn analysis_fields() -> impl Iterator<Item = LogicalField> {
        Dimension::ALL
            .into_iter()
            .flat_map(|dim| {
                Facet::ALL
                    .into_iter()
                    .map(move |facet| LogicalField::Dimension(dim, facet))
            })
            .chain(Self::TOP_LEVEL)
    }

    pub fn column_names(self) -> Vec<String> {
        let fixed = match self {
            LogicalField::Id => "id",
            LogicalField::Name => "name",
            LogicalField::Time => "time",
            LogicalField::Strengths => "strengths",
            LogicalField::AreasForImprovement => "areas_for_improvement",
            LogicalField::OverallScore => "overall_score",
            LogicalField::Transcription => "transcription",
            LogicalField::Dimension(dim, facet) => {
                return dim
                    .column_prefixes()
                    .iter()
                    .map(|prefix| format!("{prefix}_{}", facet.suffix()))
                    .collect();
            }
        };
        vec![fixed.to_string()]
    }
}
