use regex::Regex;
use serde::{Deserialize, Serialize};

use super::language_packs::{compile_phrases, Language, LanguagePack, PACKS};
use crate::models::{AggregationOp, DataType, Intent};

/// Data types in the order they win when several match.
const DATA_TYPE_PRECEDENCE: [DataType; 6] = [
    DataType::Voice,
    DataType::Photo,
    DataType::Health,
    DataType::Location,
    DataType::Text,
    DataType::Event,
];

/// Intent flags and hints extracted from one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    pub is_count: bool,
    pub is_aggregation: bool,
    pub is_comparison: bool,
    pub is_pattern: bool,
    pub suggested_data_type: Option<DataType>,
    /// Canonical activity tag, e.g. "badminton" for "羽毛球".
    pub activity: Option<String>,
    pub aggregation: AggregationOp,
    /// Health metric field the question names, if any.
    pub metric: Option<String>,
    /// Packs that contributed at least one match.
    pub languages: Vec<Language>,
}

impl QueryAnalysis {
    /// Primary intent, in routing priority order.
    pub fn intent(&self) -> Intent {
        if self.is_count {
            Intent::Count
        } else if self.is_aggregation {
            Intent::Aggregation
        } else if self.is_comparison {
            Intent::Comparison
        } else if self.is_pattern {
            Intent::Pattern
        } else {
            Intent::Other
        }
    }

    pub fn has_numeric_intent(&self) -> bool {
        self.is_count || self.is_aggregation || self.is_comparison || self.is_pattern
    }
}

struct CompiledPack {
    language: Language,
    count: Option<Regex>,
    aggregation: Option<Regex>,
    average: Option<Regex>,
    maximum: Option<Regex>,
    minimum: Option<Regex>,
    comparison: Option<Regex>,
    pattern: Option<Regex>,
    data_types: Vec<(DataType, Regex)>,
    metrics: Vec<(&'static str, Regex)>,
    activities: Vec<(&'static str, Regex)>,
}

impl CompiledPack {
    fn compile(pack: &LanguagePack) -> Self {
        let script = pack.script;
        Self {
            language: pack.language,
            count: compile_phrases(script, pack.count),
            aggregation: compile_phrases(script, pack.aggregation),
            average: compile_phrases(script, pack.average),
            maximum: compile_phrases(script, pack.maximum),
            minimum: compile_phrases(script, pack.minimum),
            comparison: compile_phrases(script, pack.comparison),
            pattern: compile_phrases(script, pack.pattern),
            data_types: pack
                .data_types
                .iter()
                .filter_map(|(dt, phrases)| compile_phrases(script, phrases).map(|re| (*dt, re)))
                .collect(),
            metrics: pack
                .metrics
                .iter()
                .filter_map(|(name, phrases)| compile_phrases(script, phrases).map(|re| (*name, re)))
                .collect(),
            activities: pack
                .activities
                .iter()
                .filter_map(|(tag, phrases)| compile_phrases(script, phrases).map(|re| (*tag, re)))
                .collect(),
        }
    }
}

fn hit(re: &Option<Regex>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

/// Keyword analysis across every language pack at once.
pub struct QueryAnalyzer {
    packs: Vec<CompiledPack>,
}

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self {
            packs: PACKS.iter().map(CompiledPack::compile).collect(),
        }
    }

    pub fn analyze(&self, text: &str) -> QueryAnalysis {
        let text = text.trim();
        if text.is_empty() {
            return QueryAnalysis::default();
        }

        let mut analysis = QueryAnalysis::default();
        let mut matched_types: Vec<DataType> = Vec::new();
        let mut has_avg = false;
        let mut has_max = false;
        let mut has_min = false;

        for pack in &self.packs {
            let mut matched = false;

            if hit(&pack.count, text) {
                analysis.is_count = true;
                matched = true;
            }
            if hit(&pack.aggregation, text) {
                analysis.is_aggregation = true;
                matched = true;
            }
            if hit(&pack.comparison, text) {
                analysis.is_comparison = true;
                matched = true;
            }
            if hit(&pack.pattern, text) {
                analysis.is_pattern = true;
                matched = true;
            }
            if hit(&pack.average, text) {
                has_avg = true;
                matched = true;
            }
            if hit(&pack.maximum, text) {
                has_max = true;
                matched = true;
            }
            if hit(&pack.minimum, text) {
                has_min = true;
                matched = true;
            }

            for (data_type, re) in &pack.data_types {
                if re.is_match(text) {
                    matched_types.push(*data_type);
                    matched = true;
                }
            }

            if analysis.activity.is_none() {
                if let Some((tag, _)) = pack.activities.iter().find(|(_, re)| re.is_match(text)) {
                    analysis.activity = Some((*tag).to_string());
                    matched = true;
                }
            }

            if matched {
                analysis.languages.push(pack.language);
            }
        }

        // Op keywords are aggregation keywords in their own right.
        if has_avg || has_max || has_min {
            analysis.is_aggregation = true;
        }
        analysis.aggregation = if has_avg {
            AggregationOp::Avg
        } else if has_max {
            AggregationOp::Max
        } else if has_min {
            AggregationOp::Min
        } else {
            AggregationOp::Sum
        };

        analysis.suggested_data_type = if analysis.activity.is_some() {
            Some(DataType::Location)
        } else {
            DATA_TYPE_PRECEDENCE
                .into_iter()
                .find(|dt| matched_types.contains(dt))
        };

        if analysis.suggested_data_type == Some(DataType::Health) {
            analysis.metric = self.find_metric(text);
        }

        tracing::trace!(
            intent = ?analysis.intent(),
            data_type = ?analysis.suggested_data_type,
            activity = ?analysis.activity,
            languages = ?analysis.languages,
            "Analyzed query"
        );

        analysis
    }

    fn find_metric(&self, text: &str) -> Option<String> {
        self.packs.iter().find_map(|pack| {
            pack.metrics
                .iter()
                .find(|(_, re)| re.is_match(text))
                .map(|(name, _)| (*name).to_string())
        })
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
