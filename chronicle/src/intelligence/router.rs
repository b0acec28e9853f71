use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analyzer::{QueryAnalysis, QueryAnalyzer};
use super::temporal::{MatchedPattern, TemporalParse, TemporalParser};
use crate::config::QueryConfig;
use crate::models::{AggregationOp, DataType, DateRange, RoutingStrategy};

/// Everything an executor needs to answer one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub strategy: RoutingStrategy,
    pub data_type: Option<DataType>,
    pub date_range: Option<DateRange>,
    pub activity: Option<String>,
    /// Period A and period B for comparison questions.
    pub comparison: Option<(DateRange, DateRange)>,
    pub aggregation: AggregationOp,
    pub metric: Option<String>,
    /// Neighbour count; set on the vector path only.
    pub top_k: Option<u32>,
    pub analysis: QueryAnalysis,
    pub matched_pattern: Option<MatchedPattern>,
}

/// Fixed-priority decision table over analyzer and temporal output.
pub struct QueryRouter {
    analyzer: QueryAnalyzer,
    temporal: TemporalParser,
    vector_top_k: u32,
    degraded_top_k: u32,
}

impl QueryRouter {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(),
            temporal: TemporalParser::new(),
            vector_top_k: config.vector_top_k,
            degraded_top_k: config.degraded_top_k,
        }
    }

    pub fn route(&self, text: &str, now: DateTime<Utc>) -> RoutingDecision {
        let analysis = self.analyzer.analyze(text);
        let temporal = self.temporal.parse(text, now);
        let comparison = if analysis.is_comparison {
            self.temporal.comparison_periods(text, now)
        } else {
            None
        };

        let decision = self.decide(analysis, temporal, comparison);

        tracing::debug!(
            strategy = %decision.strategy,
            data_type = ?decision.data_type,
            date_range = %DateRange::describe(decision.date_range.as_ref()),
            activity = ?decision.activity,
            top_k = ?decision.top_k,
            "Routed query"
        );

        decision
    }

    /// First satisfied rule wins:
    ///
    /// 1. count + data type
    /// 2. aggregation + data type
    /// 3. comparison + two periods + data type
    /// 4. pattern + data type
    /// 5. vector search
    pub fn decide(
        &self,
        analysis: QueryAnalysis,
        temporal: TemporalParse,
        comparison: Option<(DateRange, DateRange)>,
    ) -> RoutingDecision {
        let data_type = analysis.suggested_data_type;
        let known = data_type.is_some();

        let strategy = if analysis.is_count && known {
            RoutingStrategy::DirectCount
        } else if analysis.is_aggregation && known {
            RoutingStrategy::DirectAggregation
        } else if analysis.is_comparison && comparison.is_some() && known {
            RoutingStrategy::DirectComparison
        } else if analysis.is_pattern && known {
            RoutingStrategy::DirectPattern
        } else {
            RoutingStrategy::VectorSearch
        };

        let top_k = match strategy {
            RoutingStrategy::VectorSearch if analysis.has_numeric_intent() && !known => {
                Some(self.degraded_top_k)
            }
            RoutingStrategy::VectorSearch => Some(self.vector_top_k),
            _ => None,
        };

        RoutingDecision {
            strategy,
            data_type,
            date_range: temporal.range,
            activity: analysis.activity.clone(),
            comparison: if strategy == RoutingStrategy::DirectComparison {
                comparison
            } else {
                None
            },
            aggregation: analysis.aggregation,
            metric: analysis.metric.clone(),
            top_k,
            matched_pattern: temporal.matched_pattern,
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn router() -> QueryRouter {
        QueryRouter {
            analyzer: QueryAnalyzer::new(),
            temporal: TemporalParser::new(),
            vector_top_k: 10,
            degraded_top_k: 50,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap()
    }

    fn analysis(data_type: Option<DataType>) -> QueryAnalysis {
        QueryAnalysis {
            suggested_data_type: data_type,
            ..Default::default()
        }
    }

    fn periods() -> Option<(DateRange, DateRange)> {
        let a = DateRange::day(chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let b = DateRange::day(chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        Some((a, b))
    }

    #[test]
    fn test_count_with_data_type_is_never_vector() {
        let router = router();
        let decision = router.decide(
            QueryAnalysis {
                is_count: true,
                is_aggregation: true,
                is_pattern: true,
                ..analysis(Some(DataType::Health))
            },
            TemporalParse::default(),
            None,
        );

        assert_eq!(decision.strategy, RoutingStrategy::DirectCount);
        assert_eq!(decision.top_k, None);
    }

    #[test]
    fn test_decision_table_order() {
        let router = router();

        let decision = router.decide(
            QueryAnalysis {
                is_aggregation: true,
                is_comparison: true,
                ..analysis(Some(DataType::Health))
            },
            TemporalParse::default(),
            periods(),
        );
        assert_eq!(decision.strategy, RoutingStrategy::DirectAggregation);

        let decision = router.decide(
            QueryAnalysis {
                is_comparison: true,
                is_pattern: true,
                ..analysis(Some(DataType::Location))
            },
            TemporalParse::default(),
            periods(),
        );
        assert_eq!(decision.strategy, RoutingStrategy::DirectComparison);
        assert_eq!(decision.comparison, periods());

        let decision = router.decide(
            QueryAnalysis {
                is_comparison: true,
                is_pattern: true,
                ..analysis(Some(DataType::Location))
            },
            TemporalParse::default(),
            None,
        );
        assert_eq!(decision.strategy, RoutingStrategy::DirectPattern);
        assert_eq!(decision.comparison, None);
    }

    #[test]
    fn test_numeric_intent_without_data_type_degrades() {
        let router = router();
        let decision = router.decide(
            QueryAnalysis {
                is_count: true,
                ..analysis(None)
            },
            TemporalParse::default(),
            None,
        );

        assert_eq!(decision.strategy, RoutingStrategy::VectorSearch);
        assert_eq!(decision.top_k, Some(50));
    }

    #[test]
    fn test_recall_question_routes_to_vector_search() {
        let decision = router().route("What did I talk about with Sarah at dinner?", now());

        assert_eq!(decision.strategy, RoutingStrategy::VectorSearch);
        assert_eq!(decision.top_k, Some(10));
        assert_eq!(decision.data_type, None);
        assert_eq!(decision.date_range, None);
    }

    #[test]
    fn test_voice_count_routes_direct() {
        let router = router();
        for question in ["How many voice notes did I record yesterday?", "我昨天录了几条语音？"] {
            let decision = router.route(question, now());
            assert_eq!(decision.strategy, RoutingStrategy::DirectCount, "{question}");
            assert_eq!(decision.data_type, Some(DataType::Voice));
            assert_eq!(
                decision.date_range,
                Some(DateRange::day(chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()))
            );
        }
    }

    #[test]
    fn test_badminton_this_week_resolves_location() {
        let decision = router().route("badminton this week", now());
        assert_eq!(decision.data_type, Some(DataType::Location));
        assert_eq!(decision.activity.as_deref(), Some("badminton"));
    }

    #[test]
    fn test_comparison_question_resolves_both_periods() {
        let decision = router().route("Compare badminton this week vs last week", now());

        assert_eq!(decision.strategy, RoutingStrategy::DirectComparison);
        let (a, b) = decision.comparison.unwrap();
        assert!(a.start > b.end);
    }

    #[test]
    fn test_correlation_question_goes_to_vector_search() {
        let decision = router().route("Is there a correlation between my mood and the weather?", now());
        assert_eq!(decision.strategy, RoutingStrategy::VectorSearch);
    }
}
