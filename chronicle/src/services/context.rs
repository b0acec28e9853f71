use std::fmt::Write as _;

use super::executors::{DirectQueryResult, WEEKDAY_NAMES};
use crate::config::QueryConfig;
use crate::intelligence::RoutingDecision;
use crate::models::{
    format_timestamp, truncate_chars, AssembledContext, ComparisonMeasure, DataType, DateRange,
    ExactValue, RoutingMetadata, SourceItem,
};

pub const NO_MATCHING_DATA: &str = "No matching data found.";

/// Packages either path's output into a bounded context for the answer writer.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_chars: usize,
    max_sources: usize,
}

impl ContextAssembler {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            max_chars: config.max_context_chars,
            max_sources: config.max_sources,
        }
    }

    /// States the exact value first, then lists the records it came from.
    pub fn assemble_direct(
        &self,
        decision: &RoutingDecision,
        result: DirectQueryResult,
    ) -> AssembledContext {
        let header = describe_exact(&result);
        let (text, sources) = self.fit(&header, result.sources, |i, source| {
            format!("{}. {}", i + 1, source.snippet)
        });

        AssembledContext {
            text,
            sources,
            routing: RoutingMetadata {
                was_direct_query: true,
                direct_query_type: Some(result.query_type),
                exact_value: Some(result.value),
                strategy: decision.strategy,
                data_type: Some(result.data_type),
                date_range: result.date_range,
            },
        }
    }

    pub fn assemble_vector(
        &self,
        decision: &RoutingDecision,
        sources: Vec<SourceItem>,
    ) -> AssembledContext {
        let routing = RoutingMetadata {
            was_direct_query: false,
            direct_query_type: None,
            exact_value: None,
            strategy: decision.strategy,
            data_type: decision.data_type,
            date_range: decision.date_range,
        };

        if sources.is_empty() {
            return AssembledContext {
                text: truncate_chars(NO_MATCHING_DATA, self.max_chars),
                sources,
                routing,
            };
        }

        let (text, sources) = self.fit(
            "Relevant records, most relevant first:",
            sources,
            |i, source| format!("{}. {} (similarity {:.2})", i + 1, source.snippet, source.score),
        );

        AssembledContext {
            text,
            sources,
            routing,
        }
    }

    /// Drops the lowest-ranked sources until the text fits; a lone source
    /// that still overflows has its snippet cut instead.
    fn fit(
        &self,
        header: &str,
        mut sources: Vec<SourceItem>,
        line: impl Fn(usize, &SourceItem) -> String,
    ) -> (String, Vec<SourceItem>) {
        sources.truncate(self.max_sources);

        loop {
            let text = render(header, &sources, &line);
            let len = text.chars().count();
            if len <= self.max_chars {
                return (text, sources);
            }
            if sources.is_empty() {
                return (truncate_chars(&text, self.max_chars), sources);
            }

            if sources.len() > 1 {
                sources.pop();
                continue;
            }

            let overflow = len - self.max_chars;
            let current = sources[0].snippet.chars().count();
            if overflow >= current {
                // Header alone is over budget.
                sources.clear();
                let text = truncate_chars(&render(header, &sources, &line), self.max_chars);
                return (text, sources);
            }

            sources[0].snippet = truncate_chars(&sources[0].snippet, current - overflow);
            let text = truncate_chars(&render(header, &sources, &line), self.max_chars);
            return (text, sources);
        }
    }
}

fn render(
    header: &str,
    sources: &[SourceItem],
    line: &impl Fn(usize, &SourceItem) -> String,
) -> String {
    let mut text = header.to_string();
    for (i, source) in sources.iter().enumerate() {
        text.push('\n');
        text.push_str(&line(i, source));
    }
    text
}

/// The exact value as a sentence the answer writer can quote.
pub fn describe_exact(result: &DirectQueryResult) -> String {
    let data_type = result.data_type;
    let period = describe_period(result.date_range.as_ref());
    let mut text = String::from("Exact answer computed from the user's records. ");

    match &result.value {
        ExactValue::Count { count } => {
            let _ = write!(text, "Count: {count} {} {period}.", records(data_type, *count));
        }
        ExactValue::Aggregation {
            op,
            metric,
            value,
            samples,
        } => match value {
            Some(value) => {
                let _ = write!(
                    text,
                    "The {op} of {metric} across {samples} {} {period} is {}.",
                    records(data_type, *samples),
                    format_number(*value)
                );
            }
            None => {
                let _ = write!(
                    text,
                    "No {data_type} records {period} carry {metric}, so there is no {op}."
                );
            }
        },
        ExactValue::Comparison {
            measure,
            period_a,
            period_b,
            diff,
            period_a_range,
            period_b_range,
        } => {
            let what = match measure {
                ComparisonMeasure::Count => format!("{data_type} record count"),
                ComparisonMeasure::Aggregation => format!("{data_type} aggregate"),
            };
            let _ = write!(
                text,
                "Comparison of {what}: period A ({}) = {}, period B ({}) = {}, difference A minus B = {}.",
                describe_range(period_a_range),
                format_number(*period_a),
                describe_range(period_b_range),
                format_number(*period_b),
                format_number(*diff)
            );
        }
        ExactValue::Pattern {
            total,
            by_weekday,
            by_hour,
            peak_weekday,
            peak_hour,
        } => {
            let _ = write!(
                text,
                "Pattern over {total} {} {period} (UTC).",
                records(data_type, *total)
            );
            if let (Some(day), Some(hour)) = (peak_weekday, peak_hour) {
                let _ = write!(text, " Most frequent weekday: {day}. Most frequent hour: {hour:02}:00.");
            }
            let weekdays: Vec<String> = by_weekday
                .iter()
                .zip(WEEKDAY_NAMES)
                .map(|(n, day)| format!("{day} {n}"))
                .collect();
            let _ = write!(text, " By weekday: {}.", weekdays.join(", "));
            let hours: Vec<String> = by_hour
                .iter()
                .enumerate()
                .filter(|&(_, &n)| n > 0)
                .map(|(hour, n)| format!("{hour:02}:00 {n}"))
                .collect();
            if !hours.is_empty() {
                let _ = write!(text, " By hour: {}.", hours.join(", "));
            }
        }
    }

    text.push_str(" State this value as given; do not recompute it from the records below.");
    if !result.sources.is_empty() {
        text.push_str("\nSupporting records:");
    }
    text
}

fn records(data_type: DataType, n: u64) -> String {
    if n == 1 {
        format!("{data_type} record")
    } else {
        format!("{data_type} records")
    }
}

fn describe_period(range: Option<&DateRange>) -> String {
    match range {
        Some(range) => format!("between {}", describe_range(range)),
        None => "across all time".to_string(),
    }
}

fn describe_range(range: &DateRange) -> String {
    format!(
        "{} and {}",
        format_timestamp(&range.start),
        format_timestamp(&range.end)
    )
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
