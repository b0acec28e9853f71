use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::language_packs::{compile_phrases, AgoUnit, Language, LanguagePack, PACKS};
use crate::models::DateRange;

/// Which relative phrase resolved a range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TemporalKind {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Ago { amount: u32, unit: AgoUnit },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPattern {
    pub kind: TemporalKind,
    pub language: Language,
    /// The text that matched, as written.
    pub phrase: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalParse {
    pub range: Option<DateRange>,
    pub matched_pattern: Option<MatchedPattern>,
}

/// One period mention found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodMention {
    pub range: DateRange,
    pub pattern: MatchedPattern,
    pub offset: usize,
}

/// Priority of fixed phrases: day, then week, then month.
const FIXED_KINDS: [TemporalKind; 6] = [
    TemporalKind::Today,
    TemporalKind::Yesterday,
    TemporalKind::ThisWeek,
    TemporalKind::LastWeek,
    TemporalKind::ThisMonth,
    TemporalKind::LastMonth,
];

struct CompiledTemporal {
    language: Language,
    fixed: Vec<(TemporalKind, Regex)>,
    ago: Option<Regex>,
    ago_units: &'static [(&'static str, AgoUnit)],
}

impl CompiledTemporal {
    fn compile(pack: &LanguagePack) -> Self {
        let phrases = &pack.temporal;
        let fixed = FIXED_KINDS
            .into_iter()
            .filter_map(|kind| {
                let list = match kind {
                    TemporalKind::Today => phrases.today,
                    TemporalKind::Yesterday => phrases.yesterday,
                    TemporalKind::ThisWeek => phrases.this_week,
                    TemporalKind::LastWeek => phrases.last_week,
                    TemporalKind::ThisMonth => phrases.this_month,
                    TemporalKind::LastMonth => phrases.last_month,
                    TemporalKind::Ago { .. } => return None,
                };
                compile_phrases(pack.script, list).map(|re| (kind, re))
            })
            .collect();

        let ago = match Regex::new(&format!("(?i){}", phrases.ago)) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(language = %pack.language, error = %e, "Invalid ago pattern");
                None
            }
        };

        Self {
            language: pack.language,
            fixed,
            ago,
            ago_units: phrases.ago_units,
        }
    }

    fn ago_kind(&self, caps: &regex::Captures<'_>) -> Option<TemporalKind> {
        let amount: u32 = caps.name("n")?.as_str().parse().ok()?;
        let unit_text = caps.name("unit")?.as_str().to_lowercase();
        let unit = self
            .ago_units
            .iter()
            .find(|(text, _)| *text == unit_text)
            .map(|(_, unit)| *unit)?;
        Some(TemporalKind::Ago { amount, unit })
    }
}

/// Resolves relative time phrases in any supported language to UTC ranges.
///
/// Weeks start on Sunday. `this week` and `this month` end at `now`.
pub struct TemporalParser {
    packs: Vec<CompiledTemporal>,
}

impl TemporalParser {
    pub fn new() -> Self {
        Self {
            packs: PACKS.iter().map(CompiledTemporal::compile).collect(),
        }
    }

    /// First match by priority: day > week > month > "N units ago".
    pub fn parse(&self, text: &str, now: DateTime<Utc>) -> TemporalParse {
        for kind in FIXED_KINDS {
            for pack in &self.packs {
                let Some((_, re)) = pack.fixed.iter().find(|(k, _)| *k == kind) else {
                    continue;
                };
                if let Some(m) = re.find(text) {
                    if let Some(range) = resolve(kind, now) {
                        return TemporalParse {
                            range: Some(range),
                            matched_pattern: Some(MatchedPattern {
                                kind,
                                language: pack.language,
                                phrase: m.as_str().to_string(),
                            }),
                        };
                    }
                }
            }
        }

        for pack in &self.packs {
            let Some(re) = &pack.ago else { continue };
            for caps in re.captures_iter(text) {
                let Some(kind) = pack.ago_kind(&caps) else { continue };
                if let Some(range) = resolve(kind, now) {
                    return TemporalParse {
                        range: Some(range),
                        matched_pattern: Some(MatchedPattern {
                            kind,
                            language: pack.language,
                            phrase: caps[0].to_string(),
                        }),
                    };
                }
            }
        }

        TemporalParse::default()
    }

    /// Every non-overlapping period mention, in text order.
    pub fn parse_all(&self, text: &str, now: DateTime<Utc>) -> Vec<PeriodMention> {
        let mut found: Vec<(usize, usize, PeriodMention)> = Vec::new();

        for pack in &self.packs {
            for (kind, re) in &pack.fixed {
                for m in re.find_iter(text) {
                    if let Some(range) = resolve(*kind, now) {
                        found.push((
                            m.start(),
                            m.end(),
                            PeriodMention {
                                range,
                                pattern: MatchedPattern {
                                    kind: *kind,
                                    language: pack.language,
                                    phrase: m.as_str().to_string(),
                                },
                                offset: m.start(),
                            },
                        ));
                    }
                }
            }
            if let Some(re) = &pack.ago {
                for caps in re.captures_iter(text) {
                    let (Some(whole), Some(kind)) = (caps.get(0), pack.ago_kind(&caps)) else {
                        continue;
                    };
                    if let Some(range) = resolve(kind, now) {
                        found.push((
                            whole.start(),
                            whole.end(),
                            PeriodMention {
                                range,
                                pattern: MatchedPattern {
                                    kind,
                                    language: pack.language,
                                    phrase: whole.as_str().to_string(),
                                },
                                offset: whole.start(),
                            },
                        ));
                    }
                }
            }
        }

        // Earliest first; at the same offset the longer phrase wins.
        found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut mentions = Vec::new();
        let mut covered_until = 0usize;
        for (start, end, mention) in found {
            if !mentions.is_empty() && start < covered_until {
                continue;
            }
            covered_until = end;
            mentions.push(mention);
        }
        mentions
    }

    /// The two periods a comparison question contrasts.
    ///
    /// The second period is the first later mention disjoint from the first.
    /// Without one, it is the period right before the first mention.
    pub fn comparison_periods(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Option<(DateRange, DateRange)> {
        let mentions = self.parse_all(text, now);
        let first = mentions.first()?;

        if let Some(second) = mentions.iter().skip(1).find(|m| !m.range.overlaps(&first.range)) {
            return Some((first.range, second.range));
        }

        let previous = preceding(first.pattern.kind, now)?;
        Some((first.range, previous))
    }
}

impl Default for TemporalParser {
    fn default() -> Self {
        Self::new()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    DateRange::day(date).start
}

fn sunday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// Whole week starting on `sunday`.
fn week_range(sunday: NaiveDate) -> Option<DateRange> {
    let start = start_of_day(sunday);
    DateRange::new(start, start + Duration::days(7) - Duration::milliseconds(1))
}

/// Whole calendar month starting on `first`.
fn month_range(first: NaiveDate) -> Option<DateRange> {
    let next = first.checked_add_months(Months::new(1))?;
    DateRange::new(
        start_of_day(first),
        start_of_day(next) - Duration::milliseconds(1),
    )
}

fn ago_date(amount: u32, unit: AgoUnit, today: NaiveDate) -> Option<NaiveDate> {
    match unit {
        AgoUnit::Day => today.checked_sub_signed(Duration::try_days(i64::from(amount))?),
        AgoUnit::Week => today.checked_sub_signed(Duration::try_days(i64::from(amount) * 7)?),
        AgoUnit::Month => today.checked_sub_months(Months::new(amount)),
    }
}

/// Absolute range for a phrase kind evaluated at `now`.
pub fn resolve(kind: TemporalKind, now: DateTime<Utc>) -> Option<DateRange> {
    let today = now.date_naive();
    match kind {
        TemporalKind::Today => Some(DateRange::day(today)),
        TemporalKind::Yesterday => Some(DateRange::day(today.pred_opt()?)),
        TemporalKind::ThisWeek => DateRange::new(start_of_day(sunday_of_week(today)), now),
        TemporalKind::LastWeek => week_range(sunday_of_week(today) - Duration::days(7)),
        TemporalKind::ThisMonth => DateRange::new(start_of_day(first_of_month(today)?), now),
        TemporalKind::LastMonth => {
            month_range(first_of_month(today)?.checked_sub_months(Months::new(1))?)
        }
        TemporalKind::Ago { amount, unit } => Some(DateRange::day(ago_date(amount, unit, today)?)),
    }
}

/// The period immediately before `kind`, with the same granularity.
pub fn preceding(kind: TemporalKind, now: DateTime<Utc>) -> Option<DateRange> {
    let today = now.date_naive();
    match kind {
        TemporalKind::Today => resolve(TemporalKind::Yesterday, now),
        TemporalKind::Yesterday => Some(DateRange::day(today.pred_opt()?.pred_opt()?)),
        TemporalKind::ThisWeek => resolve(TemporalKind::LastWeek, now),
        TemporalKind::LastWeek => week_range(sunday_of_week(today) - Duration::days(14)),
        TemporalKind::ThisMonth => resolve(TemporalKind::LastMonth, now),
        TemporalKind::LastMonth => {
            month_range(first_of_month(today)?.checked_sub_months(Months::new(2))?)
        }
        TemporalKind::Ago { amount, unit } => {
            Some(DateRange::day(ago_date(amount, unit, today)?.pred_opt()?))
        }
    }
}
