//! Mood aggregation: statistics, trend, daily series, insights.
//!
//! Everything here is a pure transform over an immutable entry list. The
//! engine never mutates its input, never performs IO, and never fails:
//! empty or sparse input yields defined-zero defaults.

use chrono::NaiveDate;
use mindmate_core::types::MoodEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entries per trend window (recent vs previous).
const TREND_WINDOW: usize = 3;
/// Distinct calendar days kept in the chart series.
const DAILY_SERIES_DAYS: usize = 7;
/// Entries kept in the calendar/heatmap recency window.
const INTENSITY_WINDOW: usize = 30;

/// Averaged mood for one calendar day with at least one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMood {
    pub date: NaiveDate,
    /// Mean score for the day, rounded to one decimal.
    pub average_score: f64,
    /// Number of entries logged that day.
    pub entries: usize,
}

/// An advisory generated from aggregate statistics.
///
/// The variant order is the evaluation *and* presentation order: matching
/// insights are always returned in this sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    PositiveStreak,
    SelfCare,
    UpwardTrend,
    ConsistentLogging,
}

impl Insight {
    /// User-facing advisory text.
    pub fn message(self) -> &'static str {
        match self {
            Insight::PositiveStreak => {
                "You've been feeling great lately. Whatever you're doing, it's working — keep it up!"
            }
            Insight::SelfCare => {
                "The past days look heavy. Be gentle with yourself, and consider a small act of self-care today."
            }
            Insight::UpwardTrend => "Your mood is trending upward. Keep doing what you're doing!",
            Insight::ConsistentLogging => {
                "You're building a steady logging habit. Checking in regularly is a powerful first step."
            }
        }
    }
}

/// Derived view over a mood entry list. Recomputed wholesale on every
/// change to the input; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Mean of all scores, rounded to one decimal; 0 when empty.
    pub average: f64,
    pub count: usize,
    /// Recent-window mean minus previous-window mean, rounded to one
    /// decimal; 0 until a full previous window exists.
    pub trend_delta: f64,
    /// Most recent distinct days with entries, oldest first.
    pub daily_series: Vec<DailyMood>,
    /// Matching advisory rules, in evaluation order.
    pub insights: Vec<Insight>,
    /// Most recent entries as display intensities 1–5, oldest first.
    pub recent_intensities: Vec<u8>,
    /// Day with the highest average in the series.
    pub best_day: Option<NaiveDate>,
    /// Day with the lowest average in the series.
    pub worst_day: Option<NaiveDate>,
}

/// Compute the full derived view for an entry list.
///
/// Input order does not matter; entries are sorted by timestamp internally.
pub fn snapshot(entries: &[MoodEntry]) -> AnalyticsSnapshot {
    let mut sorted: Vec<&MoodEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);

    let count = sorted.len();
    let average = if count == 0 {
        0.0
    } else {
        round1(sorted.iter().map(|e| f64::from(e.score)).sum::<f64>() / count as f64)
    };

    let trend_delta = trend_delta(&sorted);
    let daily_series = daily_series(&sorted);

    let best_day = daily_series
        .iter()
        .max_by(|a, b| a.average_score.total_cmp(&b.average_score))
        .map(|d| d.date);
    let worst_day = daily_series
        .iter()
        .min_by(|a, b| a.average_score.total_cmp(&b.average_score))
        .map(|d| d.date);

    let recent_intensities = sorted
        .iter()
        .skip(count.saturating_sub(INTENSITY_WINDOW))
        .map(|e| e.score.clamp(1, 5))
        .collect();

    let insights = insights(average, count, trend_delta);

    AnalyticsSnapshot {
        average,
        count,
        trend_delta,
        daily_series,
        insights,
        recent_intensities,
        best_day,
        worst_day,
    }
}

/// Compare the mean of the newest `TREND_WINDOW` entries against the mean of
/// the window immediately before it.
///
/// An incomplete previous window would compare against a smaller sample, so
/// its mean is substituted with the recent mean and the delta reads as
/// exactly 0 until enough history exists.
fn trend_delta(sorted: &[&MoodEntry]) -> f64 {
    let recent_start = sorted.len().saturating_sub(TREND_WINDOW);
    let recent = &sorted[recent_start..];
    let previous = &sorted[recent_start.saturating_sub(TREND_WINDOW)..recent_start];

    let recent_mean = mean(recent);
    let previous_mean = if previous.len() < TREND_WINDOW {
        recent_mean
    } else {
        mean(previous)
    };
    round1(recent_mean - previous_mean)
}

/// Bucket entries by calendar day, average each bucket, keep the most recent
/// `DAILY_SERIES_DAYS` buckets, oldest first. Days with no entries are not
/// synthesized; early in a user's history the series is simply shorter.
fn daily_series(sorted: &[&MoodEntry]) -> Vec<DailyMood> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for entry in sorted {
        let bucket = buckets.entry(entry.timestamp.date_naive()).or_insert((0.0, 0));
        bucket.0 += f64::from(entry.score);
        bucket.1 += 1;
    }

    let series: Vec<DailyMood> = buckets
        .into_iter()
        .map(|(date, (sum, n))| DailyMood {
            date,
            average_score: round1(sum / n as f64),
            entries: n,
        })
        .collect();

    let skip = series.len().saturating_sub(DAILY_SERIES_DAYS);
    series.into_iter().skip(skip).collect()
}

/// Evaluate the fixed rule list. Rules are independent: zero, one, or
/// several may fire, and matches are returned in rule order.
fn insights(average: f64, count: usize, trend_delta: f64) -> Vec<Insight> {
    let mut insights = Vec::new();
    if average >= 4.0 {
        insights.push(Insight::PositiveStreak);
    }
    if average < 3.0 && count > 0 {
        insights.push(Insight::SelfCare);
    }
    if trend_delta > 0.0 {
        insights.push(Insight::UpwardTrend);
    }
    if count > 5 {
        insights.push(Insight::ConsistentLogging);
    }
    insights
}

fn mean(entries: &[&MoodEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|e| f64::from(e.score)).sum::<f64>() / entries.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    fn entry(score: u8, day: u32, hour: u32) -> MoodEntry {
        MoodEntry {
            score,
            emoji: "🙂".into(),
            note: None,
            timestamp: at(day, hour),
        }
    }

    #[test]
    fn test_empty_list_yields_zero_defaults() {
        let snap = snapshot(&[]);
        assert_eq!(snap.average, 0.0);
        assert_eq!(snap.count, 0);
        assert_eq!(snap.trend_delta, 0.0);
        assert!(snap.daily_series.is_empty());
        assert!(snap.insights.is_empty());
        assert!(snap.recent_intensities.is_empty());
        assert_eq!(snap.best_day, None);
        assert_eq!(snap.worst_day, None);
    }

    #[test]
    fn test_average_of_two_entries() {
        let snap = snapshot(&[entry(5, 1, 9), entry(3, 1, 18)]);
        assert_eq!(snap.average, 4.0);
        assert_eq!(snap.count, 2);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        // Mean 4.333… rounds to 4.3.
        let snap = snapshot(&[entry(5, 1, 9), entry(4, 1, 12), entry(4, 1, 18)]);
        assert_eq!(snap.average, 4.3);
    }

    #[test]
    fn test_trend_is_zero_with_two_entries() {
        let snap = snapshot(&[entry(1, 1, 9), entry(5, 2, 9)]);
        assert_eq!(snap.trend_delta, 0.0);
    }

    #[test]
    fn test_trend_is_zero_until_previous_window_is_full() {
        // Four entries: the previous window holds a single entry, which is
        // not enough history for a fair comparison.
        let snap = snapshot(&[entry(1, 1, 9), entry(5, 2, 9), entry(5, 3, 9), entry(5, 4, 9)]);
        assert_eq!(snap.trend_delta, 0.0);
    }

    #[test]
    fn test_trend_compares_full_windows() {
        let entries = vec![
            entry(1, 1, 9),
            entry(1, 2, 9),
            entry(1, 3, 9),
            entry(5, 4, 9),
            entry(5, 5, 9),
            entry(5, 6, 9),
        ];
        let snap = snapshot(&entries);
        assert_eq!(snap.trend_delta, 4.0);
    }

    #[test]
    fn test_trend_can_be_negative() {
        let entries = vec![
            entry(5, 1, 9),
            entry(5, 2, 9),
            entry(5, 3, 9),
            entry(1, 4, 9),
            entry(1, 5, 9),
            entry(1, 6, 9),
        ];
        let snap = snapshot(&entries);
        assert_eq!(snap.trend_delta, -4.0);
    }

    #[test]
    fn test_trend_ignores_input_order() {
        let mut entries = vec![
            entry(1, 1, 9),
            entry(1, 2, 9),
            entry(1, 3, 9),
            entry(5, 4, 9),
            entry(5, 5, 9),
            entry(5, 6, 9),
        ];
        entries.reverse();
        assert_eq!(snapshot(&entries).trend_delta, 4.0);
    }

    #[test]
    fn test_daily_series_keeps_most_recent_seven_days() {
        // Nine distinct days; the two oldest fall off.
        let entries: Vec<MoodEntry> = (1..=9).map(|day| entry(3, day, 9)).collect();
        let snap = snapshot(&entries);

        assert_eq!(snap.daily_series.len(), 7);
        let dates: Vec<u32> = snap
            .daily_series
            .iter()
            .map(|d| chrono::Datelike::day(&d.date))
            .collect();
        assert_eq!(dates, vec![3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_daily_series_averages_within_a_day() {
        let entries = vec![entry(2, 1, 9), entry(5, 1, 20), entry(4, 2, 9)];
        let snap = snapshot(&entries);

        assert_eq!(snap.daily_series.len(), 2);
        assert_eq!(snap.daily_series[0].average_score, 3.5);
        assert_eq!(snap.daily_series[0].entries, 2);
        assert_eq!(snap.daily_series[1].average_score, 4.0);
        assert_eq!(snap.daily_series[1].entries, 1);
    }

    #[test]
    fn test_best_and_worst_day() {
        let entries = vec![entry(2, 1, 9), entry(4, 2, 9), entry(5, 3, 9)];
        let snap = snapshot(&entries);
        assert_eq!(snap.best_day, Some(at(3, 9).date_naive()));
        assert_eq!(snap.worst_day, Some(at(1, 9).date_naive()));
    }

    #[test]
    fn test_all_great_week_insights() {
        // Seven straight 5s: positive streak and consistency fire, self-care
        // does not, and a flat trend earns no upward-trend message.
        let entries: Vec<MoodEntry> = (1..=7).map(|day| entry(5, day, 9)).collect();
        let snap = snapshot(&entries);

        assert!(snap.insights.contains(&Insight::PositiveStreak));
        assert!(snap.insights.contains(&Insight::ConsistentLogging));
        assert!(!snap.insights.contains(&Insight::SelfCare));
        assert!(!snap.insights.contains(&Insight::UpwardTrend));
    }

    #[test]
    fn test_low_average_fires_self_care() {
        let entries = vec![entry(2, 1, 9), entry(2, 2, 9), entry(2, 3, 9)];
        let snap = snapshot(&entries);
        assert_eq!(snap.insights, vec![Insight::SelfCare]);
    }

    #[test]
    fn test_insights_preserve_rule_order() {
        // avg 4.0, trend +2.0, count 6: three rules fire, in rule order.
        let entries = vec![
            entry(3, 1, 9),
            entry(3, 2, 9),
            entry(3, 3, 9),
            entry(5, 4, 9),
            entry(5, 5, 9),
            entry(5, 6, 9),
        ];
        let snap = snapshot(&entries);
        assert_eq!(
            snap.insights,
            vec![
                Insight::PositiveStreak,
                Insight::UpwardTrend,
                Insight::ConsistentLogging
            ]
        );
    }

    #[test]
    fn test_recent_intensities_window() {
        // 45 entries across hours of three days; only the newest 30 remain,
        // oldest first.
        let entries: Vec<MoodEntry> = (0..45u32)
            .map(|i| entry((i % 5 + 1) as u8, 1 + i / 20, i % 20))
            .collect();
        let snap = snapshot(&entries);

        assert_eq!(snap.recent_intensities.len(), 30);
        let expected: Vec<u8> = (15..45u32).map(|i| (i % 5 + 1) as u8).collect();
        assert_eq!(snap.recent_intensities, expected);
    }

    #[test]
    fn test_intensities_clamp_but_aggregates_pass_through() {
        // Out-of-range scores are the origin's bug, not ours: the average
        // reports them as-is, the display window clamps them.
        let entries = vec![entry(9, 1, 9), entry(1, 1, 12)];
        let snap = snapshot(&entries);
        assert_eq!(snap.average, 5.0);
        assert_eq!(snap.recent_intensities, vec![5, 1]);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let entries: Vec<MoodEntry> = (1..=9).map(|day| entry(day as u8 % 5 + 1, day, 9)).collect();
        assert_eq!(snapshot(&entries), snapshot(&entries));
    }
}
