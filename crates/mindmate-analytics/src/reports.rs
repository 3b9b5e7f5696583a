//! Markdown report generation from analytics data.

use crate::aggregations::AnalyticsSnapshot;

/// Glyphs for the mood calendar strip, intensity 1 (lowest) to 5.
const INTENSITY_GLYPHS: [char; 5] = ['▁', '▂', '▄', '▆', '█'];

/// Report generator for creating markdown summaries.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Generate a wellness summary from a snapshot.
    pub fn wellness_report(snapshot: &AnalyticsSnapshot) -> String {
        let mut report = String::new();

        report.push_str("# Wellness Report\n\n");

        if snapshot.count == 0 {
            report.push_str("No mood data available yet. Log a mood to get started.\n");
            return report;
        }

        // Overview.
        report.push_str("## Overview\n\n");
        report.push_str(&format!("- **Average Mood:** {}/5\n", snapshot.average));
        report.push_str(&format!("- **Total Entries:** {}\n", snapshot.count));
        report.push_str(&format!("- **Trend:** {}\n", format_trend(snapshot.trend_delta)));
        if let Some(best) = snapshot.best_day {
            report.push_str(&format!("- **Best Day:** {}\n", best.format("%B %d, %Y")));
        }
        if let Some(worst) = snapshot.worst_day {
            report.push_str(&format!("- **Toughest Day:** {}\n", worst.format("%B %d, %Y")));
        }
        report.push('\n');

        // Daily breakdown table.
        if !snapshot.daily_series.is_empty() {
            report.push_str("## Daily Breakdown\n\n");
            report.push_str("| Day | Average | Entries |\n");
            report.push_str("|-----|---------|--------|\n");
            for day in &snapshot.daily_series {
                report.push_str(&format!(
                    "| {} | {}/5 | {} |\n",
                    day.date.format("%A %b %d"),
                    day.average_score,
                    day.entries,
                ));
            }
            report.push('\n');
        }

        // Insights.
        if !snapshot.insights.is_empty() {
            report.push_str("## Insights\n\n");
            for insight in &snapshot.insights {
                report.push_str(&format!("- {}\n", insight.message()));
            }
            report.push('\n');
        }

        // Calendar strip of recent intensities.
        if !snapshot.recent_intensities.is_empty() {
            report.push_str("## Recent Moods\n\n");
            let strip: String = snapshot
                .recent_intensities
                .iter()
                .map(|&score| INTENSITY_GLYPHS[usize::from(score.clamp(1, 5)) - 1])
                .collect();
            report.push_str(&format!("`{}` (oldest → newest)\n", strip));
        }

        report
    }
}

/// Format a trend delta with an explicit sign and direction word.
fn format_trend(delta: f64) -> String {
    if delta > 0.0 {
        format!("up {:+.1}", delta)
    } else if delta < 0.0 {
        format!("down {:+.1}", delta)
    } else {
        "steady".to_string()
    }
}
