use chrono::{Duration, NaiveDate};

use super::types::{CalendarEntry, CalendarResult, GenerationResult};

/// Parameters for laying drafts out on a calendar.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub start: NaiveDate,
    /// Days between slots. Values below 1 are treated as 1.
    pub increment: i64,
    pub topic: String,
    pub format: String,
    pub goal: String,
}

/// Date of slot `index`, or `None` once it falls outside the calendar range.
fn slot_date(start: NaiveDate, index: usize, step: i64) -> Option<NaiveDate> {
    let days = i64::try_from(index).ok()?.checked_mul(step)?;
    start.checked_add_signed(Duration::try_days(days)?)
}

/// Schedule every original draft of `result` without another completion call.
///
/// Draft `i` lands on `start + i * max(1, increment)` days. Drafts whose date
/// would overflow the calendar are left out.
pub fn export_calendar(result: &GenerationResult, options: &ExportOptions) -> CalendarResult {
    let step = options.increment.max(1);
    let entries = result
        .original_posts
        .iter()
        .enumerate()
        .map_while(|(i, post)| {
            let Some(date) = slot_date(options.start, i, step) else {
                tracing::warn!(slot = i + 1, increment = step, "calendar date out of range, export stopped");
                return None;
            };
            Some(CalendarEntry {
                day: i as u32 + 1,
                date: Some(date.format("%Y-%m-%d").to_string()),
                topic: post.title.clone().unwrap_or_else(|| options.topic.clone()),
                format: options.format.clone(),
                hook: post.hook.clone(),
                goal: options.goal.clone(),
                content: Some(post.full_text()),
            })
        })
        .collect();

    CalendarResult {
        month_name: options.start.format("%B %Y").to_string(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GeneratedPost;

    fn result_with(n: usize) -> GenerationResult {
        GenerationResult {
            patterns: vec![],
            original_posts: (0..n)
                .map(|i| GeneratedPost {
                    id: format!("p{}", i),
                    title: None,
                    hook: format!("hook {}", i),
                    body: format!("body {}", i),
                    cta: "DM us".to_string(),
                    emojis: String::new(),
                    hashtags: String::new(),
                })
                .collect(),
            tone_variants: vec![],
            style_variants: vec![],
        }
    }

    fn options(start: NaiveDate, increment: i64) -> ExportOptions {
        ExportOptions {
            start,
            increment,
            topic: "Visa Extension".to_string(),
            format: "Facebook Post".to_string(),
            goal: "Trust-building".to_string(),
        }
    }

    #[test]
    fn test_dates_follow_increment() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 30).unwrap();
        let calendar = export_calendar(&result_with(3), &options(start, 2));
        let dates: Vec<&str> = calendar
            .entries
            .iter()
            .map(|e| e.date.as_deref().unwrap())
            .collect();
        assert_eq!(dates, vec!["2026-10-30", "2026-11-01", "2026-11-03"]);
        assert_eq!(calendar.month_name, "October 2026");
        assert_eq!(calendar.entries[1].day, 2);
        assert_eq!(calendar.entries[1].hook, "hook 1");
        assert_eq!(calendar.entries[1].content.as_deref(), Some("hook 1\n\nbody 1\n\nDM us"));
    }

    #[test]
    fn test_increment_clamped_to_one() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for increment in [0, -3] {
            let calendar = export_calendar(&result_with(2), &options(start, increment));
            assert_eq!(calendar.entries[0].date.as_deref(), Some("2026-01-01"));
            assert_eq!(calendar.entries[1].date.as_deref(), Some("2026-01-02"));
        }
    }

    #[test]
    fn test_huge_increment_stops_instead_of_overflowing() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let calendar = export_calendar(&result_with(3), &options(start, 100_000_000));
        assert_eq!(calendar.entries.len(), 1);
        assert_eq!(calendar.entries[0].date.as_deref(), Some("2026-10-16"));

        let calendar = export_calendar(&result_with(3), &options(start, i64::MAX));
        assert_eq!(calendar.entries.len(), 1);

        let end = NaiveDate::MAX;
        let calendar = export_calendar(&result_with(2), &options(end, 1));
        assert_eq!(calendar.entries.len(), 1);
    }

    #[test]
    fn test_empty_drafts() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let calendar = export_calendar(&result_with(0), &options(start, 1));
        assert!(calendar.entries.is_empty());
        assert_eq!(calendar.month_name, "March 2026");
    }
}
