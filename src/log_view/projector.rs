use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::db::RatingEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortPolicy {
    /// Rating descending, then greenness descending.
    #[default]
    RatingFirst,
    /// Newest first by recorded timestamp.
    RecencyFirst,
}

impl SortPolicy {
    pub fn compare(&self, a: &RatingEntry, b: &RatingEntry) -> Ordering {
        match self {
            SortPolicy::RatingFirst => b
                .rating
                .cmp(&a.rating)
                .then_with(|| b.greenness.normalized().cmp(&a.greenness.normalized())),
            SortPolicy::RecencyFirst => b.recorded_at.cmp(&a.recorded_at),
        }
    }
}

/// A sorted copy of `entries`. Ties keep their input order.
pub fn project(entries: &[RatingEntry], policy: SortPolicy) -> Vec<RatingEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| policy.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{parse_display_date, EntrySchema, StarRating},
        greenness::{GreennessScore, ScoreScale},
    };

    fn entry(rating: u8, greenness: u8, date: &str) -> RatingEntry {
        let recorded_at = parse_display_date(date).unwrap();
        let mut entry = RatingEntry::new(
            String::new(),
            StarRating::new(rating).unwrap(),
            GreennessScore::new(greenness, ScoreScale::OutOfHundred).unwrap(),
            None,
            None,
            recorded_at,
        );
        entry.date = date.to_string();
        entry
    }

    fn greenness_of(entries: &[RatingEntry]) -> Vec<u8> {
        entries.iter().map(|e| e.greenness.value()).collect()
    }

    #[test]
    fn rating_first_breaks_ties_on_greenness() {
        let entries = vec![entry(4, 72, "2024-01-01"), entry(4, 90, "2024-01-02")];
        let sorted = project(&entries, SortPolicy::RatingFirst);
        assert_eq!(greenness_of(&sorted), vec![90, 72]);
    }

    #[test]
    fn rating_outranks_greenness() {
        let entries = vec![entry(3, 99, "2024-01-01"), entry(5, 10, "2024-01-02")];
        let sorted = project(&entries, SortPolicy::RatingFirst);
        assert_eq!(sorted[0].rating.value(), 5);
    }

    #[test]
    fn exact_ties_keep_insertion_order() {
        let entries = vec![
            entry(4, 50, "2024-01-01"),
            entry(5, 20, "2024-01-02"),
            entry(4, 50, "2024-01-03"),
        ];
        let sorted = project(&entries, SortPolicy::RatingFirst);
        assert_eq!(sorted[1].id, entries[0].id);
        assert_eq!(sorted[2].id, entries[2].id);
    }

    #[test]
    fn projecting_twice_changes_nothing() {
        let entries = vec![
            entry(2, 30, "1/5/2024"),
            entry(4, 80, "1/1/2024"),
            entry(4, 80, "1/3/2024"),
            entry(1, 99, "12/30/2023"),
        ];
        for policy in [SortPolicy::RatingFirst, SortPolicy::RecencyFirst] {
            let once = project(&entries, policy);
            assert_eq!(project(&once, policy), once);
        }
    }

    #[test]
    fn recency_compares_timestamps_not_text() {
        let entries = vec![entry(3, 10, "9/30/2024"), entry(3, 10, "10/1/2024")];
        let sorted = project(&entries, SortPolicy::RecencyFirst);
        assert_eq!(sorted[0].date, "10/1/2024");
    }

    #[test]
    fn mixed_scales_compare_on_normalized_greenness() {
        let mut legacy = entry(4, 0, "2024-01-01");
        legacy.schema = EntrySchema::V1;
        legacy.greenness = GreennessScore::new(9, ScoreScale::OutOfTen).unwrap();
        let modern = entry(4, 85, "2024-01-02");

        let sorted = project(&[modern, legacy], SortPolicy::RatingFirst);
        assert_eq!(sorted[0].greenness.scale(), ScoreScale::OutOfTen);
    }

    #[test]
    fn input_is_left_untouched() {
        let entries = vec![entry(1, 10, "2024-01-01"), entry(5, 10, "2024-01-02")];
        let before = entries.clone();
        let _ = project(&entries, SortPolicy::RatingFirst);
        assert_eq!(entries, before);
    }
}
