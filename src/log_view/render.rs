use std::fmt;

use serde::Serialize;

use super::projector::{project, SortPolicy};
use crate::db::RatingEntry;

/// One entry as shown in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRow {
    pub id: String,
    pub photo: String,
    pub title: String,
    pub date: String,
    pub stars: String,
    pub rating: String,
    pub greenness: String,
    pub thoughts: String,
}

impl From<&RatingEntry> for LogRow {
    fn from(entry: &RatingEntry) -> Self {
        Self {
            id: entry.id.clone(),
            photo: entry.photo.clone(),
            title: entry.location.clone().unwrap_or_else(|| "N/A".into()),
            date: entry.date.clone(),
            stars: entry.rating.stars(),
            rating: format!("Rating: {}", entry.rating),
            greenness: format!("Greenness: {}", entry.greenness),
            thoughts: entry.thoughts.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for LogRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}", self.title, self.date)?;
        writeln!(f, "  {} {}", self.stars, self.rating)?;
        write!(f, "  {}", self.greenness)?;
        if !self.thoughts.is_empty() {
            write!(f, "\n  {}", self.thoughts)?;
        }
        Ok(())
    }
}

pub fn render(entries: &[RatingEntry], policy: SortPolicy) -> Vec<LogRow> {
    project(entries, policy).iter().map(LogRow::from).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        db::StarRating,
        greenness::{GreennessScore, ScoreScale},
    };

    #[test]
    fn row_falls_back_to_na_without_location() {
        let entry = RatingEntry::new(
            "cup.png".into(),
            StarRating::new(4).unwrap(),
            GreennessScore::new(72, ScoreScale::OutOfHundred).unwrap(),
            None,
            Some("creamy".into()),
            Utc::now(),
        );
        let row = LogRow::from(&entry);
        assert_eq!(row.title, "N/A");
        assert_eq!(row.stars, "★★★★☆");
        assert_eq!(row.rating, "Rating: 4/5");
        assert_eq!(row.greenness, "Greenness: 72/100");
        assert!(row.to_string().ends_with("creamy"));
    }

    #[test]
    fn render_follows_policy_order() {
        let now = Utc::now();
        let low = RatingEntry::new(
            String::new(),
            StarRating::new(2).unwrap(),
            GreennessScore::new(5, ScoreScale::OutOfTen).unwrap(),
            Some("Tokyo".into()),
            None,
            now,
        );
        let high = RatingEntry::new(
            String::new(),
            StarRating::new(5).unwrap(),
            GreennessScore::new(40, ScoreScale::OutOfHundred).unwrap(),
            Some("Uji".into()),
            None,
            now,
        );
        let rows = render(&[low, high], SortPolicy::RatingFirst);
        assert_eq!(
            rows.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["Uji", "Tokyo"]
        );
        assert_eq!(rows[1].greenness, "Greenness: 5/10");
    }
}
