use crate::domain::entities::diary_asset::DiaryAssetDraft;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingLog {
    pub id: i64,
    pub title: String,
    pub contents: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TradingLog {
    pub fn new(id: i64, date: &str, title: &str, contents: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            contents: contents.to_string(),
            date: date.to_string(),
            url: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Calendar date of the entry, `None` when the backend sent something unparseable.
    pub fn date_key(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Feed order: newest date first, then highest id first.
///
/// Entries with an unparseable date sort after every dated entry.
pub fn feed_order(a: &TradingLog, b: &TradingLog) -> Ordering {
    b.date_key()
        .cmp(&a.date_key())
        .then_with(|| b.id.cmp(&a.id))
}

pub fn sort_for_feed(logs: &mut [TradingLog]) {
    logs.sort_by(feed_order);
}

/// Request body for `POST /diaries.json` (wrapped in `{"diary": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTradingLog {
    pub title: String,
    pub contents: String,
    pub date: String,
    pub assets: Vec<DiaryAssetDraft>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(logs: &[TradingLog]) -> Vec<i64> {
        logs.iter().map(|log| log.id).collect()
    }

    #[test]
    fn test_newer_date_wins_over_higher_id() {
        let mut logs = vec![
            TradingLog::new(5, "2024-01-01", "older", ""),
            TradingLog::new(1, "2024-01-02", "newer", ""),
        ];
        sort_for_feed(&mut logs);
        assert_eq!(ids(&logs), vec![1, 5]);
    }

    #[test]
    fn test_same_date_breaks_tie_on_id() {
        let mut logs = vec![
            TradingLog::new(2, "2024-03-10", "a", ""),
            TradingLog::new(9, "2024-03-10", "b", ""),
            TradingLog::new(4, "2024-03-10", "c", ""),
        ];
        sort_for_feed(&mut logs);
        assert_eq!(ids(&logs), vec![9, 4, 2]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let mut logs = vec![
            TradingLog::new(7, "someday", "?", ""),
            TradingLog::new(1, "2020-01-01", "old", ""),
            TradingLog::new(3, "2024-99-99", "??", ""),
        ];
        sort_for_feed(&mut logs);
        assert_eq!(ids(&logs), vec![1, 7, 3]);
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "id": 12,
            "title": "Bought the dip",
            "contents": "line one\nline two",
            "date": "2024-05-01",
            "created_at": "2024-05-01T10:00:00.000Z",
            "updated_at": "2024-05-01T10:00:00.000Z",
            "url": "http://localhost:3000/diaries/12.json"
        }"#;
        let log: TradingLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.id, 12);
        assert_eq!(log.date_key(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
