//! Progress export as a downloadable JSON file

use chrono::NaiveDate;

use crate::progress::ProgressRecord;

/// Same shape as the stored blob, pretty-printed
pub fn export_json(record: &ProgressRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// `ai-profit-progress-YYYY-MM-DD.json`
pub fn export_filename(date: NaiveDate) -> String {
    format!("ai-profit-progress-{}.json", date.format("%Y-%m-%d"))
}
