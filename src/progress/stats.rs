//! Completion percentage and dashboard counters

use super::record::ProgressRecord;

/// Percent of checkboxes checked, rounded half up. Zero when there are none.
pub fn completion_percentage(checked: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let checked = checked.min(total);
    ((checked as f64 / total as f64) * 100.0).round() as u8
}

/// Numbers shown on the progress dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub tools_completed: usize,
    pub tools_total: usize,
    pub prompts_created: usize,
    pub overall_percentage: u8,
}

impl DashboardStats {
    pub fn new(record: &ProgressRecord, tools_total: usize, overall_percentage: u8) -> Self {
        Self {
            tools_completed: record.tools_completed(),
            tools_total,
            prompts_created: record.custom_prompts.len(),
            overall_percentage,
        }
    }

    /// "3/5" style tools label
    pub fn tools_label(&self) -> String {
        format!("{}/{}", self.tools_completed, self.tools_total)
    }

    /// "40%" style overall label
    pub fn overall_label(&self) -> String {
        format!("{}%", self.overall_percentage)
    }
}
