//! Personal prompt library operations
//!
//! Entries are addressed by position only. Any index held by a caller is stale
//! after a delete and must be re-read from the current list.

use chrono::{DateTime, Utc};

use super::record::{CustomPrompt, ProgressRecord};

/// Target of a prompt save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSlot {
    /// Append a new entry
    New,
    /// Replace the entry at this position (appends if out of range)
    At(usize),
}

impl PromptSlot {
    /// Parse the editor's index marker; negative or non-numeric means new.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>().map(usize::try_from) {
            Ok(Ok(i)) => PromptSlot::At(i),
            _ => PromptSlot::New,
        }
    }
}

/// Editor form contents before they become a [`CustomPrompt`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    pub category: String,
    pub title: String,
    pub content: String,
}

impl PromptDraft {
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Title and content must both be non-blank
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Stamp the draft into a library entry
    pub fn into_prompt(self, now: DateTime<Utc>) -> CustomPrompt {
        CustomPrompt {
            category: self.category,
            title: self.title,
            content: self.content,
            created_at: now,
        }
    }
}

/// Replace in place when `slot` names an existing position, else append.
/// The caller persists the result.
pub fn add_or_update_prompt(
    mut record: ProgressRecord,
    slot: PromptSlot,
    entry: CustomPrompt,
) -> ProgressRecord {
    match slot {
        PromptSlot::At(i) if i < record.custom_prompts.len() => {
            record.custom_prompts[i] = entry;
        }
        _ => record.custom_prompts.push(entry),
    }
    record
}

/// Remove the entry at `index`, shifting later entries down. Out of range is a no-op.
pub fn delete_prompt(mut record: ProgressRecord, index: usize) -> ProgressRecord {
    if index < record.custom_prompts.len() {
        record.custom_prompts.remove(index);
    } else {
        log::debug!(
            "Ignoring delete of prompt {} ({} stored)",
            index,
            record.custom_prompts.len()
        );
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn prompt(title: &str) -> CustomPrompt {
        PromptDraft::new("CMA", title, "body").into_prompt(Utc.timestamp_opt(0, 0).unwrap())
    }

    fn titles(record: &ProgressRecord) -> Vec<&str> {
        record.custom_prompts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_new_appends_exactly_one() {
        let record = add_or_update_prompt(ProgressRecord::new(), PromptSlot::New, prompt("A"));
        let before = record.custom_prompts.len();
        let entry = PromptDraft::new("CMA", "T", "C").into_prompt(Utc::now());
        let record = add_or_update_prompt(record, PromptSlot::New, entry);
        assert_eq!(record.custom_prompts.len(), before + 1);
        assert_eq!(record.custom_prompts.last().unwrap().title, "T");
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut record = ProgressRecord::new();
        for t in ["A", "B", "C"] {
            record = add_or_update_prompt(record, PromptSlot::New, prompt(t));
        }
        let record = add_or_update_prompt(record, PromptSlot::At(1), prompt("B2"));
        assert_eq!(titles(&record), ["A", "B2", "C"]);
    }

    #[test]
    fn test_out_of_range_update_appends() {
        let record = add_or_update_prompt(ProgressRecord::new(), PromptSlot::At(7), prompt("A"));
        assert_eq!(titles(&record), ["A"]);
    }

    #[test]
    fn test_delete_is_positional() {
        let mut record = ProgressRecord::new();
        for t in ["A", "B", "C"] {
            record = add_or_update_prompt(record, PromptSlot::New, prompt(t));
        }
        let record = delete_prompt(record, 1);
        assert_eq!(titles(&record), ["A", "C"]);

        // Reusing the old index now hits C, not B
        let record = delete_prompt(record, 1);
        assert_eq!(titles(&record), ["A"]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let record = add_or_update_prompt(ProgressRecord::new(), PromptSlot::New, prompt("A"));
        let record = delete_prompt(record, 3);
        assert_eq!(titles(&record), ["A"]);
    }

    #[test]
    fn test_slot_parse() {
        assert_eq!(PromptSlot::parse("-1"), PromptSlot::New);
        assert_eq!(PromptSlot::parse(""), PromptSlot::New);
        assert_eq!(PromptSlot::parse("new"), PromptSlot::New);
        assert_eq!(PromptSlot::parse(" 2 "), PromptSlot::At(2));
        assert_eq!(PromptSlot::parse(&u64::MAX.to_string()), PromptSlot::New);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_slot_parse_does_not_wrap() {
        assert_eq!(PromptSlot::parse("4294967296"), PromptSlot::New);
    }

    #[test]
    fn test_draft_completeness() {
        assert!(PromptDraft::new("", "T", "C").is_complete());
        assert!(!PromptDraft::new("CMA", "  ", "C").is_complete());
        assert!(!PromptDraft::new("CMA", "T", "").is_complete());
    }
}
