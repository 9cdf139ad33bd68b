//! Field-wise merging of partial updates into a record

use std::collections::{BTreeMap, BTreeSet};

use super::record::{CustomPrompt, FearAssessment, ProgressRecord};

/// A partial [`ProgressRecord`]: each `Some` field replaces the whole
/// corresponding field on merge; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPatch {
    pub completed_items: Option<BTreeSet<String>>,
    /// `Some(None)` clears the assessment
    pub fear_assessment: Option<Option<FearAssessment>>,
    pub custom_prompts: Option<Vec<CustomPrompt>>,
    pub tools_setup: Option<BTreeMap<String, bool>>,
}

impl ProgressPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed_items(mut self, items: BTreeSet<String>) -> Self {
        self.completed_items = Some(items);
        self
    }

    pub fn with_fear_assessment(mut self, assessment: Option<FearAssessment>) -> Self {
        self.fear_assessment = Some(assessment);
        self
    }

    pub fn with_custom_prompts(mut self, prompts: Vec<CustomPrompt>) -> Self {
        self.custom_prompts = Some(prompts);
        self
    }

    pub fn with_tools_setup(mut self, tools: BTreeMap<String, bool>) -> Self {
        self.tools_setup = Some(tools);
        self
    }

    /// True when merging would change nothing
    pub fn is_empty(&self) -> bool {
        self.completed_items.is_none()
            && self.fear_assessment.is_none()
            && self.custom_prompts.is_none()
            && self.tools_setup.is_none()
    }
}

/// Overwrite each top-level field present in `partial`; no deep merge.
pub fn merge(existing: ProgressRecord, partial: ProgressPatch) -> ProgressRecord {
    let ProgressPatch {
        completed_items,
        fear_assessment,
        custom_prompts,
        tools_setup,
    } = partial;

    ProgressRecord {
        version: existing.version,
        completed_items: completed_items.unwrap_or(existing.completed_items),
        fear_assessment: fear_assessment.unwrap_or(existing.fear_assessment),
        custom_prompts: custom_prompts.unwrap_or(existing.custom_prompts),
        tools_setup: tools_setup.unwrap_or(existing.tools_setup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn sample() -> ProgressRecord {
        let at = Utc.timestamp_opt(1_710_000_000, 0).unwrap();
        ProgressRecord {
            completed_items: ["a", "b"].iter().map(|s| s.to_string()).collect(),
            fear_assessment: Some(FearAssessment {
                fears: vec!["Too technical".into()],
                assessed_at: at,
            }),
            custom_prompts: vec![CustomPrompt {
                category: "Listing".into(),
                title: "Open house".into(),
                content: "Write an invite".into(),
                created_at: at,
            }],
            tools_setup: [("chatgpt".to_string(), true)].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let record = sample();
        assert!(ProgressPatch::new().is_empty());
        assert_eq!(merge(record.clone(), ProgressPatch::new()), record);
    }

    #[test]
    fn test_tools_patch_replaces_wholesale() {
        let record = sample();
        let tools: BTreeMap<String, bool> = [("claude".to_string(), false)].into_iter().collect();
        let merged = merge(record.clone(), ProgressPatch::new().with_tools_setup(tools.clone()));

        // No deep merge: "chatgpt" is gone
        assert_eq!(merged.tools_setup, tools);
        assert_eq!(merged.completed_items, record.completed_items);
        assert_eq!(merged.fear_assessment, record.fear_assessment);
        assert_eq!(merged.custom_prompts, record.custom_prompts);
    }

    #[test]
    fn test_patch_can_clear_fear_assessment() {
        let merged = merge(sample(), ProgressPatch::new().with_fear_assessment(None));
        assert!(merged.fear_assessment.is_none());
        assert_eq!(merged.custom_prompts.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_tools_merge_isolates_other_fields(
            tools in prop::collection::btree_map("[a-z]{1,8}", any::<bool>(), 0..6),
            items in prop::collection::btree_set("[a-z0-9-]{1,12}", 0..10),
        ) {
            let mut record = sample();
            record.completed_items = items;
            let merged = merge(record.clone(), ProgressPatch::new().with_tools_setup(tools.clone()));
            prop_assert_eq!(&merged.tools_setup, &tools);
            prop_assert_eq!(&merged.completed_items, &record.completed_items);
            prop_assert_eq!(&merged.fear_assessment, &record.fear_assessment);
            prop_assert_eq!(&merged.custom_prompts, &record.custom_prompts);
        }
    }
}
