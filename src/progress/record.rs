//! Persisted learner progress
//!
//! Everything that survives a page reload lives in [`ProgressRecord`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::SCHEMA_VERSION;

/// Last submission of the fear self-assessment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearAssessment {
    /// Labels of the concerns the learner ticked, in page order
    pub fears: Vec<String>,
    /// When the form was submitted
    #[serde(rename = "timestamp")]
    pub assessed_at: DateTime<Utc>,
}

/// A learner-authored prompt in the personal library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPrompt {
    pub category: String,
    pub title: String,
    pub content: String,
    /// Set on every save, so an edit refreshes it
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// The single persisted entity
///
/// Missing fields deserialize to empty containers. Unknown fields (older pages
/// wrote a `weeklyProgress` object) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    /// Schema tag; blobs written before it existed read as version 1
    pub version: u32,
    /// Ids of checked checkboxes
    pub completed_items: BTreeSet<String>,
    /// Written as `{}` when no assessment has been submitted
    #[serde(with = "fear_slot")]
    pub fear_assessment: Option<FearAssessment>,
    /// Positional: edit/delete address entries by index
    pub custom_prompts: Vec<CustomPrompt>,
    /// Tool name -> set up or not
    pub tools_setup: BTreeMap<String, bool>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            completed_items: BTreeSet::new(),
            fear_assessment: None,
            custom_prompts: Vec::new(),
            tools_setup: BTreeMap::new(),
        }
    }
}

impl ProgressRecord {
    /// Create the default-empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.completed_items.is_empty()
            && self.fear_assessment.is_none()
            && self.custom_prompts.is_empty()
            && self.tools_setup.is_empty()
    }

    /// Number of tools marked as set up
    pub fn tools_completed(&self) -> usize {
        self.tools_setup.values().filter(|done| **done).count()
    }
}

/// `fearAssessment` is either a full object or `{}`
mod fear_slot {
    use chrono::{DateTime, Utc};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::FearAssessment;

    #[derive(Deserialize)]
    struct Slot {
        fears: Option<Vec<String>>,
        timestamp: Option<DateTime<Utc>>,
    }

    pub fn serialize<S>(value: &Option<FearAssessment>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(assessment) => serde::Serialize::serialize(assessment, serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<FearAssessment>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let slot = Option::<Slot>::deserialize(deserializer)?;
        Ok(match slot {
            Some(Slot {
                fears: Some(fears),
                timestamp: Some(assessed_at),
            }) => Some(FearAssessment { fears, assessed_at }),
            _ => None,
        })
    }
}
