//! Learner progress model
//!
//! Pure data and transformations; storage and page access live in
//! `persistence` and `platform`.

pub mod merge;
pub mod prompts;
pub mod record;
pub mod stats;

pub use merge::{ProgressPatch, merge};
pub use prompts::{PromptDraft, PromptSlot, add_or_update_prompt, delete_prompt};
pub use record::{CustomPrompt, FearAssessment, ProgressRecord};
pub use stats::{DashboardStats, completion_percentage};
