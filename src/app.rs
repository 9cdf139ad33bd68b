//! Page controller
//!
//! Owns the in-memory [`ProgressRecord`] for the page's lifetime. UI event
//! handlers call into it; every mutating handler persists before returning.

use chrono::{DateTime, NaiveDate, Utc};

use crate::calculators::{
    ChallengeProgress, ImpactInputs, ImpactReport, RoiEstimate, RoiInputs, calculate_impact,
    calculate_roi, challenge_progress, parse_count, parse_input,
};
use crate::certificate::{Certificate, CertificateError, issue_certificate};
use crate::config::CompanionConfig;
use crate::fields;
use crate::persistence::{KeyValueStore, ProgressStore, export_filename, export_json};
use crate::platform::{
    ControlTarget, PageControls, checked_fears, page_completion, rehydrate_ui, snapshot_from_ui,
};
use crate::progress::{
    CustomPrompt, DashboardStats, FearAssessment, ProgressPatch, ProgressRecord, PromptDraft,
    PromptSlot, add_or_update_prompt, delete_prompt, merge,
};

/// Where the controller is in its page-lifetime cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, nothing read yet
    Unloaded,
    /// Started with no usable saved progress
    LoadedDefault,
    /// Started from saved progress
    LoadedRestored,
    /// Changed in memory; the write did not go through
    Mutated,
    /// Last change written to storage
    Persisted,
}

pub struct CourseCompanion<S, U> {
    config: CompanionConfig,
    store: ProgressStore<S>,
    page: U,
    record: ProgressRecord,
    lifecycle: Lifecycle,
}

impl<S: KeyValueStore, U: PageControls> CourseCompanion<S, U> {
    pub fn new(config: CompanionConfig, storage: S, page: U) -> Self {
        let store = ProgressStore::new(storage, config.storage_key.clone());
        Self {
            config,
            store,
            page,
            record: ProgressRecord::default(),
            lifecycle: Lifecycle::Unloaded,
        }
    }

    /// Load saved progress and apply it to the page
    pub fn start(&mut self) {
        match self.store.try_load() {
            Some(record) => {
                self.record = record;
                self.lifecycle = Lifecycle::LoadedRestored;
            }
            None => {
                self.record = ProgressRecord::default();
                self.lifecycle = Lifecycle::LoadedDefault;
            }
        }
        rehydrate_ui(&mut self.page, &self.record);
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn page(&self) -> &U {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut U {
        &mut self.page
    }

    /// Merge `patch` into the record and persist
    pub fn apply(&mut self, patch: ProgressPatch) {
        let record = std::mem::take(&mut self.record);
        self.record = merge(record, patch);
        self.lifecycle = Lifecycle::Mutated;
        self.save();
    }

    fn save(&mut self) {
        match self.store.persist(&self.record) {
            Ok(()) => self.lifecycle = Lifecycle::Persisted,
            Err(e) => log::warn!("Progress not saved: {}", e),
        }
    }

    /// A checkbox changed: capture all checkbox state and persist
    pub fn on_checkbox_changed(&mut self) {
        let patch = snapshot_from_ui(&self.page);
        self.apply(patch);
    }

    /// Replace the fear assessment with the currently checked fears
    pub fn submit_fear_assessment(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let fears = checked_fears(&self.page);
        log::info!("Fear assessment submitted ({} concerns)", fears.len());
        self.apply(ProgressPatch::new().with_fear_assessment(Some(FearAssessment {
            fears: fears.clone(),
            assessed_at: now,
        })));
        fears
    }

    /// Entry at `index` for prefilling the editor or copying
    pub fn prompt(&self, index: usize) -> Option<&CustomPrompt> {
        self.record.custom_prompts.get(index)
    }

    /// Prompt editor contents as currently typed
    pub fn read_prompt_draft(&self) -> PromptDraft {
        let field = |id: &str| self.page.read_field(id).unwrap_or_default();
        PromptDraft::new(
            field(fields::PROMPT_CATEGORY),
            field(fields::PROMPT_TITLE),
            field(fields::PROMPT_CONTENT),
        )
    }

    /// Save an edited or new prompt. Incomplete drafts are ignored.
    pub fn save_prompt(
        &mut self,
        slot: PromptSlot,
        draft: PromptDraft,
        now: DateTime<Utc>,
    ) -> bool {
        if !draft.is_complete() {
            log::debug!("Prompt needs a title and content, not saved");
            return false;
        }
        let record = std::mem::take(&mut self.record);
        self.record = add_or_update_prompt(record, slot, draft.into_prompt(now));
        self.lifecycle = Lifecycle::Mutated;
        self.save();
        self.page.render_prompts(&self.record.custom_prompts);
        true
    }

    /// Delete the prompt at `index` and re-render so indices are fresh
    pub fn delete_prompt(&mut self, index: usize) {
        let record = std::mem::take(&mut self.record);
        self.record = delete_prompt(record, index);
        self.lifecycle = Lifecycle::Mutated;
        self.save();
        self.page.render_prompts(&self.record.custom_prompts);
    }

    /// Percent of all checkboxes on the page that are checked
    pub fn completion(&self) -> u8 {
        page_completion(&self.page)
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::new(&self.record, self.config.tools_total, self.completion())
    }

    pub fn certificate(&self, today: NaiveDate) -> Result<Certificate, CertificateError> {
        issue_certificate(self.completion(), self.config.certificate_threshold, today)
    }

    /// `(filename, pretty JSON)` for a download
    pub fn export(&self, today: NaiveDate) -> Result<(String, String), serde_json::Error> {
        Ok((export_filename(today), export_json(&self.record)?))
    }

    /// Forget all saved progress and reset the page
    pub fn clear(&mut self) {
        for id in &self.record.completed_items {
            self.page.write_state(&ControlTarget::Id(id.clone()), false);
        }
        for name in self.record.tools_setup.keys() {
            self.page.write_state(&ControlTarget::Name(name.clone()), false);
        }
        self.record = ProgressRecord::default();
        self.page.render_prompts(&[]);

        match self.store.clear() {
            Ok(()) => self.lifecycle = Lifecycle::LoadedDefault,
            Err(e) => {
                log::warn!("Saved progress not cleared: {}", e);
                self.lifecycle = Lifecycle::Mutated;
            }
        }
    }

    fn field(&self, id: &str) -> f64 {
        parse_input(self.page.read_field(id).as_deref())
    }

    pub fn roi(&self) -> RoiEstimate {
        let inputs = RoiInputs {
            hours_saved: self.field(fields::HOURS_SAVED),
            hourly_value: self.field(fields::HOURLY_VALUE),
            new_leads: self.field(fields::NEW_LEADS),
            conversion_rate: self.field(fields::CONVERSION_RATE),
            avg_commission: self.field(fields::AVG_COMMISSION),
        };
        calculate_roi(&inputs, self.config.roi_bar_max)
    }

    pub fn impact(&self) -> ImpactReport {
        let inputs = ImpactInputs {
            time_saved: self.field(fields::KPI_TIME),
            new_leads: self.field(fields::KPI_LEADS),
            response_improvement: self.field(fields::KPI_RESPONSE),
            satisfaction: self.field(fields::KPI_SATISFACTION),
        };
        calculate_impact(&inputs, &self.config.impact)
    }

    pub fn challenge(&self) -> ChallengeProgress {
        let days = parse_count(self.page.read_field(fields::CHALLENGE_DAYS).as_deref());
        challenge_progress(days, self.config.challenge_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STORAGE_KEY;
    use crate::persistence::{MemoryStorage, StorageError};
    use crate::platform::MemoryPage;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_735_000_000, 0).unwrap()
    }

    fn course_page() -> MemoryPage {
        let mut page = MemoryPage::new();
        for i in 1..=6 {
            page = page.with_checkbox(&format!("lesson-{i}"), &format!("Lesson {i}"));
        }
        page.with_tool("chatgpt", "ChatGPT")
            .with_tool("claude", "Claude")
            .with_fear("It's too complicated")
            .with_fear("Clients will notice")
    }

    fn companion(storage: MemoryStorage) -> TestCompanion {
        CourseCompanion::new(CompanionConfig::default(), storage, course_page())
    }

    type TestCompanion = CourseCompanion<MemoryStorage, MemoryPage>;

    /// Simulate a page reload over the same storage
    fn reload(c: TestCompanion) -> TestCompanion {
        let storage = c.store().storage().clone();
        let mut next = companion(storage);
        next.start();
        next
    }

    #[test]
    fn test_lifecycle() {
        let mut c = companion(MemoryStorage::new());
        assert_eq!(c.lifecycle(), Lifecycle::Unloaded);
        c.start();
        assert_eq!(c.lifecycle(), Lifecycle::LoadedDefault);
        c.page_mut().set_checked_id("lesson-1", true);
        c.on_checkbox_changed();
        assert_eq!(c.lifecycle(), Lifecycle::Persisted);

        let c = reload(c);
        assert_eq!(c.lifecycle(), Lifecycle::LoadedRestored);
    }

    #[test]
    fn test_failed_write_stays_mutated() {
        let mut c = companion(MemoryStorage::unavailable());
        c.start();
        c.page_mut().set_checked_id("lesson-1", true);
        c.on_checkbox_changed();
        assert_eq!(c.lifecycle(), Lifecycle::Mutated);
        assert!(c.record().completed_items.contains("lesson-1"));
    }

    #[test]
    fn test_checkbox_state_survives_reload() {
        let mut c = companion(MemoryStorage::new());
        c.start();
        c.page_mut().set_checked_id("lesson-2", true);
        c.page_mut().set_checked_name("claude", true);
        c.on_checkbox_changed();

        let c = reload(c);
        let page = c.page();
        assert_eq!(page.read_state(&ControlTarget::Id("lesson-2".into())), Some(true));
        assert_eq!(page.read_state(&ControlTarget::Id("lesson-1".into())), Some(false));
        assert_eq!(page.read_state(&ControlTarget::Name("claude".into())), Some(true));
        assert_eq!(c.dashboard().tools_label(), "1/5");
    }

    #[test]
    fn test_checkbox_snapshot_keeps_prompts() {
        let mut c = companion(MemoryStorage::new());
        c.start();
        assert!(c.save_prompt(PromptSlot::New, PromptDraft::new("CMA", "T", "C"), now()));
        c.page_mut().set_checked_id("lesson-3", true);
        c.on_checkbox_changed();
        assert_eq!(c.record().custom_prompts.len(), 1);
    }

    #[test]
    fn test_restores_legacy_blob() {
        let blob = r#"{"completedItems":["lesson-4"],"fearAssessment":{},"customPrompts":[],"toolsSetup":{"chatgpt":true},"weeklyProgress":{"week1":[]}}"#;
        let mut c = companion(MemoryStorage::with_item(STORAGE_KEY, blob));
        c.start();
        assert_eq!(c.lifecycle(), Lifecycle::LoadedRestored);
        assert_eq!(c.page().read_state(&ControlTarget::Id("lesson-4".into())), Some(true));
        assert_eq!(c.page().read_state(&ControlTarget::Name("chatgpt".into())), Some(true));
    }

    #[test]
    fn test_corrupt_blob_starts_fresh() {
        let mut c = companion(MemoryStorage::with_item(STORAGE_KEY, "{{{"));
        c.start();
        assert_eq!(c.lifecycle(), Lifecycle::LoadedDefault);
        assert!(c.record().is_empty());
    }

    #[test]
    fn test_fear_assessment_overwrites() {
        let mut c = companion(MemoryStorage::new());
        c.start();
        c.page_mut().set_checked_label("Clients will notice", true);
        assert_eq!(c.submit_fear_assessment(now()), ["Clients will notice"]);

        c.page_mut().set_checked_label("Clients will notice", false);
        assert!(c.submit_fear_assessment(now()).is_empty());

        let c = reload(c);
        let assessment = c.record().fear_assessment.as_ref().unwrap();
        assert!(assessment.fears.is_empty());
        assert_eq!(assessment.assessed_at, now());
    }

    #[test]
    fn test_prompt_editing_flow() {
        let mut c = companion(MemoryStorage::new());
        c.start();
        c.save_prompt(PromptSlot::New, PromptDraft::new("CMA", "A", "a"), now());
        c.save_prompt(PromptSlot::New, PromptDraft::new("Listing", "B", "b"), now());
        c.save_prompt(PromptSlot::New, PromptDraft::new("Social", "C", "c"), now());

        // Edit B in place
        let mut draft = PromptDraft::new("Listing", "B2", "b2");
        assert!(c.save_prompt(PromptSlot::At(1), draft.clone(), now()));
        assert_eq!(c.prompt(1).unwrap().title, "B2");

        // Incomplete drafts are ignored
        draft.content.clear();
        assert!(!c.save_prompt(PromptSlot::New, draft, now()));
        assert_eq!(c.record().custom_prompts.len(), 3);

        c.delete_prompt(0);
        assert_eq!(c.page().rendered_prompts().len(), 2);
        assert_eq!(c.page().rendered_prompts()[0].title, "B2");

        let c = reload(c);
        let titles: Vec<_> = c
            .record()
            .custom_prompts
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["B2", "C"]);
        assert_eq!(c.page().rendered_prompts().len(), 2);
    }

    #[test]
    fn test_read_prompt_draft_from_fields() {
        let mut c = companion(MemoryStorage::new());
        c.page_mut().set_field(fields::PROMPT_CATEGORY, "CMA");
        c.page_mut().set_field(fields::PROMPT_TITLE, "Comps");
        assert_eq!(c.read_prompt_draft(), PromptDraft::new("CMA", "Comps", ""));
        assert!(!c.read_prompt_draft().is_complete());
    }

    #[test]
    fn test_certificate_gate_follows_page() {
        // 10 checkboxes total: 6 lessons, 2 tools, 2 fears
        let mut c = companion(MemoryStorage::new());
        c.start();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        for i in 1..=4 {
            c.page_mut().set_checked_id(&format!("lesson-{i}"), true);
        }
        assert_eq!(c.completion(), 40);
        assert!(c.certificate(today).is_err());

        for i in 5..=6 {
            c.page_mut().set_checked_id(&format!("lesson-{i}"), true);
        }
        c.page_mut().set_checked_name("chatgpt", true);
        c.page_mut().set_checked_name("claude", true);
        assert_eq!(c.completion(), 80);
        assert_eq!(c.certificate(today).unwrap().percentage, 80);
    }

    #[test]
    fn test_export() {
        let mut c = companion(MemoryStorage::new());
        c.start();
        c.page_mut().set_checked_id("lesson-1", true);
        c.on_checkbox_changed();

        let (name, json) = c.export(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()).unwrap();
        assert_eq!(name, "ai-profit-progress-2025-12-31.json");
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, c.record());
    }

    #[test]
    fn test_clear_resets_page_and_storage() {
        let mut c = companion(MemoryStorage::new());
        c.start();
        c.page_mut().set_checked_id("lesson-1", true);
        c.page_mut().set_checked_name("chatgpt", true);
        c.on_checkbox_changed();
        c.save_prompt(PromptSlot::New, PromptDraft::new("CMA", "T", "C"), now());

        c.clear();
        assert!(c.record().is_empty());
        assert_eq!(c.completion(), 0);
        assert!(c.page().rendered_prompts().is_empty());
        assert!(c.store().storage().is_empty());
    }

    /// Backend that saves normally but refuses to delete
    #[derive(Debug, Clone, Default)]
    struct StickyStorage(MemoryStorage);

    impl KeyValueStore for StickyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set_item(key, value)
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("quota".into()))
        }
    }

    #[test]
    fn test_failed_clear_stays_mutated() {
        let mut c = CourseCompanion::new(
            CompanionConfig::default(),
            StickyStorage::default(),
            course_page(),
        );
        c.start();
        c.page_mut().set_checked_id("lesson-1", true);
        c.on_checkbox_changed();
        assert_eq!(c.lifecycle(), Lifecycle::Persisted);

        c.clear();
        assert!(c.record().is_empty());
        assert_eq!(c.lifecycle(), Lifecycle::Mutated);
        // The old blob is still there and comes back on reload
        assert!(c.store().load().completed_items.contains("lesson-1"));
    }

    #[test]
    fn test_storage_keys_are_isolated() {
        let config = CompanionConfig::default().with_storage_key("otherCourse");
        let mut other = CourseCompanion::new(config, MemoryStorage::new(), course_page());
        other.start();
        other.page_mut().set_checked_id("lesson-5", true);
        other.on_checkbox_changed();

        let storage = other.store().storage().clone();
        assert!(storage.get_item("otherCourse").unwrap().is_some());
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());

        let mut c = companion(storage);
        c.start();
        assert_eq!(c.lifecycle(), Lifecycle::LoadedDefault);
        assert!(c.record().is_empty());
    }

    #[test]
    fn test_calculators_read_fields() {
        let mut c = companion(MemoryStorage::new());
        c.page_mut().set_field(fields::HOURS_SAVED, "10");
        c.page_mut().set_field(fields::HOURLY_VALUE, "abc");
        c.page_mut().set_field(fields::NEW_LEADS, "5");
        c.page_mut().set_field(fields::CONVERSION_RATE, "10");
        c.page_mut().set_field(fields::AVG_COMMISSION, "8000");
        let roi = c.roi();
        assert_eq!(roi.weekly_time_savings, 0.0);
        assert_eq!(roi.annual_roi, 192_000.0);

        c.page_mut().set_field(fields::KPI_TIME, "2");
        assert_eq!(c.impact().weekly_savings, 200.0);

        c.page_mut().set_field(fields::CHALLENGE_DAYS, "30");
        assert_eq!(c.challenge().percentage, 33);
    }
}
