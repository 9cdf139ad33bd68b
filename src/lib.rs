//! Course Companion - client-side progress tracking for the AI Profit course page
//!
//! Core modules:
//! - `progress`: Persisted record, merging, prompt library, completion stats
//! - `persistence`: Key-value backends and the progress blob store
//! - `platform`: Page abstraction (DOM on web, in-memory elsewhere)
//! - `calculators`: ROI, impact metrics and challenge estimators
//! - `certificate`: Completion gate for the certificate
//! - `app`: Page controller tying the above together

pub mod app;
pub mod calculators;
pub mod certificate;
pub mod config;
pub mod persistence;
pub mod platform;
pub mod progress;

pub use app::{CourseCompanion, Lifecycle};
pub use config::CompanionConfig;
pub use persistence::{KeyValueStore, MemoryStorage, ProgressStore, StorageError};
pub use platform::{MemoryPage, PageControls};
pub use progress::{ProgressPatch, ProgressRecord};

/// Companion constants
pub mod consts {
    /// LocalStorage key for the progress blob
    pub const STORAGE_KEY: &str = "aiProfitProgress";
    /// Schema tag written into every blob
    pub const SCHEMA_VERSION: u32 = 1;

    /// Completion percent required for the certificate
    pub const CERTIFICATE_THRESHOLD: u8 = 80;
    /// Tools in the setup checklist
    pub const TOOLS_TOTAL: usize = 5;
    /// Annual ROI that fills the ROI bar
    pub const ROI_BAR_MAX: f64 = 500_000.0;
    /// Implementation challenge length in days
    pub const CHALLENGE_DAYS: u32 = 90;
}

/// Ids of the page's form fields
pub mod fields {
    // ROI calculator
    pub const HOURS_SAVED: &str = "hoursSaved";
    pub const HOURLY_VALUE: &str = "hourlyValue";
    pub const NEW_LEADS: &str = "newLeads";
    pub const CONVERSION_RATE: &str = "conversionRate";
    pub const AVG_COMMISSION: &str = "avgCommission";

    // Impact metrics
    pub const KPI_TIME: &str = "kpi-time";
    pub const KPI_LEADS: &str = "kpi-leads";
    pub const KPI_RESPONSE: &str = "kpi-response";
    pub const KPI_SATISFACTION: &str = "kpi-satisfaction";

    pub const CHALLENGE_DAYS: &str = "challenge-days";

    // Prompt editor
    pub const PROMPT_CATEGORY: &str = "promptCategory";
    pub const PROMPT_TITLE: &str = "promptTitle";
    pub const PROMPT_CONTENT: &str = "promptContent";
}
