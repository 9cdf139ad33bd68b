//! Companion configuration
//!
//! Tunables that the page script used to hard-code. Defaults match the
//! shipped course page.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Assumptions behind the impact metrics estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactAssumptions {
    /// Dollar value of one saved hour
    pub hourly_rate: f64,
    /// Commission earned per closed deal
    pub avg_deal_value: f64,
    /// Fraction of new leads that close (0.05 = 5%)
    pub conversion_rate: f64,
}

impl Default for ImpactAssumptions {
    fn default() -> Self {
        Self {
            hourly_rate: 100.0,
            avg_deal_value: 10_000.0,
            conversion_rate: 0.05,
        }
    }
}

/// Companion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// LocalStorage key holding the progress blob
    pub storage_key: String,
    /// Minimum completion percent for a certificate
    pub certificate_threshold: u8,
    /// Tools in the setup checklist (dashboard denominator)
    pub tools_total: usize,
    /// Annual ROI that fills the ROI bar
    pub roi_bar_max: f64,
    /// Length of the implementation challenge
    pub challenge_days: u32,
    pub impact: ImpactAssumptions,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            certificate_threshold: CERTIFICATE_THRESHOLD,
            tools_total: TOOLS_TOTAL,
            roi_bar_max: ROI_BAR_MAX,
            challenge_days: CHALLENGE_DAYS,
            impact: ImpactAssumptions::default(),
        }
    }
}

impl CompanionConfig {
    /// Use a different storage key (separate courses on one origin)
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Parse overrides from JSON; unknown or missing fields keep defaults.
    /// Malformed input falls back to the defaults entirely.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => {
                log::info!("Loaded companion config overrides");
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed companion config: {}", e);
                Self::default()
            }
        }
    }
}
