//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Checkbox enumeration and state (DOM on web, [`MemoryPage`] elsewhere)
//! - Prompt list rendering
//! - Form field reads
//!
//! Snapshot and rehydration are written against [`PageControls`] so they run
//! without a rendered page.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub use dom::DomPage;
pub use memory::MemoryPage;

use std::collections::{BTreeMap, BTreeSet};

use crate::progress::{CustomPrompt, ProgressPatch, ProgressRecord, completion_percentage};

/// Which part of the page a checkbox belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlGroup {
    /// Lesson and checklist items
    General,
    /// Tool setup checklist, keyed by `name`
    Tool,
    /// Fear self-assessment items
    Fear,
}

/// How to find a control again
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlTarget {
    Id(String),
    Name(String),
}

/// A checkbox-like control as seen during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub id: Option<String>,
    pub name: Option<String>,
    pub group: ControlGroup,
    /// Visible label text, trimmed
    pub label: String,
    /// State at enumeration time
    pub checked: bool,
}

/// Capability the page exposes to the progress logic
pub trait PageControls {
    /// Every checkbox currently on the page, in document order
    fn enumerate_controls(&self) -> Vec<Control>;

    /// Checked state, `None` if the target is not on the page
    fn read_state(&self, target: &ControlTarget) -> Option<bool>;

    /// Set checked state; returns false if the target is not on the page
    fn write_state(&mut self, target: &ControlTarget, checked: bool) -> bool;

    /// Replace the rendered prompt list
    fn render_prompts(&mut self, prompts: &[CustomPrompt]);

    /// Raw value of a form field, `None` if absent
    fn read_field(&self, id: &str) -> Option<String>;
}

/// Read checkbox state into a patch carrying `completed_items` and `tools_setup`
pub fn snapshot_from_ui<U: PageControls + ?Sized>(page: &U) -> ProgressPatch {
    let mut completed = BTreeSet::new();
    let mut tools = BTreeMap::new();

    for control in page.enumerate_controls() {
        let checked = control.checked;
        if checked {
            if let Some(id) = &control.id {
                completed.insert(id.clone());
            }
        }
        if control.group == ControlGroup::Tool {
            if let Some(name) = &control.name {
                tools.insert(name.clone(), checked);
            }
        }
    }

    ProgressPatch::new()
        .with_completed_items(completed)
        .with_tools_setup(tools)
}

/// Labels of checked fear-assessment items, in page order
pub fn checked_fears<U: PageControls + ?Sized>(page: &U) -> Vec<String> {
    page.enumerate_controls()
        .into_iter()
        .filter(|c| c.group == ControlGroup::Fear)
        .filter(|c| c.checked)
        .map(|c| c.label)
        .collect()
}

/// Checked and total checkbox counts across the whole page
pub fn checkbox_counts<U: PageControls + ?Sized>(page: &U) -> (usize, usize) {
    let controls = page.enumerate_controls();
    let checked = controls.iter().filter(|c| c.checked).count();
    (checked, controls.len())
}

/// Percent of all checkboxes on the page that are checked
pub fn page_completion<U: PageControls + ?Sized>(page: &U) -> u8 {
    let (checked, total) = checkbox_counts(page);
    completion_percentage(checked, total)
}

/// Apply a loaded record to the page. Stale ids and names are skipped.
pub fn rehydrate_ui<U: PageControls + ?Sized>(page: &mut U, record: &ProgressRecord) {
    let mut skipped = 0usize;

    for id in &record.completed_items {
        if !page.write_state(&ControlTarget::Id(id.clone()), true) {
            skipped += 1;
        }
    }

    for (name, checked) in &record.tools_setup {
        if !page.write_state(&ControlTarget::Name(name.clone()), *checked) {
            skipped += 1;
        }
    }

    page.render_prompts(&record.custom_prompts);

    if skipped > 0 {
        log::debug!("Skipped {} saved controls not on this page", skipped);
    }
}
