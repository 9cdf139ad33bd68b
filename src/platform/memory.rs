//! In-memory page used natively and in tests

use std::collections::HashMap;

use super::{Control, ControlGroup, ControlTarget, PageControls};
use crate::progress::CustomPrompt;

/// A page model holding checkboxes, form fields and the rendered prompt list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPage {
    controls: Vec<Control>,
    fields: HashMap<String, String>,
    rendered: Vec<CustomPrompt>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    /// Lesson checkbox addressed by id
    pub fn with_checkbox(self, id: &str, label: &str) -> Self {
        self.with_control(Control {
            id: Some(id.to_string()),
            name: None,
            group: ControlGroup::General,
            label: label.to_string(),
            checked: false,
        })
    }

    /// Tool checklist box addressed by name
    pub fn with_tool(self, name: &str, label: &str) -> Self {
        self.with_control(Control {
            id: None,
            name: Some(name.to_string()),
            group: ControlGroup::Tool,
            label: label.to_string(),
            checked: false,
        })
    }

    /// Anonymous fear-assessment box
    pub fn with_fear(self, label: &str) -> Self {
        self.with_control(Control {
            id: None,
            name: None,
            group: ControlGroup::Fear,
            label: label.to_string(),
            checked: false,
        })
    }

    pub fn with_field(mut self, id: &str, value: &str) -> Self {
        self.set_field(id, value);
        self
    }

    pub fn set_field(&mut self, id: &str, value: &str) {
        self.fields.insert(id.to_string(), value.to_string());
    }

    /// Simulate the learner clicking a box
    pub fn set_checked_id(&mut self, id: &str, checked: bool) -> bool {
        self.write_state(&ControlTarget::Id(id.to_string()), checked)
    }

    pub fn set_checked_name(&mut self, name: &str, checked: bool) -> bool {
        self.write_state(&ControlTarget::Name(name.to_string()), checked)
    }

    pub fn set_checked_label(&mut self, label: &str, checked: bool) -> bool {
        match self.controls.iter_mut().find(|c| c.label == label) {
            Some(control) => {
                control.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Prompt list as last rendered
    pub fn rendered_prompts(&self) -> &[CustomPrompt] {
        &self.rendered
    }

    fn find_mut(&mut self, target: &ControlTarget) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| matches_target(c, target))
    }
}

fn matches_target(control: &Control, target: &ControlTarget) -> bool {
    match target {
        ControlTarget::Id(id) => control.id.as_deref() == Some(id.as_str()),
        ControlTarget::Name(name) => control.name.as_deref() == Some(name.as_str()),
    }
}

impl PageControls for MemoryPage {
    fn enumerate_controls(&self) -> Vec<Control> {
        self.controls.clone()
    }

    fn read_state(&self, target: &ControlTarget) -> Option<bool> {
        self.controls
            .iter()
            .find(|c| matches_target(c, target))
            .map(|c| c.checked)
    }

    fn write_state(&mut self, target: &ControlTarget, checked: bool) -> bool {
        match self.find_mut(target) {
            Some(control) => {
                control.checked = checked;
                true
            }
            None => false,
        }
    }

    fn render_prompts(&mut self, prompts: &[CustomPrompt]) {
        self.rendered = prompts.to_vec();
    }

    fn read_field(&self, id: &str) -> Option<String> {
        self.fields.get(id).cloned()
    }
}
