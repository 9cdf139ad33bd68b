//! Browser DOM implementation of [`PageControls`] (WASM only)

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use super::{Control, ControlGroup, ControlTarget, PageControls};
use crate::progress::CustomPrompt;

/// Container the prompt library renders into
const PROMPT_LIST_ID: &str = "customPromptsList";

pub struct DomPage {
    document: Document,
}

impl DomPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn checkboxes(&self) -> Vec<HtmlInputElement> {
        let Ok(nodes) = self.document.query_selector_all("input[type=\"checkbox\"]") else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
            .collect()
    }

    fn find_input(&self, target: &ControlTarget) -> Option<HtmlInputElement> {
        let element = match target {
            ControlTarget::Id(id) => self.document.get_element_by_id(id),
            ControlTarget::Name(name) => {
                let selector = format!("input[name=\"{}\"]", css_escape(name));
                self.document.query_selector(&selector).ok().flatten()
            }
        };
        element?.dyn_into::<HtmlInputElement>().ok()
    }

    fn create(&self, tag: &str, class: &str, text: Option<&str>) -> Option<Element> {
        let el = self.document.create_element(tag).ok()?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        if text.is_some() {
            el.set_text_content(text);
        }
        Some(el)
    }

    fn prompt_card(&self, index: usize, prompt: &CustomPrompt) -> Option<Element> {
        let card = self.create("div", "prompt-card", None)?;

        let header = self.create("div", "prompt-header", None)?;
        header
            .append_child(&self.create("h4", "", Some(prompt.title.as_str()))?)
            .ok()?;
        header
            .append_child(&self.create("span", "prompt-category", Some(prompt.category.as_str()))?)
            .ok()?;
        card.append_child(&header).ok()?;

        card.append_child(&self.create("p", "prompt-content", Some(prompt.content.as_str()))?)
            .ok()?;

        let actions = self.create("div", "prompt-actions", None)?;
        for (action, label) in [
            ("copy-prompt", "Copy"),
            ("edit-prompt", "Edit"),
            ("delete-prompt", "Delete"),
        ] {
            let button = self.create("button", "btn-secondary", Some(label))?;
            button.set_attribute("data-action", action).ok()?;
            button.set_attribute("data-index", &index.to_string()).ok()?;
            actions.append_child(&button).ok()?;
        }
        card.append_child(&actions).ok()?;

        Some(card)
    }
}

/// Escape a value for use inside a double-quoted attribute selector
fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn group_of(input: &HtmlInputElement) -> ControlGroup {
    let inside = |selector: &str| input.closest(selector).ok().flatten().is_some();
    if inside(".tool-checklist") {
        ControlGroup::Tool
    } else if inside(".fear-item") {
        ControlGroup::Fear
    } else {
        ControlGroup::General
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl PageControls for DomPage {
    fn enumerate_controls(&self) -> Vec<Control> {
        self.checkboxes()
            .into_iter()
            .map(|input| Control {
                id: non_empty(input.id()),
                name: non_empty(input.name()),
                group: group_of(&input),
                label: input
                    .parent_element()
                    .and_then(|p| p.text_content())
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default(),
                checked: input.checked(),
            })
            .collect()
    }

    fn read_state(&self, target: &ControlTarget) -> Option<bool> {
        self.find_input(target).map(|input| input.checked())
    }

    fn write_state(&mut self, target: &ControlTarget, checked: bool) -> bool {
        match self.find_input(target) {
            Some(input) => {
                input.set_checked(checked);
                true
            }
            None => false,
        }
    }

    fn render_prompts(&mut self, prompts: &[CustomPrompt]) {
        let Some(container) = self.document.get_element_by_id(PROMPT_LIST_ID) else {
            return;
        };
        container.set_inner_html("");

        for (index, prompt) in prompts.iter().enumerate() {
            match self.prompt_card(index, prompt) {
                Some(card) => {
                    let _ = container.append_child(&card);
                }
                None => log::warn!("Could not render prompt {}", index),
            }
        }
    }

    fn read_field(&self, id: &str) -> Option<String> {
        let element = self.document.get_element_by_id(id)?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            return Some(select.value());
        }
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(area.value());
        }
        element.text_content()
    }
}

/// Set a form field's value; no-op when absent
pub fn write_field(document: &Document, id: &str, value: &str) {
    let Some(element) = document.get_element_by_id(id) else {
        return;
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}
