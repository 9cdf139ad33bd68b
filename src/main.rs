//! Course Companion entry point
//!
//! On the web this wires DOM events to the page controller. Natively it loads
//! an exported progress file and logs a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::Utc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Event};

    use course_companion::calculators::format_currency;
    use course_companion::fields;
    use course_companion::persistence::LocalStorage;
    use course_companion::platform::DomPage;
    use course_companion::platform::dom::write_field;
    use course_companion::progress::PromptSlot;
    use course_companion::{CompanionConfig, CourseCompanion};

    type Companion = CourseCompanion<LocalStorage, DomPage>;

    // Browser APIs without a stable web-sys surface
    #[wasm_bindgen(inline_js = "
        export function copy_text(text) {
            if (navigator.clipboard) {
                navigator.clipboard.writeText(text);
            }
        }

        export function download_text(filename, text, mime) {
            const blob = new Blob([text], { type: mime });
            const url = URL.createObjectURL(blob);
            const link = document.createElement('a');
            link.href = url;
            link.download = filename;
            link.click();
            URL.revokeObjectURL(url);
        }

        export function show_notification(message) {
            const el = document.createElement('div');
            el.className = 'notification';
            el.textContent = message;
            document.body.appendChild(el);
            setTimeout(() => el.remove(), 3000);
        }
    ")]
    extern "C" {
        fn copy_text(text: &str);
        fn download_text(filename: &str, text: &str, mime: &str);
        fn show_notification(message: &str);
    }

    const PROMPT_MODAL_ID: &str = "promptModal";

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_width(el: &Element, percent: f64) {
        let _ = el.set_attribute("style", &format!("width: {}%", percent));
    }

    /// Refresh progress bar and dashboard counters
    fn update_progress_display(app: &Companion) {
        let Some(document) = document() else { return };
        let stats = app.dashboard();

        if let Some(bar) = document.get_element_by_id("progressBar") {
            set_width(&bar, stats.overall_percentage as f64);
        }
        set_text(
            &document,
            "progressText",
            &format!("{}% Complete", stats.overall_percentage),
        );
        set_text(&document, "toolsSetupCount", &stats.tools_label());
        set_text(&document, "promptsCreatedCount", &stats.prompts_created.to_string());
        set_text(&document, "overallProgress", &stats.overall_label());
    }

    fn update_roi(app: &Companion) {
        let Some(document) = document() else { return };
        let roi = app.roi();
        set_text(&document, "weeklyValue", &format_currency(roi.weekly_time_savings));
        set_text(&document, "monthlyValue", &format_currency(roi.monthly_commissions));
        set_text(&document, "annualROI", &format_currency(roi.annual_roi));
        if let Some(bar) = document.query_selector(".roi-bar-fill").ok().flatten() {
            set_width(&bar, roi.bar_percent);
        }
    }

    fn update_challenge(app: &Companion) {
        let Some(document) = document() else { return };
        let challenge = app.challenge();
        if let Some(bar) = document.get_element_by_id("challengeFill") {
            set_width(&bar, challenge.percentage as f64);
        }
        set_text(&document, "challengeStatus", &challenge.message);
    }

    fn show_metrics(app: &Companion) {
        let Some(document) = document() else { return };
        let Some(results) = document.get_element_by_id("metricsResults") else {
            return;
        };
        let report = app.impact();
        let lines = [
            format!("Time Value: {}/week", format_currency(report.weekly_savings)),
            format!("Lead Value: {}/month", format_currency(report.lead_value)),
            format!("Response Time: {}% faster", report.response_improvement),
            format!("Client Satisfaction: {}/10", report.satisfaction),
            format!(
                "Total Annual Impact: {}",
                format_currency(report.total_annual_impact)
            ),
        ];

        results.set_inner_html("");
        for line in &lines {
            if let Ok(div) = document.create_element("div") {
                div.set_text_content(Some(line));
                let _ = results.append_child(&div);
            }
        }
        let _ = results.class_list().add_1("show");
    }

    fn show_fear_results(fears: &[String]) {
        let Some(document) = document() else { return };
        let Some(results) = document.get_element_by_id("fearResults") else {
            return;
        };
        results.set_inner_html("");

        if fears.is_empty() {
            if let Ok(p) = document.create_element("p") {
                p.set_class_name("success");
                p.set_text_content(Some("Great! You're ready to embrace AI with confidence!"));
                let _ = results.append_child(&p);
            }
            return;
        }

        if let Ok(h) = document.create_element("h4") {
            h.set_text_content(Some("Your Identified Concerns:"));
            let _ = results.append_child(&h);
        }
        if let Ok(ul) = document.create_element("ul") {
            for fear in fears {
                if let Ok(li) = document.create_element("li") {
                    li.set_text_content(Some(fear));
                    let _ = ul.append_child(&li);
                }
            }
            let _ = results.append_child(&ul);
        }
    }

    fn open_prompt_editor(app: &Companion, slot: PromptSlot, category: Option<&str>) {
        let Some(document) = document() else { return };
        let Some(modal) = document.get_element_by_id(PROMPT_MODAL_ID) else {
            return;
        };
        let _ = modal.set_attribute("style", "display: flex");

        if let Some(category) = category {
            write_field(&document, fields::PROMPT_CATEGORY, category);
        }

        let existing = match slot {
            PromptSlot::At(i) => app.prompt(i),
            PromptSlot::New => None,
        };
        match existing {
            Some(prompt) => {
                write_field(&document, fields::PROMPT_TITLE, &prompt.title);
                write_field(&document, fields::PROMPT_CONTENT, &prompt.content);
                write_field(&document, fields::PROMPT_CATEGORY, &prompt.category);
            }
            None => {
                write_field(&document, fields::PROMPT_TITLE, "");
                write_field(&document, fields::PROMPT_CONTENT, "");
            }
        }

        let index = match (slot, existing) {
            (PromptSlot::At(i), Some(_)) => i.to_string(),
            _ => "-1".to_string(),
        };
        let _ = modal.set_attribute("data-edit-index", &index);
    }

    fn close_prompt_editor() {
        if let Some(modal) = document().and_then(|d| d.get_element_by_id(PROMPT_MODAL_ID)) {
            let _ = modal.set_attribute("style", "display: none");
        }
    }

    fn editing_slot() -> PromptSlot {
        document()
            .and_then(|d| d.get_element_by_id(PROMPT_MODAL_ID))
            .and_then(|m| m.get_attribute("data-edit-index"))
            .map(|raw| PromptSlot::parse(&raw))
            .unwrap_or(PromptSlot::New)
    }

    fn print_certificate(app: &Companion) {
        let Some(window) = web_sys::window() else { return };
        match app.certificate(Utc::now().date_naive()) {
            Ok(cert) => {
                if let Some(document) = window.document() {
                    set_text(&document, "certificatePercentage", &format!("{}%", cert.percentage));
                    set_text(
                        &document,
                        "certificateDate",
                        &cert.issued_on.format("%B %-d, %Y").to_string(),
                    );
                }
                log::info!("Certificate issued at {}%", cert.percentage);
                let _ = window.print();
            }
            Err(e) => {
                let _ = window.alert_with_message(&format!("Please {}.", e));
            }
        }
    }

    fn export_progress(app: &Companion) {
        match app.export(Utc::now().date_naive()) {
            Ok((filename, json)) => {
                download_text(&filename, &json, "application/json");
                log::info!("Exported progress to {}", filename);
            }
            Err(e) => log::error!("Export failed: {}", e),
        }
    }

    fn index_of(el: &Element) -> Option<usize> {
        el.get_attribute("data-index")?.parse().ok()
    }

    /// Single delegated click handler for every `[data-action]` element
    fn handle_action(app: &Rc<RefCell<Companion>>, el: &Element) {
        let Some(action) = el.get_attribute("data-action") else {
            return;
        };

        match action.as_str() {
            "new-prompt" => {
                let category = el.get_attribute("data-category");
                open_prompt_editor(&app.borrow(), PromptSlot::New, category.as_deref());
            }
            "edit-prompt" => {
                if let Some(i) = index_of(el) {
                    open_prompt_editor(&app.borrow(), PromptSlot::At(i), None);
                }
            }
            "close-prompt" => close_prompt_editor(),
            "save-prompt" => {
                let mut g = app.borrow_mut();
                let draft = g.read_prompt_draft();
                if g.save_prompt(editing_slot(), draft, Utc::now()) {
                    close_prompt_editor();
                    update_progress_display(&g);
                }
            }
            "delete-prompt" => {
                let Some(i) = index_of(el) else { return };
                let confirmed = web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message("Are you sure you want to delete this prompt?")
                            .ok()
                    })
                    .unwrap_or(false);
                if confirmed {
                    let mut g = app.borrow_mut();
                    g.delete_prompt(i);
                    update_progress_display(&g);
                }
            }
            "copy-prompt" => {
                // Preset prompts carry their key instead of an index
                let text = match el.get_attribute("data-prompt-key") {
                    Some(key) => document()
                        .and_then(|d| {
                            d.query_selector(&format!("[data-prompt=\"{}\"]", key))
                                .ok()
                                .flatten()
                        })
                        .and_then(|p| p.text_content()),
                    None => index_of(el)
                        .and_then(|i| app.borrow().prompt(i).map(|p| p.content.clone())),
                };
                if let Some(text) = text.filter(|t| !t.is_empty()) {
                    copy_text(&text);
                    show_notification("Prompt copied to clipboard!");
                }
            }
            "submit-fears" => {
                let fears = app.borrow_mut().submit_fear_assessment(Utc::now());
                show_fear_results(&fears);
            }
            "calculate-metrics" => show_metrics(&app.borrow()),
            "export-progress" => export_progress(&app.borrow()),
            "print-certificate" => print_certificate(&app.borrow()),
            "clear-progress" => {
                let mut g = app.borrow_mut();
                g.clear();
                update_progress_display(&g);
                show_notification("Progress cleared");
            }
            other => log::debug!("Unhandled action: {}", other),
        }
    }

    fn setup_event_handlers(document: &Document, app: Rc<RefCell<Companion>>) {
        // Checkbox changes
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let is_checkbox = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                    .map(|input| input.type_() == "checkbox")
                    .unwrap_or(false);
                if is_checkbox {
                    let mut g = app.borrow_mut();
                    g.on_checkbox_changed();
                    update_progress_display(&g);
                }
            });
            let _ = document
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Calculator inputs
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let Some(id) = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map(|el| el.id())
                else {
                    return;
                };
                let g = app.borrow();
                match id.as_str() {
                    fields::HOURS_SAVED
                    | fields::HOURLY_VALUE
                    | fields::NEW_LEADS
                    | fields::CONVERSION_RATE
                    | fields::AVG_COMMISSION => update_roi(&g),
                    fields::CHALLENGE_DAYS => update_challenge(&g),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Buttons and the modal backdrop
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                if target.id() == PROMPT_MODAL_ID {
                    close_prompt_editor();
                    return;
                }
                if let Some(el) = target.closest("[data-action]").ok().flatten() {
                    handle_action(&app, &el);
                }
            });
            let _ = document
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Optional JSON overrides in `<script type="application/json" id="companion-config">`
    fn page_config(document: &Document) -> CompanionConfig {
        document
            .get_element_by_id("companion-config")
            .and_then(|el| el.text_content())
            .map(|json| CompanionConfig::from_json(&json))
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Course companion starting...");

        let document = document().expect("no document");
        let config = page_config(&document);

        let mut companion =
            CourseCompanion::new(config, LocalStorage::from_window(), DomPage::new(document.clone()));
        companion.start();
        log::info!("Progress state: {:?}", companion.lifecycle());

        update_progress_display(&companion);
        update_roi(&companion);
        update_challenge(&companion);

        let app = Rc::new(RefCell::new(companion));
        setup_event_handlers(&document, app);

        log::info!("Course companion running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use course_companion::{CompanionConfig, CourseCompanion, MemoryPage, MemoryStorage};

    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: course-companion <ai-profit-progress-YYYY-MM-DD.json>");
        std::process::exit(2);
    };

    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("could not read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let config = CompanionConfig::default();
    let storage = MemoryStorage::with_item(config.storage_key.clone(), json);
    let mut companion = CourseCompanion::new(config, storage, MemoryPage::new());
    companion.start();
    log::info!("Loaded {} ({:?})", path, companion.lifecycle());

    let record = companion.record();
    let stats = companion.dashboard();
    println!("Completed items: {}", record.completed_items.len());
    println!("Tools set up:    {}", stats.tools_label());
    println!("Prompts created: {}", stats.prompts_created);
    match &record.fear_assessment {
        Some(a) => println!(
            "Fear assessment: {} concerns ({})",
            a.fears.len(),
            a.assessed_at.format("%Y-%m-%d")
        ),
        None => println!("Fear assessment: not taken"),
    }
    for (i, prompt) in record.custom_prompts.iter().enumerate() {
        println!("  [{}] {} ({})", i, prompt.title, prompt.category);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
