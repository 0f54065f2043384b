use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::options::SelectOption;
use crate::state::AppState;

const ANY: &str = "(any)";

// ---------------------------------------------------------------------------
// Left side panel – cascading filter widgets
// ---------------------------------------------------------------------------

/// One dropdown. Returns `Some(new_value)` when the user changed it.
fn filter_combo(
    ui: &mut Ui,
    id: &str,
    title: &str,
    placeholder: &str,
    options: &[SelectOption],
    current: Option<&str>,
) -> Option<Option<String>> {
    ui.strong(title);
    let selected_text = current
        .and_then(|v| options.iter().find(|o| o.value == v))
        .map(|o| o.label.clone())
        .unwrap_or_else(|| placeholder.to_string());

    let mut changed = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), ANY).clicked() && current.is_some() {
                changed = Some(None);
            }
            // Same value may appear under two labels (course renamed between terms).
            for (i, opt) in options.iter().enumerate() {
                let is_selected = current == Some(opt.value.as_str());
                let response = ui
                    .push_id(i, |ui: &mut Ui| ui.selectable_label(is_selected, &opt.label))
                    .inner;
                let response = match &opt.title {
                    Some(title) => response.on_hover_text(title),
                    None => response,
                };
                if response.clicked() && !is_selected {
                    changed = Some(Some(opt.value.clone()));
                }
            }
        });
    ui.add_space(6.0);
    changed
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone what we need so we can mutate state afterwards.
    let options = state.view().options.clone();
    let selection = state.selection().clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(v) = filter_combo(
                ui,
                "school_department",
                "School/Department",
                "Select school/department",
                &options.school_departments,
                selection.school_department.as_deref(),
            ) {
                state.set_school_department(v);
            }
            if let Some(v) = filter_combo(
                ui,
                "course",
                "Course",
                "Select a course (e.g., CS102)",
                &options.courses,
                selection.course_code.as_deref(),
            ) {
                state.set_course(v);
            }
            if let Some(v) = filter_combo(
                ui,
                "bidding_window",
                "Bidding Window",
                "Select bidding window",
                &options.bidding_windows,
                selection.bidding_window.as_deref(),
            ) {
                state.set_bidding_window(v);
            }
            if let Some(v) = filter_combo(
                ui,
                "instructor",
                "Instructor",
                "Select instructor",
                &options.instructors,
                selection.instructor.as_deref(),
            ) {
                state.set_instructor(v);
            }

            ui.separator();

            // ---- Sections checklist ----
            let header = format!(
                "Sections  ({}/{})",
                selection.sections.len(),
                options.sections.len()
            );
            ui.strong(header);
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_sections();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_sections();
                }
            });
            if options.sections.is_empty() {
                ui.label(RichText::new("No sections for these filters").weak());
            }
            for opt in &options.sections {
                let mut checked = selection.sections.contains(&opt.value);
                if ui.checkbox(&mut checked, &opt.label).changed() {
                    state.toggle_section(&opt.value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let has_charts = !state.charts().is_empty();
            if ui
                .add_enabled(has_charts, egui::Button::new("Export charts…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} matching",
            state.dataset().len(),
            state.view().matching
        ))
        .on_hover_text(state.source.display().to_string());

        ui.separator();

        if ui
            .selectable_label(state.compare_sections, "Compare sections")
            .clicked()
        {
            state.compare_sections = !state.compare_sections;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        match state.export_charts(&path) {
            Ok(_) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
