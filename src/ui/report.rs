use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use symptrack::condition::{Condition, RunMode};
use symptrack::pipeline::presenter::{Advisory, Presentation, Tone};

use super::{form, plot};
use crate::state::AppState;

const WARNING_FILL: Color32 = Color32::from_rgb(0x5a, 0x1d, 0x1d);
const WARNING_TEXT: Color32 = Color32::from_rgb(0xff, 0xb3, 0xb3);
const SUCCESS_FILL: Color32 = Color32::from_rgb(0x1d, 0x4a, 0x2a);
const SUCCESS_TEXT: Color32 = Color32::from_rgb(0xb8, 0xf0, 0xc6);

// ---------------------------------------------------------------------------
// Condition page (central panel)
// ---------------------------------------------------------------------------

/// Form, run button and the latest result for the selected condition.
pub fn condition_page(ui: &mut Ui, state: &mut AppState) {
    let condition = state.selected;
    let profile = condition.profile();
    ui.heading(profile.heading);
    ui.add_space(6.0);

    if state.registry.get(condition).is_none() {
        ui.label(
            RichText::new(format!(
                "The {} model is not loaded. Train it or pick another models folder (File → Load models…).",
                condition.title()
            ))
            .color(Color32::RED),
        );
        return;
    }

    let Some(page) = state.page_mut(condition) else {
        return;
    };
    let changed = form::condition_form(ui, profile, &mut page.form);
    ui.add_space(8.0);

    if changed {
        state.form_edited(condition);
    }
    if let RunMode::OnDemand(label) = profile.run_mode {
        if ui.button(RichText::new(label).strong()).clicked() {
            state.run(condition);
        }
    }

    let Some(page) = state.page(condition) else {
        return;
    };
    if let Some(err) = &page.error {
        ui.label(RichText::new(format!("Error: {err}")).color(Color32::RED));
    }
    if let Some(presentation) = &page.presentation {
        ui.separator();
        report(ui, condition, presentation);
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

pub fn report(ui: &mut Ui, condition: Condition, presentation: &Presentation) {
    ui.label(RichText::new(presentation.score_line()).size(20.0).strong());
    ui.add_space(6.0);

    if let Some(factors) = &presentation.factors {
        ui.strong(factors.heading);
        if factors.lines.is_empty() {
            if let Some(msg) = factors.empty_message {
                ui.label(msg);
            }
        }
        for line in &factors.lines {
            let direction = line.direction.map(|d| d.arrow()).unwrap_or_default();
            ui.label(format!(
                "• {} ({}: {:.*}) {direction}",
                line.label, factors.impact_label, factors.precision, line.impact
            ));
            if let Some(description) = line.description {
                ui.label(RichText::new(description).small().weak());
            }
        }
        ui.add_space(8.0);
    }

    plot::contribution_chart(ui, condition.file_stem(), &presentation.chart);
    ui.add_space(8.0);

    advisory(ui, &presentation.advisory);
    ui.add_space(8.0);

    egui::CollapsingHeader::new("Contribution details")
        .id_salt(("details", condition.file_stem()))
        .default_open(false)
        .show(ui, |ui: &mut Ui| details_table(ui, presentation));

    if let Some(text) = condition.profile().how_it_works {
        egui::CollapsingHeader::new("How this works")
            .id_salt(("how", condition.file_stem()))
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.label(text);
            });
    }
}

fn advisory(ui: &mut Ui, advisory: &Advisory) {
    let (fill, text) = match advisory.tone {
        Tone::Warning => (WARNING_FILL, WARNING_TEXT),
        Tone::Success => (SUCCESS_FILL, SUCCESS_TEXT),
    };
    egui::Frame::group(ui.style())
        .fill(fill)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(advisory.message).color(text));
        });
}

fn details_table(ui: &mut Ui, presentation: &Presentation) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Feature", "Input", "Score", "Direction"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &presentation.details {
                body.row(18.0, |mut cells| {
                    cells.col(|ui: &mut Ui| {
                        ui.label(row.feature.as_str());
                    });
                    cells.col(|ui: &mut Ui| {
                        ui.label(format!("{}", row.value));
                    });
                    cells.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", row.score));
                    });
                    cells.col(|ui: &mut Ui| {
                        ui.label(row.direction.map_or("–", |d| d.arrow()));
                    });
                });
            }
        });
}
