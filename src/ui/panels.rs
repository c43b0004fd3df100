use eframe::egui::{self, Color32, RichText, Ui};
use symptrack::condition::Condition;

use crate::state::AppState;

const DISCLAIMER: &str =
    "This tool is for educational purposes only and does not provide medical advice.";

// ---------------------------------------------------------------------------
// Left side panel – condition picker and model card
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Condition:");
    for condition in Condition::ALL {
        ui.radio_value(&mut state.selected, condition, condition.title());
    }

    ui.separator();
    ui.heading("About SympTrack");
    ui.add_space(4.0);

    let condition = state.selected;
    let profile = condition.profile();

    egui::Grid::new("about_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            let entry = state.registry.get(condition);
            let metrics = entry.and_then(|e| e.artifact.metrics.as_ref());
            let percent = |v: f64| format!("{:.0}%", v * 100.0);

            ui.strong("Model:");
            ui.label(entry.map_or("n/a", |e| e.artifact.classifier.family()));
            ui.end_row();

            ui.strong("Accuracy:");
            ui.label(metrics.map_or_else(|| "n/a".to_string(), |m| percent(m.accuracy)));
            ui.end_row();

            ui.strong("F1 Score:");
            ui.label(metrics.map_or_else(|| "n/a".to_string(), |m| percent(m.f1)));
            ui.end_row();

            if let Some(cv) = metrics.and_then(|m| m.cv_accuracy) {
                ui.strong("CV Accuracy:");
                ui.label(percent(cv));
                ui.end_row();
            }

            ui.strong("Dataset:");
            ui.label(profile.dataset);
            ui.end_row();
        });

    if let Some(reason) = state.registry.failure(condition) {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Model unavailable: {reason}")).color(Color32::RED).small());
    }

    ui.add_space(8.0);
    ui.label(RichText::new(DISCLAIMER).italics());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load models…").clicked() {
                open_models_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} of {} models loaded from {}",
            state.registry.len(),
            Condition::ALL.len(),
            state.registry.dir().display()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_models_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Select models directory")
        .set_directory(state.registry.dir())
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Reloading models from {}", dir.display());
        state.load_models(&dir);
    }
}
