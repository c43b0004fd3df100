use std::path::Path;

use eframe::egui::{self, RichText, Ui};

use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SympTrackApp {
    pub state: AppState,
}

impl SympTrackApp {
    pub fn new(models_dir: &Path) -> Self {
        Self {
            state: AppState::new(models_dir),
        }
    }
}

impl eframe::App for SympTrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: condition picker ----
        egui::SidePanel::left("condition_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: form and result ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading(RichText::new("SympTrack: AI-Powered Metabolic Health Dashboard").strong());
                    ui.label("Predict your risk for Heart Disease, Diabetes, or Hypertension.");
                    ui.separator();
                    report::condition_page(ui, &mut self.state);
                });
        });
    }
}
