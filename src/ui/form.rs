use eframe::egui::{self, Ui};
use symptrack::condition::{ConditionProfile, FieldKind};

use crate::state::{FieldValue, FormState};

/// Draw one condition's input form. Returns `true` if any value changed.
pub fn condition_form(ui: &mut Ui, profile: &ConditionProfile, form: &mut FormState) -> bool {
    let mut changed = false;

    egui::Grid::new(("form", profile.condition.file_stem()))
        .num_columns(2)
        .spacing([16.0, 6.0])
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for field in profile.fields {
                let Some(value) = form.values.get_mut(field.key) else {
                    continue;
                };
                ui.label(field.label);

                match (field.kind, value) {
                    (FieldKind::Slider(spec), FieldValue::Number(v)) => {
                        let mut slider = egui::Slider::new(v, spec.min..=spec.max).step_by(spec.step);
                        if spec.integer {
                            slider = slider.integer();
                        }
                        changed |= ui.add(slider).changed();
                    }
                    (FieldKind::Coded { .. } | FieldKind::OneHot(_), FieldValue::Choice(idx)) => {
                        let labels = field.option_labels();
                        let current = labels.get(*idx).cloned().unwrap_or_default();
                        egui::ComboBox::from_id_salt((profile.condition.file_stem(), field.key))
                            .selected_text(current)
                            .show_ui(ui, |ui: &mut Ui| {
                                for (i, label) in labels.iter().enumerate() {
                                    changed |= ui.selectable_value(idx, i, label.as_str()).changed();
                                }
                            });
                    }
                    (_, other) => {
                        log::error!("Field `{}` holds a mismatched value {other:?}", field.key);
                    }
                }
                ui.end_row();
            }
        });

    changed
}
