use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::pipeline::explainer::Direction;

// ---------------------------------------------------------------------------
// Bar shading
// ---------------------------------------------------------------------------

/// Lightness added to bars of risk-decreasing factors.
const DECREASING_LIFT: f32 = 0.22;

pub fn from_rgb(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Raise the HSL lightness of a colour, capped below white.
pub fn lighten(rgb: [u8; 3], amount: f32) -> Color32 {
    let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let mut hsl: Hsl = srgb.into_color();
    hsl.lightness = (hsl.lightness + amount).min(0.92);
    let out: Srgb = hsl.into_color();
    Color32::from_rgb(
        (out.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (out.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (out.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Chart colour for one contribution of a condition whose base colour is `rgb`.
pub fn bar_color(rgb: [u8; 3], direction: Option<Direction>) -> Color32 {
    match direction {
        Some(Direction::DecreasesRisk) => lighten(rgb, DECREASING_LIFT),
        _ => from_rgb(rgb),
    }
}
