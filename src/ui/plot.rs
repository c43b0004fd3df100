use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};
use symptrack::pipeline::presenter::{Chart, BAR_LABEL_DECIMALS};

// ---------------------------------------------------------------------------
// Contribution chart (central panel)
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 26.0;

/// Horizontal bar chart, largest contribution at the top, value labels at
/// the bar ends.
pub fn contribution_chart(ui: &mut Ui, id: &str, chart: &Chart) {
    ui.strong(chart.title);

    let n = chart.bars.len();
    if n == 0 {
        ui.label("No contributions to show.");
        return;
    }

    // Row i sits at y = n-1-i so the first (largest) bar is drawn on top.
    let y_of = move |i: usize| (n - 1 - i) as f64;
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let max_value = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let pad = if max_value > 0.0 { max_value * 0.02 } else { 0.01 };

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(y_of(i), b.value)
                .name(&b.label)
                .fill(b.color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(ROW_HEIGHT * n as f32 + 50.0)
        .x_axis_label(chart.axis_label)
        .include_x(0.0)
        .include_x(max_value * 1.15 + pad)
        .y_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 || pos >= n as f64 {
                return String::new();
            }
            labels
                .get(n - 1 - pos as usize)
                .cloned()
                .unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, b) in chart.bars.iter().enumerate() {
                let text = RichText::new(format!("{:.*}", BAR_LABEL_DECIMALS, b.value)).small();
                plot_ui.text(
                    Text::new(PlotPoint::new(b.value + pad, y_of(i)), text)
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}
