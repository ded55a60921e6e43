use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use school_census::data::stats::HistogramBin;

// ---------------------------------------------------------------------------
// Histograms and bar charts
// ---------------------------------------------------------------------------

/// Histogram of school counts per value bin.
pub fn histogram_plot(ui: &mut Ui, id: &str, x_label: &str, bins: &[HistogramBin], color: Color32) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width() * 0.9)
                .name(format!("{:.0}–{:.0}", b.start, b.end))
        })
        .collect();

    let chart = BarChart::new(bars).color(color).name(x_label);

    Plot::new(id)
        .height(240.0)
        .x_axis_label(x_label)
        .y_axis_label("학교 수")
        .allow_scroll(false)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// One bar per region, labelled on the x axis.
pub fn region_bar_chart(ui: &mut Ui, id: &str, counts: &[(String, usize)], color: Color32) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (region, n))| Bar::new(i as f64, *n as f64).width(0.7).name(region))
        .collect();
    let labels: Vec<String> = counts.iter().map(|(region, _)| region.clone()).collect();

    let chart = BarChart::new(bars).color(color).name("학교 수");

    Plot::new(id)
        .height(280.0)
        .y_axis_label("학교 수")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}
