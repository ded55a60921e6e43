use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use school_census::SchoolLevel;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colour per school level, shared by every chart.
pub fn level_color(level: SchoolLevel) -> Color32 {
    let palette = generate_palette(SchoolLevel::ALL.len());
    SchoolLevel::ALL
        .iter()
        .position(|&l| l == level)
        .and_then(|i| palette.get(i).copied())
        .unwrap_or(Color32::LIGHT_BLUE)
}
