use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{RiskLabel, Smoker};

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const RED: Color32 = Color32::from_rgb(0xe7, 0x4c, 0x3c);
pub const ORANGE: Color32 = Color32::from_rgb(0xf3, 0x9c, 0x12);
pub const GREEN: Color32 = Color32::from_rgb(0x2e, 0xcc, 0x71);
pub const TITLE: Color32 = Color32::from_rgb(0x2c, 0x3e, 0x50);

pub fn smoker_color(smoker: Smoker) -> Color32 {
    match smoker {
        Smoker::Yes => RED,
        Smoker::No => GREEN,
    }
}

pub fn risk_color(risk: RiskLabel) -> Color32 {
    match risk {
        RiskLabel::High => RED,
        RiskLabel::Medium => ORANGE,
        RiskLabel::Low => GREEN,
    }
}

// ---------------------------------------------------------------------------
// Qualitative palette for pie slices
// ---------------------------------------------------------------------------

/// Generates `n` soft, visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.72);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Red-white-blue stops, red at -1.
const DIVERGING: [(u8, u8, u8); 3] = [(0xb2, 0x18, 0x2b), (0xf7, 0xf7, 0xf7), (0x21, 0x66, 0xac)];

/// Colour for a correlation in `[-1, 1]`; grey for an undefined cell.
pub fn correlation_color(value: Option<f64>) -> Color32 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return Color32::LIGHT_GRAY;
    };
    let t = ((v.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let (from, to, factor) = if t < 0.5 {
        (DIVERGING[0], DIVERGING[1], t * 2.0)
    } else {
        (DIVERGING[1], DIVERGING[2], (t - 0.5) * 2.0)
    };
    let mixed = linear(from).mix(linear(to), factor);
    to_color32(Srgb::from_linear(mixed))
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_correlation_scale_endpoints() {
        let neg = correlation_color(Some(-1.0));
        let pos = correlation_color(Some(1.0));
        let zero = correlation_color(Some(0.0));
        assert!(neg.r() > neg.b());
        assert!(pos.b() > pos.r());
        assert!(zero.r() > 0xf0 && zero.g() > 0xf0 && zero.b() > 0xf0);
        assert_eq!(correlation_color(None), Color32::LIGHT_GRAY);
        assert_eq!(correlation_color(Some(f64::NAN)), Color32::LIGHT_GRAY);
    }
}
