//! Colormaps for cell backgrounds
//!
//! Values are normalized to `[0, 1]` over the array's range and mapped
//! through piecewise-linear color stops. A constant array maps every cell to
//! the low end.

use crate::array::{NdArray, Scalar};
use ratatui::style::Color;

type Rgb = (u8, u8, u8);

const COOLWARM: &[Rgb] = &[(59, 76, 192), (221, 221, 221), (180, 4, 38)];

const BLUES: &[Rgb] = &[
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

const VIRIDIS: &[Rgb] = &[
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

const GREYS: &[Rgb] = &[(255, 255, 255), (0, 0, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Diverging blue-grey-red
    Coolwarm,
    /// Sequential white to dark blue
    Blues,
    Viridis,
    Greys,
}

impl Colormap {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "coolwarm" => Some(Colormap::Coolwarm),
            "blues" => Some(Colormap::Blues),
            "viridis" => Some(Colormap::Viridis),
            "greys" | "grays" => Some(Colormap::Greys),
            _ => None,
        }
    }

    /// Resolve a configured name, warning and using `fallback` when unknown
    pub fn from_config(name: &str, fallback: Colormap) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(colormap = name, "Unknown colormap, using {:?}", fallback);
            fallback
        })
    }

    fn stops(&self) -> &'static [Rgb] {
        match self {
            Colormap::Coolwarm => COOLWARM,
            Colormap::Blues => BLUES,
            Colormap::Viridis => VIRIDIS,
            Colormap::Greys => GREYS,
        }
    }

    /// Color at position `t` in `[0, 1]`; out-of-range input is clamped
    pub fn rgb(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f64;
        let (a, b) = (stops[lower], stops[lower + 1]);
        (lerp(a.0, b.0, frac), lerp(a.1, b.1, frac), lerp(a.2, b.2, frac))
    }

}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Linear map from an array's value range onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f64,
    max: f64,
}

impl Normalizer {
    pub fn for_array(array: &NdArray) -> Self {
        let (min, max) = array.value_range().unwrap_or((0.0, 0.0));
        Self { min, max }
    }

    pub fn normalize(&self, value: Scalar) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        (value.to_f64() - self.min) / span
    }
}

/// Black or white text, whichever reads better on `background`
pub fn text_color(background: Rgb) -> Color {
    let (r, g, b) = background;
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}
