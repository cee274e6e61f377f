//! Piecewise-linear color ramps for choropleth layers.

use std::fmt;

use anyhow::{anyhow, ensure, Result};
use serde::Serialize;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        ensure!(digits.len() == 6 && digits.is_ascii(), "[classify::color] Invalid hex color {:?}", hex);
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|e| anyhow!("[classify::color] Invalid hex color {:?}: {}", hex, e));
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb { r: mix(self.r, other.r), g: mix(self.g, other.g), b: mix(self.b, other.b) }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill for values that cannot be placed on a ramp (NaN, zero-width scale).
pub const NO_ACCESS: Rgb = Rgb::new(0xd9, 0xd9, 0xd9);

const ACCESS_RAMP: [&str; 6] = ["#F3E79A", "#F9B282", "#ED7C97", "#D868A3", "#704D9E", "#573980"];

const PALMA_RAMP: [&str; 8] = ["#FFFFC8", "#FDEBA8", "#F8CD6D", "#F5A800", "#F17B00", "#E54000", "#B51700", "#7D0025"];
const PALMA_WIDE_STOPS: [f64; 8] = [0.0, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0];
const PALMA_NARROW_STOPS: [f64; 8] = [0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Fixed domain of the Palma ratio color scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PalmaScale {
    /// 0 to 10, stops at 0, 1, 2, 3, 4, 6, 8, 10.
    #[default]
    Wide,
    /// 0 to 2, for selections where ratios sit close to equality.
    Narrow,
}

/// A color ramp interpolated linearly in RGB between ascending stops.
/// Values outside the domain take the color of the nearest end.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorScale {
    stops: Vec<(f64, Rgb)>,
}

impl ColorScale {
    pub fn new(stops: Vec<(f64, Rgb)>) -> Result<Self> {
        ensure!(!stops.is_empty(), "[classify::color] A color scale needs at least one stop");
        ensure!(stops.iter().all(|(v, _)| v.is_finite()), "[classify::color] Color stops must be finite");
        ensure!(stops.windows(2).all(|w| w[0].0 <= w[1].0), "[classify::color] Color stops must be ascending");
        Ok(Self { stops })
    }

    /// Pair hex colors with stop values.
    pub fn from_hex(colors: &[&str], index: &[f64]) -> Result<Self> {
        ensure!(colors.len() == index.len(),
            "[classify::color] {} colors for {} stops", colors.len(), index.len());
        let stops = index.iter().copied()
            .zip(colors.iter().map(|c| Rgb::from_hex(c)))
            .map(|(v, c)| c.map(|c| (v, c)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(stops)
    }

    /// A scale that paints everything with one color.
    pub fn single(color: Rgb) -> Self {
        Self { stops: vec![(0.0, color)] }
    }

    /// Cumulative access ramp over `[0, max]` with stops at `max * i / 5`.
    /// A zero maximum gives the single "no access" category.
    pub fn access(max: f64) -> Self {
        if !(max.is_finite() && max > 0.0) { return Self::single(NO_ACCESS) }
        let last = (ACCESS_RAMP.len() - 1) as f64;
        Self {
            stops: ACCESS_RAMP.iter().enumerate()
                .filter_map(|(i, hex)| Rgb::from_hex(hex).ok().map(|c| (max * i as f64 / last, c)))
                .collect(),
        }
    }

    /// Fixed Palma ratio ramp, independent of the data being shown.
    pub fn palma(scale: PalmaScale) -> Self {
        let index = match scale {
            PalmaScale::Wide => &PALMA_WIDE_STOPS,
            PalmaScale::Narrow => &PALMA_NARROW_STOPS,
        };
        Self {
            stops: index.iter().copied()
                .zip(PALMA_RAMP.iter().filter_map(|hex| Rgb::from_hex(hex).ok()))
                .collect(),
        }
    }

    pub fn stops(&self) -> &[(f64, Rgb)] { &self.stops }

    pub fn vmin(&self) -> f64 { self.stops[0].0 }

    pub fn vmax(&self) -> f64 { self.stops[self.stops.len() - 1].0 }

    /// Domain of zero width.
    pub fn is_single(&self) -> bool { self.vmax() <= self.vmin() }

    pub fn color(&self, value: f64) -> Rgb {
        if value.is_nan() { return NO_ACCESS }
        if self.is_single() { return self.stops[0].1 }

        let x = value.clamp(self.vmin(), self.vmax());
        for pair in self.stops.windows(2) {
            let ((lo, c0), (hi, c1)) = (pair[0], pair[1]);
            if x <= hi {
                let t = if hi > lo { (x - lo) / (hi - lo) } else { 1.0 };
                return c0.lerp(c1, t);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let color = Rgb::from_hex("#F3E79A").unwrap();
        assert_eq!(color, Rgb::new(0xf3, 0xe7, 0x9a));
        assert_eq!(color.to_string(), "#f3e79a");
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn interpolates_between_stops() {
        let scale = ColorScale::new(vec![(0.0, Rgb::new(0, 0, 0)), (10.0, Rgb::new(200, 100, 50))]).unwrap();
        assert_eq!(scale.color(5.0), Rgb::new(100, 50, 25));
        assert_eq!(scale.color(-3.0), Rgb::new(0, 0, 0));
        assert_eq!(scale.color(99.0), Rgb::new(200, 100, 50));
        assert_eq!(scale.color(f64::NAN), NO_ACCESS);
    }

    #[test]
    fn access_ramp_spans_the_maximum() {
        let scale = ColorScale::access(50.0);
        assert_eq!(scale.stops().len(), 6);
        assert_eq!(scale.vmax(), 50.0);
        assert_eq!(scale.color(0.0), Rgb::from_hex("#F3E79A").unwrap());
        assert_eq!(scale.color(50.0), Rgb::from_hex("#573980").unwrap());
        assert_eq!(scale.color(10.0), Rgb::from_hex("#F9B282").unwrap());
    }

    #[test]
    fn zero_width_access_ramp_is_single_category() {
        let scale = ColorScale::access(0.0);
        assert!(scale.is_single());
        assert_eq!(scale.color(0.0), NO_ACCESS);
        assert_eq!(scale.color(12.0), NO_ACCESS);
    }

    #[test]
    fn palma_scale_is_fixed() {
        let wide = ColorScale::palma(PalmaScale::Wide);
        assert_eq!(wide.vmax(), 10.0);
        assert_eq!(wide.color(6.0), Rgb::from_hex("#E54000").unwrap());
        assert_eq!(wide.color(25.0), Rgb::from_hex("#7D0025").unwrap());

        let narrow = ColorScale::palma(PalmaScale::Narrow);
        assert_eq!(narrow.vmax(), 2.0);
        assert_eq!(narrow.color(1.0), Rgb::from_hex("#F17B00").unwrap());
    }

    #[test]
    fn rejects_unordered_stops() {
        assert!(ColorScale::from_hex(&["#000000", "#ffffff"], &[1.0, 0.0]).is_err());
        assert!(ColorScale::from_hex(&["#000000"], &[0.0, 1.0]).is_err());
    }
}
