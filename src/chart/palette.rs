//! Gradient palettes for ranked bar charts
//!
//! Colours are interpolated linearly between a few anchor colours, so a
//! ranking of any length gets an evenly spread set of shades.

use plotters::style::RGBColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Near-black through magenta to pale yellow
    Magma,
    /// Blue through light grey to red
    CoolWarm,
}

impl Palette {
    fn anchors(self) -> &'static [(u8, u8, u8)] {
        match self {
            Palette::Magma => &[(28, 16, 68), (129, 37, 129), (229, 80, 100), (252, 253, 191)],
            Palette::CoolWarm => &[(59, 76, 192), (221, 221, 221), (180, 4, 38)],
        }
    }

    /// Colour for item `index` out of `count`
    pub fn color(self, index: usize, count: usize) -> RGBColor {
        let anchors = self.anchors();
        let t = if count > 1 {
            index.min(count - 1) as f64 / (count - 1) as f64
        } else {
            0.0
        };

        let spans = (anchors.len() - 1) as f64;
        let pos = t * spans;
        let lo = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = pos - lo as f64;

        let (a, b) = (anchors[lo], anchors[lo + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}
