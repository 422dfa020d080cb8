//! Chart geometry: ring/donut dash offsets, pie slice arcs, bar scaling.
//!
//! Pure arithmetic. Nothing here draws; the render module turns these
//! primitives into SVG.

pub mod bar;
pub mod pie;
pub mod ring;

pub use bar::{BarLayout, BarStyle};
pub use pie::{PieEntry, PieLayout, PieSlice};
pub use ring::RingGeometry;

/// Angle of 12 o'clock in SVG's y-down coordinate system.
pub const TWELVE_O_CLOCK_DEG: f64 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Point on a circle of `radius` around `center` at `angle_deg`.
    pub fn on_circle(center: Point, radius: f64, angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        Point {
            x: center.x + radius * rad.cos(),
            y: center.y + radius * rad.sin(),
        }
    }
}

/// Format a coordinate for SVG output: at most three decimals, no trailing zeros.
pub fn svg_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.3}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_number_trims() {
        assert_eq!(svg_number(60.0), "60");
        assert_eq!(svg_number(12.5), "12.5");
        assert_eq!(svg_number(1.23456), "1.235");
        assert_eq!(svg_number(-0.0001), "0");
    }

    #[test]
    fn test_on_circle_twelve_o_clock() {
        let p = Point::on_circle(Point { x: 60.0, y: 60.0 }, 50.0, TWELVE_O_CLOCK_DEG);
        assert!((p.x - 60.0).abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }
}
