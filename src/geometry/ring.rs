//! Circular progress indicator geometry.
//!
//! A ring is drawn as a full background circle plus a foreground circle whose
//! stroke is dashed with `dasharray = C C` and shifted by `dash_offset`, so
//! the visible arc length is `C * p / 100`. The foreground is rotated -90°
//! about the center so the arc starts at 12 o'clock.

use serde::Serialize;

use super::{Point, TWELVE_O_CLOCK_DEG};
use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingGeometry {
    pub size: f64,
    pub stroke_width: f64,
    pub radius: f64,
    pub circumference: f64,
    /// Input percentage after clamping to [0, 100].
    pub percent: f64,
    pub dash_offset: f64,
}

impl RingGeometry {
    /// Geometry for a `size`×`size` ring drawn with `stroke_width`.
    ///
    /// Fails when the derived radius `(size - stroke_width) / 2` is not
    /// positive.
    pub fn new(size: f64, stroke_width: f64, percent: f64) -> Result<Self, DashboardError> {
        let radius = ring_radius(size, stroke_width)?;
        let circumference = 2.0 * std::f64::consts::PI * radius;
        let percent = clamp_percent(percent);
        Ok(Self {
            size,
            stroke_width,
            radius,
            circumference,
            percent,
            dash_offset: dash_offset(circumference, percent),
        })
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.size / 2.0,
            y: self.size / 2.0,
        }
    }

    /// Rotation applied to the foreground circle.
    pub fn rotation_deg(&self) -> f64 {
        TWELVE_O_CLOCK_DEG
    }

    /// `(dash, gap)` for `stroke-dasharray`.
    pub fn dash_array(&self) -> (f64, f64) {
        (self.circumference, self.circumference)
    }

    /// Length of the drawn foreground arc.
    pub fn visible_length(&self) -> f64 {
        self.circumference - self.dash_offset
    }
}

/// `(size - stroke_width) / 2`, rejecting non-positive or non-finite results.
pub fn ring_radius(size: f64, stroke_width: f64) -> Result<f64, DashboardError> {
    let radius = (size - stroke_width) / 2.0;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(DashboardError::DegenerateGeometry(format!(
            "ring radius {} from size {} and stroke width {} is not positive",
            radius, size, stroke_width
        )));
    }
    Ok(radius)
}

/// Clamp to [0, 100]. NaN counts as 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// `C - C * p / 100` with `p` clamped.
pub fn dash_offset(circumference: f64, percent: f64) -> f64 {
    let p = clamp_percent(percent);
    circumference - (circumference * p) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_and_circumference() {
        let ring = RingGeometry::new(54.0, 6.0, 50.0).unwrap();
        assert_eq!(ring.radius, 24.0);
        assert!((ring.circumference - 48.0 * std::f64::consts::PI).abs() < 1e-9);
        assert!((ring.dash_offset - ring.circumference / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoints() {
        let empty = RingGeometry::new(180.0, 16.0, 0.0).unwrap();
        assert_eq!(empty.dash_offset, empty.circumference);
        assert_eq!(empty.visible_length(), 0.0);

        let full = RingGeometry::new(180.0, 16.0, 100.0).unwrap();
        assert_eq!(full.dash_offset, 0.0);
        assert_eq!(full.visible_length(), full.circumference);
    }

    #[test]
    fn test_offset_monotonic_non_increasing() {
        let c = 100.0;
        let mut previous = f64::INFINITY;
        for step in 0..=200 {
            let p = step as f64 * 0.5;
            let offset = dash_offset(c, p);
            assert!(offset <= previous, "offset rose at p={}", p);
            previous = offset;
        }
    }

    #[test]
    fn test_clamps_out_of_range() {
        let low = RingGeometry::new(54.0, 6.0, -10.0).unwrap();
        let zero = RingGeometry::new(54.0, 6.0, 0.0).unwrap();
        assert_eq!(low, zero);

        let high = RingGeometry::new(54.0, 6.0, 150.0).unwrap();
        let hundred = RingGeometry::new(54.0, 6.0, 100.0).unwrap();
        assert_eq!(high, hundred);
    }

    #[test]
    fn test_nan_percent_is_zero() {
        let ring = RingGeometry::new(54.0, 6.0, f64::NAN).unwrap();
        assert_eq!(ring.percent, 0.0);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(matches!(
            RingGeometry::new(6.0, 6.0, 10.0),
            Err(DashboardError::DegenerateGeometry(_))
        ));
        assert!(RingGeometry::new(4.0, 6.0, 10.0).is_err());
        assert!(RingGeometry::new(f64::NAN, 6.0, 10.0).is_err());
    }

    #[test]
    fn test_starts_at_twelve() {
        let ring = RingGeometry::new(54.0, 6.0, 10.0).unwrap();
        assert_eq!(ring.rotation_deg(), -90.0);
        assert_eq!(ring.center(), Point { x: 27.0, y: 27.0 });
    }
}
