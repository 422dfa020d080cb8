//! Pie/ring slice geometry.
//!
//! Slices are laid out clockwise in input order starting at 12 o'clock. Each
//! slice is a closed path from the center out to the circumference, along the
//! arc, and back. A concentric hole of radius `size / 4` is drawn over the
//! center by the renderer.

use serde::Serialize;

use super::{svg_number, Point, TWELVE_O_CLOCK_DEG};
use crate::error::DashboardError;

/// Gap between the outer arc and the bounding box.
const OUTER_PADDING: f64 = 10.0;

/// Sweeps this close to a full turn are drawn as two half arcs.
const FULL_TURN_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct PieEntry {
    pub label: String,
    pub value: f64,
    pub color: String,
}

impl PieEntry {
    pub fn new(label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub label: String,
    pub color: String,
    pub value: f64,
    pub percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub large_arc: bool,
    pub start: Point,
    pub end: Point,
    /// SVG path data for the filled wedge.
    pub path: String,
}

impl PieSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieLayout {
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    pub hole_radius: f64,
    pub total: f64,
    pub slices: Vec<PieSlice>,
}

impl PieLayout {
    /// Partition a circle of diameter `size` into wedges proportional to the
    /// entry values.
    ///
    /// Fails when the total is not positive or any value is negative or not
    /// finite, and when `size` leaves no room for the arc.
    pub fn new(entries: &[PieEntry], size: f64) -> Result<Self, DashboardError> {
        if let Some(bad) = entries
            .iter()
            .find(|e| !e.value.is_finite() || e.value < 0.0)
        {
            return Err(DashboardError::DegenerateGeometry(format!(
                "pie value {} for '{}' must be a non-negative number",
                bad.value, bad.label
            )));
        }

        let total: f64 = entries.iter().map(|e| e.value).sum();
        if total <= 0.0 {
            return Err(DashboardError::DegenerateGeometry(
                "pie chart total is zero".to_string(),
            ));
        }

        let radius = size / 2.0 - OUTER_PADDING;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(DashboardError::DegenerateGeometry(format!(
                "pie size {} leaves no radius",
                size
            )));
        }

        let center = Point {
            x: size / 2.0,
            y: size / 2.0,
        };

        let mut cumulative_pct = 0.0;
        let mut slices = Vec::with_capacity(entries.len());
        for entry in entries {
            let percentage = entry.value / total * 100.0;
            let start_angle = cumulative_pct / 100.0 * 360.0 + TWELVE_O_CLOCK_DEG;
            let sweep = percentage / 100.0 * 360.0;
            let end_angle = start_angle + sweep;
            cumulative_pct += percentage;

            let start = Point::on_circle(center, radius, start_angle);
            let end = Point::on_circle(center, radius, end_angle);
            let large_arc = sweep > 180.0;
            let path = if sweep >= 360.0 - FULL_TURN_EPSILON {
                full_circle_path(center, radius, start_angle)
            } else {
                wedge_path(center, radius, start, end, large_arc)
            };

            slices.push(PieSlice {
                label: entry.label.clone(),
                color: entry.color.clone(),
                value: entry.value,
                percentage,
                start_angle,
                end_angle,
                large_arc,
                start,
                end,
                path,
            });
        }

        Ok(Self {
            size,
            center,
            radius,
            hole_radius: size / 4.0,
            total,
            slices,
        })
    }
}

fn wedge_path(center: Point, radius: f64, start: Point, end: Point, large_arc: bool) -> String {
    format!(
        "M {cx} {cy} L {x1} {y1} A {r} {r} 0 {flag} 1 {x2} {y2} Z",
        cx = svg_number(center.x),
        cy = svg_number(center.y),
        x1 = svg_number(start.x),
        y1 = svg_number(start.y),
        r = svg_number(radius),
        flag = u8::from(large_arc),
        x2 = svg_number(end.x),
        y2 = svg_number(end.y),
    )
}

/// A single arc cannot start and end on the same point, so a full turn is
/// split at the opposite side.
fn full_circle_path(center: Point, radius: f64, start_angle: f64) -> String {
    let start = Point::on_circle(center, radius, start_angle);
    let opposite = Point::on_circle(center, radius, start_angle + 180.0);
    format!(
        "M {cx} {cy} L {x1} {y1} A {r} {r} 0 0 1 {xm} {ym} A {r} {r} 0 0 1 {x1} {y1} Z",
        cx = svg_number(center.x),
        cy = svg_number(center.y),
        x1 = svg_number(start.x),
        y1 = svg_number(start.y),
        r = svg_number(radius),
        xm = svg_number(opposite.x),
        ym = svg_number(opposite.y),
    )
}
