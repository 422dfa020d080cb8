//! Horizontal bar chart scaling.

use serde::Serialize;

use crate::types::LabeledValue;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarStyle {
    pub width: f64,
    pub padding: f64,
    pub bar_thickness: f64,
    pub gap: f64,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            width: 320.0,
            padding: 20.0,
            bar_thickness: 18.0,
            gap: 16.0,
        }
    }
}

impl BarStyle {
    pub fn with_width(width: f64) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Usable length of a bar track.
    pub fn track_length(&self) -> f64 {
        (self.width - self.padding * 2.0).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub length: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayout {
    pub style: BarStyle,
    pub max: f64,
    pub track_length: f64,
    /// Height needed to show every bar.
    pub height: f64,
    pub bars: Vec<Bar>,
}

impl BarLayout {
    /// Lay bars out top to bottom in input order.
    pub fn new(items: &[LabeledValue], style: BarStyle) -> Self {
        let values: Vec<f64> = items.iter().map(|i| i.value).collect();
        let track_length = style.track_length();
        let lengths = scale(&values, track_length);
        let pitch = style.bar_thickness + style.gap;

        let bars = items
            .iter()
            .zip(lengths)
            .enumerate()
            .map(|(i, (item, length))| Bar {
                label: item.label.clone(),
                value: item.value,
                x: style.padding,
                y: style.padding + i as f64 * pitch,
                length,
            })
            .collect::<Vec<_>>();

        let height = style.padding * 2.0 + bars.len() as f64 * pitch;

        Self {
            style,
            max: scale_max(&values),
            track_length,
            height,
            bars,
        }
    }
}

/// Largest value, floored at 1. Sub-unit data therefore never stretches to
/// fill the track.
pub fn scale_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(1.0, f64::max)
}

/// `value / max * track` per value; negative or non-finite values get 0.
pub fn scale(values: &[f64], track_length: f64) -> Vec<f64> {
    let max = scale_max(values);
    values
        .iter()
        .map(|&v| {
            if v.is_finite() && v > 0.0 {
                v / max * track_length
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_against_max() {
        assert_eq!(scale(&[10.0, 20.0, 5.0], 100.0), vec![50.0, 100.0, 25.0]);
    }

    #[test]
    fn test_sub_unit_values_scale_against_one() {
        assert_eq!(scale_max(&[0.5, 0.25]), 1.0);
        assert_eq!(scale(&[0.5, 0.25], 100.0), vec![50.0, 25.0]);
    }

    #[test]
    fn test_all_zero_uses_unit_max() {
        assert_eq!(scale_max(&[0.0, 0.0]), 1.0);
        assert_eq!(scale(&[0.0, 0.0], 100.0), vec![0.0, 0.0]);
        assert_eq!(scale_max(&[]), 1.0);
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        assert_eq!(scale(&[-5.0, 10.0], 100.0), vec![0.0, 100.0]);
    }

    #[test]
    fn test_layout_keeps_input_order_and_spacing() {
        let items = vec![
            LabeledValue::new("Project 1", 10.0),
            LabeledValue::new("Project 2", 20.0),
            LabeledValue::new("Project 3", 5.0),
        ];
        let layout = BarLayout::new(&items, BarStyle::default());
        assert_eq!(layout.track_length, 280.0);
        assert_eq!(layout.max, 20.0);
        let labels: Vec<&str> = layout.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Project 1", "Project 2", "Project 3"]);
        assert_eq!(layout.bars[0].y, 20.0);
        assert_eq!(layout.bars[1].y, 54.0);
        assert_eq!(layout.bars[2].y, 88.0);
        assert_eq!(layout.bars[1].length, 280.0);
        assert_eq!(layout.bars[0].length, 140.0);
        assert_eq!(layout.height, 20.0 * 2.0 + 3.0 * 34.0);
    }
}
