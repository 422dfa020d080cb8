//! SVG primitives. Every function returns a fragment string; `document`
//! wraps fragments into a standalone file.

use crate::geometry::{svg_number as n, BarLayout, PieLayout, RingGeometry};
use crate::palette;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn document(width: f64, height: f64, body: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
<rect width="{w}" height="{h}" fill="{bg}"/>
{body}</svg>
"##,
        w = n(width),
        h = n(height),
        bg = palette::PAGE,
        body = body
    )
}

/// Translate a fragment to `(x, y)`.
pub fn group(x: f64, y: f64, body: &str) -> String {
    format!(
        "<g transform=\"translate({} {})\">\n{}</g>\n",
        n(x),
        n(y),
        body
    )
}

pub fn text(x: f64, y: f64, size: f64, fill: &str, anchor: &str, content: &str) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\">{}</text>\n",
        n(x),
        n(y),
        n(size),
        fill,
        anchor,
        escape_xml(content)
    )
}

pub fn bold_text(x: f64, y: f64, size: f64, fill: &str, anchor: &str, content: &str) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\" text-anchor=\"{}\">{}</text>\n",
        n(x),
        n(y),
        n(size),
        fill,
        anchor,
        escape_xml(content)
    )
}

pub fn rounded_rect(x: f64, y: f64, width: f64, height: f64, radius: f64, fill: &str) -> String {
    format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\"/>\n",
        n(x),
        n(y),
        n(width),
        n(height),
        n(radius),
        fill
    )
}

/// Background track plus the dashed foreground arc, with `label` centered.
pub fn ring(geometry: &RingGeometry, color: &str, label: &str, label_size: f64) -> String {
    let c = geometry.center();
    let (dash, gap) = geometry.dash_array();
    let mut out = format!(
        "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"none\" stroke=\"{track}\" stroke-width=\"{sw}\"/>\n",
        cx = n(c.x),
        cy = n(c.y),
        r = n(geometry.radius),
        track = palette::TRACK,
        sw = n(geometry.stroke_width)
    );
    out.push_str(&format!(
        "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{sw}\" stroke-linecap=\"round\" stroke-dasharray=\"{dash} {gap}\" stroke-dashoffset=\"{offset}\" transform=\"rotate({rot} {cx} {cy})\"/>\n",
        cx = n(c.x),
        cy = n(c.y),
        r = n(geometry.radius),
        color = color,
        sw = n(geometry.stroke_width),
        dash = n(dash),
        gap = n(gap),
        offset = n(geometry.dash_offset),
        rot = n(geometry.rotation_deg())
    ));
    out.push_str(&bold_text(
        c.x,
        c.y + label_size / 3.0,
        label_size,
        palette::TEXT,
        "middle",
        label,
    ));
    out
}

/// Wedges with the center hole punched out, plus a legend to the right.
pub fn pie(layout: &PieLayout) -> String {
    let mut out = String::new();
    for slice in &layout.slices {
        out.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\"/>\n",
            slice.path, slice.color
        ));
    }
    out.push_str(&format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
        n(layout.center.x),
        n(layout.center.y),
        n(layout.hole_radius),
        palette::CARD
    ));

    let legend_x = layout.size + 12.0;
    for (i, slice) in layout.slices.iter().enumerate() {
        let y = 16.0 + i as f64 * 20.0;
        out.push_str(&rounded_rect(legend_x, y - 10.0, 12.0, 12.0, 3.0, &slice.color));
        out.push_str(&text(
            legend_x + 18.0,
            y,
            12.0,
            palette::TEXT,
            "start",
            &format!("{} ({}%)", slice.label, n(slice.percentage)),
        ));
    }
    out
}

/// Track, bar and label rows.
pub fn bars(layout: &BarLayout, value_labels: &[String]) -> String {
    let thickness = layout.style.bar_thickness;
    let mut out = String::new();
    for (i, bar) in layout.bars.iter().enumerate() {
        out.push_str(&text(bar.x, bar.y - 3.0, 11.0, palette::MUTED_TEXT, "start", &bar.label));
        out.push_str(&rounded_rect(
            bar.x,
            bar.y,
            layout.track_length,
            thickness,
            thickness / 2.0,
            palette::TRACK,
        ));
        if bar.length > 0.0 {
            out.push_str(&rounded_rect(
                bar.x,
                bar.y,
                bar.length,
                thickness,
                thickness / 2.0,
                palette::BAR,
            ));
        }
        if let Some(label) = value_labels.get(i) {
            out.push_str(&text(
                bar.x + layout.track_length,
                bar.y - 3.0,
                11.0,
                palette::TEXT,
                "end",
                label,
            ));
        }
    }
    out
}

/// Card with a big value over a small caption.
pub fn stat_card(width: f64, value: &str, label: &str, tint: &str) -> String {
    let mut out = rounded_rect(0.0, 0.0, width, 72.0, 12.0, tint);
    out.push_str(&bold_text(14.0, 32.0, 20.0, palette::HEADING, "start", value));
    out.push_str(&text(14.0, 54.0, 12.0, palette::MUTED_TEXT, "start", label));
    out
}

/// Pill-shaped selector chip.
pub fn chip(width: f64, label: &str, selected: bool) -> String {
    let (fill, color) = if selected {
        (palette::CHIP_SELECTED, palette::CARD)
    } else {
        (palette::CARD, palette::TEXT)
    };
    let mut out = rounded_rect(0.0, 0.0, width, 28.0, 14.0, fill);
    out.push_str(&text(width / 2.0, 18.0, 12.0, color, "middle", label));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BarStyle, PieEntry};
    use crate::types::LabeledValue;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("South & Central <x>"), "South &amp; Central &lt;x&gt;");
        assert_eq!(escape_xml("\"a\" 'b'"), "&quot;a&quot; &apos;b&apos;");
    }

    #[test]
    fn test_ring_dash_attributes() {
        let geometry = RingGeometry::new(120.0, 10.0, 40.0).unwrap();
        let svg = ring(&geometry, palette::RING, "40%", 14.0);
        // C = 2π·55 ≈ 345.575, offset = 0.6·C ≈ 207.345
        assert!(svg.contains("stroke-dasharray=\"345.575 345.575\""));
        assert!(svg.contains("stroke-dashoffset=\"207.345\""));
        assert!(svg.contains("rotate(-90 60 60)"));
        assert!(svg.contains(">40%</text>"));
    }

    #[test]
    fn test_pie_emits_paths_hole_and_legend() {
        let layout = PieLayout::new(
            &[
                PieEntry::new("On Track", 75.0, "#10B981"),
                PieEntry::new("Delayed", 25.0, "#EF4444"),
            ],
            120.0,
        )
        .unwrap();
        let svg = pie(&layout);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("r=\"30\" fill=\"#FFFFFF\""));
        assert!(svg.contains("On Track (75%)"));
    }

    #[test]
    fn test_bars_skip_zero_length_fill() {
        let layout = BarLayout::new(
            &[LabeledValue::new("A", 10.0), LabeledValue::new("B", 0.0)],
            BarStyle::default(),
        );
        let svg = bars(&layout, &["10".to_string(), "0".to_string()]);
        assert_eq!(svg.matches(palette::BAR).count(), 1);
        assert_eq!(svg.matches(palette::TRACK).count(), 2);
    }

    #[test]
    fn test_document_wraps_body() {
        let svg = document(100.0, 50.0, "<g/>\n");
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"50\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
