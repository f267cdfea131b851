//! SVG renderer — serializes a computed chart (plus selection state) to an
//! SVG string.
//!
//! Arcs are emitted as `<path>` elliptical-arc commands, dots as `<circle>`,
//! labels as `<text>` with `text-anchor`, and highlight overlays as
//! `<polyline>` plus floating labels. Slot degrees decrease in the clockwise
//! drawing direction, which maps to sweep-flag 1 in screen coordinates.

use crate::geom::{Point, pt_on_circle};
use crate::layout::{Anchor, ArcSegment, Chart, TextLabel};
use crate::select::SelectionController;

const FONT_FAMILY: &str = "sans-serif";

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn fmt(v: f64) -> String {
    // Two decimals is plenty at pixel scale and keeps output diffable.
    format!("{v:.2}")
}

fn arc_path(center: Point, arc: &ArcSegment) -> String {
    let p0 = pt_on_circle(center, arc.radius, arc.start_deg);
    let p1 = pt_on_circle(center, arc.radius, arc.end_deg);
    let large = if (arc.start_deg - arc.end_deg).abs() > 180.0 {
        1
    } else {
        0
    };
    // start_deg > end_deg: the drawing direction is clockwise on screen.
    let sweep = if arc.start_deg > arc.end_deg { 1 } else { 0 };
    let r = fmt(arc.radius);
    format!(
        "M {} {} A {r} {r} 0 {large} {sweep} {} {}",
        fmt(p0.x),
        fmt(p0.y),
        fmt(p1.x),
        fmt(p1.y)
    )
}

fn render_arc(center: Point, arc: &ArcSegment) -> String {
    format!(
        r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        arc_path(center, arc),
        arc.color.to_hex(),
        fmt(arc.thickness)
    )
}

fn render_label(label: &TextLabel) -> String {
    let anchor = match label.anchor {
        Anchor::Start => "start",
        Anchor::End => "end",
    };
    let dy = if label.raise { "-0.4em" } else { "0.9em" };
    let emphasis = if label.emphasis {
        r#" font-weight="bold" font-style="italic""#
    } else {
        ""
    };
    format!(
        r#"<text x="{}" y="{}" dy="{dy}" text-anchor="{anchor}" font-family="{FONT_FAMILY}" font-size="{}" fill="{}"{emphasis}>{}</text>"#,
        fmt(label.pos.x),
        fmt(label.pos.y),
        fmt(label.font_size),
        label.color.to_hex(),
        escape(&label.text)
    )
}

fn render_polyline(points: &[Point], thickness: f64) -> String {
    let pts: String = points
        .iter()
        .map(|p| format!("{},{}", fmt(p.x), fmt(p.y)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        r##"<polyline points="{pts}" fill="none" stroke="#000000" stroke-width="{}"/>"##,
        fmt(thickness)
    )
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Render the chart scene, with the given selection applied, to SVG text.
pub fn render_svg(chart: &Chart, selection: &SelectionController) -> String {
    let w = fmt(chart.width);
    let h = fmt(chart.height);
    let mut parts = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ),
        format!(r#"<rect width="{w}" height="{h}" fill="white"/>"#),
    ];

    // Arcs behind dots.
    for arc in &chart.arcs {
        parts.push(render_arc(chart.center, arc));
    }

    // Highlight polylines behind the dots they connect.
    let highlight = selection.overlays(chart);
    let line_thickness = chart.font_size * 0.4;
    for line in &highlight.polylines {
        parts.push(render_polyline(line, line_thickness));
    }

    for dot in &chart.dots {
        parts.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            fmt(dot.pos.x),
            fmt(dot.pos.y),
            fmt(selection.dot_size(dot)),
            dot.color.to_hex()
        ));
    }

    for label in &chart.labels {
        parts.push(render_label(label));
    }
    for label in &highlight.labels {
        parts.push(render_label(label));
    }

    parts.push("</svg>".to_string());
    parts.join("\n")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
