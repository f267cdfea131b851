//! Radial layout engine: grouped dataset → chart scene.
//!
//! Every true presence flag consumes exactly one angular slot; the slot width
//! is 360° divided by the total presence count, so the slots partition the
//! circle exactly once. Traversal order is species → population → record, in
//! loader order, with a monotonic slot counter. Slots begin on the left of
//! the circle (180°) and advance clockwise (negative angular step).

use crate::config::{
    ChartConfig, MULTI_SPECIES_DOT_SCALE, POPULATION_COLORS, Rgb, SPECIES_COLORS,
    START_OFFSET_DEG, classification_color,
};
use crate::data::Dataset;
use crate::geom::{Point, pt_on_circle};

// ─── Scene types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    Population,
    Species,
    MultiPresence,
}

/// A stroked arc around the circle center, from `start_deg` to `end_deg`
/// (degrees decrease in the clockwise drawing direction).
#[derive(Debug, Clone)]
pub struct ArcSegment {
    pub kind: ArcKind,
    pub start_deg: f64,
    pub end_deg: f64,
    pub radius: f64,
    pub color: Rgb,
    pub thickness: f64,
    /// Record name for multi-presence arcs.
    pub record: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct TextLabel {
    pub text: String,
    pub pos: Point,
    pub color: Rgb,
    pub anchor: Anchor,
    /// Shift the text upward (label sits above the circle center).
    pub raise: bool,
    /// Bold-italic emphasis (species labels).
    pub emphasis: bool,
    pub font_size: f64,
}

/// One rendered presence flag.
#[derive(Debug, Clone)]
pub struct PresenceDot {
    pub record: String,
    pub classification: String,
    pub species_idx: usize,
    pub population_idx: usize,
    pub angle_deg: f64,
    pub ring_radius: f64,
    pub pos: Point,
    /// Resting dot radius, multi-species bonus included.
    pub base_size: f64,
    pub color: Rgb,
    pub multi_species: bool,
}

/// The full computed scene, before selection overlays.
#[derive(Debug, Clone)]
pub struct Chart {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    /// Signed angular step per slot (negative: clockwise).
    pub slot_deg: f64,
    pub font_size: f64,
    pub dots: Vec<PresenceDot>,
    pub arcs: Vec<ArcSegment>,
    pub labels: Vec<TextLabel>,
}

impl Chart {
    /// Dots belonging to one record, in slot order.
    pub fn dots_of(&self, record: &str) -> Vec<&PresenceDot> {
        self.dots.iter().filter(|d| d.record == record).collect()
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

fn species_color(idx: usize) -> Rgb {
    SPECIES_COLORS[idx % SPECIES_COLORS.len()]
}

fn population_color(species_idx: usize, population_idx: usize) -> Rgb {
    let row = POPULATION_COLORS[species_idx % POPULATION_COLORS.len()];
    row[population_idx % row.len()]
}

fn arc_label(cfg: &ChartConfig, text: &str, radius: f64, deg: f64, color: Rgb, emphasis: bool) -> TextLabel {
    let pos = pt_on_circle(cfg.center, radius, deg);
    TextLabel {
        text: text.to_string(),
        pos,
        color,
        anchor: if pos.x <= cfg.center.x {
            Anchor::End
        } else {
            Anchor::Start
        },
        raise: pos.y <= cfg.center.y,
        emphasis,
        font_size: cfg.font_size,
    }
}

impl Chart {
    /// Compute the radial layout. Collected dot angles are written back into
    /// the dataset's multi-presence entries.
    pub fn compute(ds: &mut Dataset, cfg: &ChartConfig) -> Result<Chart, String> {
        if ds.presence_total == 0 {
            return Err("dataset contains no presence flags".to_string());
        }
        let slot_deg = -360.0 / ds.presence_total as f64;
        let center = cfg.center;

        for (_, m) in ds.multi.iter_mut() {
            m.angles.clear();
        }

        let mut dots: Vec<PresenceDot> = Vec::new();
        let mut arcs: Vec<ArcSegment> = Vec::new();
        let mut labels: Vec<TextLabel> = Vec::new();
        let mut collected: Vec<(String, f64)> = Vec::new();
        let mut slot = 0usize;

        for (si, sp) in ds.species.iter().enumerate() {
            let mut sp_span: Option<(f64, f64)> = None;
            for (pi, pop) in sp.populations.iter().enumerate() {
                let mut pop_span: Option<(f64, f64)> = None;
                for rec in &ds.records {
                    if !rec.present(pop.column) {
                        continue;
                    }
                    let deg = START_OFFSET_DEG + slot as f64 * slot_deg;
                    slot += 1;

                    let multi = ds.multi.iter().find(|(n, _)| *n == rec.name).map(|(_, m)| m);
                    let indent = multi.map(|m| m.indent).unwrap_or(0);
                    let multi_species = multi.map(|m| m.species.len() > 1).unwrap_or(false);
                    let ring_radius = cfg.base_radius - indent as f64 * cfg.indent_unit;
                    let base_size = if multi_species {
                        cfg.dot_radius * MULTI_SPECIES_DOT_SCALE
                    } else {
                        cfg.dot_radius
                    };

                    dots.push(PresenceDot {
                        record: rec.name.clone(),
                        classification: rec.classification.clone(),
                        species_idx: si,
                        population_idx: pi,
                        angle_deg: deg,
                        ring_radius,
                        pos: pt_on_circle(center, ring_radius, deg),
                        base_size,
                        color: classification_color(&rec.classification),
                        multi_species,
                    });
                    if multi.is_some() {
                        collected.push((rec.name.clone(), deg));
                    }

                    pop_span = Some(match pop_span {
                        None => (deg - slot_deg / 2.0, deg + slot_deg / 2.0),
                        Some((s, _)) => (s, deg + slot_deg / 2.0),
                    });
                    sp_span = Some(match sp_span {
                        None => (deg, deg),
                        Some((s, _)) => (s, deg),
                    });
                }
                if let Some((start, end)) = pop_span {
                    let (start, end) = widen_degenerate(start, end);
                    let color = population_color(si, pi).lighter(75);
                    arcs.push(ArcSegment {
                        kind: ArcKind::Population,
                        start_deg: start,
                        end_deg: end,
                        radius: cfg.base_radius + cfg.population_arc_offset,
                        color,
                        thickness: cfg.species_arc_thickness,
                        record: None,
                    });
                    labels.push(arc_label(
                        cfg,
                        &pop.label,
                        cfg.base_radius + cfg.population_label_offset,
                        start + (end - start) / 2.0,
                        population_color(si, pi),
                        false,
                    ));
                }
            }
            if let Some((start, end)) = sp_span {
                let (start, end) = widen_degenerate(start, end);
                arcs.push(ArcSegment {
                    kind: ArcKind::Species,
                    start_deg: start,
                    end_deg: end,
                    radius: cfg.base_radius + cfg.species_arc_offset,
                    color: species_color(si),
                    thickness: cfg.species_arc_thickness,
                    record: None,
                });
                labels.push(arc_label(
                    cfg,
                    &sp.name,
                    cfg.base_radius + cfg.species_label_offset,
                    start + (end - start) / 2.0,
                    species_color(si),
                    true,
                ));
            }
        }

        // Write collected angles back into the multi-presence entries.
        for (name, deg) in collected {
            if let Some(m) = ds.multi_entry_mut(&name) {
                m.angles.push(deg);
            }
        }

        // One arc per multi-presence record, spanning its min..max dot angle
        // at the record's indent ring. Entries with fewer than two angles
        // draw nothing.
        for (name, m) in &ds.multi {
            if m.angles.len() < 2 {
                continue;
            }
            let lo = m.angles.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = m.angles.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let cross = m.species.len() > 1;
            let color = if cross {
                Rgb(0, 0, 0)
            } else {
                let si = ds
                    .species
                    .iter()
                    .position(|s| s.name == m.species[0])
                    .unwrap_or(0);
                species_color(si)
            };
            arcs.push(ArcSegment {
                kind: ArcKind::MultiPresence,
                start_deg: hi,
                end_deg: lo,
                radius: cfg.base_radius - m.indent as f64 * cfg.indent_unit,
                color,
                thickness: if cross {
                    cfg.multi_thickness
                } else {
                    cfg.connector_thickness
                },
                record: Some(name.clone()),
            });
        }

        labels.extend(legend_labels(ds, cfg));

        Ok(Chart {
            width: cfg.width,
            height: cfg.height,
            center,
            slot_deg,
            font_size: cfg.font_size,
            dots,
            arcs,
            labels,
        })
    }
}

/// Widen a zero-span arc by one degree in the drawing direction.
fn widen_degenerate(start: f64, end: f64) -> (f64, f64) {
    if (start - end).abs() < f64::EPSILON {
        (start, end - 1.0)
    } else {
        (start, end)
    }
}

/// Legend column: classification labels with their viruses beneath, sorted by
/// virus name within each classification.
fn legend_labels(ds: &Dataset, cfg: &ChartConfig) -> Vec<TextLabel> {
    let x1 = cfg.width * 0.76;
    let x2 = cfg.width * 0.92;
    let mut y = cfg.height * 0.05;
    let y_step = cfg.font_size * 1.4 + cfg.height * 0.001;
    let mut labels = Vec::new();
    for cl in ds.classifications() {
        labels.push(TextLabel {
            text: cl.clone(),
            pos: Point::new(x1, y),
            color: Rgb(153, 153, 153),
            anchor: Anchor::Start,
            raise: false,
            emphasis: false,
            font_size: cfg.font_size,
        });
        for vl in ds.viruses_in_classification(&cl) {
            labels.push(TextLabel {
                text: vl,
                pos: Point::new(x2, y),
                color: classification_color(&cl),
                anchor: Anchor::Start,
                raise: false,
                emphasis: false,
                font_size: cfg.font_size,
            });
            y += y_step;
        }
    }
    labels
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    fn chart_for(csv: &str) -> (Dataset, Chart) {
        let mut ds = Dataset::parse(csv).unwrap();
        let cfg = ChartConfig::default();
        let chart = Chart::compute(&mut ds, &cfg).unwrap();
        (ds, chart)
    }

    #[test]
    fn test_two_presences_are_half_circle_apart() {
        // Two true cells → slot width 180°, dots at 180° and 0°.
        let csv = "\
V,C,Sp A P1,Sp A P2,Sp A P3,Sp B P1,Sp B P2,Sp B P3
V1,Unclassified,1,0,0,0,0,0
V2,Unclassified,0,0,0,1,0,0
";
        let (ds, chart) = chart_for(csv);
        assert_eq!(ds.presence_total, 2);
        assert_eq!(chart.dots.len(), 2);
        assert!((chart.slot_deg.abs() - 180.0).abs() < 1e-9);
        assert!((chart.dots[0].angle_deg - 180.0).abs() < 1e-9);
        assert!((chart.dots[1].angle_deg - 0.0).abs() < 1e-9);
        assert!(ds.multi.is_empty());
    }

    #[test]
    fn test_dot_count_equals_presence_total() {
        let csv = "\
V,C,Sp A P1,Sp A P2,Sp B P1
V1,Picornavirales,1,1,0
V2,Totiviridae,1,0,1
V3,Unclassified,0,1,1
";
        let (ds, chart) = chart_for(csv);
        assert_eq!(chart.dots.len(), ds.presence_total);
        assert_eq!(chart.dots.len(), 6);
    }

    #[test]
    fn test_slots_partition_full_circle() {
        let csv = "\
V,C,Sp A P1,Sp A P2,Sp B P1
V1,Picornavirales,1,1,0
V2,Totiviridae,1,0,1
V3,Unclassified,0,1,1
";
        let (_, chart) = chart_for(csv);
        let total = chart.dots.len() as f64;
        assert!((chart.slot_deg.abs() * total - 360.0).abs() < 1e-9);
        // Slot angles are distinct and evenly spaced.
        for (i, d) in chart.dots.iter().enumerate() {
            let expected = 180.0 + i as f64 * chart.slot_deg;
            assert!((d.angle_deg - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_traversal_is_species_population_record_order() {
        let csv = "\
V,C,Sp A P1,Sp A P2,Sp B P1
V1,Picornavirales,1,1,0
V2,Totiviridae,1,0,1
";
        let (_, chart) = chart_for(csv);
        let order: Vec<(&str, usize, usize)> = chart
            .dots
            .iter()
            .map(|d| (d.record.as_str(), d.species_idx, d.population_idx))
            .collect();
        assert_eq!(
            order,
            vec![
                ("V1", 0, 0),
                ("V2", 0, 0),
                ("V1", 0, 1),
                ("V2", 1, 0),
            ]
        );
    }

    #[test]
    fn test_multi_presence_ring_depth() {
        let csv = "\
V,C,Sp A P1,Sp A P2,Sp B P1
SOLO,Picornavirales,1,0,0
TWICE,Totiviridae,1,1,0
SHARED,Unclassified,1,0,1
";
        let (ds, chart) = chart_for(csv);
        let cfg = ChartConfig::default();
        let solo = &chart.dots_of("SOLO")[0];
        assert!((solo.ring_radius - cfg.base_radius).abs() < 1e-9);
        let twice = &chart.dots_of("TWICE")[0];
        assert!((twice.ring_radius - (cfg.base_radius - cfg.indent_unit)).abs() < 1e-9);
        // Cross-species record sits deeper than every single-species one.
        let shared = &chart.dots_of("SHARED")[0];
        assert!(shared.ring_radius < twice.ring_radius);
        assert!(shared.multi_species);
        assert!(!twice.multi_species);
        let m = ds.multi_entry("SHARED").unwrap();
        assert_eq!(m.indent, 2);
    }

    #[test]
    fn test_multi_species_dot_enlarged() {
        let csv = "\
V,C,Sp A P1,Sp B P1
SHARED,Unclassified,1,1
";
        let (_, chart) = chart_for(csv);
        let cfg = ChartConfig::default();
        for d in &chart.dots {
            assert!((d.base_size - cfg.dot_radius * MULTI_SPECIES_DOT_SCALE).abs() < 1e-9);
        }
    }

    #[test]
    fn test_collected_angles_written_back() {
        let csv = "\
V,C,Sp A P1,Sp B P1
SHARED,Unclassified,1,1
";
        let (ds, chart) = chart_for(csv);
        let m = ds.multi_entry("SHARED").unwrap();
        assert_eq!(m.angles.len(), 2);
        assert!((m.angles[0] - chart.dots[0].angle_deg).abs() < 1e-9);
        assert!((m.angles[1] - chart.dots[1].angle_deg).abs() < 1e-9);
    }

    #[test]
    fn test_multi_presence_arc_spans_min_max() {
        let csv = "\
V,C,Sp A P1,Sp B P1
SHARED,Unclassified,1,1
";
        let (ds, chart) = chart_for(csv);
        let arc = chart
            .arcs
            .iter()
            .find(|a| a.kind == ArcKind::MultiPresence)
            .unwrap();
        let m = ds.multi_entry("SHARED").unwrap();
        let lo = m.angles.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = m.angles.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((arc.start_deg - hi).abs() < 1e-9);
        assert!((arc.end_deg - lo).abs() < 1e-9);
        assert_eq!(arc.record.as_deref(), Some("SHARED"));
        assert_eq!(arc.color, Rgb(0, 0, 0));
    }

    #[test]
    fn test_population_and_species_arcs_present() {
        let csv = "\
V,C,Sp A P1,Sp A P2,Sp B P1
V1,Picornavirales,1,1,0
V2,Totiviridae,0,0,1
";
        let (_, chart) = chart_for(csv);
        let pops = chart
            .arcs
            .iter()
            .filter(|a| a.kind == ArcKind::Population)
            .count();
        let sps = chart
            .arcs
            .iter()
            .filter(|a| a.kind == ArcKind::Species)
            .count();
        assert_eq!(pops, 3);
        assert_eq!(sps, 2);
    }

    #[test]
    fn test_empty_population_draws_no_arc() {
        let csv = "\
V,C,Sp A P1,Sp A P2
V1,Picornavirales,1,0
";
        let (_, chart) = chart_for(csv);
        let pops = chart
            .arcs
            .iter()
            .filter(|a| a.kind == ArcKind::Population)
            .count();
        assert_eq!(pops, 1);
    }

    #[test]
    fn test_degenerate_species_arc_widened() {
        let csv = "\
V,C,Sp A P1,Sp B P1
V1,Picornavirales,1,0
V2,Totiviridae,0,1
";
        let (_, chart) = chart_for(csv);
        for arc in chart.arcs.iter().filter(|a| a.kind == ArcKind::Species) {
            assert!((arc.start_deg - arc.end_deg).abs() > 1e-9);
        }
    }

    #[test]
    fn test_label_anchor_side() {
        // First slot is on the left of the circle → its labels anchor End.
        let csv = "\
V,C,Sp A P1,Sp B P1
V1,Picornavirales,1,0
V2,Totiviridae,0,1
";
        let (_, chart) = chart_for(csv);
        let cfg = ChartConfig::default();
        for l in &chart.labels {
            let expected = if l.pos.x <= cfg.center.x {
                Anchor::End
            } else {
                Anchor::Start
            };
            assert_eq!(l.anchor, expected, "label {:?}", l.text);
        }
    }

    #[test]
    fn test_no_presence_is_error() {
        let mut ds = Dataset::parse("V,C,Sp A P1\nV1,Unclassified,0\n").unwrap();
        assert!(Chart::compute(&mut ds, &ChartConfig::default()).is_err());
    }

    #[test]
    fn test_legend_lists_viruses_under_classifications() {
        let csv = "\
V,C,Sp A P1
B,Totiviridae,1
A,Totiviridae,1
";
        let (_, chart) = chart_for(csv);
        let texts: Vec<&str> = chart.labels.iter().map(|l| l.text.as_str()).collect();
        let cl_idx = texts.iter().position(|t| *t == "Totiviridae").unwrap();
        let a_idx = texts.iter().position(|t| *t == "A").unwrap();
        let b_idx = texts.iter().position(|t| *t == "B").unwrap();
        assert!(cl_idx < a_idx && a_idx < b_idx, "legend sorted by virus name");
    }
}
