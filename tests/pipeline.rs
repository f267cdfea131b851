//! End-to-end pipeline tests: CSV text → dataset → layout → SVG, plus the
//! selection round trip over the rendered output.

use viroplot::config::ChartConfig;
use viroplot::data::Dataset;
use viroplot::layout::Chart;
use viroplot::render::render_svg;
use viroplot::select::{EntryId, HoverPolicy, PointerEvent, SelectionController};

const WORKED_EXAMPLE: &str = "\
Virus,Class,SpA Pop1,SpA Pop2,SpA Pop3,SpB Pop1,SpB Pop2,SpB Pop3
LHUV-1,Picornavirales,1,0,0,0,0,0
FCIV-1,Unclassified,0,0,0,1,0,0
";

const SHARED_DATA: &str = "\
Virus,Class,Lasius neglectus P1,Lasius neglectus P2,Formica cinerea P1,Formica cinerea P2
LHUV-1,Picornavirales,1,1,0,0
LHUV-2,Picornavirales,1,0,0,0
FCIV-1,Unclassified,0,0,1,0
SHARED-1,Totiviridae,1,0,1,1
";

fn compute(csv: &str) -> (Dataset, Chart) {
    let mut ds = Dataset::parse(csv).expect("parse");
    let chart = Chart::compute(&mut ds, &ChartConfig::default()).expect("layout");
    (ds, chart)
}

#[test]
fn worked_example_two_presences() {
    let (ds, chart) = compute(WORKED_EXAMPLE);
    assert_eq!(ds.presence_total, 2);
    assert_eq!(chart.dots.len(), 2);
    assert!((chart.slot_deg.abs() - 180.0).abs() < 1e-9);
    // Dots sit half a circle apart: 180° and 360°≡0°.
    assert!((chart.dots[0].angle_deg - 180.0).abs() < 1e-9);
    assert!((chart.dots[1].angle_deg - 0.0).abs() < 1e-9);
    // Both records are single-presence: no multi-presence metadata.
    assert!(ds.multi.is_empty());
}

#[test]
fn dot_count_matches_true_cells() {
    let (ds, chart) = compute(SHARED_DATA);
    assert_eq!(ds.presence_total, 7);
    assert_eq!(chart.dots.len(), 7);
}

#[test]
fn slots_cover_circle_without_gaps() {
    let (_, chart) = compute(SHARED_DATA);
    let n = chart.dots.len() as f64;
    assert!((chart.slot_deg.abs() * n - 360.0).abs() < 1e-9);
    for pair in chart.dots.windows(2) {
        assert!((pair[1].angle_deg - pair[0].angle_deg - chart.slot_deg).abs() < 1e-9);
    }
}

#[test]
fn cross_species_record_gets_deepest_level() {
    let (ds, _) = compute(SHARED_DATA);
    let shared = ds.multi_entry("SHARED-1").expect("in multi map");
    assert_eq!(shared.species.len(), 2);
    assert_eq!(shared.presence_count, 3);
    for (name, m) in &ds.multi {
        if name != "SHARED-1" {
            assert!(m.indent < shared.indent, "{name} not deeper than SHARED-1");
        }
        assert!(m.indent >= 1);
    }
}

#[test]
fn collected_angles_span_multi_arc() {
    let (ds, chart) = compute(SHARED_DATA);
    let shared = ds.multi_entry("SHARED-1").unwrap();
    assert_eq!(shared.angles.len(), 3);
    let arc = chart
        .arcs
        .iter()
        .find(|a| a.record.as_deref() == Some("SHARED-1"))
        .expect("multi-presence arc");
    let lo = shared.angles.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = shared
        .angles
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((arc.start_deg - hi).abs() < 1e-9);
    assert!((arc.end_deg - lo).abs() < 1e-9);
}

#[test]
fn selection_round_trip_restores_svg() {
    let (ds, chart) = compute(SHARED_DATA);
    let mut sel = SelectionController::default();
    let plain = render_svg(&chart, &sel);

    sel.select(&ds, &EntryId::virus("SHARED-1"));
    let highlighted = render_svg(&chart, &sel);
    assert_ne!(plain, highlighted);
    assert!(highlighted.contains("SHARED-1 [Totiviridae]"));
    assert!(highlighted.contains("<polyline"));

    sel.deselect(&ds, &EntryId::virus("SHARED-1"));
    assert_eq!(render_svg(&chart, &sel), plain);
}

#[test]
fn classification_selection_cascades_and_reverses() {
    let (ds, chart) = compute(SHARED_DATA);
    let mut sel = SelectionController::default();
    let plain = render_svg(&chart, &sel);

    let id = EntryId::classification("Picornavirales");
    sel.select(&ds, &id);
    assert!(sel.is_selected(&EntryId::virus("LHUV-1")));
    assert!(sel.is_selected(&EntryId::virus("LHUV-2")));
    assert!(!sel.is_selected(&EntryId::virus("SHARED-1")));

    sel.deselect(&ds, &id);
    assert!(sel.is_empty());
    assert_eq!(render_svg(&chart, &sel), plain);
}

#[test]
fn hover_policies_differ_on_repeated_leave() {
    let (ds, _) = compute(SHARED_DATA);
    let id = EntryId::virus("LHUV-1");

    let mut fixed = SelectionController::new(HoverPolicy::EnterLeave);
    fixed.handle_pointer(&ds, &id, PointerEvent::Leave);
    fixed.handle_pointer(&ds, &id, PointerEvent::Leave);
    assert!(!fixed.is_selected(&id));

    let mut legacy = SelectionController::new(HoverPolicy::ToggleAll);
    legacy.handle_pointer(&ds, &id, PointerEvent::Leave);
    legacy.handle_pointer(&ds, &id, PointerEvent::Leave);
    assert!(legacy.is_selected(&id));
}

#[test]
fn malformed_short_rows_are_dropped_not_reported() {
    let csv = "\
Virus,Class,SpA Pop1,SpB Pop1
GOOD-1,Unclassified,1,0
TRUNCATED,Unclassified
GOOD-2,Unclassified,0,1
";
    let (ds, chart) = compute(csv);
    assert_eq!(ds.records.len(), 2);
    assert_eq!(chart.dots.len(), 2);
    assert!(ds.record("TRUNCATED").is_none());
}

#[test]
fn library_facade_renders() {
    let svg = viroplot::render_chart(SHARED_DATA, &ChartConfig::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<circle").count(), 7);
}
