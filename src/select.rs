//! Selection and highlight state.
//!
//! A `SelectionController` owns the set of selected entries and derives the
//! highlight overlays (enlarged dots, connecting polyline, floating label)
//! from a computed chart. Entries are typed identifiers rather than encoded
//! strings, and the controller is passed to callers explicitly rather than
//! living in process-global state.
//!
//! Historically every pointer event type (enter, leave, activate) invoked the
//! same toggle handler, so a leave after an enter returned to unselected but
//! two leaves in a row re-selected. `HoverPolicy::ToggleAll` reproduces that;
//! the default `HoverPolicy::EnterLeave` makes enter select, leave deselect,
//! and activation toggle.

use std::collections::BTreeSet;

use crate::config::{Rgb, SELECTED_DOT_SCALE};
use crate::data::Dataset;
use crate::geom::Point;
use crate::layout::{Anchor, Chart, PresenceDot, TextLabel};

// ─── Identifiers and events ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Virus,
    Classification,
}

/// Typed selection identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryId {
    pub kind: EntryKind,
    pub name: String,
}

impl EntryId {
    pub fn virus(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Virus,
            name: name.into(),
        }
    }

    pub fn classification(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Classification,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Activate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverPolicy {
    /// Enter selects, leave deselects, activation toggles.
    #[default]
    EnterLeave,
    /// Every event type toggles (historical behavior).
    ToggleAll,
}

// ─── Overlays ────────────────────────────────────────────────────────────────

/// Visual additions produced by the current selection.
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    /// One connecting polyline per selected record with two or more dots.
    pub polylines: Vec<Vec<Point>>,
    /// One floating label per selected record, at its first dot.
    pub labels: Vec<TextLabel>,
}

// ─── Controller ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: BTreeSet<EntryId>,
    policy: HoverPolicy,
}

impl SelectionController {
    pub fn new(policy: HoverPolicy) -> Self {
        Self {
            selected: BTreeSet::new(),
            policy,
        }
    }

    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.contains(id)
    }

    pub fn selected(&self) -> &BTreeSet<EntryId> {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Select an entry. A classification also selects every virus under it.
    pub fn select(&mut self, ds: &Dataset, id: &EntryId) {
        self.selected.insert(id.clone());
        if id.kind == EntryKind::Classification {
            for vl in ds.viruses_in_classification(&id.name) {
                self.selected.insert(EntryId::virus(vl));
            }
        }
    }

    /// Deselect an entry, cascading over a classification's viruses.
    pub fn deselect(&mut self, ds: &Dataset, id: &EntryId) {
        self.selected.remove(id);
        if id.kind == EntryKind::Classification {
            for vl in ds.viruses_in_classification(&id.name) {
                self.selected.remove(&EntryId::virus(vl));
            }
        }
    }

    pub fn toggle(&mut self, ds: &Dataset, id: &EntryId) {
        if self.is_selected(id) {
            self.deselect(ds, id);
        } else {
            self.select(ds, id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Dispatch a pointer event according to the hover policy.
    pub fn handle_pointer(&mut self, ds: &Dataset, id: &EntryId, event: PointerEvent) {
        match self.policy {
            HoverPolicy::ToggleAll => self.toggle(ds, id),
            HoverPolicy::EnterLeave => match event {
                PointerEvent::Enter => self.select(ds, id),
                PointerEvent::Leave => self.deselect(ds, id),
                PointerEvent::Activate => self.toggle(ds, id),
            },
        }
    }

    /// Displayed radius of a dot: base size, enlarged while selected.
    pub fn dot_size(&self, dot: &PresenceDot) -> f64 {
        if self.is_selected(&EntryId::virus(dot.record.clone())) {
            dot.base_size * SELECTED_DOT_SCALE
        } else {
            dot.base_size
        }
    }

    /// Derive the highlight overlays for the current selection.
    pub fn overlays(&self, chart: &Chart) -> Highlight {
        let mut hl = Highlight::default();
        for id in &self.selected {
            if id.kind != EntryKind::Virus {
                continue;
            }
            let dots = chart.dots_of(&id.name);
            let Some(first) = dots.first() else {
                continue;
            };
            if dots.len() >= 2 {
                hl.polylines.push(connecting_polyline(&dots, chart.center));
            }
            hl.labels.push(TextLabel {
                text: format!("{} [{}]", first.record, first.classification),
                pos: first.pos,
                color: Rgb(102, 102, 102),
                anchor: Anchor::Start,
                raise: true,
                emphasis: false,
                font_size: chart.font_size,
            });
        }
        hl
    }
}

// ─── Polyline construction ───────────────────────────────────────────────────

/// Which axis a point is closer to the center on.
#[derive(PartialEq)]
enum NearAxis {
    X,
    Y,
}

fn near_axis(p: Point, center: Point) -> NearAxis {
    if (p.x - center.x).abs() <= (p.y - center.y).abs() {
        NearAxis::X
    } else {
        NearAxis::Y
    }
}

/// Polyline through a record's dots. When consecutive dots differ in which
/// axis is closer to the center, an elbow point is inserted that takes from
/// each dot the coordinate nearer the center, stepping the line inward
/// instead of cutting straight across.
fn connecting_polyline(dots: &[&PresenceDot], center: Point) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(dots.len());
    for pair in dots.windows(2) {
        let a = pair[0].pos;
        let b = pair[1].pos;
        if pts.is_empty() {
            pts.push(a);
        }
        if near_axis(a, center) != near_axis(b, center) {
            let x = if (a.x - center.x).abs() <= (b.x - center.x).abs() {
                a.x
            } else {
                b.x
            };
            let y = if (a.y - center.y).abs() <= (b.y - center.y).abs() {
                a.y
            } else {
                b.y
            };
            pts.push(Point::new(x, y));
        }
        pts.push(b);
    }
    pts
}

// ─── Tests ───────────────────────────────────────────────────────────────────
