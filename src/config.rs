//! Chart configuration: fixed palettes and viewport-derived geometry.
//!
//! The palettes are not user-configurable: three species colors, a 3×3 grid
//! of population shades, and an exact-string classification→color map.
//! Geometry constants scale with the chart height, which is derived from a
//! viewport (90% of the viewport height, width from a 16:9 ratio).

use crate::geom::Point;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Brighten every channel by `amount`, saturating at 255.
    pub fn lighter(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }
}

// ─── Palettes ────────────────────────────────────────────────────────────────

/// One color per ant species, in column order.
pub const SPECIES_COLORS: [Rgb; 3] = [Rgb(0, 200, 0), Rgb(0, 0, 255), Rgb(150, 150, 0)];

/// One shade per (species, population) pair.
pub const POPULATION_COLORS: [[Rgb; 3]; 3] = [
    [Rgb(50, 200, 50), Rgb(100, 200, 100), Rgb(150, 200, 150)],
    [Rgb(0, 0, 175), Rgb(50, 50, 175), Rgb(100, 100, 175)],
    [Rgb(175, 175, 0), Rgb(175, 175, 90), Rgb(175, 175, 150)],
];

/// Classification label → dot color, keyed by exact string match.
pub const CLASSIFICATION_COLORS: [(&str, Rgb); 12] = [
    ("Bunyavirales", Rgb(255, 50, 255)),
    ("Mononegavirales;Partitiviridae", Rgb(255, 100, 25)),
    ("Mononegavirales;Rhabdoviridae", Rgb(255, 150, 75)),
    ("Narnaviridae", Rgb(200, 100, 200)),
    ("Nodaviridae", Rgb(100, 50, 100)),
    ("Permutotetraviridae", Rgb(200, 50, 100)),
    ("Picornavirales", Rgb(255, 0, 0)),
    ("Picornavirales;Dicistroviridae;Aparavirus", Rgb(255, 50, 50)),
    ("Picornavirales;Polycipiviridae", Rgb(255, 100, 100)),
    ("Picornavirales;Polycipiviridae;Sopolycivirus", Rgb(255, 150, 150)),
    ("Totiviridae", Rgb(150, 0, 150)),
    ("Unclassified", Rgb(100, 100, 100)),
];

/// Fallback for classifications missing from the fixed map.
pub const UNKNOWN_CLASSIFICATION_COLOR: Rgb = Rgb(128, 128, 128);

pub fn classification_color(label: &str) -> Rgb {
    CLASSIFICATION_COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, col)| *col)
        .unwrap_or(UNKNOWN_CLASSIFICATION_COLOR)
}

// ─── ChartConfig ─────────────────────────────────────────────────────────────

/// Size multiplier for dots of records present in more than one species.
pub const MULTI_SPECIES_DOT_SCALE: f64 = 1.5;

/// Size multiplier applied to a dot while its record is selected.
pub const SELECTED_DOT_SCALE: f64 = 2.0;

/// Slots begin on the left of the circle.
pub const START_OFFSET_DEG: f64 = 180.0;

#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Rendered scene size in pixels.
    pub width: f64,
    pub height: f64,
    /// Center of the circle.
    pub center: Point,
    /// Ring radius for single-presence dots.
    pub base_radius: f64,
    /// Radial step inward per indentation level.
    pub indent_unit: f64,
    /// Radius of a single-presence dot.
    pub dot_radius: f64,
    /// Outward offsets of the population / species arcs from the base ring.
    pub population_arc_offset: f64,
    pub species_arc_offset: f64,
    /// Outward offsets of the population / species labels.
    pub population_label_offset: f64,
    pub species_label_offset: f64,
    /// Stroke widths for connector and multi-species arcs.
    pub connector_thickness: f64,
    pub multi_thickness: f64,
    pub species_arc_thickness: f64,
    pub font_size: f64,
}

impl ChartConfig {
    /// Derive the chart geometry from a viewport height in pixels: the scene
    /// is 90% of the viewport height tall and 16:9 of that height wide.
    pub fn from_viewport_height(viewport_height: f64) -> Self {
        let height = viewport_height * 0.9;
        let width = height * 16.0 / 9.0;
        let max_radius = width.min(height) / 2.0;
        Self {
            width,
            height,
            center: Point::new(width * 0.38, height / 2.0),
            base_radius: max_radius * 0.6,
            indent_unit: height * 0.007,
            dot_radius: height * 0.01,
            population_arc_offset: height * 0.03,
            species_arc_offset: height * 0.12,
            population_label_offset: height * 0.04,
            species_label_offset: height * 0.125,
            connector_thickness: height * 0.002,
            multi_thickness: height * 0.004,
            species_arc_thickness: height * 0.01,
            font_size: height * 0.01,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::from_viewport_height(1080.0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
