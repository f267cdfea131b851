//! viroplot — radial SVG chart of virus presence across ant species.
//!
//! Pipeline: load CSV → group into species/populations and detect
//! multi-presence records → compute the radial layout → render SVG, with an
//! optional selection applied for highlight overlays.
//!
//! Public API: [`render_chart`] / [`render_chart_with`].

pub mod config;
pub mod data;
pub mod ethogram;
pub mod geom;
pub mod layout;
pub mod render;
pub mod select;

use config::ChartConfig;
use data::Dataset;
use layout::Chart;
use select::SelectionController;

/// Parse CSV text and render the chart with no selection applied.
pub fn render_chart(csv_text: &str, cfg: &ChartConfig) -> Result<String, String> {
    render_chart_with(csv_text, cfg, &SelectionController::default())
}

/// Parse CSV text and render the chart with the given selection applied.
pub fn render_chart_with(
    csv_text: &str,
    cfg: &ChartConfig,
    selection: &SelectionController,
) -> Result<String, String> {
    let mut ds = Dataset::parse(csv_text)?;
    let chart = Chart::compute(&mut ds, cfg)?;
    Ok(render::render_svg(&chart, selection))
}
