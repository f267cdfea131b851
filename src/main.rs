//! viroplot CLI entry point.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;

use viroplot::config::ChartConfig;
use viroplot::data::Dataset;
use viroplot::ethogram::Ethogram;
use viroplot::layout::Chart;
use viroplot::render::render_svg;
use viroplot::select::{EntryId, HoverPolicy, SelectionController};

/// Radial SVG chart of virus presence across ant species.
#[derive(Parser, Debug)]
#[command(
    name = "viroplot",
    about = "Radial SVG chart of virus presence across ant species"
)]
struct Cli {
    /// Input CSV file (reads from stdin if not provided)
    input: Option<String>,

    /// Write SVG output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Viewport height in pixels (chart is 90% of this, 16:9 width)
    #[arg(long = "viewport-height", default_value = "1080")]
    viewport_height: f64,

    /// Highlight a virus by name (repeatable)
    #[arg(long = "select")]
    select: Vec<String>,

    /// Highlight a classification and all its viruses (repeatable)
    #[arg(long = "select-class")]
    select_class: Vec<String>,

    /// Use the historical hover behavior where every pointer event toggles
    #[arg(long = "legacy-hover")]
    legacy_hover: bool,

    /// Parse an ethogram configuration file and print a summary, then exit
    #[arg(long = "ethogram")]
    ethogram: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(ref path) = cli.ethogram {
        summarize_ethogram(path);
        return;
    }

    // Read input from file or stdin
    let text = if let Some(ref path) = cli.input {
        match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: cannot read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    let cfg = ChartConfig::from_viewport_height(cli.viewport_height);
    let policy = if cli.legacy_hover {
        HoverPolicy::ToggleAll
    } else {
        HoverPolicy::EnterLeave
    };

    let svg = match render(&text, &cfg, policy, &cli.select, &cli.select_class) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // Write output to file or stdout
    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, svg) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        println!("{}", svg);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}

fn render(
    csv_text: &str,
    cfg: &ChartConfig,
    policy: HoverPolicy,
    viruses: &[String],
    classes: &[String],
) -> Result<String, String> {
    let mut ds = Dataset::parse(csv_text)?;
    let chart = Chart::compute(&mut ds, cfg)?;
    let mut selection = SelectionController::new(policy);
    for name in viruses {
        if ds.record(name).is_none() {
            return Err(format!("unknown virus '{}'", name));
        }
        selection.select(&ds, &EntryId::virus(name.clone()));
    }
    for name in classes {
        selection.select(&ds, &EntryId::classification(name.clone()));
    }
    Ok(render_svg(&chart, &selection))
}

fn summarize_ethogram(path: &str) {
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };
    match Ethogram::parse(&text) {
        Ok(eg) => {
            println!(
                "{}: {} sets, {} behaviors ({} monadic, {} dyadic), {} colors",
                path,
                eg.behavior_sets.len(),
                eg.behaviors.len(),
                eg.monadic.len(),
                eg.dyadic.len(),
                eg.colors.len()
            );
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
