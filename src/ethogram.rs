//! Ethogram configuration file: behavior categories and display colors.
//!
//! The companion plain-text file is a sequence of `###BEGIN:<section>` /
//! `###END:<section>` blocks with one entry per line. The `defaultV` section
//! holds `key: <int>` pairs, `annotation-color` holds `key: r,g,b` colors,
//! and the remaining sections are plain lists. Inline `#` comments are cut
//! off. `behavior-list` entries are kept only when their `<set>-` prefix
//! names a declared behavior set.

use regex::Regex;

use crate::config::Rgb;

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ethogram {
    /// `defaultV` integer settings, in file order.
    pub defaults: Vec<(String, i64)>,
    pub behavior_sets: Vec<String>,
    pub monadic: Vec<String>,
    pub dyadic: Vec<String>,
    /// Flattened behavior-action list (`<set>-<action>` entries).
    pub behaviors: Vec<String>,
    /// RGB color per behavior action, in file order.
    pub colors: Vec<(String, Rgb)>,
}

impl Ethogram {
    pub fn color_of(&self, behavior: &str) -> Option<Rgb> {
        self.colors
            .iter()
            .find(|(name, _)| name == behavior)
            .map(|(_, c)| *c)
    }

    pub fn default_of(&self, key: &str) -> Option<i64> {
        self.defaults
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, v)| *v)
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

fn parse_color(value: &str) -> Result<Rgb, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected 'r,g,b', got '{value}'"));
    }
    let chan = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| format!("invalid color channel '{s}'"))
    };
    Ok(Rgb(chan(parts[0])?, chan(parts[1])?, chan(parts[2])?))
}

impl Ethogram {
    pub fn parse(text: &str) -> Result<Ethogram, String> {
        let begin = Regex::new(r"###BEGIN:\s*(\S+)").map_err(|e| e.to_string())?;
        let mut eg = Ethogram::default();
        let mut section = String::new();

        for line in text.lines() {
            if section.is_empty() {
                if let Some(caps) = begin.captures(line) {
                    section = caps[1].to_string();
                }
                continue;
            }
            if line.contains("###END") {
                section.clear();
                continue;
            }
            // Cut off inline comments.
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            match section.as_str() {
                "defaultV" => {
                    let (key, value) = line
                        .split_once(':')
                        .ok_or_else(|| format!("malformed defaultV entry '{line}'"))?;
                    let value: i64 = value
                        .trim()
                        .parse()
                        .map_err(|_| format!("non-integer defaultV value '{line}'"))?;
                    eg.defaults.push((key.trim().to_string(), value));
                }
                "behavior-sets" => eg.behavior_sets.push(line.to_string()),
                "monadic-behavior" => eg.monadic.push(line.to_string()),
                "dyadic-behavior" => eg.dyadic.push(line.to_string()),
                "behavior-list" => {
                    let set = line.split('-').next().unwrap_or("");
                    if eg.behavior_sets.iter().any(|s| s == set) {
                        eg.behaviors.push(line.to_string());
                    }
                }
                "annotation-color" => {
                    let (key, value) = line
                        .split_once(':')
                        .ok_or_else(|| format!("malformed color entry '{line}'"))?;
                    eg.colors
                        .push((key.trim().to_string(), parse_color(value.trim())?));
                }
                _ => {} // unknown section: entries ignored
            }
        }
        Ok(eg)
    }

    /// Write the configuration back out in the block format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("###BEGIN:defaultV\n");
        for (k, v) in &self.defaults {
            out.push_str(&format!("{k}: {v}\n"));
        }
        out.push_str("###END:defaultV\n\n");
        out.push_str("###BEGIN:behavior-sets\n");
        for item in &self.behavior_sets {
            out.push_str(item);
            out.push('\n');
        }
        out.push_str("###END:behavior-sets\n\n");
        out.push_str("###BEGIN:monadic-behavior\n");
        for item in &self.monadic {
            out.push_str(item);
            out.push('\n');
        }
        out.push_str("###END:monadic-behavior\n\n");
        out.push_str("###BEGIN:dyadic-behavior\n");
        for item in &self.dyadic {
            out.push_str(item);
            out.push('\n');
        }
        out.push_str("###END:dyadic-behavior\n\n");
        out.push_str("###BEGIN:behavior-list\n");
        for item in &self.behaviors {
            out.push_str(item);
            out.push('\n');
        }
        out.push_str("###END:behavior-list\n\n");
        out.push_str("###BEGIN:annotation-color\n");
        for (k, c) in &self.colors {
            out.push_str(&format!("{k}: {},{},{}\n", c.0, c.1, c.2));
        }
        out.push_str("###END:annotation-color\n\n");
        out
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
