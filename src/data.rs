//! Data loader: CSV text → grouped dataset.
//!
//! The first two columns are the virus name and its classification; every
//! later column is one (species, population) pair, where the first two
//! whitespace-separated words of the column title form the species name.
//! A cell is a presence flag: the literal `"1"` counts as present.
//!
//! Rows with fewer fields than the header are dropped without a report; this
//! is deliberate (single-operator tool) and covered by tests.

use csv::{ReaderBuilder, Trim};

/// Index of the first presence column (after name and classification).
pub const DATA_COL_OFFSET: usize = 2;

// ─── Types ───────────────────────────────────────────────────────────────────

/// One population of one species, tied to a header column.
#[derive(Debug, Clone)]
pub struct Population {
    pub label: String,
    /// Header index of the presence column.
    pub column: usize,
}

/// An ant species with its populations in column order.
#[derive(Debug, Clone)]
pub struct Species {
    pub name: String,
    pub populations: Vec<Population>,
}

/// One CSV data row: a virus and its presence flags.
#[derive(Debug, Clone)]
pub struct VirusRecord {
    pub name: String,
    pub classification: String,
    /// Raw cells aligned with the header columns.
    pub cells: Vec<String>,
}

impl VirusRecord {
    pub fn present(&self, column: usize) -> bool {
        self.cells.get(column).map(|c| c == "1").unwrap_or(false)
    }

    /// Cell value for a header column.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Metadata for a record present in more than one population.
#[derive(Debug, Clone, Default)]
pub struct MultiPresence {
    /// Number of true presence cells.
    pub presence_count: usize,
    /// Species the record occurs in, in species order.
    pub species: Vec<String>,
    /// Radial depth; assigned after all records are scanned.
    pub indent: usize,
    /// Slot angles of the record's dots, collected by the layout engine.
    pub angles: Vec<f64>,
}

/// Parsed and grouped dataset.
///
/// `multi` is an explicit ordered sequence (record order), never a hash map:
/// indentation and slot assignment depend on a reproducible iteration order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub species: Vec<Species>,
    pub records: Vec<VirusRecord>,
    /// Total number of true presence cells across the dataset.
    pub presence_total: usize,
    pub multi: Vec<(String, MultiPresence)>,
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Species name: the first two whitespace-separated words of a column title.
fn species_name(title: &str) -> String {
    title.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Population label: whatever follows the species words, or `P<n>`.
fn population_label(title: &str, fallback_index: usize) -> String {
    let rest = title.split_whitespace().skip(2).collect::<Vec<_>>().join(" ");
    if rest.is_empty() {
        format!("P{}", fallback_index + 1)
    } else {
        rest
    }
}

impl Dataset {
    /// Parse CSV text into a grouped dataset.
    pub fn parse(csv_text: &str) -> Result<Dataset, String> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(csv_text.as_bytes());

        let mut headers: Vec<String> = Vec::new();
        let mut records: Vec<VirusRecord> = Vec::new();

        for row in reader.records() {
            let row = row.map_err(|e| format!("CSV read error: {e}"))?;
            let items: Vec<String> = row
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if items.len() <= 1 {
                continue; // empty or comment line
            }
            if headers.is_empty() {
                // First proper line is the title line.
                headers = items;
                continue;
            }
            if items.len() < headers.len() {
                continue; // malformed short row, silently dropped
            }
            records.push(VirusRecord {
                name: items[0].clone(),
                classification: items[1].clone(),
                cells: items[..headers.len()].to_vec(),
            });
        }

        if headers.is_empty() {
            return Err("no header row found in CSV input".to_string());
        }
        if headers.len() <= DATA_COL_OFFSET {
            return Err("header has no presence columns".to_string());
        }

        let species = group_species(&headers);
        let mut ds = Dataset {
            headers,
            species,
            records,
            presence_total: 0,
            multi: Vec::new(),
        };
        ds.scan_presence();
        ds.assign_indent_levels();
        Ok(ds)
    }

    /// Count presence cells and collect multi-presence metadata.
    fn scan_presence(&mut self) {
        let mut total = 0;
        for rec in &self.records {
            let mut count = 0;
            let mut involved: Vec<String> = Vec::new();
            for sp in &self.species {
                let in_species = sp
                    .populations
                    .iter()
                    .filter(|p| rec.present(p.column))
                    .count();
                if in_species > 0 {
                    involved.push(sp.name.clone());
                }
                count += in_species;
            }
            total += count;
            if count > 1 {
                self.multi.push((
                    rec.name.clone(),
                    MultiPresence {
                        presence_count: count,
                        species: involved,
                        indent: 0,
                        angles: Vec::new(),
                    },
                ));
            }
        }
        self.presence_total = total;
    }

    /// Assign indentation levels: per-species counters (starting at 1) for
    /// records confined to one species, then cross-species records continue
    /// upward from the maximum single-species level, one unique level each.
    fn assign_indent_levels(&mut self) {
        let mut max_level = 0;
        for sp in &self.species {
            let mut counter = 0;
            for (_, m) in self.multi.iter_mut() {
                if m.species.len() == 1 && m.species[0] == sp.name {
                    counter += 1;
                    m.indent = counter;
                }
            }
            max_level = max_level.max(counter);
        }
        let mut level = max_level;
        for (_, m) in self.multi.iter_mut() {
            if m.species.len() > 1 {
                level += 1;
                m.indent = level;
            }
        }
    }

    pub fn multi_entry(&self, name: &str) -> Option<&MultiPresence> {
        self.multi.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    pub fn multi_entry_mut(&mut self, name: &str) -> Option<&mut MultiPresence> {
        self.multi
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }

    pub fn record(&self, name: &str) -> Option<&VirusRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Distinct classification labels, sorted.
    pub fn classifications(&self) -> Vec<String> {
        let mut cls: Vec<String> = self
            .records
            .iter()
            .map(|r| r.classification.clone())
            .collect();
        cls.sort();
        cls.dedup();
        cls
    }

    /// Names of all viruses under a classification, sorted by name.
    pub fn viruses_in_classification(&self, classification: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.classification == classification)
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Group presence columns into species, deduplicated in first-seen order.
fn group_species(headers: &[String]) -> Vec<Species> {
    let mut species: Vec<Species> = Vec::new();
    for (ci, title) in headers.iter().enumerate().skip(DATA_COL_OFFSET) {
        let name = species_name(title);
        let idx = match species.iter().position(|s| s.name == name) {
            Some(i) => i,
            None => {
                species.push(Species {
                    name,
                    populations: Vec::new(),
                });
                species.len() - 1
            }
        };
        let label = population_label(title, species[idx].populations.len());
        species[idx].populations.push(Population { label, column: ci });
    }
    species
}

// ─── Tests ───────────────────────────────────────────────────────────────────
