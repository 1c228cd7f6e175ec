// Pitch-arsenal tables: CSV loading, season aggregation, pitch names.
//
// Reads Baseball Savant "pitch arsenal stats" exports. Batter and pitcher
// files share the same columns; the numbers are from the row owner's
// perspective (what the batter hit against the pitch type, or what the
// pitcher allowed with it).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Column holding the canonical "Last, First" player key.
pub const PLAYER_KEY_COLUMN: &str = "last_name, first_name";

/// Columns an arsenal CSV must carry to be usable.
pub const REQUIRED_COLUMNS: [&str; 4] = [PLAYER_KEY_COLUMN, "player_id", "team_name_alt", "pitch_type"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One row of per-pitch-type statistics for a batter or a pitcher.
///
/// Missing or non-finite numbers are stored as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArsenalRow {
    pub player_key: String,
    pub player_id: Option<u64>,
    pub team: String,
    pub season: Option<u16>,
    pub pitch_type: String,
    pub pitch_name: Option<String>,
    pub pitches: f64,
    /// Share of the pitcher's pitches of this type, 0-100. Pitcher rows only.
    pub pitch_usage_percent: f64,
    pub batting_average_against: f64,
    pub slugging_against: f64,
    pub woba_against: f64,
    pub whiff_percent: f64,
    pub strikeout_percent: f64,
    pub run_value_per_100: f64,
}

/// Every row of one side (batters or pitchers) across the loaded seasons.
#[derive(Debug, Clone, Default)]
pub struct ArsenalTable {
    rows: Vec<ArsenalRow>,
    seasons: Vec<u16>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ArsenalError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required columns: {}", columns.join(", "))]
    MissingColumns { path: String, columns: Vec<String> },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Savant arsenal CSV row. Numeric columns are optional because Savant
/// leaves them blank for tiny samples; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawArsenalRow {
    #[serde(rename = "last_name, first_name")]
    player_key: String,
    #[serde(default)]
    player_id: Option<u64>,
    #[serde(default, rename = "team_name_alt")]
    team: String,
    pitch_type: String,
    #[serde(default)]
    pitch_name: Option<String>,
    #[serde(default)]
    pitches: Option<f64>,
    #[serde(default)]
    pitch_usage: Option<f64>,
    #[serde(default)]
    ba: Option<f64>,
    #[serde(default)]
    slg: Option<f64>,
    #[serde(default)]
    woba: Option<f64>,
    #[serde(default)]
    whiff_percent: Option<f64>,
    #[serde(default)]
    k_percent: Option<f64>,
    #[serde(default)]
    run_value_per_100: Option<f64>,
}

impl RawArsenalRow {
    fn into_row(self, season: Option<u16>) -> ArsenalRow {
        let num = |v: Option<f64>| finite_or_zero(v.unwrap_or(0.0));
        ArsenalRow {
            player_key: self.player_key,
            player_id: self.player_id,
            team: self.team,
            season,
            pitch_type: self.pitch_type,
            pitch_name: self.pitch_name.filter(|n| !n.is_empty()),
            pitches: num(self.pitches),
            pitch_usage_percent: num(self.pitch_usage),
            batting_average_against: num(self.ba),
            slugging_against: num(self.slg),
            woba_against: num(self.woba),
            whiff_percent: num(self.whiff_percent),
            strikeout_percent: num(self.k_percent),
            run_value_per_100: num(self.run_value_per_100),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map NaN and infinities to 0.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn missing_columns(headers: &csv::StringRecord) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_rows_from_reader<R: Read>(
    rdr: R,
    source: &str,
    season: Option<u16>,
) -> Result<Vec<ArsenalRow>, ArsenalError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let headers = reader.headers().map_err(|e| ArsenalError::Csv {
        path: source.to_string(),
        source: e,
    })?;
    let missing = missing_columns(headers);
    if !missing.is_empty() {
        return Err(ArsenalError::MissingColumns {
            path: source.to_string(),
            columns: missing,
        });
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawArsenalRow>() {
        match result {
            Ok(raw) => {
                if raw.player_key.is_empty() || raw.pitch_type.is_empty() {
                    warn!("skipping {} row without player or pitch type", source);
                    continue;
                }
                rows.push(raw.into_row(season));
            }
            Err(e) => {
                warn!("skipping malformed arsenal row in {}: {}", source, e);
            }
        }
    }
    Ok(rows)
}

/// Load one arsenal CSV file, tagging each row with `season`.
pub fn load_arsenal(path: &Path, season: Option<u16>) -> Result<Vec<ArsenalRow>, ArsenalError> {
    let file = std::fs::File::open(path).map_err(|e| ArsenalError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_rows_from_reader(file, &path.display().to_string(), season)
}

// ---------------------------------------------------------------------------
// Table and season aggregation
// ---------------------------------------------------------------------------

impl ArsenalTable {
    /// Build a table; the season list is derived from the rows, newest first.
    pub fn new(rows: Vec<ArsenalRow>) -> Self {
        let mut seasons: Vec<u16> = rows.iter().filter_map(|r| r.season).collect();
        seasons.sort_unstable_by(|a, b| b.cmp(a));
        seasons.dedup();
        ArsenalTable { rows, seasons }
    }

    pub fn rows(&self) -> &[ArsenalRow] {
        &self.rows
    }

    /// Seasons present in the table, newest first.
    pub fn seasons(&self) -> &[u16] {
        &self.seasons
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw rows for one player. `seasons = None` keeps every season; rows
    /// without a season tag are always kept.
    pub fn player_rows<'a>(
        &'a self,
        player_key: &'a str,
        seasons: Option<&'a [u16]>,
    ) -> impl Iterator<Item = &'a ArsenalRow> + 'a {
        self.rows.iter().filter(move |r| {
            r.player_key == player_key
                && match (seasons, r.season) {
                    (Some(wanted), Some(year)) => wanted.contains(&year),
                    _ => true,
                }
        })
    }

    /// Uncombined rows of one player and pitch type, oldest season first.
    pub fn season_rows(
        &self,
        player_key: &str,
        pitch_type: &str,
        seasons: Option<&[u16]>,
    ) -> Vec<ArsenalRow> {
        let mut rows: Vec<ArsenalRow> = self
            .player_rows(player_key, seasons)
            .filter(|r| r.pitch_type == pitch_type)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.season);
        rows
    }

    /// One row per pitch type for a player, combining the selected seasons.
    ///
    /// Pitch types keep the order in which they first appear in the table.
    pub fn player_arsenal(&self, player_key: &str, seasons: Option<&[u16]>) -> Vec<ArsenalRow> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&ArsenalRow>> = HashMap::new();
        for row in self.player_rows(player_key, seasons) {
            let group = groups.entry(row.pitch_type.as_str()).or_default();
            if group.is_empty() {
                order.push(row.pitch_type.as_str());
            }
            group.push(row);
        }

        order
            .into_iter()
            .filter_map(|pitch_type| groups.get(pitch_type))
            .map(|group| combine_seasons(group))
            .collect()
    }
}

/// Combine several seasons of the same (player, pitch type).
///
/// Numbers are weighted by pitch count over seasons with pitches > 0, or a
/// plain mean when no season has any.
fn combine_seasons(rows: &[&ArsenalRow]) -> ArsenalRow {
    if let [only] = rows {
        return (*only).clone();
    }

    let weighted: Vec<&ArsenalRow> = rows.iter().copied().filter(|r| r.pitches > 0.0).collect();
    let total_pitches: f64 = weighted.iter().map(|r| r.pitches).sum();
    let mean = |field: fn(&ArsenalRow) -> f64| -> f64 {
        if weighted.is_empty() {
            rows.iter().map(|r| field(r)).sum::<f64>() / rows.len() as f64
        } else {
            weighted.iter().map(|r| field(r) * r.pitches).sum::<f64>() / total_pitches
        }
    };

    let first = rows[0];
    ArsenalRow {
        player_key: first.player_key.clone(),
        player_id: rows.iter().find_map(|r| r.player_id),
        team: first.team.clone(),
        season: None,
        pitch_type: first.pitch_type.clone(),
        pitch_name: rows.iter().find_map(|r| r.pitch_name.clone()),
        pitches: rows.iter().map(|r| r.pitches).sum(),
        pitch_usage_percent: mean(|r| r.pitch_usage_percent),
        batting_average_against: mean(|r| r.batting_average_against),
        slugging_against: mean(|r| r.slugging_against),
        woba_against: mean(|r| r.woba_against),
        whiff_percent: mean(|r| r.whiff_percent),
        strikeout_percent: mean(|r| r.strikeout_percent),
        run_value_per_100: mean(|r| r.run_value_per_100),
    }
}

/// Rescale pitcher usage so the arsenal sums to 100. No-op when the total
/// is zero.
pub fn normalize_usage(rows: &mut [ArsenalRow]) {
    let total: f64 = rows.iter().map(|r| r.pitch_usage_percent).sum();
    if total > 0.0 && total.is_finite() {
        for row in rows.iter_mut() {
            row.pitch_usage_percent = row.pitch_usage_percent / total * 100.0;
        }
    }
}

// ---------------------------------------------------------------------------
// Pitch names
// ---------------------------------------------------------------------------

/// Map each pitch code to the first pitch name found, scanning tables in order.
pub fn pitch_type_names(tables: &[&ArsenalTable]) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for row in tables.iter().flat_map(|t| t.rows()) {
        if let Some(name) = &row.pitch_name {
            names
                .entry(row.pitch_type.clone())
                .or_insert_with(|| name.clone());
        }
    }
    names
}

/// Human-readable name for a pitch code, or the code itself when unknown.
pub fn display_pitch_name<'a>(names: &'a HashMap<String, String>, code: &'a str) -> &'a str {
    names.get(code).map(String::as_str).unwrap_or(code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
