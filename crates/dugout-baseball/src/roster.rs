// Roster data (rosters.json) and candidate player lists with handedness.

use crate::arsenal::ArsenalTable;
use crate::names::PlayerRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Batting side or throwing arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
    Switch,
    #[default]
    Unknown,
}

impl Handedness {
    /// Parse a roster code ("L", "R", "S"). Anything else is `Unknown`.
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "L" => Handedness::Left,
            "R" => Handedness::Right,
            "S" => Handedness::Switch,
            _ => Handedness::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Handedness::Left => "L",
            Handedness::Right => "R",
            Handedness::Switch => "S",
            Handedness::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Handedness::Unknown
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Roster entries and identities
// ---------------------------------------------------------------------------

/// One entry of `rosters.json`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterEntry {
    /// Short form, usually "A. Judge".
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub bats: Option<String>,
    /// Pitching hand.
    #[serde(default, rename = "ph", alias = "throws")]
    pub throws: Option<String>,
    #[serde(default, rename = "type")]
    pub player_type: Option<String>,
}

impl RosterEntry {
    pub fn handedness(&self, role: PlayerRole) -> Handedness {
        let code = match role {
            PlayerRole::Batter => self.bats.as_deref(),
            PlayerRole::Pitcher => self.throws.as_deref(),
        };
        code.map(Handedness::from_code).unwrap_or_default()
    }

    /// Whether the roster's `type` fits `role`. Entries without a type fit
    /// either role.
    pub fn plays(&self, role: PlayerRole) -> bool {
        let Some(kind) = self.player_type.as_deref() else {
            return true;
        };
        let kind = kind.trim().to_lowercase();
        match role {
            PlayerRole::Batter => kind == "hitter" || kind == "batter",
            PlayerRole::Pitcher => kind == "pitcher",
        }
    }

    /// Resolver target carrying everything the roster knows about the player.
    pub fn to_player_ref(&self) -> PlayerRef {
        PlayerRef::new(
            Some(self.name.as_str()),
            self.full_name.as_deref(),
            Some(self.team.as_str()),
        )
    }
}

/// Which side of the matchup a player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Batter,
    Pitcher,
}

/// A player as shown in the statistics tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerIdentity {
    /// "Last, First" as in the arsenal CSVs.
    pub display_name: String,
    /// "First Last" from the roster, when known.
    pub full_name: Option<String>,
    pub team: String,
    pub player_id: Option<u64>,
    /// Bats for batters, throws for pitchers.
    pub handedness: Handedness,
}

impl PlayerIdentity {
    pub fn new(display_name: &str, team: &str) -> Self {
        PlayerIdentity {
            display_name: display_name.to_string(),
            full_name: None,
            team: team.to_string(),
            player_id: None,
            handedness: Handedness::Unknown,
        }
    }

    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = Some(full_name.to_string());
        self
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid roster JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `rosters.json`: a JSON array of roster entries.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, RosterError> {
    let text = std::fs::read_to_string(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| RosterError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Find the roster entry whose short or full name is exactly `query`,
/// restricted to `team` when given. Entries whose type fits `role` win over
/// the first name match.
pub fn find_entry<'a>(
    roster: &'a [RosterEntry],
    query: &str,
    team: Option<&str>,
    role: PlayerRole,
) -> Option<&'a RosterEntry> {
    let mut matches = roster.iter().filter(|e| {
        (e.name == query || e.full_name.as_deref() == Some(query))
            && team.map_or(true, |t| e.team == t)
    });
    let first = matches.next()?;
    if first.plays(role) {
        return Some(first);
    }
    matches.find(|e| e.plays(role)).or(Some(first))
}

/// Roster entry that most plausibly belongs to a "Last, First" table row.
///
/// An exact full-name match wins; otherwise any entry mentioning the
/// surname (or the first name in its full name). Either way the row's team
/// is preferred.
fn roster_entry_for<'a>(
    roster: &'a [RosterEntry],
    display_name: &str,
    team: &str,
) -> Option<&'a RosterEntry> {
    let mut parts = display_name.splitn(2, ", ");
    let last = parts.next().unwrap_or_default();
    let first = parts.next();
    if last.is_empty() {
        return None;
    }

    if let Some(first) = first {
        let full = format!("{first} {last}");
        let exact: Vec<&RosterEntry> = roster
            .iter()
            .filter(|e| e.full_name.as_deref() == Some(full.as_str()))
            .collect();
        if let Some(entry) = exact.iter().find(|e| e.team == team).or_else(|| exact.first()) {
            return Some(*entry);
        }
    }

    let loose: Vec<&RosterEntry> = roster
        .iter()
        .filter(|e| {
            let full = e.full_name.as_deref().unwrap_or_default();
            full.contains(last)
                || e.name.contains(last)
                || first.is_some_and(|f| !f.is_empty() && full.contains(f))
        })
        .collect();

    loose
        .iter()
        .find(|e| e.team == team)
        .or_else(|| loose.first())
        .copied()
}

/// One identity per distinct player in the table, in table order, with
/// full name and handedness filled from the roster where possible.
pub fn identities(
    table: &ArsenalTable,
    roster: &[RosterEntry],
    role: PlayerRole,
) -> Vec<PlayerIdentity> {
    let mut seen = HashSet::new();
    let mut players = Vec::new();

    for row in table.rows() {
        if !seen.insert(row.player_key.as_str()) {
            continue;
        }
        let entry = roster_entry_for(roster, &row.player_key, &row.team);
        if entry.is_none() {
            debug!("no roster entry for {:?} ({})", row.player_key, row.team);
        }
        players.push(PlayerIdentity {
            display_name: row.player_key.clone(),
            full_name: entry.and_then(|e| e.full_name.clone()),
            team: row.team.clone(),
            player_id: row.player_id,
            handedness: entry.map(|e| e.handedness(role)).unwrap_or_default(),
        });
    }

    players
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arsenal::ArsenalRow;

    const ROSTER_JSON: &str = r#"[
        {"name": "A. Judge", "fullName": "Aaron Judge", "team": "NYY", "bats": "R", "ph": "R", "type": "hitter"},
        {"name": "G. Cole", "fullName": "Gerrit Cole", "team": "NYY", "bats": "R", "ph": "R", "type": "pitcher"},
        {"name": "W. Smith", "fullName": "Will Smith", "team": "LAD", "bats": "R", "ph": "R"},
        {"name": "W. Smith", "fullName": "Will Smith", "team": "TEX", "bats": "R", "throws": "L"},
        {"name": "J. Soto", "fullName": "Juan Soto", "team": "NYM", "bats": "L", "ph": null, "extra": 5}
    ]"#;

    fn roster() -> Vec<RosterEntry> {
        serde_json::from_str(ROSTER_JSON).unwrap()
    }

    fn row(key: &str, team: &str) -> ArsenalRow {
        ArsenalRow {
            player_key: key.into(),
            team: team.into(),
            pitch_type: "FF".into(),
            ..Default::default()
        }
    }

    #[test]
    fn handedness_codes() {
        assert_eq!(Handedness::from_code("L"), Handedness::Left);
        assert_eq!(Handedness::from_code(" r "), Handedness::Right);
        assert_eq!(Handedness::from_code("S"), Handedness::Switch);
        assert_eq!(Handedness::from_code("B"), Handedness::Unknown);
        assert_eq!(Handedness::from_code(""), Handedness::Unknown);
        assert_eq!(Handedness::Switch.to_string(), "S");
        assert!(!Handedness::Unknown.is_known());
    }

    #[test]
    fn roster_json_parses_with_aliases_and_nulls() {
        let roster = roster();
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0].full_name.as_deref(), Some("Aaron Judge"));
        assert_eq!(roster[1].handedness(PlayerRole::Pitcher), Handedness::Right);
        assert_eq!(roster[3].handedness(PlayerRole::Pitcher), Handedness::Left);
        assert_eq!(roster[4].handedness(PlayerRole::Pitcher), Handedness::Unknown);
        assert_eq!(roster[4].handedness(PlayerRole::Batter), Handedness::Left);
    }

    #[test]
    fn identities_enriched_from_roster() {
        let table = ArsenalTable::new(vec![
            row("Judge, Aaron", "NYY"),
            row("Judge, Aaron", "NYY"),
            row("Soto, Juan", "NYM"),
            row("Nobody, Known", "SEA"),
        ]);
        let players = identities(&table, &roster(), PlayerRole::Batter);

        assert_eq!(players.len(), 3);
        assert_eq!(players[0].display_name, "Judge, Aaron");
        assert_eq!(players[0].full_name.as_deref(), Some("Aaron Judge"));
        assert_eq!(players[0].handedness, Handedness::Right);
        assert_eq!(players[1].handedness, Handedness::Left);
        assert_eq!(players[2].full_name, None);
        assert_eq!(players[2].handedness, Handedness::Unknown);
    }

    #[test]
    fn identities_prefer_roster_entry_on_same_team() {
        let mut roster = roster();
        // Drop exact full names so only the loose surname match applies.
        for e in roster.iter_mut() {
            if e.name == "W. Smith" {
                e.full_name = Some(format!("Will Smith {}", e.team));
            }
        }
        let table = ArsenalTable::new(vec![row("Smith, Will", "TEX")]);
        let players = identities(&table, &roster, PlayerRole::Pitcher);
        assert_eq!(players[0].handedness, Handedness::Left);
    }

    #[test]
    fn identical_full_names_split_by_team() {
        let table = ArsenalTable::new(vec![row("Smith, Will", "TEX"), row("Smith, Will", "LAD")]);
        let players = identities(&table, &roster(), PlayerRole::Pitcher);
        // Same display key, so only the first row yields a candidate.
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].team, "TEX");
        assert_eq!(players[0].handedness, Handedness::Left);
    }

    #[test]
    fn find_entry_by_short_or_full_name() {
        let roster = roster();
        let batter = PlayerRole::Batter;
        assert_eq!(find_entry(&roster, "A. Judge", None, batter).unwrap().team, "NYY");
        assert_eq!(find_entry(&roster, "Juan Soto", None, batter).unwrap().team, "NYM");
        assert_eq!(find_entry(&roster, "W. Smith", Some("TEX"), batter).unwrap().team, "TEX");
        assert!(find_entry(&roster, "W. Smith", Some("BOS"), batter).is_none());
    }

    #[test]
    fn find_entry_prefers_entries_of_the_role() {
        let mut roster = roster();
        roster[2].player_type = Some("hitter".into());
        roster[3].player_type = Some("pitcher".into());

        let pitcher = find_entry(&roster, "W. Smith", None, PlayerRole::Pitcher).unwrap();
        assert_eq!(pitcher.team, "TEX");
        let batter = find_entry(&roster, "W. Smith", None, PlayerRole::Batter).unwrap();
        assert_eq!(batter.team, "LAD");

        // No entry of the role: the first name match still counts.
        let judge = find_entry(&roster, "A. Judge", None, PlayerRole::Pitcher).unwrap();
        assert_eq!(judge.full_name.as_deref(), Some("Aaron Judge"));
    }

    #[test]
    fn roster_type_fits_role() {
        let roster = roster();
        assert!(roster[0].plays(PlayerRole::Batter));
        assert!(!roster[0].plays(PlayerRole::Pitcher));
        assert!(roster[1].plays(PlayerRole::Pitcher));
        // Untyped entries fit both.
        assert!(roster[2].plays(PlayerRole::Batter));
        assert!(roster[2].plays(PlayerRole::Pitcher));
    }

    #[test]
    fn roster_entry_to_player_ref() {
        let roster = roster();
        let target = roster[0].to_player_ref();
        assert_eq!(target.name.as_deref(), Some("A. Judge"));
        assert_eq!(target.full_name.as_deref(), Some("Aaron Judge"));
        assert_eq!(target.team.as_deref(), Some("NYY"));
    }

    #[test]
    fn load_roster_reports_bad_json() {
        let path = std::env::temp_dir().join("dugout_roster_bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_roster(&path).unwrap_err();
        assert!(matches!(err, RosterError::Json { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
