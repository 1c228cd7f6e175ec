// Player name resolution.
//
// Maps a loosely specified player ("Aaron Judge", "A. Judge", "Judge, Aaron",
// or a roster reference with full name and team) onto a row of the
// statistics tables. Strategies run from strictest to loosest and the first
// one that produces a match wins; ties inside a strategy are broken by team
// and then by list order.

use crate::roster::PlayerIdentity;
use serde::Serialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Reference to a player from another data source.
///
/// A reference may carry only a full name (e.g. from a roster), so every
/// field is optional. Blank strings are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerRef {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub team: Option<String>,
}

impl PlayerRef {
    pub fn new(name: Option<&str>, full_name: Option<&str>, team: Option<&str>) -> Self {
        PlayerRef {
            name: non_blank(name),
            full_name: non_blank(full_name),
            team: non_blank(team),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// What the caller is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TargetPlayer {
    /// A bare display name in any supported format.
    Name(String),
    Ref(PlayerRef),
}

impl TargetPlayer {
    fn name(&self) -> Option<&str> {
        match self {
            TargetPlayer::Name(n) => Some(n.trim()).filter(|n| !n.is_empty()),
            TargetPlayer::Ref(r) => r.name.as_deref(),
        }
    }

    fn full_name(&self) -> Option<&str> {
        match self {
            TargetPlayer::Name(_) => None,
            TargetPlayer::Ref(r) => r.full_name.as_deref(),
        }
    }

    fn team(&self) -> Option<&str> {
        match self {
            TargetPlayer::Name(_) => None,
            TargetPlayer::Ref(r) => r.team.as_deref(),
        }
    }

    fn describe(&self) -> String {
        match (self.name(), self.full_name()) {
            (Some(n), _) => n.to_string(),
            (None, Some(f)) => f.to_string(),
            (None, None) => String::new(),
        }
    }
}

impl From<&str> for TargetPlayer {
    fn from(name: &str) -> Self {
        TargetPlayer::Name(name.to_string())
    }
}

impl From<PlayerRef> for TargetPlayer {
    fn from(r: PlayerRef) -> Self {
        TargetPlayer::Ref(r)
    }
}

// ---------------------------------------------------------------------------
// Name format conversion
// ---------------------------------------------------------------------------

/// Target layout for `convert_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    /// "Judge, Aaron"
    LastFirst,
    /// "Aaron Judge"
    FirstLast,
}

/// Convert between "First Last", "F. Last" and "Last, First".
///
/// Names that do not fit the requested conversion are returned unchanged.
pub fn convert_name(name: &str, format: NameFormat) -> String {
    match format {
        NameFormat::LastFirst => {
            if name.contains('.') {
                let parts: Vec<&str> = name.split(' ').collect();
                if let [first, last] = parts.as_slice() {
                    return format!("{last}, {first}");
                }
            }
            if name.contains(' ') && !name.contains(',') {
                if let Some(converted) = full_name_to_last_first(name) {
                    return converted;
                }
            }
        }
        NameFormat::FirstLast => {
            if name.contains(',') {
                let parts: Vec<&str> = name.split(", ").collect();
                if let [last, first] = parts.as_slice() {
                    return format!("{first} {last}");
                }
            }
        }
    }
    name.to_string()
}

/// "Aaron Judge" -> "Judge, Aaron"; everything after the first token is the
/// surname ("Elly De La Cruz" -> "De La Cruz, Elly").
pub fn full_name_to_last_first(full_name: &str) -> Option<String> {
    let (first, rest) = full_name.split_once(' ')?;
    Some(format!("{rest}, {first}"))
}

// ---------------------------------------------------------------------------
// Resolution result and trace
// ---------------------------------------------------------------------------

/// Which strategy produced the match, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchTier {
    Exact,
    FullNameConversion,
    NameFormatConversion,
    LastName,
    LastNameFirstInitial,
    LastNameSubstring,
    Substring,
}

/// A successful resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub player: &'a PlayerIdentity,
    pub tier: MatchTier,
}

/// Intermediate decisions made while resolving one target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionTrace {
    pub searching_for: String,
    pub candidate_count: usize,
    pub converted_full_name: Option<String>,
    pub converted_name: Option<String>,
    pub extracted_last_name: Option<String>,
    pub last_name_matches: Vec<String>,
    pub special_case_matches: Vec<String>,
    pub tier: Option<MatchTier>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve `target` against `candidates`. `None` means no strategy matched.
pub fn resolve<'a>(target: &TargetPlayer, candidates: &'a [PlayerIdentity]) -> Option<&'a PlayerIdentity> {
    resolve_traced(target, candidates).0.map(|r| r.player)
}

/// Like `resolve`, also returning what each strategy saw.
pub fn resolve_traced<'a>(
    target: &TargetPlayer,
    candidates: &'a [PlayerIdentity],
) -> (Option<Resolved<'a>>, ResolutionTrace) {
    let mut trace = ResolutionTrace {
        searching_for: target.describe(),
        candidate_count: candidates.len(),
        ..Default::default()
    };

    let found = if candidates.is_empty() {
        None
    } else {
        run_tiers(target, candidates, &mut trace)
    };

    match found {
        Some((player, tier)) => {
            trace.tier = Some(tier);
            debug!(
                "resolved {:?} to {:?} via {:?}",
                trace.searching_for, player.display_name, tier
            );
            (Some(Resolved { player, tier }), trace)
        }
        None => {
            debug!("no match for {:?}: {:?}", trace.searching_for, trace);
            (None, trace)
        }
    }
}

fn run_tiers<'a>(
    target: &TargetPlayer,
    candidates: &'a [PlayerIdentity],
    trace: &mut ResolutionTrace,
) -> Option<(&'a PlayerIdentity, MatchTier)> {
    let name = target.name();
    let full_name = target.full_name();
    let team = target.team();
    let by_display = |wanted: &str| candidates.iter().find(|p| p.display_name == wanted);

    // 1. Exact display name.
    if let Some(found) = name.and_then(by_display) {
        return Some((found, MatchTier::Exact));
    }

    // 2. Full name converted to "Last, First".
    if let Some(converted) = full_name.and_then(full_name_to_last_first) {
        let found = by_display(&converted);
        trace.converted_full_name = Some(converted);
        if let Some(found) = found {
            return Some((found, MatchTier::FullNameConversion));
        }
    }

    // 3. Bare name converted to "Last, First".
    if let Some(name) = name {
        let converted = convert_name(name, NameFormat::LastFirst);
        if converted != name {
            let found = by_display(&converted);
            trace.converted_name = Some(converted);
            if let Some(found) = found {
                return Some((found, MatchTier::NameFormatConversion));
            }
        }
    }

    // 4. Surname filter, disambiguated by team.
    if name.map_or(full_name.is_some(), |n| n.contains(' ')) {
        let last_name = match name {
            Some(n) if n.contains('.') => n.split(' ').nth(1),
            _ => full_name.and_then(|f| f.contains(' ').then(|| f.split(' ').last()).flatten()),
        };
        trace.extracted_last_name = last_name.map(str::to_string);

        if let Some(last) = last_name {
            let starts = format!("{last},");
            let contains = format!(", {last}");
            let matches: Vec<&PlayerIdentity> = candidates
                .iter()
                .filter(|p| {
                    p.display_name.starts_with(&starts)
                        || p.display_name.contains(&contains)
                        || p.full_name.as_deref().is_some_and(|f| f.contains(last))
                })
                .collect();
            trace.last_name_matches = matches.iter().map(|p| p.display_name.clone()).collect();

            if let Some(found) = pick_by_team(&matches, team) {
                return Some((found, MatchTier::LastName));
            }
        }
    }

    if let Some(full) = full_name {
        // 5. Surname before the comma, then first name or initial.
        let (first, last) = full.split_once(' ').unwrap_or((full, ""));
        if !last.is_empty() {
            let first_lower = first.to_lowercase();
            let last_lower = last.to_lowercase();
            let starts = format!("{last_lower},");
            let matches: Vec<&PlayerIdentity> = candidates
                .iter()
                .filter(|p| {
                    let display = p.display_name.to_lowercase();
                    display.starts_with(&starts) || surname(&display) == last_lower
                })
                .collect();
            trace.special_case_matches = matches.iter().map(|p| p.display_name.clone()).collect();

            if let [only] = matches.as_slice() {
                return Some((*only, MatchTier::LastNameFirstInitial));
            }
            if !matches.is_empty() {
                let initial: String = first_lower.chars().take(1).collect();
                let by_first = matches.iter().find(|p| {
                    p.display_name.split(", ").nth(1).is_some_and(|csv_first| {
                        let csv_first = csv_first.to_lowercase();
                        csv_first == first_lower || csv_first.starts_with(&initial)
                    })
                });
                let found = by_first.copied().or_else(|| pick_by_team(&matches, team));
                if let Some(found) = found {
                    return Some((found, MatchTier::LastNameFirstInitial));
                }
            }
        }

        // 6. Surname anywhere in the display name.
        let last_lower = final_token(full).to_lowercase();
        if let Some(found) = candidates
            .iter()
            .find(|p| p.display_name.to_lowercase().contains(&last_lower))
        {
            return Some((found, MatchTier::LastNameSubstring));
        }
    }

    // 7. Either name contains the other. Any candidate containing the full
    // name's final token was already taken by step 6, so only the bare name
    // is left to compare.
    let name = name?;
    candidates
        .iter()
        .find(|p| {
            p.display_name.contains(name)
                || name.contains(p.display_name.as_str())
                || p.full_name.as_deref().is_some_and(|f| f.contains(name))
        })
        .map(|p| (p, MatchTier::Substring))
}

/// One match wins outright; several prefer the target's team, else the first.
fn pick_by_team<'a>(matches: &[&'a PlayerIdentity], team: Option<&str>) -> Option<&'a PlayerIdentity> {
    if let [only] = matches {
        return Some(*only);
    }
    team.and_then(|t| matches.iter().find(|p| p.team == t))
        .or_else(|| matches.first())
        .copied()
}

/// Portion of a "Last, First" name before the comma.
fn surname(display: &str) -> &str {
    display.split(',').next().unwrap_or_default()
}

fn final_token(s: &str) -> &str {
    s.split(' ').last().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn player(display: &str, team: &str) -> PlayerIdentity {
        PlayerIdentity::new(display, team)
    }

    fn full_ref(full: &str, team: Option<&str>) -> TargetPlayer {
        TargetPlayer::Ref(PlayerRef::new(None, Some(full), team))
    }

    #[test]
    fn converts_name_formats() {
        assert_eq!(convert_name("Aaron Judge", NameFormat::LastFirst), "Judge, Aaron");
        assert_eq!(convert_name("A. Judge", NameFormat::LastFirst), "Judge, A.");
        assert_eq!(convert_name("Elly De La Cruz", NameFormat::LastFirst), "De La Cruz, Elly");
        assert_eq!(convert_name("Judge, Aaron", NameFormat::LastFirst), "Judge, Aaron");
        assert_eq!(convert_name("Judge, Aaron", NameFormat::FirstLast), "Aaron Judge");
        assert_eq!(convert_name("Aaron Judge", NameFormat::FirstLast), "Aaron Judge");
        assert_eq!(convert_name("Ohtani", NameFormat::LastFirst), "Ohtani");
    }

    #[test]
    fn exact_match() {
        let candidates = vec![player("Judge, Aaron", "NYY")];
        let target = TargetPlayer::Ref(PlayerRef::new(Some("Judge, Aaron"), None, None));
        let (found, trace) = resolve_traced(&target, &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Judge, Aaron");
        assert_eq!(found.tier, MatchTier::Exact);
        assert_eq!(trace.tier, Some(MatchTier::Exact));
    }

    #[test]
    fn full_name_conversion_match() {
        let candidates = vec![player("Soto, Juan", "NYM"), player("Judge, Aaron", "NYY")];
        let target = full_ref("Aaron Judge", Some("NYY"));
        let (found, trace) = resolve_traced(&target, &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Judge, Aaron");
        assert_eq!(found.tier, MatchTier::FullNameConversion);
        assert_eq!(trace.converted_full_name.as_deref(), Some("Judge, Aaron"));
    }

    #[test]
    fn bare_first_last_name_converted() {
        let candidates = vec![player("Judge, Aaron", "NYY")];
        let (found, trace) = resolve_traced(&"Aaron Judge".into(), &candidates);
        assert_eq!(found.unwrap().tier, MatchTier::NameFormatConversion);
        assert_eq!(trace.converted_name.as_deref(), Some("Judge, Aaron"));
    }

    #[test]
    fn exact_match_beats_looser_tiers() {
        // "Judge, Aaron" also matches the surname and substring strategies
        // for the first candidate, which must not win.
        let candidates = vec![
            player("Judge, Aaron Jr.", "NYY"),
            player("Judge, Aaron", "NYY"),
        ];
        let target = TargetPlayer::Ref(PlayerRef::new(
            Some("Judge, Aaron"),
            Some("Aaron Judge"),
            Some("NYY"),
        ));
        let found = resolve(&target, &candidates).unwrap();
        assert_eq!(found.display_name, "Judge, Aaron");
    }

    #[test]
    fn initial_form_uses_last_name_filter() {
        let candidates = vec![player("Cole, Gerrit", "NYY"), player("Judge, Aaron", "NYY")];
        let (found, trace) = resolve_traced(&"A. Judge".into(), &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Judge, Aaron");
        assert_eq!(found.tier, MatchTier::LastName);
        assert_eq!(trace.converted_name.as_deref(), Some("Judge, A."));
        assert_eq!(trace.extracted_last_name.as_deref(), Some("Judge"));
        assert_eq!(trace.last_name_matches, vec!["Judge, Aaron"]);
    }

    #[test]
    fn last_name_ties_broken_by_team() {
        let candidates = vec![
            player("Smith, Will", "LAD"),
            player("Smith, Will", "TEX"),
            player("Smith, Dominic", "BOS"),
        ];
        let target = TargetPlayer::Ref(PlayerRef::new(Some("W. Smith"), None, Some("TEX")));
        let found = resolve(&target, &candidates).unwrap();
        assert_eq!(found.team, "TEX");

        // Without a team the first match wins.
        let found = resolve(&"W. Smith".into(), &candidates).unwrap();
        assert_eq!(found.team, "LAD");
    }

    #[test]
    fn full_name_last_token_drives_last_name_filter() {
        let candidates = vec![
            player("Smith, Will", "LAD"),
            player("Smith, Will", "TEX"),
        ];
        // Not convertible to an exact display name ("Smith, William").
        let target = full_ref("William Smith", Some("TEX"));
        let (found, trace) = resolve_traced(&target, &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.team, "TEX");
        assert_eq!(found.tier, MatchTier::LastName);
        assert_eq!(trace.extracted_last_name.as_deref(), Some("Smith"));
    }

    #[test]
    fn multi_word_surname_uses_first_initial() {
        let candidates = vec![
            player("De La Cruz, Bryan", "MIA"),
            player("De La Cruz, Elly", "CIN"),
        ];
        // Exact conversion fails ("De La Cruz, Elijah"); the last-name filter
        // keys on "Cruz" which appears in neither "Cruz," prefix nor ", Cruz".
        let target = full_ref("Elijah De La Cruz", None);
        let (found, trace) = resolve_traced(&target, &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "De La Cruz, Elly");
        assert_eq!(found.tier, MatchTier::LastNameFirstInitial);
        assert_eq!(trace.special_case_matches.len(), 2);
    }

    #[test]
    fn first_initial_falls_back_to_team() {
        let candidates = vec![
            player("De La Cruz, Bryan", "MIA"),
            player("De La Cruz, Elly", "CIN"),
        ];
        // No first name starts with "z", so the team decides.
        let target = full_ref("Zed De La Cruz", Some("CIN"));
        let (found, _) = resolve_traced(&target, &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "De La Cruz, Elly");
        assert_eq!(found.tier, MatchTier::LastNameFirstInitial);

        // No team either: first in list order.
        let target = full_ref("Zed De La Cruz", None);
        assert_eq!(resolve(&target, &candidates).unwrap().team, "MIA");
    }

    #[test]
    fn surname_substring_fallback() {
        let candidates = vec![player("Acuna Jr., Ronald", "ATL")];
        let target = full_ref("Ronald Acuna", None);
        let (found, _) = resolve_traced(&target, &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Acuna Jr., Ronald");
        assert_eq!(found.tier, MatchTier::LastNameSubstring);
    }

    #[test]
    fn bidirectional_substring_fallback() {
        let candidates = vec![player("Ohtani, Shohei", "LAD")];
        let (found, _) = resolve_traced(&"Ohtani".into(), &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Ohtani, Shohei");
        assert_eq!(found.tier, MatchTier::Substring);
    }

    #[test]
    fn last_name_filter_checks_candidate_full_name() {
        // Neither "Acuna," nor ", Acuna" appears in the display name; only
        // the roster full name carries the bare surname.
        let candidates = vec![
            player("Cole, Gerrit", "NYY"),
            player("Acuna Jr., Ronald", "ATL").with_full_name("Ronald Acuna Jr."),
        ];
        let (found, trace) = resolve_traced(&"R. Acuna".into(), &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Acuna Jr., Ronald");
        assert_eq!(found.tier, MatchTier::LastName);
        assert_eq!(trace.last_name_matches, vec!["Acuna Jr., Ronald"]);

        // Without the full name nothing matches.
        let bare = vec![player("Acuna Jr., Ronald", "ATL")];
        assert!(resolve(&"R. Acuna".into(), &bare).is_none());
    }

    #[test]
    fn substring_fallback_checks_candidate_full_name() {
        let candidates = vec![player("Ohtani, S.", "LAD").with_full_name("Shohei Ohtani")];
        let (found, _) = resolve_traced(&"Shohei".into(), &candidates);
        let found = found.unwrap();
        assert_eq!(found.player.display_name, "Ohtani, S.");
        assert_eq!(found.tier, MatchTier::Substring);
    }

    #[test]
    fn substring_fallback_when_target_contains_display_name() {
        let candidates = vec![player("Ohtani, Shohei", "LAD")];
        let (found, _) = resolve_traced(&"Ohtani, Shohei (DH)".into(), &candidates);
        assert_eq!(found.unwrap().tier, MatchTier::Substring);
    }

    #[test]
    fn full_name_inside_display_settles_before_substring() {
        let candidates = vec![player("Ohtani, Shohei", "LAD").with_full_name("Shohei Ohtani")];
        let target = TargetPlayer::Ref(PlayerRef::new(None, Some("Ohtani"), None));
        let (found, _) = resolve_traced(&target, &candidates);
        assert_eq!(found.unwrap().tier, MatchTier::LastNameSubstring);
    }

    #[test]
    fn middle_initial_names_do_not_reach_last_name_filter() {
        let candidates = vec![player("Smith, A.J.", "CHW")];
        let (found, trace) = resolve_traced(&"A. J. Smith Jr.".into(), &candidates);
        assert!(found.is_none());
        assert_eq!(trace.extracted_last_name.as_deref(), Some("J."));
        assert!(trace.last_name_matches.is_empty());
    }

    #[test]
    fn not_found_and_empty_candidates() {
        let candidates = vec![player("Judge, Aaron", "NYY")];
        assert!(resolve(&"Shohei Ohtani".into(), &candidates).is_none());
        assert!(resolve(&"Judge, Aaron".into(), &[]).is_none());

        let (found, trace) = resolve_traced(&"Judge, Aaron".into(), &[]);
        assert!(found.is_none());
        assert_eq!(trace.candidate_count, 0);
        assert_eq!(trace.tier, None);
    }

    #[test]
    fn blank_fields_are_absent() {
        let r = PlayerRef::new(Some("  "), Some(""), Some(" NYY "));
        assert_eq!(r.name, None);
        assert_eq!(r.full_name, None);
        assert_eq!(r.team.as_deref(), Some("NYY"));

        // A blank bare name must not match everything by substring.
        let candidates = vec![player("Judge, Aaron", "NYY")];
        assert!(resolve(&"".into(), &candidates).is_none());
    }
}
