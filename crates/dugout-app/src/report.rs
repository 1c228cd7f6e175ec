// Text and JSON rendering of a matchup analysis.

use chrono::{DateTime, Utc};
use dugout_baseball::aggregate::OverallPrediction;
use dugout_baseball::arsenal::{display_pitch_name, ArsenalRow};
use dugout_baseball::matchup::{
    AdvantageLevel, BasesPotential, MatchupAnalysis, OutcomeKind, ProbabilityCategory,
};
use dugout_baseball::platoon::PlatoonFactor;
use dugout_baseball::roster::PlayerIdentity;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MatchupReport<'a> {
    pub generated_at: DateTime<Utc>,
    /// Empty when every loaded season was used.
    pub seasons: &'a [u16],
    pub batter: &'a PlayerIdentity,
    pub pitcher: &'a PlayerIdentity,
    pub platoon: &'a PlatoonFactor,
    pub advantage_level: AdvantageLevel,
    pub overall: &'a OverallPrediction,
    pub categories: Categories,
    pub pitches: Vec<PitchLine<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Categories {
    pub hit: ProbabilityCategory,
    pub extra_base: ProbabilityCategory,
    pub strikeout: ProbabilityCategory,
    pub total_bases: BasesPotential,
}

impl Categories {
    fn of(overall: &OverallPrediction) -> Self {
        Categories {
            hit: ProbabilityCategory::classify(overall.hit_probability, OutcomeKind::Hit),
            extra_base: ProbabilityCategory::classify(
                overall.extra_base_probability,
                OutcomeKind::ExtraBase,
            ),
            strikeout: ProbabilityCategory::classify(
                overall.strikeout_probability,
                OutcomeKind::Strikeout,
            ),
            total_bases: BasesPotential::classify(overall.slg, overall.woba),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PitchLine<'a> {
    pub pitch_type: &'a str,
    pub pitch_name: &'a str,
    pub usage: f64,
    pub batter_ba: f64,
    pub batter_slg: f64,
    pub pitcher_ba_allowed: f64,
    pub predicted_ba: f64,
    pub predicted_slg: f64,
    pub predicted_woba: f64,
    pub advantage: f64,
    pub batter_seasons: &'a [ArsenalRow],
    pub pitcher_seasons: &'a [ArsenalRow],
}

pub fn build_report<'a>(
    analysis: &'a MatchupAnalysis,
    pitch_names: &'a HashMap<String, String>,
    seasons: &'a [u16],
    generated_at: DateTime<Utc>,
) -> MatchupReport<'a> {
    let pitches = analysis
        .pitches
        .iter()
        .map(|p| PitchLine {
            pitch_type: &p.pitch_type,
            pitch_name: p
                .pitch_name
                .as_deref()
                .unwrap_or_else(|| display_pitch_name(pitch_names, &p.pitch_type)),
            usage: p.pitcher_usage,
            batter_ba: p.batter.batting_average_against,
            batter_slg: p.batter.slugging_against,
            pitcher_ba_allowed: p.pitcher.batting_average_against,
            predicted_ba: p.predicted_ba,
            predicted_slg: p.predicted_slg,
            predicted_woba: p.predicted_woba,
            advantage: p.matchup_advantage,
            batter_seasons: &p.batter_seasons,
            pitcher_seasons: &p.pitcher_seasons,
        })
        .collect();

    MatchupReport {
        generated_at,
        seasons,
        batter: &analysis.batter,
        pitcher: &analysis.pitcher,
        platoon: &analysis.platoon,
        advantage_level: analysis.advantage_level(),
        overall: &analysis.overall,
        categories: Categories::of(&analysis.overall),
        pitches,
    }
}

pub fn render_json(report: &MatchupReport<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// JSON body for runs that end without a prediction.
pub fn render_json_error(kind: &str, message: &str) -> String {
    serde_json::json!({ "error": kind, "message": message }).to_string()
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

fn player_line(role: &str, p: &PlayerIdentity) -> String {
    let full = p.full_name.as_deref().unwrap_or(&p.display_name);
    format!("{role:<8} {full} ({}, {})", p.team, p.handedness)
}

/// Three-decimal baseball rate: ".275", "1.025".
fn rate(v: f64) -> String {
    let s = format!("{v:.3}");
    match s.strip_prefix("0.") {
        Some(rest) => format!(".{rest}"),
        None => s,
    }
}

fn percent(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

pub fn render_text(report: &MatchupReport<'_>) -> String {
    let mut out = String::new();
    let o = report.overall;

    let _ = writeln!(out, "{}", player_line("Batter", report.batter));
    let _ = writeln!(out, "{}", player_line("Pitcher", report.pitcher));
    let _ = writeln!(
        out,
        "Platoon  {} (x{:.2}, favors {})",
        report.platoon.description, report.platoon.multiplier, report.platoon.advantage
    );
    if !report.seasons.is_empty() {
        let seasons: Vec<String> = report.seasons.iter().map(u16::to_string).collect();
        let _ = writeln!(out, "Seasons  {}", seasons.join(", "));
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "{:<18} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "Pitch", "Usage", "B-BA", "B-SLG", "P-BA", "xBA", "xSLG", "xwOBA", "Adv"
    );
    for p in &report.pitches {
        let _ = writeln!(
            out,
            "{:<18} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>+6.2}",
            p.pitch_name,
            format!("{:.1}%", p.usage),
            rate(p.batter_ba),
            rate(p.batter_slg),
            rate(p.pitcher_ba_allowed),
            rate(p.predicted_ba),
            rate(p.predicted_slg),
            rate(p.predicted_woba),
            p.advantage
        );
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Predicted  BA {} / SLG {} / wOBA {}  (before platoon: {} / {} / {})",
        rate(o.ba),
        rate(o.slg),
        rate(o.woba),
        rate(o.base_ba),
        rate(o.base_slg),
        rate(o.base_woba)
    );
    let _ = writeln!(
        out,
        "Hit {} ({})  Extra base {} ({})  Strikeout {} ({})",
        percent(o.hit_probability),
        report.categories.hit,
        percent(o.extra_base_probability),
        report.categories.extra_base,
        percent(o.strikeout_probability),
        report.categories.strikeout
    );
    let _ = writeln!(out, "Total bases potential {}", report.categories.total_bases);
    let _ = writeln!(out, "Advantage {:+.2}: {}", o.advantage, report.advantage_level);

    out
}
