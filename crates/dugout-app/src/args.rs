// Command-line argument parsing.

use anyhow::{bail, Context};
use dugout_baseball::roster::Handedness;

pub const USAGE: &str = "\
usage: dugout <batter> <pitcher> [options]

Predict how a batter will fare against a pitcher from pitch-arsenal stats.
Names may be \"Last, First\", \"First Last\" or roster short names (\"A. Judge\").

options:
  --json            print a JSON report instead of a table
  --bats L|R|S      override the batter's batting side
  --throws L|R      override the pitcher's throwing arm
  --batter-team T   pick the batter on team T when names collide
  --pitcher-team T  pick the pitcher on team T when names collide
  --season YEAR     restrict to a season (repeatable; default: all loaded)
  -h, --help        show this help";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub batter: String,
    pub pitcher: String,
    pub json: bool,
    pub bats: Option<Handedness>,
    pub throws: Option<Handedness>,
    pub seasons: Vec<u16>,
    pub batter_team: Option<String>,
    pub pitcher_team: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
}

/// Parse arguments (program name already stripped).
pub fn parse<I, S>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut positional = Vec::new();
    let mut json = false;
    let mut bats = None;
    let mut throws = None;
    let mut seasons = Vec::new();
    let mut batter_team = None;
    let mut pitcher_team = None;

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => json = true,
            "--bats" => {
                let value = iter.next().context("--bats needs a value")?;
                bats = Some(hand(&value, "--bats", &["L", "R", "S"])?);
            }
            "--throws" => {
                let value = iter.next().context("--throws needs a value")?;
                throws = Some(hand(&value, "--throws", &["L", "R"])?);
            }
            "--season" => {
                let value = iter.next().context("--season needs a value")?;
                let year = value
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("invalid season {value:?}"))?;
                if !seasons.contains(&year) {
                    seasons.push(year);
                }
            }
            "--batter-team" => batter_team = Some(team(iter.next(), "--batter-team")?),
            "--pitcher-team" => pitcher_team = Some(team(iter.next(), "--pitcher-team")?),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }

    let [batter, pitcher]: [String; 2] = match positional.try_into() {
        Ok(pair) => pair,
        Err(got) => bail!("expected <batter> <pitcher>, got {} name(s)", got.len()),
    };
    if batter.trim().is_empty() || pitcher.trim().is_empty() {
        bail!("player names must not be empty");
    }

    Ok(Command::Run(Args {
        batter,
        pitcher,
        json,
        bats,
        throws,
        seasons,
        batter_team,
        pitcher_team,
    }))
}

/// Team abbreviations are matched against the tables' upper-case codes.
fn team(value: Option<String>, flag: &str) -> anyhow::Result<String> {
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    let code = value.trim().to_uppercase();
    if code.is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(code)
}

fn hand(value: &str, flag: &str, allowed: &[&str]) -> anyhow::Result<Handedness> {
    let code = value.trim().to_uppercase();
    if !allowed.contains(&code.as_str()) {
        bail!("{flag} must be one of {}, got {value:?}", allowed.join("|"));
    }
    Ok(Handedness::from_code(&code))
}
