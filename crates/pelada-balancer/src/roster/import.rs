// Roster and pair loading from CSV files.
//
// Roster CSV columns: id, name, position, attack, midfield, defense,
// goalkeeper, and an optional overall. When overall is blank or missing it is
// derived from the three line skills.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::player::{PlayerForBalancing, PlayerPair, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: String,
    name: String,
    position: String,
    #[serde(alias = "attack_skill", alias = "striker")]
    attack: f64,
    #[serde(alias = "midfield_skill", alias = "mid")]
    midfield: f64,
    #[serde(alias = "defense_skill", alias = "defender")]
    defense: f64,
    #[serde(default, alias = "goalkeeper_skill", alias = "gk")]
    goalkeeper: f64,
    #[serde(default, alias = "overall_rating")]
    overall: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPair {
    #[serde(alias = "player1")]
    player1_id: String,
    #[serde(alias = "player2")]
    player2_id: String,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerForBalancing>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for result in reader.deserialize::<RawPlayer>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
                continue;
            }
        };

        let id = raw.id.trim().to_string();
        if id.is_empty() {
            warn!("skipping player '{}': empty id", raw.name.trim());
            continue;
        }
        let Some(position) = Position::from_str_pos(&raw.position) else {
            warn!("skipping player '{}': unknown position '{}'", id, raw.position);
            continue;
        };
        let skills = [raw.attack, raw.midfield, raw.defense, raw.goalkeeper];
        if !skills.iter().chain(raw.overall.iter()).all(|v| v.is_finite()) {
            warn!("skipping player '{}': non-finite rating value", id);
            continue;
        }
        if !seen_ids.insert(id.clone()) {
            warn!("duplicate roster entry for '{}', keeping the first one", id);
            continue;
        }

        let mut player = PlayerForBalancing::from_skills(
            id,
            raw.name.trim(),
            position,
            raw.attack,
            raw.midfield,
            raw.defense,
            raw.goalkeeper,
        );
        if let Some(overall) = raw.overall {
            player.overall_rating = overall;
        }
        players.push(player);
    }

    Ok(players)
}

fn load_pairs_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerPair>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut pairs = Vec::new();
    for result in reader.deserialize::<RawPair>() {
        match result {
            Ok(raw) => {
                if raw.player1_id.is_empty() || raw.player2_id.is_empty() {
                    warn!("skipping pair with an empty player id");
                    continue;
                }
                pairs.push(PlayerPair::new(raw.player1_id, raw.player2_id));
            }
            Err(e) => {
                warn!("skipping malformed pair row: {}", e);
            }
        }
    }
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the roster from a CSV file. An empty roster is an error here, since
/// the caller asked for a file that produced nothing usable.
pub fn load_roster(path: &Path) -> Result<Vec<PlayerForBalancing>, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file).map_err(|e| ImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if players.is_empty() {
        return Err(ImportError::Validation(format!(
            "roster CSV {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(players)
}

/// Load pair constraints from a CSV file. A missing file means no pairs.
pub fn load_pairs(path: &Path) -> Result<Vec<PlayerPair>, ImportError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_pairs_from_reader(file).map_err(|e| ImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
