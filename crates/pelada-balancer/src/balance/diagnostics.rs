// Post-split diagnostics: position distribution, pair compliance, and
// rotation suggestions for the UI.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::roster::player::{PlayerForBalancing, PlayerPair, Position};

/// Maximum rating gap for two players to be suggested as a rotation swap.
pub const ROTATION_SIMILARITY: f64 = 0.5;

/// How many rotation suggestions are reported at most.
pub const MAX_ROTATION_SUGGESTIONS: usize = 3;

const ROTATION_REASON: &str = "similar skill: swap for variety";

/// A suggested swap between one player of each team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSuggestion {
    pub player1_id: String,
    pub player1_name: String,
    pub player2_id: String,
    pub player2_name: String,
    /// Not computed for rotation suggestions; always 0.
    pub rating_improvement_percent: f64,
    pub reason: String,
}

/// Per-position head counts, keyed by canonical position name.
pub fn position_distribution(
    team_a: &[PlayerForBalancing],
    team_b: &[PlayerForBalancing],
) -> BTreeMap<String, (usize, usize)> {
    Position::ALL
        .iter()
        .map(|&position| {
            let count_a = team_a.iter().filter(|p| p.position == position).count();
            let count_b = team_b.iter().filter(|p| p.position == position).count();
            (position.as_str().to_string(), (count_a, count_b))
        })
        .collect()
}

/// Whether every pair with both members on the rosters sits inside one team.
///
/// Pairs naming a player on neither roster are ignored.
pub fn pairs_respected(
    team_a: &[PlayerForBalancing],
    team_b: &[PlayerForBalancing],
    pairs: &[PlayerPair],
) -> bool {
    let ids_a: HashSet<&str> = team_a.iter().map(|p| p.id.as_str()).collect();
    let ids_b: HashSet<&str> = team_b.iter().map(|p| p.id.as_str()).collect();
    let present = |id: &str| ids_a.contains(id) || ids_b.contains(id);

    pairs
        .iter()
        .filter(|pair| present(&pair.player1_id) && present(&pair.player2_id))
        .all(|pair| {
            let both_in_a = ids_a.contains(pair.player1_id.as_str()) && ids_a.contains(pair.player2_id.as_str());
            let both_in_b = ids_b.contains(pair.player1_id.as_str()) && ids_b.contains(pair.player2_id.as_str());
            both_in_a || both_in_b
        })
}

/// Suggest up to three swaps between unpaired line players of similar rating.
pub fn rotation_suggestions(
    team_a: &[PlayerForBalancing],
    team_b: &[PlayerForBalancing],
    pairs: &[PlayerPair],
) -> Vec<SwapSuggestion> {
    let swappable = |p: &&PlayerForBalancing| {
        p.position == Position::Line && !pairs.iter().any(|pair| pair.contains(&p.id))
    };

    team_a
        .iter()
        .filter(swappable)
        .flat_map(|a| team_b.iter().filter(swappable).map(move |b| (a, b)))
        .filter(|(a, b)| (a.overall_rating - b.overall_rating).abs() < ROTATION_SIMILARITY)
        .take(MAX_ROTATION_SUGGESTIONS)
        .map(|(a, b)| SwapSuggestion {
            player1_id: a.id.clone(),
            player1_name: a.name.clone(),
            player2_id: b.id.clone(),
            player2_name: b.name.clone(),
            rating_improvement_percent: 0.0,
            reason: ROTATION_REASON.to_string(),
        })
        .collect()
}
