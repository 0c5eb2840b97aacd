// Roster classification: goalkeepers vs line players.

use std::cmp::Ordering;

use crate::roster::player::{PlayerForBalancing, Position};

/// The roster split by position, each side sorted strongest first.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedRoster {
    /// Sorted descending by goalkeeper skill.
    pub goalkeepers: Vec<PlayerForBalancing>,
    /// Sorted descending by overall rating.
    pub line_players: Vec<PlayerForBalancing>,
}

/// Descending comparison for ratings. NaN compares equal so the stable sort
/// leaves such entries in input order.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Split a roster into goalkeepers and line players.
pub fn classify_roster(players: &[PlayerForBalancing]) -> ClassifiedRoster {
    let mut goalkeepers: Vec<PlayerForBalancing> = players
        .iter()
        .filter(|p| p.position == Position::Goalkeeper)
        .cloned()
        .collect();
    goalkeepers.sort_by(|a, b| descending(a.goalkeeper_skill, b.goalkeeper_skill));

    let mut line_players: Vec<PlayerForBalancing> = players
        .iter()
        .filter(|p| p.position == Position::Line)
        .cloned()
        .collect();
    line_players.sort_by(|a, b| descending(a.overall_rating, b.overall_rating));

    ClassifiedRoster {
        goalkeepers,
        line_players,
    }
}
