// Snake-draft allocation of the unconstrained line players.

use std::cmp::Ordering;

use tracing::debug;

use crate::roster::player::PlayerForBalancing;

use super::classify::descending;
use super::distribute::{TeamSide, TwoTeams};

/// Which team the snake pattern picks for the `index`-th player:
/// A, B, B, A, A, B, B, A, ...
pub fn snake_side(index: usize) -> TeamSide {
    let round = index / 2;
    let slot = index % 2;
    match (round % 2 == 0, slot == 0) {
        (true, true) | (false, false) => TeamSide::A,
        _ => TeamSide::B,
    }
}

/// Distribute `players` across the two teams.
///
/// Players are taken strongest first. Whenever the teams differ in size the
/// player goes to the smaller one; the snake pattern only decides when the
/// sizes are equal.
pub fn allocate_snake_draft(players: &[PlayerForBalancing], teams: &mut TwoTeams) {
    let mut sorted: Vec<&PlayerForBalancing> = players.iter().collect();
    sorted.sort_by(|a, b| descending(a.overall_rating, b.overall_rating));

    for (index, player) in sorted.into_iter().enumerate() {
        let side = match teams.len(TeamSide::A).cmp(&teams.len(TeamSide::B)) {
            Ordering::Less => TeamSide::A,
            Ordering::Greater => TeamSide::B,
            Ordering::Equal => snake_side(index),
        };
        debug!("snake pick {} '{}' ({:.2}) -> team {:?}", index, player.id, player.overall_rating, side);
        teams.push(side, player.clone());
    }
}
