// Named-team interface shared by every balancing path.
//
// Callers that only need "which player ids go on which named team" work
// against `TeamBalancer`. The local engine implements it through
// `TwoTeamBalancer`; an externally delegated balancer can implement the same
// trait and be swapped in without the caller noticing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::balance::distribute::TeamSide;
use crate::balance::{self, BalanceOptions, BalanceResult};
use crate::roster::player::{PlayerForBalancing, PlayerPair};

/// Number of teams requested when the caller does not say otherwise.
pub const DEFAULT_NUMBER_OF_TEAMS: usize = 2;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("game id must not be empty")]
    EmptyGameId,

    #[error("player list must not be empty")]
    NoPlayers,

    #[error("number of teams must be at least 2, got {requested}")]
    TooFewTeams { requested: usize },

    #[error("number of teams ({teams}) cannot be greater than the number of players ({players})")]
    MoreTeamsThanPlayers { teams: usize, players: usize },

    #[error("this balancer only builds 2 teams, got {requested}")]
    UnsupportedTeamCount { requested: usize },

    #[error(transparent)]
    Delegate(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Named team
// ---------------------------------------------------------------------------

/// A team as the rest of the application stores it: a name and the ids of
/// its players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTeam {
    pub id: String,
    pub game_id: String,
    pub name: String,
    pub player_ids: Vec<String>,
}

impl BalanceResult {
    /// Map the two rosters onto named teams for `game_id`, A first.
    pub fn to_named_teams(&self, game_id: &str) -> Vec<NamedTeam> {
        [
            (TeamSide::A, &self.team_a_strength),
            (TeamSide::B, &self.team_b_strength),
        ]
        .into_iter()
        .map(|(side, strength)| NamedTeam {
            id: strength.team_id.clone(),
            game_id: game_id.to_string(),
            name: strength.team_name.clone(),
            player_ids: self.team(side).iter().map(|p| p.id.clone()).collect(),
        })
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Balancer seam
// ---------------------------------------------------------------------------

/// Anything that can turn a list of confirmed players into named teams.
pub trait TeamBalancer {
    fn balance_teams(
        &self,
        game_id: &str,
        players: &[PlayerForBalancing],
        number_of_teams: usize,
    ) -> Result<Vec<NamedTeam>, BalanceError>;
}

/// The local two-team engine behind the `TeamBalancer` seam.
#[derive(Debug, Clone, Default)]
pub struct TwoTeamBalancer {
    pub pairs: Vec<PlayerPair>,
    pub options: BalanceOptions,
}

impl TwoTeamBalancer {
    pub fn new(pairs: Vec<PlayerPair>, options: BalanceOptions) -> Self {
        TwoTeamBalancer { pairs, options }
    }

    /// Run the engine and return the full result, diagnostics included.
    pub fn balance(&self, players: &[PlayerForBalancing]) -> BalanceResult {
        balance::balance(players, &self.pairs, &self.options)
    }
}

impl TeamBalancer for TwoTeamBalancer {
    fn balance_teams(
        &self,
        game_id: &str,
        players: &[PlayerForBalancing],
        number_of_teams: usize,
    ) -> Result<Vec<NamedTeam>, BalanceError> {
        if number_of_teams != 2 {
            return Err(BalanceError::UnsupportedTeamCount {
                requested: number_of_teams,
            });
        }
        Ok(self.balance(players).to_named_teams(game_id))
    }
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Check a balancing request before it reaches any balancer.
pub fn validate_request(
    game_id: &str,
    player_count: usize,
    number_of_teams: usize,
) -> Result<(), BalanceError> {
    if game_id.trim().is_empty() {
        return Err(BalanceError::EmptyGameId);
    }
    if player_count == 0 {
        return Err(BalanceError::NoPlayers);
    }
    if number_of_teams < 2 {
        return Err(BalanceError::TooFewTeams {
            requested: number_of_teams,
        });
    }
    if number_of_teams > player_count {
        return Err(BalanceError::MoreTeamsThanPlayers {
            teams: number_of_teams,
            players: player_count,
        });
    }
    Ok(())
}

/// Validate the request, then delegate to `balancer`. Errors from the
/// balancer are passed through unchanged.
pub fn calculate_team_balance(
    balancer: &dyn TeamBalancer,
    game_id: &str,
    players: &[PlayerForBalancing],
    number_of_teams: usize,
) -> Result<Vec<NamedTeam>, BalanceError> {
    if let Err(e) = validate_request(game_id, players.len(), number_of_teams) {
        warn!("rejected balancing request for game '{}': {}", game_id, e);
        return Err(e);
    }
    balancer.balance_teams(game_id, players, number_of_teams)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
