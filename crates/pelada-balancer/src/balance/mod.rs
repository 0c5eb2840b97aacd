// Two-team balancing engine.
//
// Pipeline: classify -> goalkeepers -> pairs -> snake draft -> local search
// -> strengths -> diagnostics. Every call is independent; nothing is kept
// between calls.

pub mod classify;
pub mod diagnostics;
pub mod distribute;
pub mod optimize;
pub mod snake;
pub mod strength;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::roster::player::{PlayerForBalancing, PlayerPair};

use self::diagnostics::SwapSuggestion;
use self::distribute::{TeamSide, TwoTeams};
use self::strength::{BalanceLevel, TeamStrength};

pub const TEAM_A_ID: &str = "A";
pub const TEAM_A_NAME: &str = "Team A";
pub const TEAM_B_ID: &str = "B";
pub const TEAM_B_NAME: &str = "Team B";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Per-call balancing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOptions {
    /// Minimum goalkeepers each team should receive when supply allows.
    /// Default 1.
    pub goalkeepers_per_team: usize,
    /// Spread positions evenly. Default true. With the two-value position
    /// model the goalkeeper quota and the same-position swap rule already do
    /// this, so the flag does not alter placement.
    pub consider_positions: bool,
}

impl Default for BalanceOptions {
    fn default() -> Self {
        BalanceOptions {
            goalkeepers_per_team: 1,
            consider_positions: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of a balancing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub team_a: Vec<PlayerForBalancing>,
    pub team_b: Vec<PlayerForBalancing>,
    pub team_a_strength: TeamStrength,
    pub team_b_strength: TeamStrength,
    pub balance_level: BalanceLevel,
    /// Position name -> (count in A, count in B).
    pub position_distribution: BTreeMap<String, (usize, usize)>,
    pub pairs_respected: bool,
    /// At most three.
    pub rotation_suggestions: Vec<SwapSuggestion>,
}

impl BalanceResult {
    /// Result for an empty roster: two empty teams, trivially balanced.
    pub fn empty() -> Self {
        BalanceResult {
            team_a: Vec::new(),
            team_b: Vec::new(),
            team_a_strength: TeamStrength::empty(TEAM_A_ID, TEAM_A_NAME),
            team_b_strength: TeamStrength::empty(TEAM_B_ID, TEAM_B_NAME),
            balance_level: BalanceLevel::Balanced,
            position_distribution: BTreeMap::new(),
            pairs_respected: true,
            rotation_suggestions: Vec::new(),
        }
    }

    /// Whether the overall ratings differ by less than 5%.
    pub fn is_balanced(&self) -> bool {
        self.balance_level == BalanceLevel::Balanced
    }

    /// Relative overall-rating gap, in percent of the stronger team.
    pub fn difference_percent(&self) -> f64 {
        self.team_a_strength.difference_percent(&self.team_b_strength)
    }

    pub fn team(&self, side: TeamSide) -> &[PlayerForBalancing] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Split `players` into two teams as evenly as the constraints allow.
///
/// Never fails: an empty roster yields [`BalanceResult::empty`], pairs naming
/// unknown players are ignored, and goalkeeper shortages show up in the
/// result (`has_goalkeeper`, `position_distribution`) rather than as errors.
pub fn balance(
    players: &[PlayerForBalancing],
    pairs: &[PlayerPair],
    options: &BalanceOptions,
) -> BalanceResult {
    if players.is_empty() {
        debug!("empty roster, returning neutral result");
        return BalanceResult::empty();
    }

    debug!(
        players = players.len(),
        pairs = pairs.len(),
        goalkeepers_per_team = options.goalkeepers_per_team,
        consider_positions = options.consider_positions,
        "balancing roster"
    );

    let roster = classify::classify_roster(players);
    let mut teams = TwoTeams::new();

    distribute::distribute_goalkeepers(&roster.goalkeepers, &mut teams, options.goalkeepers_per_team);

    let paired = distribute::distribute_pairs(&roster.line_players, pairs, &mut teams);

    let remaining: Vec<PlayerForBalancing> = roster
        .line_players
        .into_iter()
        .filter(|p| !paired.contains(&p.id))
        .collect();
    snake::allocate_snake_draft(&remaining, &mut teams);

    let constrained: HashSet<&str> = pairs
        .iter()
        .flat_map(|p| [p.player1_id.as_str(), p.player2_id.as_str()])
        .collect();
    let swaps = optimize::optimize_balance(&mut teams, &constrained);

    let (team_a, team_b) = teams.into_parts();
    let team_a_strength = strength::calculate_team_strength(TEAM_A_ID, TEAM_A_NAME, &team_a);
    let team_b_strength = strength::calculate_team_strength(TEAM_B_ID, TEAM_B_NAME, &team_b);
    let balance_level = BalanceLevel::between(&team_a_strength, &team_b_strength);

    let rotation_suggestions = diagnostics::rotation_suggestions(&team_a, &team_b, pairs);
    let position_distribution = diagnostics::position_distribution(&team_a, &team_b);
    let pairs_respected = diagnostics::pairs_respected(&team_a, &team_b, pairs);

    info!(
        "balanced {} players into {} vs {} ({:.2} vs {:.2}, {}, {} swaps, pairs respected: {})",
        players.len(),
        team_a.len(),
        team_b.len(),
        team_a_strength.overall_rating,
        team_b_strength.overall_rating,
        balance_level.label(),
        swaps,
        pairs_respected
    );

    BalanceResult {
        team_a,
        team_b,
        team_a_strength,
        team_b_strength,
        balance_level,
        position_distribution,
        pairs_respected,
        rotation_suggestions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
