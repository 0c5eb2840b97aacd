// Team strength aggregation and the balance verdict derived from it.

use serde::{Deserialize, Serialize};

use crate::roster::player::{PlayerForBalancing, Position};

/// Relative gap (percent of the stronger team) below which a split counts
/// as balanced.
pub const BALANCE_THRESHOLD_PERCENT: f64 = 5.0;

/// Upper bound (inclusive) of the "slightly unbalanced" band.
pub const SLIGHT_IMBALANCE_PERCENT: f64 = 15.0;

// ---------------------------------------------------------------------------
// Team strength
// ---------------------------------------------------------------------------

/// Aggregate skill metrics for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub team_id: String,
    pub team_name: String,
    /// Mean overall rating over every member.
    pub overall_rating: f64,
    /// Means over line players only.
    pub attack_rating: f64,
    pub defense_rating: f64,
    pub midfield_rating: f64,
    /// Mean goalkeeper skill over goalkeepers only.
    pub goalkeeper_rating: f64,
    pub player_count: usize,
    pub has_goalkeeper: bool,
}

impl TeamStrength {
    /// Zero-valued strength for a team with no players.
    pub fn empty(team_id: &str, team_name: &str) -> Self {
        TeamStrength {
            team_id: team_id.to_string(),
            team_name: team_name.to_string(),
            overall_rating: 0.0,
            attack_rating: 0.0,
            defense_rating: 0.0,
            midfield_rating: 0.0,
            goalkeeper_rating: 0.0,
            player_count: 0,
            has_goalkeeper: false,
        }
    }

    /// Overall rating gap as a percentage of the larger of the two ratings.
    ///
    /// Returns 0.0 when the larger rating is not positive, so two empty teams
    /// compare as perfectly even.
    pub fn difference_percent(&self, other: &TeamStrength) -> f64 {
        let larger = self.overall_rating.max(other.overall_rating);
        if larger <= 0.0 {
            return 0.0;
        }
        (self.overall_rating - other.overall_rating).abs() / larger * 100.0
    }

    pub fn goalkeeper_status(&self) -> GoalkeeperStatus {
        if self.has_goalkeeper {
            GoalkeeperStatus::Covered
        } else {
            GoalkeeperStatus::Missing
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean overall rating of a list of players, 0.0 when empty.
pub fn average_rating(players: &[PlayerForBalancing]) -> f64 {
    mean(players.iter().map(|p| p.overall_rating))
}

/// Compute the strength record for one team.
pub fn calculate_team_strength(
    team_id: &str,
    team_name: &str,
    players: &[PlayerForBalancing],
) -> TeamStrength {
    if players.is_empty() {
        return TeamStrength::empty(team_id, team_name);
    }

    let line = || players.iter().filter(|p| p.position == Position::Line);
    let goalkeepers = || players.iter().filter(|p| p.position == Position::Goalkeeper);

    TeamStrength {
        team_id: team_id.to_string(),
        team_name: team_name.to_string(),
        overall_rating: average_rating(players),
        attack_rating: mean(line().map(|p| p.attack_skill)),
        defense_rating: mean(line().map(|p| p.defense_skill)),
        midfield_rating: mean(line().map(|p| p.midfield_skill)),
        goalkeeper_rating: mean(goalkeepers().map(|p| p.goalkeeper_skill)),
        player_count: players.len(),
        has_goalkeeper: goalkeepers().next().is_some(),
    }
}

/// Whether a team ended up with someone in goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalkeeperStatus {
    Covered,
    Missing,
}

impl GoalkeeperStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GoalkeeperStatus::Covered => "goalkeeper",
            GoalkeeperStatus::Missing => "no goalkeeper",
        }
    }
}

// ---------------------------------------------------------------------------
// Balance verdict
// ---------------------------------------------------------------------------

/// How evenly matched two teams are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLevel {
    /// Gap under 5%.
    Balanced,
    /// Gap between 5% and 15% inclusive.
    SlightlyUnbalanced,
    /// Gap over 15%.
    Unbalanced,
}

impl BalanceLevel {
    /// Classify a relative gap expressed in percent.
    pub fn from_difference_percent(percent: f64) -> Self {
        if percent < BALANCE_THRESHOLD_PERCENT {
            BalanceLevel::Balanced
        } else if percent <= SLIGHT_IMBALANCE_PERCENT {
            BalanceLevel::SlightlyUnbalanced
        } else {
            BalanceLevel::Unbalanced
        }
    }

    /// Classify the gap between two team strengths.
    pub fn between(a: &TeamStrength, b: &TeamStrength) -> Self {
        Self::from_difference_percent(a.difference_percent(b))
    }

    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            BalanceLevel::Balanced => "BALANCED",
            BalanceLevel::SlightlyUnbalanced => "SLIGHTLY UNBALANCED",
            BalanceLevel::Unbalanced => "UNBALANCED",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
