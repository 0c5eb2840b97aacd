// Roster entrants, positions, and pair constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing position used by the balancer.
///
/// A player either defends the goal or plays on the line. There are no
/// mixed or multi-position players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Goalkeeper,
    Line,
}

impl Position {
    /// Every position value, in display order.
    pub const ALL: [Position; 2] = [Position::Goalkeeper, Position::Line];

    /// Parse a position string into a Position enum.
    ///
    /// Accepts the canonical names plus common short forms:
    /// - "GOALKEEPER", "GK", "GOLEIRO" -> Goalkeeper
    /// - "LINE", "FIELD", "LINHA" -> Line
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GOALKEEPER" | "GK" | "GOLEIRO" => Some(Position::Goalkeeper),
            "LINE" | "FIELD" | "LINHA" => Some(Position::Line),
            _ => None,
        }
    }

    /// Canonical name, used as the key of position distributions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GOALKEEPER",
            Position::Line => "LINE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One roster entrant with the skill profile the balancer works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerForBalancing {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub attack_skill: f64,
    pub midfield_skill: f64,
    pub defense_skill: f64,
    pub goalkeeper_skill: f64,
    /// Primary balancing signal.
    pub overall_rating: f64,
}

impl PlayerForBalancing {
    /// Build a player whose overall rating is the mean of the three line
    /// skills. Goalkeeper skill does not contribute.
    pub fn from_skills(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        attack_skill: f64,
        midfield_skill: f64,
        defense_skill: f64,
        goalkeeper_skill: f64,
    ) -> Self {
        let overall_rating = (attack_skill + midfield_skill + defense_skill) / 3.0;
        PlayerForBalancing {
            id: id.into(),
            name: name.into(),
            position,
            attack_skill,
            midfield_skill,
            defense_skill,
            goalkeeper_skill,
            overall_rating,
        }
    }

    /// Build a player from an explicit overall rating. All four skills are
    /// set to the same value, except goalkeeper skill for line players.
    pub fn with_overall_rating(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        overall_rating: f64,
    ) -> Self {
        let goalkeeper_skill = match position {
            Position::Goalkeeper => overall_rating,
            Position::Line => 0.0,
        };
        PlayerForBalancing {
            id: id.into(),
            name: name.into(),
            position,
            attack_skill: overall_rating,
            midfield_skill: overall_rating,
            defense_skill: overall_rating,
            goalkeeper_skill,
            overall_rating,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position == Position::Goalkeeper
    }
}

/// A player card as shown on the draft screen. Ratings are per role and the
/// overall is precomputed by whoever built the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftCard {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub striker_rating: f64,
    pub mid_rating: f64,
    pub defender_rating: f64,
    pub gk_rating: f64,
    pub overall_rating: f64,
}

impl From<&DraftCard> for PlayerForBalancing {
    fn from(card: &DraftCard) -> Self {
        PlayerForBalancing {
            id: card.id.clone(),
            name: card.name.clone(),
            position: card.position,
            attack_skill: card.striker_rating,
            midfield_skill: card.mid_rating,
            defense_skill: card.defender_rating,
            goalkeeper_skill: card.gk_rating,
            overall_rating: card.overall_rating,
        }
    }
}

/// Two players that must end up on the same team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair {
    pub player1_id: String,
    pub player2_id: String,
}

impl PlayerPair {
    pub fn new(player1_id: impl Into<String>, player2_id: impl Into<String>) -> Self {
        PlayerPair {
            player1_id: player1_id.into(),
            player2_id: player2_id.into(),
        }
    }

    /// Whether `id` is one of the two members.
    pub fn contains(&self, id: &str) -> bool {
        self.player1_id == id || self.player2_id == id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn parse_positions() {
        assert_eq!(Position::from_str_pos("GOALKEEPER"), Some(Position::Goalkeeper));
        assert_eq!(Position::from_str_pos("gk"), Some(Position::Goalkeeper));
        assert_eq!(Position::from_str_pos("Goleiro"), Some(Position::Goalkeeper));
        assert_eq!(Position::from_str_pos("LINE"), Some(Position::Line));
        assert_eq!(Position::from_str_pos(" field "), Some(Position::Line));
        assert_eq!(Position::from_str_pos("linha"), Some(Position::Line));
        assert_eq!(Position::from_str_pos("striker"), None);
        assert_eq!(Position::from_str_pos(""), None);
    }

    #[test]
    fn display_uses_canonical_names() {
        assert_eq!(Position::Goalkeeper.to_string(), "GOALKEEPER");
        assert_eq!(Position::Line.to_string(), "LINE");
    }

    #[test]
    fn position_serializes_as_canonical_name() {
        let json = serde_json::to_string(&Position::Goalkeeper).unwrap();
        assert_eq!(json, "\"GOALKEEPER\"");
        let back: Position = serde_json::from_str("\"LINE\"").unwrap();
        assert_eq!(back, Position::Line);
    }

    #[test]
    fn overall_is_mean_of_line_skills() {
        let p = PlayerForBalancing::from_skills("1", "Player", Position::Line, 90.0, 60.0, 60.0, 0.0);
        assert!(approx_eq(p.overall_rating, 70.0, 1e-9));
    }

    #[test]
    fn goalkeeper_overall_ignores_goalkeeper_skill() {
        let gk = PlayerForBalancing::from_skills("gk", "Keeper", Position::Goalkeeper, 0.0, 0.0, 0.0, 90.0);
        assert!(approx_eq(gk.overall_rating, 0.0, 1e-9));
        assert!(gk.is_goalkeeper());
    }

    #[test]
    fn explicit_overall_rating() {
        let line = PlayerForBalancing::with_overall_rating("1", "A", Position::Line, 4.0);
        assert!(approx_eq(line.overall_rating, 4.0, 1e-9));
        assert!(approx_eq(line.goalkeeper_skill, 0.0, 1e-9));

        let gk = PlayerForBalancing::with_overall_rating("2", "B", Position::Goalkeeper, 3.5);
        assert!(approx_eq(gk.goalkeeper_skill, 3.5, 1e-9));
    }

    #[test]
    fn draft_card_conversion_maps_fields() {
        let card = DraftCard {
            id: "u1".into(),
            name: "Card".into(),
            position: Position::Line,
            striker_rating: 4.5,
            mid_rating: 3.0,
            defender_rating: 2.0,
            gk_rating: 1.0,
            overall_rating: 3.4,
        };
        let p = PlayerForBalancing::from(&card);
        assert_eq!(p.id, "u1");
        assert!(approx_eq(p.attack_skill, 4.5, 1e-9));
        assert!(approx_eq(p.midfield_skill, 3.0, 1e-9));
        assert!(approx_eq(p.defense_skill, 2.0, 1e-9));
        assert!(approx_eq(p.goalkeeper_skill, 1.0, 1e-9));
        // The card's overall is carried over, not recomputed.
        assert!(approx_eq(p.overall_rating, 3.4, 1e-9));
    }

    #[test]
    fn pair_contains() {
        let pair = PlayerPair::new("a", "b");
        assert!(pair.contains("a"));
        assert!(pair.contains("b"));
        assert!(!pair.contains("c"));
    }
}
