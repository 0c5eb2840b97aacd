// Balancing report: JSON envelope and a plain-text summary for the terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::balance::strength::{GoalkeeperStatus, TeamStrength};
use crate::balance::BalanceResult;
use crate::roster::player::PlayerForBalancing;
use crate::teams::NamedTeam;

/// Everything the binary prints for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub game_id: String,
    pub generated_at: DateTime<Utc>,
    pub difference_percent: f64,
    pub is_balanced: bool,
    pub teams: Vec<NamedTeam>,
    pub result: BalanceResult,
}

impl BalanceReport {
    pub fn new(game_id: &str, result: BalanceResult) -> Self {
        Self::generated_at(game_id, result, Utc::now())
    }

    /// Build a report with a fixed timestamp.
    pub fn generated_at(game_id: &str, result: BalanceResult, at: DateTime<Utc>) -> Self {
        BalanceReport {
            game_id: game_id.to_string(),
            generated_at: at,
            difference_percent: result.difference_percent(),
            is_balanced: result.is_balanced(),
            teams: result.to_named_teams(game_id),
            result,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Render a human-readable summary of a balancing result.
pub fn render_summary(result: &BalanceResult) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(&format!(
        "{} ({:.1}% gap)\n\n",
        result.balance_level.label(),
        result.difference_percent()
    ));

    out.push_str(&format_team(&result.team_a_strength, &result.team_a));
    out.push('\n');
    out.push_str(&format_team(&result.team_b_strength, &result.team_b));
    out.push('\n');

    out.push_str("Positions (A / B):\n");
    for (position, (count_a, count_b)) in &result.position_distribution {
        out.push_str(&format!("  {:<10} {} / {}\n", position, count_a, count_b));
    }

    if !result.pairs_respected {
        out.push_str("\nWarning: some pairs could not be kept together\n");
    }

    if !result.rotation_suggestions.is_empty() {
        out.push_str("\nRotation ideas:\n");
        for s in &result.rotation_suggestions {
            out.push_str(&format!(
                "  {} <-> {}: {}\n",
                s.player1_name, s.player2_name, s.reason
            ));
        }
    }

    out
}

fn format_team(strength: &TeamStrength, players: &[PlayerForBalancing]) -> String {
    let mut out = format!(
        "{} - {} players, overall {:.2} (atk {:.2} / mid {:.2} / def {:.2} / gk {:.2}){}\n",
        strength.team_name,
        strength.player_count,
        strength.overall_rating,
        strength.attack_rating,
        strength.midfield_rating,
        strength.defense_rating,
        strength.goalkeeper_rating,
        match strength.goalkeeper_status() {
            GoalkeeperStatus::Covered => String::new(),
            missing => format!(" [{}]", missing.label()),
        },
    );
    for p in players {
        out.push_str(&format!("  {:<20} {:<10} {:.2}\n", p.name, p.position.as_str(), p.overall_rating));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{self, BalanceOptions};
    use crate::roster::player::{PlayerPair, Position};
    use chrono::TimeZone;

    fn line(id: &str, name: &str, rating: f64) -> PlayerForBalancing {
        PlayerForBalancing::with_overall_rating(id, name, Position::Line, rating)
    }

    fn sample() -> BalanceResult {
        let players = vec![
            PlayerForBalancing::with_overall_rating("g1", "Marcos", Position::Goalkeeper, 4.0),
            PlayerForBalancing::with_overall_rating("g2", "Rogerio", Position::Goalkeeper, 3.5),
            line("p1", "Bruno", 4.0),
            line("p2", "Caio", 3.0),
            line("p3", "Diego", 3.0),
            line("p4", "Eduardo", 2.0),
        ];
        balance::balance(&players, &[], &BalanceOptions::default())
    }

    #[test]
    fn summary_lists_both_teams_and_positions() {
        let result = sample();
        let text = render_summary(&result);

        assert!(text.starts_with(result.balance_level.label()));
        assert!(text.contains("Team A - 3 players"));
        assert!(text.contains("Team B - 3 players"));
        assert!(text.contains("GOALKEEPER"));
        assert!(text.contains("LINE"));
        for name in ["Marcos", "Rogerio", "Bruno", "Caio", "Diego", "Eduardo"] {
            assert!(text.contains(name), "summary is missing {name}");
        }
        assert!(!text.contains("[no goalkeeper]"));
    }

    #[test]
    fn summary_flags_broken_pairs_and_missing_keepers() {
        let mut result = balance::balance(
            &[line("p1", "Ana", 3.0), line("p2", "Bia", 3.0)],
            &[PlayerPair::new("p1", "p2")],
            &BalanceOptions::default(),
        );
        result.pairs_respected = false;
        let text = render_summary(&result);
        assert!(text.contains("[no goalkeeper]"));
        assert!(text.contains("some pairs could not be kept together"));
    }

    #[test]
    fn summary_shows_rotation_ideas() {
        let result = balance::balance(
            &[line("p1", "Ana", 3.0), line("p2", "Bia", 3.0)],
            &[],
            &BalanceOptions::default(),
        );
        assert_eq!(result.rotation_suggestions.len(), 1);
        let text = render_summary(&result);
        assert!(text.contains("Rotation ideas:"));
        assert!(text.contains("Ana <-> Bia: similar skill: swap for variety"));
    }

    #[test]
    fn report_envelope_serializes() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap();
        let result = sample();
        let report = BalanceReport::generated_at("pelada-sunday", result.clone(), at);

        assert_eq!(report.teams.len(), 2);
        assert_eq!(report.is_balanced, result.is_balanced());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["game_id"], "pelada-sunday");
        assert_eq!(json["generated_at"], "2026-03-01T18:30:00Z");
        assert_eq!(json["teams"][0]["name"], "Team A");
        assert_eq!(json["teams"][1]["game_id"], "pelada-sunday");
        assert!(json["result"]["team_a"].is_array());
    }
}
