// Greedy local search over cross-team swaps.
//
// Each iteration looks for one swap between the stronger and the weaker team
// that moves the mean gap toward zero, applies the best one, and repeats.
// This is a heuristic: it stops at the first local optimum.

use std::collections::HashSet;

use tracing::debug;

use crate::roster::player::PlayerForBalancing;

use super::distribute::{TeamSide, TwoTeams};
use super::strength::average_rating;

/// Hard cap on swap iterations.
pub const MAX_ITERATIONS: usize = 100;

/// Mean gap (rating points) considered close enough to stop.
pub const GOOD_ENOUGH_GAP: f64 = 0.1;

/// A candidate swap: `from_higher` leaves the stronger team, `from_lower`
/// leaves the weaker one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapCandidate<'a> {
    pub from_higher: &'a PlayerForBalancing,
    pub from_lower: &'a PlayerForBalancing,
    pub score: f64,
}

/// Find the best swap between `higher` and `lower`.
///
/// Only players outside every pair and sharing a position are eligible. The
/// rating delta must be strictly between 0 and `target_diff`; among those the
/// score `target_diff - |target_diff - 2 * delta|` is maximized, first found
/// winning ties.
pub fn find_swappable_pair<'a>(
    higher: &'a [PlayerForBalancing],
    lower: &'a [PlayerForBalancing],
    constrained_ids: &HashSet<&str>,
    target_diff: f64,
) -> Option<SwapCandidate<'a>> {
    let mut best: Option<SwapCandidate<'a>> = None;
    let mut best_score = 0.0;

    let eligible = |p: &&PlayerForBalancing| !constrained_ids.contains(p.id.as_str());

    for h in higher.iter().filter(eligible) {
        for l in lower.iter().filter(eligible) {
            if h.position != l.position {
                continue;
            }
            let delta = h.overall_rating - l.overall_rating;
            if delta > 0.0 && delta < target_diff {
                let score = target_diff - (target_diff - 2.0 * delta).abs();
                if score > best_score {
                    best_score = score;
                    best = Some(SwapCandidate {
                        from_higher: h,
                        from_lower: l,
                        score,
                    });
                }
            }
        }
    }

    best
}

/// Run the swap search on `teams`, never moving a player named in `pairs`
/// (`constrained_ids`). Returns the number of swaps applied.
pub fn optimize_balance(teams: &mut TwoTeams, constrained_ids: &HashSet<&str>) -> usize {
    let mut swaps = 0;

    for iteration in 0..MAX_ITERATIONS {
        let rating_a = average_rating(&teams.team_a);
        let rating_b = average_rating(&teams.team_b);
        let diff = (rating_a - rating_b).abs();

        if diff < GOOD_ENOUGH_GAP {
            debug!("optimizer converged after {} iterations (gap {:.3})", iteration, diff);
            break;
        }

        let higher_side = if rating_a > rating_b { TeamSide::A } else { TeamSide::B };
        let candidate = find_swappable_pair(
            teams.side(higher_side),
            teams.side(higher_side.other()),
            constrained_ids,
            diff,
        )
        .map(|c| (c.from_higher.id.clone(), c.from_lower.id.clone(), c.score));

        let Some((from_higher, from_lower, score)) = candidate else {
            debug!("optimizer found no improving swap at iteration {} (gap {:.3})", iteration, diff);
            break;
        };

        debug!(
            "swap '{}' ({:?}) <-> '{}' (score {:.3}, gap {:.3})",
            from_higher, higher_side, from_lower, score, diff
        );
        teams.swap(higher_side, &from_higher, &from_lower);
        swaps += 1;
    }

    swaps
}
