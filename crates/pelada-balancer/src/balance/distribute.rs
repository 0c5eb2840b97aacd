// Constraint placement: goalkeeper quota first, then "stay together" pairs.
//
// Both stages write into a `TwoTeams` accumulator that the later stages
// (snake draft, local search) keep filling and rearranging.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::roster::player::{PlayerForBalancing, PlayerPair, Position};

use super::strength::average_rating;

// ---------------------------------------------------------------------------
// Team accumulator
// ---------------------------------------------------------------------------

/// One of the two teams being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

/// The two rosters under construction. Insertion order is preserved.
#[derive(Debug, Clone, Default)]
pub struct TwoTeams {
    pub team_a: Vec<PlayerForBalancing>,
    pub team_b: Vec<PlayerForBalancing>,
}

impl TwoTeams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: TeamSide) -> &[PlayerForBalancing] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    fn side_mut(&mut self, side: TeamSide) -> &mut Vec<PlayerForBalancing> {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }

    pub fn push(&mut self, side: TeamSide, player: PlayerForBalancing) {
        self.side_mut(side).push(player);
    }

    pub fn len(&self, side: TeamSide) -> usize {
        self.side(side).len()
    }

    pub fn is_empty(&self) -> bool {
        self.team_a.is_empty() && self.team_b.is_empty()
    }

    /// Number of players at `position` on one side.
    pub fn count_position(&self, side: TeamSide, position: Position) -> usize {
        self.side(side).iter().filter(|p| p.position == position).count()
    }

    /// Which side currently holds the player with `id`, if any.
    pub fn side_of(&self, id: &str) -> Option<TeamSide> {
        if self.team_a.iter().any(|p| p.id == id) {
            Some(TeamSide::A)
        } else if self.team_b.iter().any(|p| p.id == id) {
            Some(TeamSide::B)
        } else {
            None
        }
    }

    /// Swap two players across teams: `from_id` leaves `from` for the other
    /// side and `to_id` comes the opposite way. Both are appended at the end
    /// of their new list. Returns false, changing nothing, if either id is not
    /// on the expected side.
    pub fn swap(&mut self, from: TeamSide, from_id: &str, to_id: &str) -> bool {
        let to = from.other();
        let Some(from_idx) = self.side(from).iter().position(|p| p.id == from_id) else {
            return false;
        };
        let Some(to_idx) = self.side(to).iter().position(|p| p.id == to_id) else {
            return false;
        };

        let leaving = self.side_mut(from).remove(from_idx);
        let arriving = self.side_mut(to).remove(to_idx);
        self.side_mut(from).push(arriving);
        self.side_mut(to).push(leaving);
        true
    }

    pub fn into_parts(self) -> (Vec<PlayerForBalancing>, Vec<PlayerForBalancing>) {
        (self.team_a, self.team_b)
    }
}

// ---------------------------------------------------------------------------
// Goalkeepers
// ---------------------------------------------------------------------------

/// Place goalkeepers (already sorted best first) so each team reaches
/// `per_team` goalkeepers whenever supply allows.
///
/// While both teams are short, even indices go to A and odd indices to B.
/// When only one team is short it takes the goalkeeper. Past both quotas,
/// extras go to the team with fewer players, A on ties.
pub fn distribute_goalkeepers(
    goalkeepers: &[PlayerForBalancing],
    teams: &mut TwoTeams,
    per_team: usize,
) {
    for (index, gk) in goalkeepers.iter().enumerate() {
        let a_needs = teams.count_position(TeamSide::A, Position::Goalkeeper) < per_team;
        let b_needs = teams.count_position(TeamSide::B, Position::Goalkeeper) < per_team;

        let side = match (a_needs, b_needs) {
            (true, true) => {
                if index % 2 == 0 {
                    TeamSide::A
                } else {
                    TeamSide::B
                }
            }
            (true, false) => TeamSide::A,
            (false, true) => TeamSide::B,
            (false, false) => {
                if teams.len(TeamSide::A) <= teams.len(TeamSide::B) {
                    TeamSide::A
                } else {
                    TeamSide::B
                }
            }
        };

        debug!("goalkeeper '{}' -> team {:?}", gk.id, side);
        teams.push(side, gk.clone());
    }
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// Pair constraints merged into connected groups: players linked through
/// any chain of pairs belong to one group.
struct PairGroups<'a> {
    index: HashMap<&'a str, usize>,
    ids: Vec<&'a str>,
    parent: Vec<usize>,
}

impl<'a> PairGroups<'a> {
    fn new() -> Self {
        PairGroups {
            index: HashMap::new(),
            ids: Vec::new(),
            parent: Vec::new(),
        }
    }

    fn slot(&mut self, id: &'a str) -> usize {
        if let Some(&i) = self.index.get(id) {
            return i;
        }
        let i = self.ids.len();
        self.index.insert(id, i);
        self.ids.push(id);
        self.parent.push(i);
        i
    }

    fn root(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn link(&mut self, a: &'a str, b: &'a str) {
        let ra = self.slot(a);
        let ra = self.root(ra);
        let rb = self.slot(b);
        let rb = self.root(rb);
        // The lower slot stays root, so a group is keyed by its first id.
        match ra.cmp(&rb) {
            std::cmp::Ordering::Less => self.parent[rb] = ra,
            std::cmp::Ordering::Greater => self.parent[ra] = rb,
            std::cmp::Ordering::Equal => {}
        }
    }

    /// Groups ordered by their first pair, members by first appearance.
    fn into_groups(mut self) -> Vec<Vec<&'a str>> {
        let mut order: Vec<usize> = Vec::new();
        let mut members: HashMap<usize, Vec<&'a str>> = HashMap::new();
        for i in 0..self.ids.len() {
            let root = self.root(i);
            members
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    Vec::new()
                })
                .push(self.ids[i]);
        }
        order.into_iter().filter_map(|root| members.remove(&root)).collect()
    }
}

/// Place pair-constrained line players, returning the ids placed here.
///
/// `line_players` is the full, sorted line-player list. Overlapping pairs are
/// merged first, so `(p1, p2)` and `(p2, p3)` make one group of three. Groups
/// are then placed whole, in the order of their first pair:
/// - no member placed yet: the group joins team A if A is both not stronger
///   and not larger than B, otherwise team B;
/// - a member already placed (a goalkeeper): the rest of the group joins that
///   team. A group tied to goalkeepers on both teams follows the first one
///   and is reported through `pairs_respected`.
///
/// Self-pairs and pairs naming an id absent from the roster are skipped.
pub fn distribute_pairs(
    line_players: &[PlayerForBalancing],
    pairs: &[PlayerPair],
    teams: &mut TwoTeams,
) -> HashSet<String> {
    let by_id: HashMap<&str, &PlayerForBalancing> =
        line_players.iter().map(|p| (p.id.as_str(), p)).collect();
    let present = |id: &str| by_id.contains_key(id) || teams.side_of(id).is_some();

    let mut groups = PairGroups::new();
    for pair in pairs {
        let (id1, id2) = (pair.player1_id.as_str(), pair.player2_id.as_str());
        if id1 == id2 {
            continue;
        }
        if !present(id1) || !present(id2) {
            debug!("skipping pair ({}, {}): member not in roster", id1, id2);
            continue;
        }
        groups.link(id1, id2);
    }

    let mut paired: HashSet<String> = HashSet::new();

    for group in groups.into_groups() {
        let anchors: Vec<(&str, TeamSide)> = group
            .iter()
            .filter_map(|&id| teams.side_of(id).map(|side| (id, side)))
            .collect();

        let side = match anchors.first() {
            Some(&(anchor, side)) => {
                if anchors.iter().any(|&(_, s)| s != side) {
                    warn!(
                        "pair group {:?} links players already on both teams; following '{}' to team {:?}",
                        group, anchor, side
                    );
                }
                side
            }
            None => {
                let rating_a = average_rating(&teams.team_a);
                let rating_b = average_rating(&teams.team_b);
                if rating_a <= rating_b && teams.len(TeamSide::A) <= teams.len(TeamSide::B) {
                    TeamSide::A
                } else {
                    TeamSide::B
                }
            }
        };

        debug!("pair group {:?} -> team {:?}", group, side);
        for player in group.iter().filter_map(|id| by_id.get(id).copied()) {
            teams.push(side, player.clone());
            paired.insert(player.id.clone());
        }
    }

    paired
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, rating: f64) -> PlayerForBalancing {
        PlayerForBalancing::with_overall_rating(id, id, Position::Line, rating)
    }

    fn keeper(id: &str, skill: f64) -> PlayerForBalancing {
        PlayerForBalancing::with_overall_rating(id, id, Position::Goalkeeper, skill)
    }

    fn ids(players: &[PlayerForBalancing]) -> Vec<&str> {
        players.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn swap_moves_both_players_to_the_end() {
        let mut teams = TwoTeams::new();
        teams.push(TeamSide::A, line("a1", 1.0));
        teams.push(TeamSide::A, line("a2", 2.0));
        teams.push(TeamSide::B, line("b1", 3.0));
        teams.push(TeamSide::B, line("b2", 4.0));

        assert!(teams.swap(TeamSide::A, "a1", "b2"));
        assert_eq!(ids(&teams.team_a), vec!["a2", "b2"]);
        assert_eq!(ids(&teams.team_b), vec!["b1", "a1"]);
    }

    #[test]
    fn swap_with_wrong_side_changes_nothing() {
        let mut teams = TwoTeams::new();
        teams.push(TeamSide::A, line("a1", 1.0));
        teams.push(TeamSide::B, line("b1", 3.0));

        assert!(!teams.swap(TeamSide::B, "a1", "b1"));
        assert_eq!(ids(&teams.team_a), vec!["a1"]);
        assert_eq!(ids(&teams.team_b), vec!["b1"]);
    }

    #[test]
    fn two_goalkeepers_one_each() {
        let mut teams = TwoTeams::new();
        distribute_goalkeepers(&[keeper("g1", 5.0), keeper("g2", 4.0)], &mut teams, 1);
        assert_eq!(ids(&teams.team_a), vec!["g1"]);
        assert_eq!(ids(&teams.team_b), vec!["g2"]);
    }

    #[test]
    fn quota_of_two_alternates() {
        let mut teams = TwoTeams::new();
        let gks = [keeper("g1", 5.0), keeper("g2", 4.0), keeper("g3", 3.0), keeper("g4", 2.0)];
        distribute_goalkeepers(&gks, &mut teams, 2);
        assert_eq!(ids(&teams.team_a), vec!["g1", "g3"]);
        assert_eq!(ids(&teams.team_b), vec!["g2", "g4"]);
    }

    #[test]
    fn extra_goalkeeper_goes_to_smaller_team() {
        let mut teams = TwoTeams::new();
        let gks = [keeper("g1", 5.0), keeper("g2", 4.0), keeper("g3", 3.0)];
        distribute_goalkeepers(&gks, &mut teams, 1);
        // Quotas met after g1/g2; sizes tie so g3 lands on A.
        assert_eq!(ids(&teams.team_a), vec!["g1", "g3"]);
        assert_eq!(ids(&teams.team_b), vec!["g2"]);
    }

    #[test]
    fn single_goalkeeper_shortage() {
        let mut teams = TwoTeams::new();
        distribute_goalkeepers(&[keeper("g1", 5.0)], &mut teams, 1);
        assert_eq!(teams.count_position(TeamSide::A, Position::Goalkeeper), 1);
        assert_eq!(teams.count_position(TeamSide::B, Position::Goalkeeper), 0);
    }

    #[test]
    fn zero_quota_spreads_by_size() {
        let mut teams = TwoTeams::new();
        let gks = [keeper("g1", 5.0), keeper("g2", 4.0), keeper("g3", 3.0)];
        distribute_goalkeepers(&gks, &mut teams, 0);
        assert_eq!(ids(&teams.team_a), vec!["g1", "g3"]);
        assert_eq!(ids(&teams.team_b), vec!["g2"]);
    }

    #[test]
    fn first_pair_goes_to_empty_team_a() {
        let line_players = vec![line("p1", 4.0), line("p2", 3.0), line("p3", 2.0), line("p4", 1.0)];
        let mut teams = TwoTeams::new();
        let paired = distribute_pairs(&line_players, &[PlayerPair::new("p1", "p4")], &mut teams);

        assert_eq!(ids(&teams.team_a), vec!["p1", "p4"]);
        assert!(teams.team_b.is_empty());
        assert!(paired.contains("p1") && paired.contains("p4"));
        assert_eq!(paired.len(), 2);
    }

    #[test]
    fn second_pair_goes_to_weaker_team() {
        let line_players = vec![line("p1", 5.0), line("p2", 4.0), line("p3", 3.0), line("p4", 2.0)];
        let mut teams = TwoTeams::new();
        teams.push(TeamSide::A, keeper("g1", 1.0));
        teams.push(TeamSide::B, keeper("g2", 3.0));

        // A is weaker (1.0 < 3.0) and not larger -> A.
        distribute_pairs(&line_players, &[PlayerPair::new("p1", "p2")], &mut teams);
        assert_eq!(ids(&teams.team_a), vec!["g1", "p1", "p2"]);

        // A is now larger -> B, regardless of rating.
        distribute_pairs(&line_players, &[PlayerPair::new("p3", "p4")], &mut teams);
        assert_eq!(ids(&teams.team_b), vec!["g2", "p3", "p4"]);
    }

    #[test]
    fn pair_with_absent_member_is_skipped() {
        let line_players = vec![line("p1", 4.0), line("p2", 3.0)];
        let mut teams = TwoTeams::new();
        let paired = distribute_pairs(&line_players, &[PlayerPair::new("p1", "ghost")], &mut teams);
        assert!(teams.is_empty());
        assert!(paired.is_empty());
    }

    #[test]
    fn overlapping_pairs_chain_into_one_team() {
        let line_players = vec![line("p1", 4.0), line("p2", 3.0), line("p3", 2.0)];
        let mut teams = TwoTeams::new();
        let pairs = [PlayerPair::new("p1", "p2"), PlayerPair::new("p2", "p3")];
        let paired = distribute_pairs(&line_players, &pairs, &mut teams);

        assert_eq!(ids(&teams.team_a), vec!["p1", "p2", "p3"]);
        assert_eq!(paired.len(), 3);
    }

    #[test]
    fn bridging_pair_merges_two_pairs() {
        let line_players: Vec<PlayerForBalancing> =
            (1..=6).map(|i| line(&format!("p{i}"), 10.0 - i as f64)).collect();
        let pairs = [
            PlayerPair::new("p1", "p2"),
            PlayerPair::new("p3", "p4"),
            PlayerPair::new("p2", "p3"),
        ];
        let mut teams = TwoTeams::new();
        let paired = distribute_pairs(&line_players, &pairs, &mut teams);

        assert_eq!(ids(&teams.team_a), vec!["p1", "p2", "p3", "p4"]);
        assert!(teams.team_b.is_empty());
        assert_eq!(paired.len(), 4);
    }

    #[test]
    fn chain_through_goalkeeper_follows_the_goalkeeper() {
        let line_players = vec![line("p1", 4.0), line("p2", 3.0)];
        let mut teams = TwoTeams::new();
        teams.push(TeamSide::A, keeper("g1", 4.0));
        teams.push(TeamSide::B, keeper("g2", 3.0));

        let pairs = [PlayerPair::new("p1", "p2"), PlayerPair::new("p2", "g2")];
        distribute_pairs(&line_players, &pairs, &mut teams);
        assert_eq!(ids(&teams.team_a), vec!["g1"]);
        assert_eq!(ids(&teams.team_b), vec!["g2", "p1", "p2"]);
    }

    #[test]
    fn group_tied_to_both_goalkeepers_follows_the_first() {
        let line_players = vec![line("p1", 4.0)];
        let mut teams = TwoTeams::new();
        teams.push(TeamSide::A, keeper("g1", 4.0));
        teams.push(TeamSide::B, keeper("g2", 3.0));

        let pairs = [PlayerPair::new("g1", "p1"), PlayerPair::new("p1", "g2")];
        let paired = distribute_pairs(&line_players, &pairs, &mut teams);
        assert_eq!(ids(&teams.team_a), vec!["g1", "p1"]);
        assert_eq!(ids(&teams.team_b), vec!["g2"]);
        assert_eq!(paired.len(), 1);
    }

    #[test]
    fn line_partner_follows_goalkeeper() {
        let line_players = vec![line("p1", 4.0), line("p2", 3.0)];
        let mut teams = TwoTeams::new();
        teams.push(TeamSide::A, keeper("g1", 4.0));
        teams.push(TeamSide::B, keeper("g2", 3.0));

        let paired = distribute_pairs(&line_players, &[PlayerPair::new("g2", "p1")], &mut teams);
        assert_eq!(ids(&teams.team_b), vec!["g2", "p1"]);
        assert!(paired.contains("p1"));
        assert!(!paired.contains("g2"));
    }

    #[test]
    fn self_pair_is_ignored() {
        let line_players = vec![line("p1", 4.0)];
        let mut teams = TwoTeams::new();
        let paired = distribute_pairs(&line_players, &[PlayerPair::new("p1", "p1")], &mut teams);
        assert!(teams.is_empty());
        assert!(paired.is_empty());
    }
}
