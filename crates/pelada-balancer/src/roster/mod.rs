// Roster model and import: players, positions, pair constraints.

pub mod import;
pub mod player;
