use crate::club::Team;
use log::warn;

pub const SQUAD_SIZE: usize = 11;

#[derive(Debug, Clone)]
pub struct SquadPlayer {
    pub id: u32,
    pub display_name: String,
    pub overall: u8,
}

/// The on-field selection taken from a roster: the first eleven entries
/// in roster order. A short roster degrades to fewer on-field players
/// rather than failing or inventing placeholders.
#[derive(Debug, Clone)]
pub struct MatchSquad {
    pub team_id: u32,
    pub team_name: String,
    pub color: String,
    pub players: Vec<SquadPlayer>,
}

impl MatchSquad {
    pub fn from_team(team: &Team) -> Self {
        if team.players.len() < SQUAD_SIZE {
            warn!(
                "{} fields only {} players, simulating a reduced side",
                team.name,
                team.players.len()
            );
        }

        let players = team
            .players
            .iter()
            .take(SQUAD_SIZE)
            .map(|player| SquadPlayer {
                id: player.id,
                display_name: player.name.clone(),
                overall: player.overall,
            })
            .collect();

        MatchSquad {
            team_id: team.id,
            team_name: team.name.clone(),
            color: team.color.clone(),
            players,
        }
    }
}
