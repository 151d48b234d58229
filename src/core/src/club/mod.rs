use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

/// A roster entry as supplied by the roster provider. Only `overall`
/// feeds the simulation; everything else is presentation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPlayer {
    pub id: u32,
    pub name: String,
    pub overall: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub players: Vec<TeamPlayer>,
}

pub struct TeamGenerator;

impl TeamGenerator {
    /// Generate a demo roster of `roster_size` players with overalls in
    /// the 70..90 range. Player ids are derived from the team id so two
    /// generated teams never collide.
    pub fn generate(
        id: u32,
        name: &str,
        color: &str,
        roster_size: usize,
        rng: &mut impl Rng,
    ) -> Team {
        let players = (0..roster_size)
            .map(|index| TeamPlayer {
                id: id * 1000 + index as u32,
                name: format!("{} {}", name, index + 1),
                overall: rng.random_range(70..90),
            })
            .collect();

        Team {
            id,
            name: String::from(name),
            color: String::from(color),
            players,
        }
    }
}
