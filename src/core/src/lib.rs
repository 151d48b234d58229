pub mod club;
pub mod r#match;
pub mod settings;

pub use club::{Team, TeamGenerator, TeamPlayer};
pub use settings::{Difficulty, DifficultyMultipliers, MatchPhysicsSettings};
