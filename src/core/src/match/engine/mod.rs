pub mod ball;
pub mod context;
pub mod engine;
pub mod events;
pub mod field;
pub mod formation;
pub mod geometry;
pub mod player;
pub mod snapshot;
pub mod state;

pub use ball::*;
pub use context::*;
pub use engine::*;
pub use events::*;
pub use field::*;
pub use formation::*;
pub use geometry::*;
pub use player::*;
pub use snapshot::*;
pub use state::*;
