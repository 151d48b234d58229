pub mod engine;
pub mod narrator;
pub mod result;
pub mod squad;

pub use engine::*;
pub use narrator::*;
pub use result::*;
pub use squad::*;
