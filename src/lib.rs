pub mod engine;
pub mod game;

pub use engine::*;
pub use game::*;
