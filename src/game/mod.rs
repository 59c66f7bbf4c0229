mod coin;
mod context;
mod game;
mod level_changer;
mod player;
mod session;
mod sprite;
mod time;
mod zapper;
pub use coin::*;
pub use context::*;
pub use game::*;
pub use level_changer::*;
pub use player::*;
pub use session::*;
pub use sprite::*;
pub use time::*;
pub use zapper::*;

/// Left edge past which a scrolled entity is recycled forward.
pub const RECYCLE_X: f32 = -1.15;

/// Half-range of the random vertical row entities respawn into.
pub const ROW_RANGE: f32 = 0.75;
