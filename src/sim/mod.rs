//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Bounds, overlaps};
pub use obstacle::{Obstacle, PlatformKind, difficulty_multiplier, scroll_speed};
pub use player::{Player, SpriteRect};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
