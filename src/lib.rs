//! Rhythm Platformer - a single-screen auto-runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, obstacle generation)
//! - `renderer`: Software frame composition and GPU presentation
//! - `assets`: Sprite, font and music loading
//! - `audio`: Looping background track
//! - `settings`: User configuration

pub mod assets;
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, Assets};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 400.0;
    /// Ground line (y grows downward)
    pub const GROUND_LEVEL: f32 = SCREEN_HEIGHT - 50.0;

    /// Target frame rate
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep (one tick per frame at target rate)
    pub const SIM_DT: f32 = 1.0 / FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player defaults. Physics values are per tick, not per second.
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const GRAVITY: f32 = 0.8;
    /// Upward impulse magnitude (applied as negative velocity)
    pub const JUMP_IMPULSE: f32 = 15.0;
    pub const ANIMATION_SPEED: f32 = 0.2;
    /// Frames in the player spritesheet, laid out horizontally
    pub const PLAYER_FRAMES: u32 = 4;

    /// Obstacles
    pub const BASE_OBSTACLE_SPEED: f32 = 7.0;
    pub const MAX_SPEED_BONUS: f32 = 8.0;
    /// Passed obstacles per +1 difficulty multiplier
    pub const DIFFICULTY_DIVISOR: f32 = 50.0;
    /// Passed obstacles per +1 scroll speed
    pub const SPEED_DIVISOR: f32 = 25.0;
    pub const MAX_ACTIVE_OBSTACLES: usize = 3;

    /// Obstacles to clear for a win
    pub const WIN_THRESHOLD: u32 = 100;
}

/// Peak height reachable from a standing jump: v² / 2g
#[inline]
pub fn max_jump_height(jump_impulse: f32, gravity: f32) -> f32 {
    (jump_impulse * jump_impulse) / (2.0 * gravity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_jump_height_default_physics() {
        let h = max_jump_height(consts::JUMP_IMPULSE, consts::GRAVITY);
        assert!((h - 140.625).abs() < 1e-4);
    }
}
