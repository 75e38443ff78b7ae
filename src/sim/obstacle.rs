//! Scrolling platform obstacles and their procedural generation
//!
//! Obstacle size and speed scale with how many obstacles the player has
//! already cleared. Heights are always capped relative to the player's peak
//! jump height so every obstacle stays jumpable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use super::player::Player;
use crate::consts::*;

/// Visual category; selects the sprite and the size ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    Narrow,
    #[default]
    Normal,
    Wide,
}

impl PlatformKind {
    /// Classify a uniform roll in [0, 1).
    ///
    /// The narrow threshold grows with difficulty and saturates once it
    /// passes 1.0 (every roll is then narrow). Narrow takes precedence over wide.
    pub fn from_roll(roll: f32, difficulty: f32) -> Self {
        if roll < 0.3 * difficulty {
            PlatformKind::Narrow
        } else if roll > 0.8 {
            PlatformKind::Wide
        } else {
            PlatformKind::Normal
        }
    }

    /// Inclusive width range in pixels
    pub fn width_range(self) -> (u32, u32) {
        match self {
            PlatformKind::Narrow => (20, 35),
            PlatformKind::Normal => (40, 80),
            PlatformKind::Wide => (120, 200),
        }
    }

    /// Fixed minimum height in pixels
    pub fn min_height(self) -> u32 {
        match self {
            PlatformKind::Narrow => 40,
            PlatformKind::Normal => 45,
            PlatformKind::Wide => 50,
        }
    }

    /// Fraction of the peak jump height this category may reach
    pub fn height_fraction(self) -> f32 {
        match self {
            PlatformKind::Narrow => 0.6,
            PlatformKind::Normal => 0.75,
            PlatformKind::Wide => 0.85,
        }
    }

    /// Inclusive height range for a given peak jump height.
    ///
    /// The cap never drops below the minimum, so the range is never empty.
    pub fn height_range(self, max_jump_height: f32) -> (u32, u32) {
        let min = self.min_height();
        let cap = (max_jump_height * self.height_fraction()) as u32;
        (min, cap.max(min))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Narrow => "narrow",
            PlatformKind::Normal => "normal",
            PlatformKind::Wide => "wide",
        }
    }
}

/// Difficulty multiplier for a given number of cleared obstacles (unbounded)
#[inline]
pub fn difficulty_multiplier(obstacles_passed: u32) -> f32 {
    1.0 + obstacles_passed as f32 / DIFFICULTY_DIVISOR
}

/// Scroll speed for a given number of cleared obstacles
#[inline]
pub fn scroll_speed(obstacles_passed: u32) -> f32 {
    BASE_OBSTACLE_SPEED + (obstacles_passed as f32 / SPEED_DIVISOR).min(MAX_SPEED_BONUS)
}

/// A platform scrolling from right to left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Leftward pixels per tick
    pub speed: f32,
    /// Set once the obstacle's x drops behind the player; scored exactly once
    pub passed: bool,
    pub kind: PlatformKind,
}

impl Obstacle {
    /// Generate a new obstacle standing on `ground` with its left edge at `x`
    pub fn generate<R: Rng>(
        rng: &mut R,
        x: f32,
        ground: f32,
        obstacles_passed: u32,
        player: &Player,
    ) -> Self {
        let difficulty = difficulty_multiplier(obstacles_passed);
        let kind = PlatformKind::from_roll(rng.random::<f32>(), difficulty);

        let (min_w, max_w) = kind.width_range();
        let width = rng.random_range(min_w..=max_w) as f32;

        let (min_h, max_h) = kind.height_range(player.max_jump_height());
        let height = rng.random_range(min_h..=max_h) as f32;

        let obstacle = Self {
            pos: Vec2::new(x, ground - height),
            width,
            height,
            speed: scroll_speed(obstacles_passed),
            passed: false,
            kind,
        };
        log::debug!(
            "Spawned {} obstacle at x={}: {}x{} speed={}",
            kind.as_str(),
            x,
            width,
            height,
            obstacle.speed
        );
        obstacle
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Scroll one tick. Returns true on the tick the obstacle first passes
    /// behind `player_x`.
    pub fn update(&mut self, player_x: f32) -> bool {
        self.pos.x -= self.speed;

        if !self.passed && self.pos.x < player_x {
            self.passed = true;
            return true;
        }
        false
    }

    /// Right edge has scrolled past the left edge of the screen
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.width < 0.0
    }
}
