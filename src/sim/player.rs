//! The auto-running player sprite
//!
//! The player never moves horizontally; obstacles scroll toward it. Only the
//! vertical axis is simulated: gravity, a single grounded jump, and landing
//! on either the ground line or a platform top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use super::obstacle::Obstacle;
use crate::consts::*;

/// Source rectangle of one animation frame inside the spritesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the hitbox
    pub pos: Vec2,
    /// Vertical velocity in pixels per tick (positive = falling)
    pub velocity: f32,
    pub gravity: f32,
    /// Jump impulse magnitude; applied as `-jump_impulse`
    pub jump_impulse: f32,
    /// Side length of the square hitbox
    pub size: f32,
    /// Ground line the player rests on
    pub ground: f32,
    /// Set by a jump, cleared on landing. While set, jumps are ignored.
    pub airborne: bool,
    /// Fractional animation counter
    pub frame_counter: f32,
}

impl Player {
    pub fn new(ground: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            velocity: 0.0,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            size: PLAYER_SIZE,
            ground,
            airborne: false,
            frame_counter: 0.0,
        }
    }

    /// Highest y the center may reach (resting on the ground line)
    #[inline]
    pub fn rest_y(&self) -> f32 {
        self.ground - self.size / 2.0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered_square(self.pos.x, self.pos.y, self.size)
    }

    /// Peak height of a standing jump with this player's physics
    pub fn max_jump_height(&self) -> f32 {
        crate::max_jump_height(self.jump_impulse, self.gravity)
    }

    /// Start a jump if grounded. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if self.airborne {
            return false;
        }
        self.velocity = -self.jump_impulse;
        self.airborne = true;
        true
    }

    /// Advance one tick of vertical physics.
    ///
    /// Returns true when the player touched down this tick after being airborne.
    pub fn update(&mut self, obstacles: &[Obstacle]) -> bool {
        let was_airborne = self.airborne;

        self.velocity += self.gravity;
        self.pos.y += self.velocity;

        if self.pos.y > self.rest_y() {
            self.pos.y = self.rest_y();
            self.settle();
        }

        if let Some(top) = self.landing_platform_top(obstacles) {
            self.pos.y = top - self.size / 2.0;
            self.settle();
        }

        was_airborne && !self.airborne
    }

    /// Top edge of the platform the player lands on this tick, if any.
    ///
    /// A landing needs the player falling, above the platform top before this
    /// tick's move, horizontally overlapping it, and now at or past the top.
    /// When several platforms qualify the highest one wins; equal tops go to
    /// the oldest obstacle.
    fn landing_platform_top(&self, obstacles: &[Obstacle]) -> Option<f32> {
        if self.velocity <= 0.0 {
            return None;
        }
        let me = self.bounds();
        obstacles
            .iter()
            .map(Obstacle::bounds)
            .filter(|b| {
                let was_above = me.bottom - self.velocity <= b.top;
                was_above && me.overlaps_x(b) && me.bottom >= b.top
            })
            .map(|b| b.top)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    fn settle(&mut self) {
        self.velocity = 0.0;
        self.airborne = false;
    }

    /// Whether the player was above `top` before this tick's displacement,
    /// i.e. the contact is a landing rather than a side hit.
    #[inline]
    pub fn was_above(&self, top: f32) -> bool {
        self.bounds().bottom - self.velocity <= top
    }

    pub fn advance_animation(&mut self) {
        self.frame_counter += ANIMATION_SPEED;
    }

    pub fn current_frame(&self) -> u32 {
        (self.frame_counter as u32) % PLAYER_FRAMES
    }

    /// Source rect of the current frame in a sheet of `frame_width`-wide cells
    pub fn sprite_source(&self, frame_width: u32, frame_height: u32) -> SpriteRect {
        SpriteRect {
            x: self.current_frame() * frame_width,
            y: 0,
            width: frame_width,
            height: frame_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::PlatformKind;
    use proptest::prelude::*;

    fn grounded_player() -> Player {
        let mut p = Player::new(GROUND_LEVEL);
        p.pos.y = p.rest_y();
        p
    }

    fn platform(x: f32, top: f32, width: f32) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, top),
            width,
            height: GROUND_LEVEL - top,
            speed: BASE_OBSTACLE_SPEED,
            passed: false,
            kind: PlatformKind::Normal,
        }
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut p = grounded_player();
        assert!(p.jump());
        assert_eq!(p.velocity, -JUMP_IMPULSE);
        assert!(p.airborne);

        p.update(&[]);
        let v = p.velocity;
        assert!(!p.jump(), "no air jumps");
        assert_eq!(p.velocity, v);
    }

    #[test]
    fn test_falls_to_ground_and_settles() {
        let mut p = Player::new(GROUND_LEVEL);
        for _ in 0..120 {
            p.update(&[]);
        }
        assert_eq!(p.pos.y, p.rest_y());
        assert_eq!(p.velocity, 0.0);
        assert!(!p.airborne);
    }

    #[test]
    fn test_jump_returns_to_ground() {
        let mut p = grounded_player();
        p.jump();
        let mut landed = false;
        for _ in 0..60 {
            if p.update(&[]) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(p.pos.y, p.rest_y());
    }

    #[test]
    fn test_lands_on_platform_from_above() {
        let mut p = grounded_player();
        // Feet 5px above the platform top, falling onto it
        let top = GROUND_LEVEL - 60.0;
        p.pos.y = top - p.size / 2.0 - 5.0;
        p.velocity = 6.0;
        p.airborne = true;
        let obstacles = [platform(90.0, top, 40.0)];

        assert!(p.update(&obstacles));
        assert_eq!(p.bounds().bottom, top);
        assert_eq!(p.velocity, 0.0);
        assert!(!p.airborne);
    }

    #[test]
    fn test_no_landing_when_rising() {
        let mut p = grounded_player();
        let top = GROUND_LEVEL - 60.0;
        p.pos.y = top - p.size / 2.0 + 5.0;
        p.velocity = -5.0;
        p.airborne = true;
        let obstacles = [platform(90.0, top, 40.0)];

        p.update(&obstacles);
        assert!(p.velocity < 0.0);
        assert!(p.airborne);
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let mut p = grounded_player();
        let top = GROUND_LEVEL - 60.0;
        p.pos.y = top - p.size / 2.0 - 2.0;
        p.velocity = 4.0;
        p.airborne = true;
        // Left edge exactly at the player's right edge: touching, not overlapping
        let obstacles = [platform(p.pos.x + p.size / 2.0, top, 40.0)];

        p.update(&obstacles);
        assert!(p.airborne);
    }

    #[test]
    fn test_highest_platform_wins_tie_break() {
        let mut p = grounded_player();
        let low_top = GROUND_LEVEL - 50.0;
        let high_top = GROUND_LEVEL - 56.0;
        p.pos.y = high_top - p.size / 2.0 - 1.0;
        p.velocity = 9.0;
        p.airborne = true;
        // Lower platform first in spawn order
        let obstacles = [platform(80.0, low_top, 60.0), platform(95.0, high_top, 30.0)];

        p.update(&obstacles);
        assert_eq!(p.bounds().bottom, high_top);
    }

    #[test]
    fn test_sprite_frames_cycle() {
        let mut p = grounded_player();
        assert_eq!(p.current_frame(), 0);
        for _ in 0..6 {
            p.advance_animation();
        }
        assert_eq!(p.current_frame(), 1);
        for _ in 0..15 {
            p.advance_animation();
        }
        // 21 ticks * 0.2 = 4.2 -> wrapped back to frame 0
        assert_eq!(p.current_frame(), 0);

        for _ in 0..15 {
            p.advance_animation();
        }
        assert_eq!(
            p.sprite_source(32, 32),
            SpriteRect { x: 96, y: 0, width: 32, height: 32 }
        );
    }

    proptest! {
        #[test]
        fn prop_never_below_ground(jumps in proptest::collection::vec(any::<bool>(), 1..400)) {
            let mut p = Player::new(GROUND_LEVEL);
            for jump in jumps {
                if jump {
                    p.jump();
                }
                p.update(&[]);
                prop_assert!(p.pos.y <= p.rest_y());
            }
        }
    }
}
