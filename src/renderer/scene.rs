//! Frame composition: entities, background and HUD for each game phase

use super::canvas::{Canvas, Color};
use super::text;
use crate::assets::Assets;
use crate::consts::*;
use crate::sim::{GamePhase, GameState, SpriteRect};

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BLACK: Color = [0, 0, 0];
    pub const WHITE: Color = [255, 255, 255];
    pub const GROUND: Color = [80, 80, 80];
    pub const BACKGROUND: Color = [30, 30, 30];
}

const HUD_SIZE: f32 = 24.0;
const TITLE_SIZE: f32 = 48.0;

/// Where a line of HUD text goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    TopLeft { x: f32, y: f32 },
    /// Horizontally centered, top edge at y
    Centered { y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudLine {
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub placement: Placement,
}

impl HudLine {
    fn centered(text: String, size: f32, y: f32) -> Self {
        Self {
            text,
            size,
            color: colors::WHITE,
            placement: Placement::Centered { y },
        }
    }
}

/// HUD text for the current phase
pub fn hud_lines(state: &GameState) -> Vec<HudLine> {
    let mid = SCREEN_HEIGHT / 2.0;
    match state.phase {
        GamePhase::Playing => vec![HudLine {
            text: format!("Obstacles: {}/{}", state.obstacles_passed, WIN_THRESHOLD),
            size: HUD_SIZE,
            color: colors::BLACK,
            placement: Placement::TopLeft { x: 20.0, y: 20.0 },
        }],
        GamePhase::GameOver => vec![
            HudLine::centered("Game Over!".into(), TITLE_SIZE, mid - 50.0),
            HudLine::centered(
                format!("Obstacles cleared: {}", state.obstacles_passed),
                HUD_SIZE,
                mid,
            ),
            HudLine::centered("Press SPACE to restart".into(), HUD_SIZE, mid + 50.0),
        ],
        GamePhase::GameWon => vec![
            HudLine::centered("YOU WON!".into(), TITLE_SIZE, mid - 25.0),
            HudLine::centered("Press SPACE to play again".into(), HUD_SIZE, mid + 50.0),
        ],
    }
}

/// Compose the full frame for `state` onto `canvas`
pub fn compose(canvas: &mut Canvas, state: &GameState, assets: &Assets) {
    canvas.clear(colors::BACKGROUND);

    if state.phase == GamePhase::Playing {
        draw_world(canvas, state, assets);
    }

    for line in hud_lines(state) {
        match line.placement {
            Placement::TopLeft { x, y } => {
                text::draw_text(canvas, &assets.font, &line.text, line.size, x, y, line.color)
            }
            Placement::Centered { y } => {
                text::draw_text_centered(canvas, &assets.font, &line.text, line.size, y, line.color)
            }
        }
    }
}

fn draw_world(canvas: &mut Canvas, state: &GameState, assets: &Assets) {
    canvas.blit(&assets.background, 0, 0);

    let ground = state.player.ground;
    canvas.fill_rect(
        0,
        ground as i32,
        SCREEN_WIDTH as u32,
        (SCREEN_HEIGHT - ground) as u32,
        colors::GROUND,
    );

    for obstacle in &state.obstacles {
        let sprite = assets.platform_sprite(obstacle.kind);
        let full = SpriteRect {
            x: 0,
            y: 0,
            width: sprite.width(),
            height: sprite.height(),
        };
        canvas.blit_scaled(
            sprite,
            full,
            obstacle.pos.x as i32,
            obstacle.pos.y as i32,
            obstacle.width as u32,
            obstacle.height as u32,
        );
    }

    let player = &state.player;
    let (frame_w, frame_h) = assets.player_frame_size();
    let half = player.size / 2.0;
    canvas.blit_scaled(
        &assets.player_sheet,
        player.sprite_source(frame_w, frame_h),
        (player.pos.x - half) as i32,
        (player.pos.y - half) as i32,
        player.size as u32,
        player.size as u32,
    );
}
