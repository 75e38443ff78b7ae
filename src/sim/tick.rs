//! Fixed timestep simulation tick
//!
//! Core game loop that advances one session deterministically.

use super::collision::overlaps;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump while playing, restart after the run has ended (space/click)
    pub jump: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.jump {
        if state.phase.is_terminal() {
            state.restart();
            return;
        }
        if state.player.jump() {
            state.push_event(GameEvent::Jumped);
        }
    }

    if state.phase.is_terminal() {
        return;
    }

    state.time_ticks += 1;
    state.player.advance_animation();

    // Physics resolves against obstacle positions from the previous tick
    if state.player.update(&state.obstacles) {
        state.push_event(GameEvent::Landed);
    }

    let player_x = state.player.pos.x;
    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;

        let just_passed = state.obstacles[i].update(player_x);
        if just_passed && state.phase == GamePhase::Playing {
            state.obstacles_passed += 1;
            let total = state.obstacles_passed;
            state.push_event(GameEvent::ObstaclePassed { total });
            if total >= WIN_THRESHOLD {
                state.phase = GamePhase::GameWon;
                state.push_event(GameEvent::Won);
                log::info!("Run won after {} ticks", state.time_ticks);
            }
        }

        // A fatal hit still ends the run as lost when the win fired earlier this tick
        if state.phase != GamePhase::GameOver && is_fatal_hit(state, i) {
            state.phase = GamePhase::GameOver;
            let cleared = state.obstacles_passed;
            state.push_event(GameEvent::Lost { cleared });
            log::info!("Game over: {} obstacles cleared", cleared);
        }

        if state.obstacles[i].is_off_screen() {
            state.obstacles.remove(i);
        }
    }

    if state.phase == GamePhase::Playing && should_spawn(state) {
        state.spawn_obstacle(SCREEN_WIDTH);
    }
}

/// Player overlaps obstacle `index` without having come down onto its top
fn is_fatal_hit(state: &GameState, index: usize) -> bool {
    let obstacle = state.obstacles[index].bounds();
    !state.player.was_above(obstacle.top) && overlaps(&state.player.bounds(), &obstacle)
}

/// Room for another obstacle and the newest one is over half a screen in
fn should_spawn(state: &GameState) -> bool {
    if state.obstacles.len() >= MAX_ACTIVE_OBSTACLES {
        return false;
    }
    match state.obstacles.last() {
        Some(last) => SCREEN_WIDTH - last.pos.x > SCREEN_WIDTH / 2.0,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Obstacle, PlatformKind};
    use glam::Vec2;

    const JUMP: TickInput = TickInput { jump: true };

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn obstacle(x: f32, width: f32, height: f32) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, GROUND_LEVEL - height),
            width,
            height,
            speed: BASE_OBSTACLE_SPEED,
            passed: false,
            kind: PlatformKind::Normal,
        }
    }

    /// Session with the player resting on the ground and no obstacles
    fn grounded_session(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.obstacles.clear();
        state.player.pos.y = state.player.rest_y();
        state
    }

    #[test]
    fn test_jump_event_only_when_grounded() {
        let mut state = grounded_session(1);
        tick(&mut state, &JUMP);
        assert!(state.player.airborne);
        tick(&mut state, &JUMP);
        let jumps = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Jumped)
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_overlapping_obstacle_is_fatal() {
        let mut state = grounded_session(2);
        let p = state.player.bounds();
        // Covers the player's box fully, and still does after scrolling one tick
        state.obstacles.push(obstacle(p.left - 5.0, 60.0, 80.0));
        assert!(state.player.velocity >= 0.0);

        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::Lost { cleared: 1 }));
    }

    #[test]
    fn test_standing_on_platform_is_safe_and_scores_once() {
        let mut state = grounded_session(3);
        let platform = obstacle(90.0, 200.0, 50.0);
        state.player.pos.y = platform.pos.y - state.player.size / 2.0;
        state.obstacles.push(platform);

        for _ in 0..20 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.obstacles_passed, 1);
        let passes: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
            .collect();
        assert_eq!(passes, vec![GameEvent::ObstaclePassed { total: 1 }]);
    }

    #[test]
    fn test_hundredth_pass_wins_and_freezes_score() {
        let mut state = grounded_session(4);
        state.obstacles_passed = WIN_THRESHOLD - 1;
        // Player high above the obstacle as it slides underneath
        state.player.pos.y = 100.0;
        state.obstacles.push(obstacle(state.player.pos.x + 1.0, 30.0, 50.0));

        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameWon);
        assert_eq!(state.obstacles_passed, WIN_THRESHOLD);
        assert!(state.drain_events().contains(&GameEvent::Won));

        for _ in 0..50 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.obstacles_passed, WIN_THRESHOLD);
        assert_eq!(state.phase, GamePhase::GameWon);
    }

    #[test]
    fn test_win_and_fatal_hit_same_tick_is_game_over() {
        let mut state = grounded_session(4);
        state.obstacles_passed = WIN_THRESHOLD - 1;
        // Passes behind the player and overlaps it in the same tick
        state.obstacles.push(obstacle(state.player.pos.x + 1.0, 40.0, 50.0));

        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles_passed, WIN_THRESHOLD);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::ObstaclePassed { total: WIN_THRESHOLD },
                GameEvent::Won,
                GameEvent::Lost { cleared: WIN_THRESHOLD },
            ]
        );
    }

    #[test]
    fn test_no_scoring_after_fatal_hit_in_same_tick() {
        let mut state = grounded_session(9);
        state.obstacles_passed = 10;
        // Oldest obstacle passes, newest (checked first) kills the player
        state.obstacles.push(obstacle(state.player.pos.x + 1.0, 10.0, 50.0));
        state.obstacles.push(obstacle(state.player.pos.x - 5.0, 40.0, 50.0));
        state.obstacles[1].passed = true;

        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles_passed, 10);
    }

    #[test]
    fn test_jump_restarts_from_terminal_phases() {
        for phase in [GamePhase::GameOver, GamePhase::GameWon] {
            let mut state = GameState::new(5);
            state.obstacles_passed = 37;
            state.phase = phase;

            tick(&mut state, &JUMP);
            assert_eq!(state.phase, GamePhase::Playing);
            assert_eq!(state.obstacles_passed, 0);
            let xs: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
            assert_eq!(xs, vec![800.0, 1200.0, 1600.0]);
            assert!(!state.player.airborne, "restart tick must not also jump");
            assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
        }
    }

    #[test]
    fn test_terminal_phase_does_not_advance() {
        let mut state = GameState::new(6);
        state.phase = GamePhase::GameOver;
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        tick(&mut state, &idle());
        let after: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        assert_eq!(xs, after);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_spawn_rule() {
        let mut state = grounded_session(7);
        // Empty list spawns straight away at the right edge
        tick(&mut state, &idle());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.x, SCREEN_WIDTH);

        // Newest obstacle less than half a screen in: no spawn
        state.obstacles[0].pos.x = 500.0;
        tick(&mut state, &idle());
        assert_eq!(state.obstacles.len(), 1);

        // Past the halfway mark: spawn
        state.obstacles[0].pos.x = 399.0;
        state.obstacles[0].passed = true;
        tick(&mut state, &idle());
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[1].pos.x, SCREEN_WIDTH);
    }

    #[test]
    fn test_off_screen_obstacles_removed() {
        let mut state = grounded_session(8);
        state.player.pos.y = 50.0;
        let mut gone = obstacle(-25.0, 20.0, 50.0);
        gone.passed = true;
        state.obstacles.push(gone);
        state.obstacles.push(obstacle(700.0, 40.0, 50.0));

        tick(&mut state, &idle());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.x, 700.0 - BASE_OBSTACLE_SPEED);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);

        for t in 0..600 {
            let input = TickInput { jump: t % 45 == 0 };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles_passed, b.obstacles_passed);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_player_never_sinks_below_ground_in_full_game() {
        let mut state = GameState::new(2024);
        for t in 0..5_000u32 {
            let input = TickInput { jump: t % 23 == 0 };
            tick(&mut state, &input);
            assert!(state.player.pos.y <= state.player.rest_y());
            assert!(state.obstacles.len() <= MAX_ACTIVE_OBSTACLES);
        }
    }
}
