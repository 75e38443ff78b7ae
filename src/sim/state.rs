//! Game session state and core simulation types
//!
//! A `GameState` is one self-contained session: nothing in the simulation
//! lives outside it, so sessions can be created, ticked and inspected in
//! isolation.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::player::Player;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active run
    Playing,
    /// Player hit an obstacle
    GameOver,
    /// Cleared `WIN_THRESHOLD` obstacles
    GameWon,
}

impl GamePhase {
    /// Run has ended; the next jump input restarts
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Things that happened during a tick, drained by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    /// An obstacle scrolled behind the player; `total` is the new count
    ObstaclePassed { total: u32 },
    Won,
    Lost { cleared: u32 },
    Restarted,
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG; keeps its stream across restarts
    pub rng: Pcg32,
    pub player: Player,
    /// Active obstacles in spawn order (oldest first)
    pub obstacles: Vec<Obstacle>,
    /// Obstacles cleared this run
    pub obstacles_passed: u32,
    pub phase: GamePhase,
    /// Ticks simulated this run
    pub time_ticks: u64,
    /// Runs started in this session (1 for the first)
    pub run: u32,
    /// Pending events, oldest first
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(GROUND_LEVEL),
            obstacles: Vec::with_capacity(MAX_ACTIVE_OBSTACLES),
            obstacles_passed: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            run: 1,
            events: Vec::new(),
        };
        state.populate_initial_obstacles();
        log::info!("Session started with seed {}", seed);
        state
    }

    /// Reinitialize the run in place: fresh player, counters and obstacles.
    pub fn restart(&mut self) {
        self.player = Player::new(GROUND_LEVEL);
        self.obstacles.clear();
        self.obstacles_passed = 0;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.run += 1;
        self.populate_initial_obstacles();
        self.push_event(GameEvent::Restarted);
        log::info!("Run {} started (session seed {})", self.run, self.seed);
    }

    /// Three obstacles staggered half a screen apart, starting off the right edge
    fn populate_initial_obstacles(&mut self) {
        for i in 0..MAX_ACTIVE_OBSTACLES {
            let x = SCREEN_WIDTH + i as f32 * SCREEN_WIDTH / 2.0;
            self.spawn_obstacle(x);
        }
    }

    /// Generate an obstacle at `x` using the current difficulty and append it
    pub fn spawn_obstacle(&mut self, x: f32) {
        let obstacle = Obstacle::generate(
            &mut self.rng,
            x,
            self.player.ground,
            self.obstacles_passed,
            &self.player,
        );
        self.obstacles.push(obstacle);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
