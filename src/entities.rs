/// All game entity types — pure data, no logic.

use crate::config::GameConfig;
use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Terminal: the ship touched an enemy. Nothing moves until a restart.
    GameOver,
}

/// The four keyboard steering directions. Up decreases `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Discrete things that happened during a tick, for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// The ship reached the bomb.
    Detonation {
        at: Point,
        /// Enemies destroyed by this blast.
        cleared: u32,
    },
    /// An enemy reached the ship.
    GameOver { frame: u64 },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub ship: Point,
    pub enemies: Vec<Point>,
    /// `None` until the first bomb is placed at startup.
    pub bomb: Option<Point>,
    /// Last pointer position in screen coordinates (terminal cells).
    /// `None` until the pointer first moves; the ship is only steered by keys.
    pub pointer: Option<Point>,
    pub status: GameStatus,
    /// Frames simulated while playing.
    pub frame: u64,
    pub enemies_cleared: u32,
    pub detonations: u32,
    pub config: GameConfig,
}

impl World {
    /// Ship centred, no pointer, no enemies, no bomb yet.
    pub fn new(config: GameConfig) -> Self {
        let centre = Point::new(config.width / 2.0, config.height / 2.0);
        Self {
            ship: centre,
            enemies: Vec::new(),
            bomb: None,
            pointer: None,
            status: GameStatus::Playing,
            frame: 0,
            enemies_cleared: 0,
            detonations: 0,
            config,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Seconds survived, derived from the frame counter.
    pub fn elapsed_secs(&self) -> f64 {
        self.frame as f64 / self.config.frame_rate as f64
    }
}
