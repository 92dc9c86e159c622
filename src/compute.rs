/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `World` (and, where needed, an RNG handle) and returns a brand-new
/// `World`.  Side effects are limited to the injected RNG and logging.

use log::{debug, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Direction, GameEvent, GameStatus, World};
use crate::geometry::{clamp_to_area, distance, unit_towards, Point};
use crate::viewport::Viewport;

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh world with its first bomb already placed.
pub fn new_game(config: GameConfig, rng: &mut impl Rng) -> World {
    place_bomb(&World::new(config), rng)
}

/// Uniform sample over the whole play area.
pub fn random_point(config: &GameConfig, rng: &mut impl Rng) -> Point {
    Point::new(
        rng.gen_range(0.0..=config.width),
        rng.gen_range(0.0..=config.height),
    )
}

// ── Input handlers ──────────────────────────────────────────────────────────

/// Nudge the ship one step.  Bounds are enforced by the next collision pass.
pub fn handle_key(state: &World, direction: Direction) -> World {
    if state.is_over() {
        return state.clone();
    }
    let step = state.config.distance_per_step;
    let offset = match direction {
        Direction::Up => Point::new(0.0, -step),
        Direction::Down => Point::new(0.0, step),
        Direction::Left => Point::new(-step, 0.0),
        Direction::Right => Point::new(step, 0.0),
    };
    World {
        ship: state.ship + offset,
        ..state.clone()
    }
}

/// Record the pointer position, in screen coordinates.
pub fn handle_pointer_move(state: &World, x: f64, y: f64) -> World {
    if state.is_over() {
        return state.clone();
    }
    World {
        pointer: Some(Point::new(x, y)),
        ..state.clone()
    }
}

// ── Spawner ─────────────────────────────────────────────────────────────────

/// Pick a spawn position at least `min_distance_from_ship` away from `ship`.
///
/// Gives up after `spawn_retry_limit` rejected samples and returns the last
/// one, so configs whose exclusion zone covers the whole area still spawn.
/// The flag is `false` when that fallback was taken.
pub fn sample_spawn_point(ship: Point, config: &GameConfig, rng: &mut impl Rng) -> (Point, bool) {
    let mut candidate = random_point(config, rng);
    for _ in 1..config.spawn_retry_limit {
        if distance(candidate, ship) >= config.min_distance_from_ship {
            return (candidate, true);
        }
        candidate = random_point(config, rng);
    }
    let accepted = distance(candidate, ship) >= config.min_distance_from_ship;
    (candidate, accepted)
}

/// One run of the spawn task: append a new enemy away from the ship.
pub fn spawn_enemy(state: &World, rng: &mut impl Rng) -> World {
    if state.is_over() {
        return state.clone();
    }
    let (enemy, accepted) = sample_spawn_point(state.ship, &state.config, rng);
    if !accepted {
        warn!(
            "no spawn point {} away from the ship after {} tries; using ({:.1}, {:.1})",
            state.config.min_distance_from_ship, state.config.spawn_retry_limit, enemy.x, enemy.y
        );
    }
    debug!("enemy spawned at ({:.1}, {:.1})", enemy.x, enemy.y);

    let mut enemies = state.enemies.clone();
    enemies.push(enemy);
    World {
        enemies,
        ..state.clone()
    }
}

/// Put the bomb somewhere new.  Unlike enemies, it may land on the ship.
pub fn place_bomb(state: &World, rng: &mut impl Rng) -> World {
    let bomb = random_point(&state.config, rng);
    debug!("bomb placed at ({:.1}, {:.1})", bomb.x, bomb.y);
    World {
        bomb: Some(bomb),
        ..state.clone()
    }
}

// ── Behaviour ───────────────────────────────────────────────────────────────

/// Random walk plus pursuit of the ship, clamped to the play area.
pub fn move_enemies(state: &World, rng: &mut impl Rng) -> World {
    let c = &state.config;
    let enemies = state
        .enemies
        .iter()
        .map(|&e| {
            let jitter = Point::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5) * c.random_walk_step;
            let chase = unit_towards(e, state.ship) * c.enemy_chasing_step;
            clamp_to_area(e + jitter + chase, c.width, c.height)
        })
        .collect();
    World {
        enemies,
        ..state.clone()
    }
}

/// Steer the ship toward the pointer.
///
/// Speed grows with `log2` of the distance and never drops below
/// `distance_per_step`.  A pointer exactly on the ship, or one that has
/// never moved, leaves it in place.
pub fn chase_pointer(state: &World, viewport: &Viewport) -> World {
    let Some(pointer) = state.pointer else {
        return state.clone();
    };
    let target = viewport.to_play_area(pointer);
    let d = distance(state.ship, target);
    if d == 0.0 {
        return state.clone();
    }
    let speed = d.log2().max(state.config.distance_per_step);
    World {
        ship: state.ship + unit_towards(state.ship, target) * speed,
        ..state.clone()
    }
}

// ── Collision / boundary ────────────────────────────────────────────────────

/// Split `enemies` by the blast: survivors are strictly farther than
/// `radius` from `bomb`.  Returns the survivors and how many were destroyed.
pub fn detonate(enemies: &[Point], bomb: Point, radius: f64) -> (Vec<Point>, u32) {
    let survivors: Vec<Point> = enemies
        .iter()
        .copied()
        .filter(|&e| distance(e, bomb) > radius)
        .collect();
    let cleared = (enemies.len() - survivors.len()) as u32;
    (survivors, cleared)
}

/// Clamp the ship, end the game on enemy contact, detonate a touched bomb.
pub fn check_collisions(state: &World, rng: &mut impl Rng) -> (World, Vec<GameEvent>) {
    let c = &state.config;
    let ship = clamp_to_area(state.ship, c.width, c.height);

    if state
        .enemies
        .iter()
        .any(|&e| distance(e, ship) < c.hit_distance())
    {
        info!(
            "game over at frame {} ({} enemies cleared)",
            state.frame, state.enemies_cleared
        );
        let world = World {
            ship,
            status: GameStatus::GameOver,
            ..state.clone()
        };
        return (world, vec![GameEvent::GameOver { frame: state.frame }]);
    }

    let bomb = match state.bomb {
        Some(b) if distance(ship, b) < c.pickup_distance() => b,
        _ => {
            return (
                World {
                    ship,
                    ..state.clone()
                },
                Vec::new(),
            )
        }
    };

    let (enemies, cleared) = detonate(&state.enemies, bomb, c.bombing_radius);
    info!(
        "bomb detonated at ({:.1}, {:.1}), {} enemies cleared",
        bomb.x, bomb.y, cleared
    );
    let detonated = World {
        ship,
        enemies,
        enemies_cleared: state.enemies_cleared + cleared,
        detonations: state.detonations + 1,
        ..state.clone()
    };
    (
        place_bomb(&detonated, rng),
        vec![GameEvent::Detonation { at: bomb, cleared }],
    )
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame: collisions, then enemy movement,
/// then the ship's pointer chase.  A finished game is returned unchanged.
pub fn tick(state: &World, viewport: &Viewport, rng: &mut impl Rng) -> (World, Vec<GameEvent>) {
    if state.is_over() {
        return (state.clone(), Vec::new());
    }
    let counted = World {
        frame: state.frame + 1,
        ..state.clone()
    };

    let (collided, events) = check_collisions(&counted, rng);
    if collided.is_over() {
        return (collided, events);
    }

    let moved = move_enemies(&collided, rng);
    (chase_pointer(&moved, viewport), events)
}
