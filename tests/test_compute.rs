use spaceship::compute::*;
use spaceship::config::GameConfig;
use spaceship::entities::*;
use spaceship::geometry::{distance, Point};
use spaceship::viewport::Viewport;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Ship centred, no enemies, bomb parked in the far corner.
fn make_world() -> World {
    World {
        bomb: Some(Point::new(790.0, 590.0)),
        ..World::new(GameConfig::default())
    }
}

/// Enemies that only chase, so movement is predictable.
fn no_jitter_world() -> World {
    let config = GameConfig {
        random_walk_step: 0.0,
        ..GameConfig::default()
    };
    World {
        bomb: Some(Point::new(790.0, 590.0)),
        ..World::new(config)
    }
}

fn identity(world: &World) -> Viewport {
    Viewport::identity(world.config.width, world.config.height)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn in_area(p: Point, c: &GameConfig) -> bool {
    p.x >= 0.0 && p.x <= c.width && p.y >= 0.0 && p.y <= c.height
}

// ── new_game ──────────────────────────────────────────────────────────────────

#[test]
fn new_world_is_centred_and_empty() {
    let w = World::new(GameConfig::default());
    assert_eq!(w.ship, Point::new(400.0, 300.0));
    assert_eq!(w.pointer, None);
    assert!(w.enemies.is_empty());
    assert_eq!(w.bomb, None);
    assert_eq!(w.status, GameStatus::Playing);
    assert_eq!(w.frame, 0);
}

#[test]
fn new_game_places_one_bomb_in_area() {
    let w = new_game(GameConfig::default(), &mut seeded_rng());
    let bomb = w.bomb.expect("bomb placed");
    assert!(in_area(bomb, &w.config));
}

// ── handle_key ────────────────────────────────────────────────────────────────

#[test]
fn keys_move_ship_one_step() {
    let w = make_world();
    assert_eq!(handle_key(&w, Direction::Left).ship, Point::new(399.0, 300.0));
    assert_eq!(handle_key(&w, Direction::Right).ship, Point::new(401.0, 300.0));
    assert_eq!(handle_key(&w, Direction::Up).ship, Point::new(400.0, 299.0));
    assert_eq!(handle_key(&w, Direction::Down).ship, Point::new(400.0, 301.0));
}

#[test]
fn key_step_is_configurable() {
    let mut w = make_world();
    w.config.distance_per_step = 5.0;
    assert_eq!(handle_key(&w, Direction::Left).ship, Point::new(395.0, 300.0));
}

#[test]
fn keys_do_not_clamp() {
    let mut w = make_world();
    w.ship = Point::new(0.0, 0.0);
    let moved = handle_key(&w, Direction::Left);
    assert_eq!(moved.ship, Point::new(-1.0, 0.0));

    // The next collision pass brings it back inside
    let (checked, _) = check_collisions(&moved, &mut seeded_rng());
    assert_eq!(checked.ship, Point::new(0.0, 0.0));
}

#[test]
fn key_does_not_mutate_original() {
    let w = make_world();
    let _moved = handle_key(&w, Direction::Up);
    assert_eq!(w.ship, Point::new(400.0, 300.0));
}

// ── handle_pointer_move ───────────────────────────────────────────────────────

#[test]
fn pointer_is_overwritten() {
    let w = handle_pointer_move(&make_world(), 12.0, 34.0);
    assert_eq!(w.pointer, Some(Point::new(12.0, 34.0)));
    let w = handle_pointer_move(&w, -5.0, 9000.0);
    assert_eq!(w.pointer, Some(Point::new(-5.0, 9000.0)));
}

// ── spawner ───────────────────────────────────────────────────────────────────

#[test]
fn spawn_appends_one_enemy() {
    let w = spawn_enemy(&make_world(), &mut seeded_rng());
    assert_eq!(w.enemies.len(), 1);
    assert!(in_area(w.enemies[0], &w.config));
}

#[test]
fn spawn_respects_min_distance() {
    let mut rng = seeded_rng();
    let mut w = make_world();
    for _ in 0..500 {
        w = spawn_enemy(&w, &mut rng);
    }
    assert_eq!(w.enemies.len(), 500);
    for &e in &w.enemies {
        assert!(distance(e, w.ship) >= 100.0, "enemy {e:?} too close");
    }
}

#[test]
fn spawn_respects_min_distance_from_a_corner_ship() {
    let mut rng = seeded_rng();
    let mut w = make_world();
    w.ship = Point::new(0.0, 0.0);
    for _ in 0..200 {
        w = spawn_enemy(&w, &mut rng);
    }
    assert!(w.enemies.iter().all(|&e| distance(e, w.ship) >= 100.0));
}

#[test]
fn spawn_with_impossible_min_distance_terminates() {
    let mut w = make_world();
    w.config.min_distance_from_ship = 10_000.0; // larger than the diagonal
    let (p, accepted) = sample_spawn_point(w.ship, &w.config, &mut seeded_rng());
    assert!(!accepted);
    assert!(in_area(p, &w.config));

    let w = spawn_enemy(&w, &mut seeded_rng());
    assert_eq!(w.enemies.len(), 1);
}

#[test]
fn spawn_retry_limit_of_one_takes_the_first_sample() {
    let mut w = make_world();
    w.config.spawn_retry_limit = 1;
    w.config.min_distance_from_ship = 10_000.0;
    let (p, accepted) = sample_spawn_point(w.ship, &w.config, &mut seeded_rng());
    assert!(!accepted);
    assert_eq!(p, random_point(&w.config, &mut seeded_rng()));
}

// ── place_bomb ────────────────────────────────────────────────────────────────

#[test]
fn bomb_may_land_anywhere_in_area() {
    let mut rng = seeded_rng();
    let mut w = make_world();
    for _ in 0..100 {
        w = place_bomb(&w, &mut rng);
        assert!(in_area(w.bomb.unwrap(), &w.config));
    }
}

// ── move_enemies ──────────────────────────────────────────────────────────────

#[test]
fn enemy_chases_ship_by_chasing_step() {
    let mut w = no_jitter_world();
    w.enemies = vec![Point::new(400.0, 200.0), Point::new(100.0, 300.0)];
    let moved = move_enemies(&w, &mut seeded_rng());
    assert_abs_diff_eq!(moved.enemies[0].x, 400.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.enemies[0].y, 202.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.enemies[1].x, 102.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.enemies[1].y, 300.0, epsilon = 1e-9);
}

#[test]
fn random_walk_is_bounded_by_step() {
    let mut w = make_world();
    w.enemies = vec![Point::new(100.0, 100.0); 50];
    let moved = move_enemies(&w, &mut seeded_rng());
    for (&before, &after) in w.enemies.iter().zip(&moved.enemies) {
        // half a walk step per axis plus the chase step
        assert!(distance(before, after) <= 2.0 + 2f64.sqrt() + 1e-9);
    }
}

#[test]
fn enemy_on_ship_does_not_produce_nan() {
    let mut w = no_jitter_world();
    w.enemies = vec![w.ship];
    let moved = move_enemies(&w, &mut seeded_rng());
    assert_eq!(moved.enemies[0], w.ship);
    assert!(moved.enemies[0].is_finite());
}

#[test]
fn enemies_are_clamped_to_area() {
    let mut rng = seeded_rng();
    let mut w = make_world();
    w.config.random_walk_step = 50.0;
    w.enemies = vec![
        Point::new(0.0, 0.0),
        Point::new(800.0, 600.0),
        Point::new(0.0, 600.0),
        Point::new(800.0, 0.0),
    ];
    for _ in 0..50 {
        w = move_enemies(&w, &mut rng);
        assert!(w.enemies.iter().all(|&e| in_area(e, &w.config)));
    }
}

#[test]
fn enemies_keep_their_order() {
    let mut w = no_jitter_world();
    w.enemies = vec![Point::new(10.0, 10.0), Point::new(790.0, 590.0)];
    let moved = move_enemies(&w, &mut seeded_rng());
    assert!(moved.enemies[0].x < 400.0);
    assert!(moved.enemies[1].x > 400.0);
}

// ── chase_pointer ─────────────────────────────────────────────────────────────

#[test]
fn pointer_on_ship_means_no_movement() {
    let w = handle_pointer_move(&make_world(), 400.0, 300.0);
    let moved = chase_pointer(&w, &identity(&w));
    assert_eq!(moved.ship, w.ship);
    assert!(moved.ship.is_finite());
}

#[test]
fn untouched_pointer_does_not_steer() {
    let w = make_world();
    assert_eq!(chase_pointer(&w, &identity(&w)).ship, w.ship);
}

#[test]
fn fresh_game_holds_still_on_a_real_terminal() {
    let mut rng = seeded_rng();
    for (cols, rows) in [(80, 24), (120, 40), (100, 30), (211, 55), (82, 64)] {
        let w = new_game(GameConfig::default(), &mut rng);
        let viewport = Viewport::new(cols, rows, w.config.width, w.config.height);
        let (after, _) = tick(&w, &viewport, &mut rng);
        assert_eq!(after.ship, w.ship, "ship drifted on a {cols}x{rows} terminal");
    }
}

#[test]
fn far_pointer_moves_log2_of_distance() {
    let w = handle_pointer_move(&make_world(), 400.0, 556.0); // 256 below
    let moved = chase_pointer(&w, &identity(&w));
    assert_abs_diff_eq!(moved.ship.x, 400.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.ship.y, 308.0, epsilon = 1e-9); // log2(256) = 8
}

#[test]
fn near_pointer_moves_at_least_one_step() {
    let w = handle_pointer_move(&make_world(), 401.5, 300.0);
    let moved = chase_pointer(&w, &identity(&w));
    assert_abs_diff_eq!(moved.ship.x, 401.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.ship.y, 300.0, epsilon = 1e-9);
}

#[test]
fn pointer_is_translated_through_the_viewport() {
    // 82×64 terminal: play cells start at (1, 2), 10 units per cell
    let viewport = Viewport::new(82, 64, 800.0, 600.0);
    let mut w = make_world();
    w.ship = Point::new(5.0, 5.0);
    let on_ship = Viewport::cell_centre(1, 2);
    let w = handle_pointer_move(&w, on_ship.x, on_ship.y);
    assert_eq!(chase_pointer(&w, &viewport).ship, w.ship);

    let left_edge = Viewport::cell_centre(1, 32); // play-area (5, 305)
    let w = handle_pointer_move(&w, left_edge.x, left_edge.y);
    let moved = chase_pointer(&w, &viewport);
    assert_abs_diff_eq!(moved.ship.x, 5.0, epsilon = 1e-9);
    assert!(moved.ship.y > 5.0);
}

// ── detonate ──────────────────────────────────────────────────────────────────

#[test]
fn detonation_radius_is_inclusive() {
    let bomb = Point::new(100.0, 100.0);
    let enemies = vec![
        Point::new(250.0, 100.0), // 150
        Point::new(300.0, 100.0), // exactly 200
        Point::new(350.0, 100.0), // 250
        Point::new(100.0, 100.0), // 0
    ];
    let (survivors, cleared) = detonate(&enemies, bomb, 200.0);
    assert_eq!(cleared, 3);
    assert_eq!(survivors, vec![Point::new(350.0, 100.0)]);
}

#[test]
fn detonation_with_no_enemies() {
    let (survivors, cleared) = detonate(&[], Point::new(1.0, 1.0), 200.0);
    assert!(survivors.is_empty());
    assert_eq!(cleared, 0);
}

// ── check_collisions ──────────────────────────────────────────────────────────

#[test]
fn enemy_within_ship_radius_ends_game() {
    let mut w = make_world(); // ship at (400, 300)
    w.enemies = vec![Point::new(400.0, 290.0)]; // distance 10
    let (after, events) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.status, GameStatus::GameOver);
    assert_eq!(events, vec![GameEvent::GameOver { frame: 0 }]);
}

#[test]
fn enemy_outside_ship_radius_is_harmless() {
    let mut w = make_world();
    w.enemies = vec![Point::new(400.0, 275.0)]; // distance 25
    let (after, events) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.status, GameStatus::Playing);
    assert!(events.is_empty());
}

#[test]
fn enemy_exactly_at_ship_radius_is_harmless() {
    let mut w = make_world();
    w.enemies = vec![Point::new(420.0, 300.0)]; // distance 20, strict <
    let (after, _) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.status, GameStatus::Playing);
}

#[test]
fn ship_on_bomb_detonates_and_respawns_bomb() {
    let mut w = make_world();
    w.bomb = Some(Point::new(100.0, 100.0));
    w.ship = Point::new(100.0, 100.0);
    w.enemies = vec![Point::new(250.0, 100.0), Point::new(350.0, 100.0)];

    let (after, events) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.status, GameStatus::Playing);
    assert_eq!(after.enemies, vec![Point::new(350.0, 100.0)]);
    assert_eq!(after.enemies_cleared, 1);
    assert_eq!(after.detonations, 1);
    assert_eq!(
        events,
        vec![GameEvent::Detonation {
            at: Point::new(100.0, 100.0),
            cleared: 1
        }]
    );

    let bomb = after.bomb.expect("bomb respawned");
    assert_ne!(bomb, Point::new(100.0, 100.0));
    assert!(in_area(bomb, &after.config));
}

#[test]
fn bomb_pickup_uses_ship_radius_plus_bomb_radius() {
    let mut w = make_world();
    w.bomb = Some(Point::new(425.0, 300.0)); // 25 < 20 + 6
    let (after, events) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.detonations, 1);
    assert_eq!(events.len(), 1);

    w.bomb = Some(Point::new(427.0, 300.0)); // 27 >= 26
    let (after, events) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.detonations, 0);
    assert!(events.is_empty());
}

#[test]
fn game_over_wins_over_detonation() {
    let mut w = make_world();
    w.bomb = Some(w.ship);
    w.enemies = vec![Point::new(405.0, 300.0)];
    let (after, events) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.status, GameStatus::GameOver);
    assert_eq!(after.bomb, w.bomb);
    assert_eq!(after.enemies.len(), 1);
    assert!(matches!(events[..], [GameEvent::GameOver { .. }]));
}

#[test]
fn ship_is_clamped_to_area() {
    let mut w = make_world();
    w.ship = Point::new(-50.0, 700.0);
    let (after, _) = check_collisions(&w, &mut seeded_rng());
    assert_eq!(after.ship, Point::new(0.0, 600.0));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_counts_frames() {
    let w = make_world();
    let vp = identity(&w);
    let mut rng = seeded_rng();
    let (w, _) = tick(&w, &vp, &mut rng);
    let (w, _) = tick(&w, &vp, &mut rng);
    assert_eq!(w.frame, 2);
}

#[test]
fn collisions_are_checked_before_movement() {
    let mut w = no_jitter_world();
    w.enemies = vec![Point::new(400.0, 279.0)]; // 21 away, 19 after moving
    let vp = identity(&w);
    let mut rng = seeded_rng();

    let (w, events) = tick(&w, &vp, &mut rng);
    assert_eq!(w.status, GameStatus::Playing);
    assert!(events.is_empty());
    assert_abs_diff_eq!(distance(w.enemies[0], w.ship), 19.0, epsilon = 1e-9);

    let (w, events) = tick(&w, &vp, &mut rng);
    assert_eq!(w.status, GameStatus::GameOver);
    assert_eq!(events, vec![GameEvent::GameOver { frame: 2 }]);
}

#[test]
fn game_over_freezes_the_world() {
    let mut w = make_world();
    w.status = GameStatus::GameOver;
    w.enemies = vec![Point::new(100.0, 100.0)];
    let vp = identity(&w);
    let mut rng = seeded_rng();

    let (after, events) = tick(&w, &vp, &mut rng);
    assert_eq!(after, w);
    assert!(events.is_empty());

    assert_eq!(spawn_enemy(&w, &mut rng), w);
    assert_eq!(handle_key(&w, Direction::Up), w);
    assert_eq!(handle_pointer_move(&w, 1.0, 1.0), w);
}

#[test]
fn long_run_keeps_everything_in_area() {
    let mut rng = seeded_rng();
    let mut w = new_game(GameConfig::default(), &mut rng);
    let vp = identity(&w);
    // Drag the pointer around the edges to push the ship outward
    let targets = [(-100.0, -100.0), (900.0, -100.0), (900.0, 700.0), (-100.0, 700.0)];

    for frame in 0..600 {
        if frame % 15 == 0 {
            w = spawn_enemy(&w, &mut rng);
        }
        let (x, y) = targets[(frame / 150) % targets.len()];
        w = handle_pointer_move(&w, x, y);

        let (checked, _) = check_collisions(&w, &mut rng);
        assert!(in_area(checked.ship, &checked.config));

        let (next, _) = tick(&w, &vp, &mut rng);
        w = next;
        assert!(w.enemies.iter().all(|&e| in_area(e, &w.config)));
        assert!(w.bomb.is_some());
        if w.is_over() {
            break;
        }
    }
}
