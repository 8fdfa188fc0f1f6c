//! Fixed-order frame orchestrator
//!
//! One call advances the whole world by one clamped timestep. The step order
//! is load-bearing: surface state machines run before resolution so
//! collidability is settled for the tick, adhesion from the previous tick
//! suppresses gravity before it is re-armed, and lethal checks run last
//! against fully resolved positions.

use log::debug;
use serde::{Deserialize, Serialize};

use super::collision::resolve_category;
use super::state::{Phase, World};
use super::surface::{SurfaceCategory, SurfaceKind};
use crate::consts::*;

/// Edge-level input sampled by the caller once per frame
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.left || self.right || self.jump
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Spike,
    Projectile,
    OutOfBounds,
    GravityWell,
}

/// Outcome of a tick, when it produced one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickEvent {
    Died(DeathCause),
    /// Run complete; `collected` pickups are claimed by this win
    Won { elapsed: f32, collected: usize },
    /// The body overlaps the goal but the post-spawn cooldown has not
    /// elapsed yet
    GoalCooldownActive,
}

/// Advance the world by one frame. Returns at most one event; terminal
/// events flip the phase, and further ticks are no-ops until `respawn`.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Option<TickEvent> {
    if world.phase != Phase::Playing {
        return None;
    }
    let dt = dt.min(MAX_DT);

    // Surface and hazard state machines settle first so resolution and
    // death checks see this tick's geometry
    for surface in &mut world.surfaces {
        surface.update(dt);
    }
    for spike in &mut world.moving_spikes {
        spike.update(dt);
    }
    for turret in &mut world.turrets {
        if let Some(projectile) = turret.update(dt) {
            world.projectiles.push(projectile);
        }
    }
    for projectile in &mut world.projectiles {
        projectile.update(dt);
    }
    let bounds = world.bounds;
    world.projectiles.retain(|p| !p.expired(bounds));

    // Run clock starts on the first input
    if !world.timer_started && input.any() {
        world.timer_started = true;
    }
    if world.timer_started {
        world.elapsed += dt;
    }

    for well in &world.wells {
        well.apply(&mut world.body, dt);
    }

    // Adhesion from the previous tick's resolution suppresses gravity for
    // exactly one tick, then re-arms; grounded bodies keep accumulating a
    // tick of gravity that landing zeroes again
    if !(world.body.stuck_to_adhesive && !world.body.grounded) {
        world.body.vel.y += GRAVITY * dt;
    }
    world.body.stuck_to_adhesive = false;

    world.body.update(input, dt);
    world.body.clamp_to_bounds(world.bounds);

    // Contact state is rebuilt from scratch every tick
    world.body.grounded = false;
    world.body.corner = None;
    for category in SurfaceCategory::RESOLUTION_ORDER {
        resolve_category(&mut world.body, &mut world.surfaces, category, dt);
    }

    // Pickups, at the resolved position; death before the goal hands them
    // back via respawn
    for collectible in &mut world.collectibles {
        if !collectible.collected && collectible.touches(&world.body) {
            collectible.collected = true;
            debug!("picked up collectible at {}", collectible.center);
        }
    }

    // Lethal checks, against resolved positions
    for spike in &world.spikes {
        if world.body.rect.overlaps(&spike.rect) {
            return Some(die(world, DeathCause::Spike));
        }
    }
    for spike in &world.moving_spikes {
        if world.body.rect.overlaps(&spike.rect) {
            return Some(die(world, DeathCause::Spike));
        }
    }
    for surface in &world.surfaces {
        if let SurfaceKind::Pressure(state) = &surface.kind {
            if let Some(zone) = state.danger_zone(&surface.rect) {
                if world.body.rect.overlaps(&zone) {
                    return Some(die(world, DeathCause::Spike));
                }
            }
        }
    }
    for projectile in &world.projectiles {
        if world.body.rect.overlaps(&projectile.rect) {
            return Some(die(world, DeathCause::Projectile));
        }
    }

    let mut goal_on_cooldown = false;
    if !world.goal_triggered && world.body.rect.overlaps(&world.goal) {
        if world.elapsed >= GOAL_COOLDOWN {
            world.goal_triggered = true;
            world.phase = Phase::Won;
            debug!(
                "won '{}' in {:.2}s ({} stars, {} pickups)",
                world.level_name,
                world.elapsed,
                world.stars(),
                world.collected()
            );
            return Some(TickEvent::Won {
                elapsed: world.elapsed,
                collected: world.collected(),
            });
        }
        goal_on_cooldown = true;
    }

    if world.body.rect.pos.y > world.bounds.y + FALL_MARGIN {
        return Some(die(world, DeathCause::OutOfBounds));
    }

    // Well core check runs last so a same-tick goal overlap still wins
    for well in &world.wells {
        if well.kills(&world.body) {
            return Some(die(world, DeathCause::GravityWell));
        }
    }

    goal_on_cooldown.then_some(TickEvent::GoalCooldownActive)
}

fn die(world: &mut World, cause: DeathCause) -> TickEvent {
    world.phase = Phase::Dead;
    debug!("died in '{}': {:?}", world.level_name, cause);
    TickEvent::Died(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelData;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn flat_level() -> World {
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "solids": [ { "x": 0, "y": 600, "width": 1200, "height": 100 } ]
        }"#;
        LevelData::from_json(json).unwrap().build().unwrap()
    }

    fn run(world: &mut World, input: TickInput, seconds: f32) -> Option<TickEvent> {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            if let Some(event) = tick(world, &input, DT) {
                return Some(event);
            }
        }
        None
    }

    #[test]
    fn test_timer_starts_on_first_input() {
        let mut world = flat_level();
        run(&mut world, TickInput::default(), 1.0);
        assert_eq!(world.elapsed, 0.0);

        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        run(&mut world, right, 0.5);
        assert!(world.elapsed > 0.4);
    }

    #[test]
    fn test_body_settles_on_floor() {
        let mut world = flat_level();
        run(&mut world, TickInput::default(), 1.0);
        assert!(world.body.grounded);
        assert_eq!(world.body.rect.pos.y, 560.0);
    }

    #[test]
    fn test_walks_into_goal_and_wins() {
        let mut world = flat_level();
        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        let event = run(&mut world, right, 10.0);
        assert!(matches!(event, Some(TickEvent::Won { .. })));
        assert_eq!(world.phase, Phase::Won);
    }

    #[test]
    fn test_goal_cooldown_blocks_instant_win() {
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 90, "y": 540, "width": 80, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "solids": [ { "x": 0, "y": 600, "width": 1200, "height": 100 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let jump = TickInput {
            jump: true,
            ..TickInput::default()
        };
        let event = tick(&mut world, &jump, DT);
        assert_eq!(event, Some(TickEvent::GoalCooldownActive));
        assert_eq!(world.phase, Phase::Playing);

        // After the cooldown the same overlap wins
        let event = run(&mut world, jump, 1.5);
        assert!(matches!(event, Some(TickEvent::Won { .. })));
    }

    #[test]
    fn test_fall_out_of_world_dies() {
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let event = run(&mut world, TickInput::default(), 3.0);
        assert_eq!(event, Some(TickEvent::Died(DeathCause::OutOfBounds)));
        assert_eq!(world.phase, Phase::Dead);
    }

    #[test]
    fn test_terminal_phase_is_inert() {
        let mut world = flat_level();
        world.phase = Phase::Dead;
        let pos = world.body.rect.pos;
        assert_eq!(tick(&mut world, &TickInput::default(), DT), None);
        assert_eq!(world.body.rect.pos, pos);
    }

    #[test]
    fn test_spike_overlap_dies() {
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "solids": [ { "x": 0, "y": 600, "width": 1200, "height": 100 } ],
            "spikes": [ { "x": 300, "y": 580, "width": 60, "height": 20 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        let event = run(&mut world, right, 3.0);
        assert_eq!(event, Some(TickEvent::Died(DeathCause::Spike)));
    }

    #[test]
    fn test_adhesive_side_stick_suppresses_gravity() {
        let json = r#"{
            "start": { "x": 100, "y": 250, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "adhesives": [ { "x": 200, "y": 100, "width": 40, "height": 500 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        // Run into the wall mid-fall and stick
        run(&mut world, right, 0.3);
        assert!(world.body.stuck_to_adhesive);
        assert_eq!(world.body.rect.right(), 200.0);
        let stuck_vy = world.body.vel.y;
        assert!(stuck_vy > 0.0, "hit the wall while falling");

        // Holding into the wall keeps re-sticking; gravity is suppressed, so
        // the body slides along the wall at exactly its stick velocity
        run(&mut world, right, 0.2);
        assert!(world.body.stuck_to_adhesive);
        assert_eq!(world.body.vel.y, stuck_vy);

        // Releasing input detaches and gravity resumes accelerating
        run(&mut world, TickInput::default(), 0.2);
        assert!(!world.body.stuck_to_adhesive);
        assert!(world.body.vel.y > stuck_vy);
    }

    #[test]
    fn test_clamped_jump_tunnels_thin_platform() {
        // At the dt clamp a rising body can cross a thin platform's whole
        // bottom-resolution window in one step, leaving a top-side overlap
        // the falling guard refuses to resolve; the tick must tolerate that
        // and let the body keep rising
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "solids": [
                { "x": 0, "y": 600, "width": 1200, "height": 100 },
                { "x": 0, "y": 480, "width": 1200, "height": 20 }
            ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let jump = TickInput {
            jump: true,
            ..TickInput::default()
        };
        for _ in 0..3 {
            tick(&mut world, &jump, 0.1);
        }
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.body.rect.bottom() < 480.0, "rose past the platform");
        assert!(!world.body.grounded);
    }

    #[test]
    fn test_collectible_claimed_on_win() {
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 500, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "solids": [ { "x": 0, "y": 600, "width": 1200, "height": 100 } ],
            "collectibles": [ { "x": 300, "y": 580 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        let event = run(&mut world, right, 10.0);
        assert!(world.collectibles[0].collected);
        assert!(matches!(event, Some(TickEvent::Won { collected: 1, .. })));
    }

    #[test]
    fn test_death_hands_collectible_back() {
        let json = r#"{
            "start": { "x": 100, "y": 560, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "solids": [ { "x": 0, "y": 600, "width": 400, "height": 100 } ],
            "collectibles": [ { "x": 300, "y": 580 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let right = TickInput {
            right: true,
            ..TickInput::default()
        };
        // Grab the pickup, then walk off the floor's end and fall out
        let event = run(&mut world, right, 5.0);
        assert_eq!(event, Some(TickEvent::Died(DeathCause::OutOfBounds)));
        assert!(world.collectibles[0].collected);

        world.respawn();
        assert!(!world.collectibles[0].collected);
    }

    #[test]
    fn test_destructible_fall_through_after_final_touch() {
        let json = r#"{
            "start": { "x": 100, "y": 100, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "destructibles": [ { "x": 50, "y": 300, "width": 200, "height": 20 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();

        // First landing: one touch consumed, still standing
        run(&mut world, TickInput::default(), 1.0);
        assert!(world.body.grounded);
        assert_eq!(world.body.rect.pos.y, 260.0);

        // Jump off and land again: second touch, disintegration, and after
        // the delay the body falls through and out
        let jump = TickInput {
            jump: true,
            ..TickInput::default()
        };
        tick(&mut world, &jump, DT);
        let event = run(&mut world, TickInput::default(), 4.0);
        assert_eq!(event, Some(TickEvent::Died(DeathCause::OutOfBounds)));
    }

    #[test]
    fn test_gravity_well_pulls_and_kills() {
        let json = r#"{
            "start": { "x": 380, "y": 280, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 540, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "gravity_wells": [
                { "x": 600, "y": 300, "pull_radius": 400, "pull_strength": 3000, "kill_radius": 60 }
            ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();
        let event = run(&mut world, TickInput::default(), 5.0);
        assert_eq!(event, Some(TickEvent::Died(DeathCause::GravityWell)));
    }

    #[test]
    fn test_dt_clamped() {
        let mut world = flat_level();
        // Settle on the floor, then feed a huge frame hitch
        run(&mut world, TickInput::default(), 0.5);
        let before = world.body.rect.pos;
        tick(&mut world, &TickInput::default(), 5.0);
        // Grounded with no input: at most one clamped tick of drift
        assert!((world.body.rect.pos.y - before.y).abs() < 20.0);
        assert_eq!(world.phase, Phase::Playing);
    }
}
