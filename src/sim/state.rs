//! World aggregate and run lifecycle

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use super::collectible::Collectible;
use super::collision::Aabb;
use super::hazard::{GravityWell, MovingSpike, Projectile, Spike, Turret};
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Dead,
    Won,
}

/// The whole simulation state for one level run. Exclusive owner of all
/// mutable sim data; `tick` is the only writer during a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub level_name: String,
    pub body: KinematicBody,
    pub surfaces: Vec<Surface>,
    pub wells: Vec<GravityWell>,
    pub spikes: Vec<Spike>,
    pub moving_spikes: Vec<MovingSpike>,
    pub turrets: Vec<Turret>,
    pub projectiles: Vec<Projectile>,
    pub collectibles: Vec<Collectible>,
    pub start: Aabb,
    pub goal: Aabb,
    pub three_star_time: f32,
    pub two_star_time: f32,
    pub bounds: Vec2,
    /// Run time in seconds; starts counting at the first directional or
    /// jump input, not at load
    pub elapsed: f32,
    pub timer_started: bool,
    pub goal_triggered: bool,
    pub phase: Phase,
}

impl World {
    /// Star count for the current elapsed time
    pub fn stars(&self) -> u8 {
        star_rating(self.elapsed, self.three_star_time, self.two_star_time)
    }

    /// Count of pickups collected in the current run
    pub fn collected(&self) -> usize {
        self.collectibles.iter().filter(|c| c.collected).count()
    }

    /// Put the level back into its initial state after a death: body at the
    /// start box, timer zeroed, all surface and hazard state machines reset,
    /// projectiles cleared, unclaimed pickups handed back. Destructible
    /// surfaces come back whole.
    pub fn respawn(&mut self) {
        self.body = KinematicBody::new(self.start.pos);
        for surface in &mut self.surfaces {
            surface.reset();
        }
        for spike in &mut self.moving_spikes {
            spike.reset();
        }
        for turret in &mut self.turrets {
            turret.reset();
        }
        for collectible in &mut self.collectibles {
            collectible.reset();
        }
        self.projectiles.clear();
        self.elapsed = 0.0;
        self.timer_started = false;
        self.goal_triggered = false;
        self.phase = Phase::Playing;
        debug!("respawned in '{}'", self.level_name);
    }
}

/// Completion rating; always at least one star
pub fn star_rating(elapsed: f32, three_star_time: f32, two_star_time: f32) -> u8 {
    if elapsed <= three_star_time {
        3
    } else if elapsed <= two_star_time {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelData;
    use crate::sim::surface::{DestructiblePhase, SurfaceKind};

    #[test]
    fn test_star_rating_thresholds() {
        assert_eq!(star_rating(10.0, 15.0, 30.0), 3);
        assert_eq!(star_rating(15.0, 15.0, 30.0), 3);
        assert_eq!(star_rating(15.1, 15.0, 30.0), 2);
        assert_eq!(star_rating(30.0, 15.0, 30.0), 2);
        assert_eq!(star_rating(31.0, 15.0, 30.0), 1);
    }

    #[test]
    fn test_respawn_restores_initial_state() {
        let json = r#"{
            "start": { "x": 50, "y": 600, "width": 40, "height": 40 },
            "goal": { "x": 1100, "y": 600, "width": 60, "height": 60 },
            "three_star_time": 15.0,
            "two_star_time": 30.0,
            "destructibles": [ { "x": 200, "y": 600, "width": 100, "height": 20 } ]
        }"#;
        let mut world = LevelData::from_json(json).unwrap().build().unwrap();

        world.body.rect.pos = Vec2::new(400.0, 100.0);
        world.elapsed = 12.0;
        world.timer_started = true;
        world.phase = Phase::Dead;
        if let SurfaceKind::Destructible(state) = &mut world.surfaces[0].kind {
            state.touch();
            state.touch();
        }

        world.respawn();

        assert_eq!(world.body.rect.pos, Vec2::new(50.0, 600.0));
        assert_eq!(world.elapsed, 0.0);
        assert!(!world.timer_started);
        assert_eq!(world.phase, Phase::Playing);
        let SurfaceKind::Destructible(state) = &world.surfaces[0].kind else {
            panic!("expected destructible");
        };
        assert_eq!(state.phase, DestructiblePhase::Intact);
        assert_eq!(state.touch_count, 0);
    }
}
