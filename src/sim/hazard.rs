//! Lethal entities: spikes, gravity wells, turrets and their projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use super::collision::Aabb;
use crate::consts::*;

/// Static spike strip; lethal on any overlap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spike {
    pub rect: Aabb,
}

/// Spike strip patrolling horizontally between two x positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingSpike {
    pub rect: Aabb,
    pub start_x: f32,
    pub end_x: f32,
    pub speed: f32,
    /// +1 toward `end_x`, -1 back
    pub dir: f32,
}

impl MovingSpike {
    pub fn update(&mut self, dt: f32) {
        self.rect.pos.x += self.speed * self.dir * dt;
        if self.rect.pos.x >= self.end_x {
            self.rect.pos.x = self.end_x;
            self.dir = -1.0;
        } else if self.rect.pos.x <= self.start_x {
            self.rect.pos.x = self.start_x;
            self.dir = 1.0;
        }
    }

    pub fn reset(&mut self) {
        self.rect.pos.x = self.start_x;
        self.dir = 1.0;
    }
}

/// Point attractor with a lethal core.
///
/// The pull blends a linear and a quadratic falloff so the force stays
/// meaningful at mid range; inside the danger zone (five kill radii) it is
/// amplified up to 13x and the body additionally takes frame-rate-normalized
/// drag, making escape progressively harder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityWell {
    pub center: Vec2,
    pub pull_radius: f32,
    pub pull_strength: f32,
    pub kill_radius: f32,
}

impl GravityWell {
    /// Accelerate the body toward the well center for one tick
    pub fn apply(&self, body: &mut KinematicBody, dt: f32) {
        let to_center = self.center - body.rect.center();
        let distance = to_center.length();
        if distance >= self.pull_radius || distance <= WELL_EPSILON {
            return;
        }
        let dir = to_center / distance;
        let ratio = distance / self.pull_radius;
        let falloff = (1.0 - ratio) * 0.7 + (1.0 - ratio * ratio) * 0.3;
        let mut force = self.pull_strength * falloff * 1.5;

        let danger_zone = self.kill_radius * WELL_DANGER_FACTOR;
        let in_danger = distance < danger_zone;
        if in_danger {
            let danger = 1.0 - distance / danger_zone;
            force *= 1.0 + danger * danger * 12.0;
        }

        body.vel += dir * force * dt;

        let speed = body.vel.length();
        if speed > WELL_SPEED_CAP {
            body.vel *= WELL_SPEED_CAP / speed;
        }
        if in_danger {
            body.vel *= WELL_DRAG.powf(dt * 60.0);
        }
    }

    /// Lethal when the body center crosses into the core
    pub fn kills(&self, body: &KinematicBody) -> bool {
        (self.center - body.rect.center()).length() < self.kill_radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShootDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Fixed emplacement firing projectiles on a timer. The last half second
/// before each shot is exposed as a 0..1 charge ramp for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub rect: Aabb,
    pub shoot_direction: ShootDirection,
    pub fire_rate: f32,
    pub time_since_last_shot: f32,
    pub charging: bool,
    pub charge_progress: f32,
}

impl Turret {
    pub fn new(pos: Vec2, shoot_direction: ShootDirection, fire_rate: f32) -> Self {
        Self {
            rect: Aabb {
                pos,
                size: Vec2::new(TURRET_SIZE, TURRET_SIZE),
            },
            shoot_direction,
            fire_rate,
            time_since_last_shot: 0.0,
            charging: false,
            charge_progress: 0.0,
        }
    }

    /// Advance the fire timer; returns the spawned projectile on fire ticks
    pub fn update(&mut self, dt: f32) -> Option<Projectile> {
        self.time_since_last_shot += dt;
        let charge_start = self.fire_rate - TURRET_CHARGE_DURATION;
        if self.time_since_last_shot >= charge_start && self.time_since_last_shot < self.fire_rate
        {
            self.charging = true;
            self.charge_progress =
                ((self.time_since_last_shot - charge_start) / TURRET_CHARGE_DURATION).min(1.0);
        } else {
            self.charging = false;
            self.charge_progress = 0.0;
        }
        if self.time_since_last_shot >= self.fire_rate {
            self.time_since_last_shot = 0.0;
            return Some(self.spawn_projectile());
        }
        None
    }

    fn spawn_projectile(&self) -> Projectile {
        // Top-left corner starts on the firing edge, centered on the
        // perpendicular axis
        let center = self.rect.center();
        let (pos, vel) = match self.shoot_direction {
            ShootDirection::Left => (
                Vec2::new(self.rect.left(), center.y),
                Vec2::new(-PROJECTILE_SPEED, 0.0),
            ),
            ShootDirection::Right => (
                Vec2::new(self.rect.right(), center.y),
                Vec2::new(PROJECTILE_SPEED, 0.0),
            ),
            ShootDirection::Up => (
                Vec2::new(center.x, self.rect.top()),
                Vec2::new(0.0, -PROJECTILE_SPEED),
            ),
            ShootDirection::Down => (
                Vec2::new(center.x, self.rect.bottom()),
                Vec2::new(0.0, PROJECTILE_SPEED),
            ),
        };
        Projectile {
            rect: Aabb {
                pos,
                size: Vec2::splat(PROJECTILE_SIZE),
            },
            vel,
            lifetime: PROJECTILE_LIFETIME,
        }
    }

    pub fn reset(&mut self) {
        self.time_since_last_shot = 0.0;
        self.charging = false;
        self.charge_progress = 0.0;
    }
}

/// Turret shot; constant velocity, lethal on overlap, culled on lifetime
/// expiry or when well outside the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub rect: Aabb,
    pub vel: Vec2,
    pub lifetime: f32,
}

impl Projectile {
    pub fn update(&mut self, dt: f32) {
        self.rect.pos += self.vel * dt;
        self.lifetime -= dt;
    }

    pub fn expired(&self, bounds: Vec2) -> bool {
        self.lifetime <= 0.0
            || self.rect.right() < -PROJECTILE_CULL_MARGIN
            || self.rect.left() > bounds.x + PROJECTILE_CULL_MARGIN
            || self.rect.bottom() < -PROJECTILE_CULL_MARGIN
            || self.rect.top() > bounds.y + PROJECTILE_CULL_MARGIN
    }
}
