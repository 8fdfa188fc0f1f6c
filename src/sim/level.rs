//! Level data contract
//!
//! Levels arrive as JSON documents. Every entity array is optional and
//! defaults to empty; tuning fields carry per-variant defaults. Malformed
//! geometry is rejected here, at load time, so the simulation never has to
//! validate mid-tick.

use glam::Vec2;
use log::info;
use serde::Deserialize;
use thiserror::Error;

use super::collectible::Collectible;
use super::collision::Aabb;
use super::hazard::{GravityWell, MovingSpike, ShootDirection, Spike, Turret};
use super::state::{Phase, World};
use super::surface::{
    DestructibleState, IntermittentState, MoveAxis, MovingState, PressureState, Surface,
    SurfaceKind,
};
use crate::consts::*;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{kind} surface at ({x}, {y}) has zero or negative extent")]
    DegenerateSurface { kind: &'static str, x: f32, y: f32 },
    #[error(
        "gravity well at ({x}, {y}): kill radius {kill_radius} must be below pull radius {pull_radius}"
    )]
    InvalidWell {
        x: f32,
        y: f32,
        kill_radius: f32,
        pull_radius: f32,
    },
    #[error("moving surface at ({x}, {y}) needs a positive speed and travel distance")]
    InvalidPath { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RectDesc {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectDesc {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    fn validate(&self, kind: &'static str) -> Result<Aabb, LevelError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LevelError::DegenerateSurface {
                kind,
                x: self.x,
                y: self.y,
            });
        }
        Ok(self.aabb())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdhesiveDesc {
    #[serde(flatten)]
    pub rect: RectDesc,
    #[serde(default = "default_glue_factor")]
    pub glue_factor: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestructibleDesc {
    #[serde(flatten)]
    pub rect: RectDesc,
    #[serde(default = "default_max_touches")]
    pub max_touches: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntermittentDesc {
    #[serde(flatten)]
    pub rect: RectDesc,
    #[serde(default = "default_interval")]
    pub interval: f32,
    #[serde(default = "default_true")]
    pub start_visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovingDesc {
    #[serde(flatten)]
    pub rect: RectDesc,
    pub direction: MoveAxis,
    pub distance: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovingSpikeDesc {
    #[serde(flatten)]
    pub rect: RectDesc,
    pub start_x: f32,
    pub end_x: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointDesc {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WellDesc {
    pub x: f32,
    pub y: f32,
    pub pull_radius: f32,
    pub pull_strength: f32,
    pub kill_radius: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TurretDesc {
    pub x: f32,
    pub y: f32,
    pub shoot_direction: ShootDirection,
    #[serde(default = "default_fire_rate")]
    pub fire_rate: f32,
}

fn default_glue_factor() -> f32 {
    0.4
}

fn default_max_touches() -> u32 {
    DESTRUCTIBLE_MAX_TOUCHES
}

fn default_interval() -> f32 {
    INTERMITTENT_PERIOD
}

fn default_true() -> bool {
    true
}

fn default_fire_rate() -> f32 {
    2.0
}

/// Parsed level document. `build` turns it into a live `World`.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub start: RectDesc,
    pub goal: RectDesc,
    pub three_star_time: f32,
    pub two_star_time: f32,
    #[serde(default)]
    pub solids: Vec<RectDesc>,
    #[serde(default)]
    pub destructibles: Vec<DestructibleDesc>,
    #[serde(default)]
    pub adhesives: Vec<AdhesiveDesc>,
    #[serde(default)]
    pub intermittents: Vec<IntermittentDesc>,
    #[serde(default)]
    pub movers: Vec<MovingDesc>,
    #[serde(default)]
    pub pressure_plates: Vec<RectDesc>,
    #[serde(default)]
    pub spikes: Vec<RectDesc>,
    #[serde(default)]
    pub moving_spikes: Vec<MovingSpikeDesc>,
    #[serde(default)]
    pub gravity_wells: Vec<WellDesc>,
    #[serde(default)]
    pub turrets: Vec<TurretDesc>,
    #[serde(default)]
    pub collectibles: Vec<PointDesc>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate geometry and construct the initial world state
    pub fn build(&self) -> Result<World, LevelError> {
        let mut surfaces = Vec::new();

        for desc in &self.solids {
            surfaces.push(Surface::solid(desc.validate("solid")?));
        }
        for desc in &self.destructibles {
            surfaces.push(Surface {
                rect: desc.rect.validate("destructible")?,
                kind: SurfaceKind::Destructible(DestructibleState::new(desc.max_touches)),
            });
        }
        for desc in &self.adhesives {
            surfaces.push(Surface {
                rect: desc.rect.validate("adhesive")?,
                kind: SurfaceKind::Adhesive {
                    glue_factor: desc.glue_factor,
                },
            });
        }
        for desc in &self.intermittents {
            surfaces.push(Surface {
                rect: desc.rect.validate("intermittent")?,
                kind: SurfaceKind::Intermittent(IntermittentState::new(
                    desc.interval,
                    desc.start_visible,
                )),
            });
        }
        for desc in &self.movers {
            let rect = desc.rect.validate("moving")?;
            if desc.speed <= 0.0 || desc.distance <= 0.0 {
                return Err(LevelError::InvalidPath {
                    x: desc.rect.x,
                    y: desc.rect.y,
                });
            }
            let state = match desc.direction {
                MoveAxis::Horizontal => MovingState::horizontal(rect.pos, desc.distance, desc.speed),
                MoveAxis::Vertical => MovingState::vertical(rect.pos, desc.distance, desc.speed),
            };
            surfaces.push(Surface {
                rect,
                kind: SurfaceKind::Moving(state),
            });
        }
        for desc in &self.pressure_plates {
            surfaces.push(Surface {
                rect: desc.validate("pressure")?,
                kind: SurfaceKind::Pressure(PressureState::new()),
            });
        }

        let mut wells = Vec::new();
        for desc in &self.gravity_wells {
            if desc.kill_radius >= desc.pull_radius {
                return Err(LevelError::InvalidWell {
                    x: desc.x,
                    y: desc.y,
                    kill_radius: desc.kill_radius,
                    pull_radius: desc.pull_radius,
                });
            }
            wells.push(GravityWell {
                center: Vec2::new(desc.x, desc.y),
                pull_radius: desc.pull_radius,
                pull_strength: desc.pull_strength,
                kill_radius: desc.kill_radius,
            });
        }

        let spikes = self
            .spikes
            .iter()
            .map(|desc| Ok(Spike { rect: desc.validate("spike")? }))
            .collect::<Result<Vec<_>, LevelError>>()?;

        let moving_spikes = self
            .moving_spikes
            .iter()
            .map(|desc| {
                Ok(MovingSpike {
                    rect: desc.rect.validate("moving spike")?,
                    start_x: desc.start_x,
                    end_x: desc.end_x,
                    speed: desc.speed,
                    dir: 1.0,
                })
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        let turrets = self
            .turrets
            .iter()
            .map(|desc| Turret::new(Vec2::new(desc.x, desc.y), desc.shoot_direction, desc.fire_rate))
            .collect();

        let collectibles = self
            .collectibles
            .iter()
            .map(|desc| Collectible::new(Vec2::new(desc.x, desc.y)))
            .collect();

        let start = self.start.aabb();
        let world = World {
            level_name: self.name.clone(),
            body: super::body::KinematicBody::new(start.pos),
            surfaces,
            wells,
            spikes,
            moving_spikes,
            turrets,
            projectiles: Vec::new(),
            collectibles,
            start,
            goal: self.goal.aabb(),
            three_star_time: self.three_star_time,
            two_star_time: self.two_star_time,
            bounds: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            elapsed: 0.0,
            timer_started: false,
            goal_triggered: false,
            phase: Phase::Playing,
        };

        info!(
            "loaded level '{}': {} surfaces, {} wells, {} turrets",
            self.name,
            world.surfaces.len(),
            world.wells.len(),
            world.turrets.len()
        );
        Ok(world)
    }
}
