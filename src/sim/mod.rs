//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep, clamped at the tick boundary
//! - No randomness, no I/O, no platform dependencies
//! - Single-writer: the `World` aggregate exclusively owns all mutable state
//!   for the duration of one tick; external consumers read between ticks

pub mod body;
pub mod collectible;
pub mod collision;
pub mod hazard;
pub mod level;
pub mod state;
pub mod surface;
pub mod tick;

pub use body::{CornerSide, KinematicBody};
pub use collectible::Collectible;
pub use collision::{Aabb, Contact, Overlap, resolve_category};
pub use hazard::{GravityWell, MovingSpike, Projectile, ShootDirection, Spike, Turret};
pub use level::{LevelData, LevelError};
pub use state::{Phase, World, star_rating};
pub use surface::{Surface, SurfaceCategory, SurfaceKind};
pub use tick::{DeathCause, TickEvent, TickInput, tick};
