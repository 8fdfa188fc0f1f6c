//! Gloop - a deterministic 2D platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body, surfaces, hazards, tick loop)
//! - `scores`: Per-level best time / star bookkeeping
//!
//! Rendering, audio, menus and save storage live outside this crate. The
//! surrounding shell drives `sim::tick` once per frame with clamped delta
//! time and reads state between ticks; nothing here performs I/O.

pub mod scores;
pub mod sim;

pub use scores::ScoreBoard;
pub use sim::level::{LevelData, LevelError};
pub use sim::state::{Phase, World, star_rating};
pub use sim::tick::{DeathCause, TickEvent, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Upper bound on per-frame delta time; larger values are clamped to
    /// prevent tunneling on frame hitches
    pub const MAX_DT: f32 = 0.1;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 700.0;
    /// How far below the world bottom the body may fall before dying
    pub const FALL_MARGIN: f32 = 100.0;

    /// Body defaults
    pub const BODY_WIDTH: f32 = 40.0;
    pub const BODY_HEIGHT: f32 = 40.0;
    pub const RUN_SPEED: f32 = 300.0;
    /// Jump impulse (negative = up)
    pub const JUMP_FORCE: f32 = -600.0;
    pub const MAX_JUMPS: u32 = 2;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1500.0;

    /// Seconds the goal ignores the body after level start (no instant win
    /// when spawn and goal overlap)
    pub const GOAL_COOLDOWN: f32 = 1.0;

    /// Corner balancing: a top landing with less than this fraction of the
    /// body width on the surface counts as a corner
    pub const CORNER_THRESHOLD: f32 = 0.4;
    /// Seconds of idle balancing before the body slides off
    pub const CORNER_BALANCE_TIME: f32 = 0.3;
    /// Slide-off speed as a fraction of run speed
    pub const CORNER_SLIDE_FACTOR: f32 = 0.3;

    /// Destructible surfaces
    pub const DESTRUCTIBLE_MAX_TOUCHES: u32 = 2;
    pub const DISINTEGRATION_DELAY: f32 = 0.5;

    /// Intermittent surfaces
    pub const INTERMITTENT_PERIOD: f32 = 2.0;
    pub const INTERMITTENT_WARNING: f32 = 0.3;
    /// Opacity fade rate (per second) between visibility phases
    pub const OPACITY_RAMP: f32 = 4.0;
    /// Warning flicker rate (radians per second)
    pub const FLICKER_RATE: f32 = 15.0;
    /// Collidable iff opacity is above this
    pub const COLLIDABLE_OPACITY: f32 = 0.5;

    /// Pressure surfaces
    pub const PRESS_DEPTH_MAX: f32 = 5.0;
    pub const PRESS_SPEED: f32 = 20.0;
    pub const PRESSURE_SPIKE_HEIGHT: f32 = 40.0;
    pub const SPIKE_RISE_SPEED: f32 = 100.0;
    pub const SPIKE_FALL_SPEED: f32 = 80.0;
    pub const SPIKE_DELAY: f32 = 1.0;
    pub const SPIKE_STAY: f32 = 2.0;
    pub const PRESSURE_COOLDOWN: f32 = 0.2;

    /// Gravity wells: below this distance no force is applied (division guard)
    pub const WELL_EPSILON: f32 = 0.1;
    /// Danger zone extends to kill_radius times this
    pub const WELL_DANGER_FACTOR: f32 = 5.0;
    /// Speed cap while under gravity-well pull
    pub const WELL_SPEED_CAP: f32 = 1200.0;
    /// Per-tick drag inside the danger zone, applied as drag^(dt*60)
    pub const WELL_DRAG: f32 = 0.98;

    /// Pickup radius (half the rendered diameter)
    pub const COLLECTIBLE_RADIUS: f32 = 16.0;

    /// Turrets and projectiles
    pub const TURRET_SIZE: f32 = 40.0;
    pub const TURRET_CHARGE_DURATION: f32 = 0.5;
    pub const PROJECTILE_SPEED: f32 = 300.0;
    pub const PROJECTILE_SIZE: f32 = 16.0;
    pub const PROJECTILE_LIFETIME: f32 = 5.0;
    /// Projectiles are culled this far outside world bounds
    pub const PROJECTILE_CULL_MARGIN: f32 = 50.0;
}
