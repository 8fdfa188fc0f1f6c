//! Surface variants and their state machines
//!
//! All surfaces are static boxes except the moving variant. Variant behavior
//! lives in per-kind state structs updated once per tick, before any
//! collision resolution; `is_collidable()` is the single gate resolution
//! consults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// A surface: one box plus variant-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub rect: Aabb,
    pub kind: SurfaceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceKind {
    Solid,
    Destructible(DestructibleState),
    Adhesive {
        /// Cosmetic stickiness factor carried through from level data
        glue_factor: f32,
    },
    Intermittent(IntermittentState),
    Moving(MovingState),
    Pressure(PressureState),
}

/// Resolution category. Passes run in `RESOLUTION_ORDER`; within a tick the
/// last category to move the body on an axis wins positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceCategory {
    Solid,
    Destructible,
    Adhesive,
    Intermittent,
    Moving,
    Pressure,
}

impl SurfaceCategory {
    pub const RESOLUTION_ORDER: [SurfaceCategory; 6] = [
        SurfaceCategory::Solid,
        SurfaceCategory::Destructible,
        SurfaceCategory::Adhesive,
        SurfaceCategory::Intermittent,
        SurfaceCategory::Moving,
        SurfaceCategory::Pressure,
    ];
}

impl Surface {
    pub fn solid(rect: Aabb) -> Self {
        Self {
            rect,
            kind: SurfaceKind::Solid,
        }
    }

    pub fn category(&self) -> SurfaceCategory {
        match self.kind {
            SurfaceKind::Solid => SurfaceCategory::Solid,
            SurfaceKind::Destructible(_) => SurfaceCategory::Destructible,
            SurfaceKind::Adhesive { .. } => SurfaceCategory::Adhesive,
            SurfaceKind::Intermittent(_) => SurfaceCategory::Intermittent,
            SurfaceKind::Moving(_) => SurfaceCategory::Moving,
            SurfaceKind::Pressure(_) => SurfaceCategory::Pressure,
        }
    }

    pub fn is_collidable(&self) -> bool {
        match &self.kind {
            SurfaceKind::Destructible(state) => state.collidable(),
            SurfaceKind::Intermittent(state) => state.visible,
            _ => true,
        }
    }

    /// Advance variant state by one tick. Runs before collision resolution,
    /// so contact flags set during the previous tick's passes are shifted
    /// into their was-on slots here.
    pub fn update(&mut self, dt: f32) {
        match &mut self.kind {
            SurfaceKind::Destructible(state) => state.update(dt),
            SurfaceKind::Intermittent(state) => state.update(dt),
            SurfaceKind::Moving(state) => state.update(&mut self.rect, dt),
            SurfaceKind::Pressure(state) => state.update(dt),
            SurfaceKind::Solid | SurfaceKind::Adhesive { .. } => {}
        }
    }

    /// Restore initial state; used on respawn
    pub fn reset(&mut self) {
        match &mut self.kind {
            SurfaceKind::Destructible(state) => state.reset(),
            SurfaceKind::Intermittent(state) => state.reset(),
            SurfaceKind::Moving(state) => state.reset(&mut self.rect),
            SurfaceKind::Pressure(state) => state.reset(),
            SurfaceKind::Solid | SurfaceKind::Adhesive { .. } => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructiblePhase {
    Intact,
    Disintegrating,
    Destroyed,
}

/// Destructible surface: counts discrete landings, disintegrates after the
/// final one, then drops out of collision after a fixed delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestructibleState {
    pub phase: DestructiblePhase,
    pub touch_count: u32,
    pub max_touches: u32,
    timer: f32,
    on: bool,
    was_on: bool,
}

impl DestructibleState {
    pub fn new(max_touches: u32) -> Self {
        Self {
            phase: DestructiblePhase::Intact,
            touch_count: 0,
            max_touches,
            timer: 0.0,
            on: false,
            was_on: false,
        }
    }

    pub fn collidable(&self) -> bool {
        self.phase != DestructiblePhase::Destroyed
    }

    /// True once at least one touch has been consumed but the surface still
    /// holds; the renderer shakes the surface in this window.
    pub fn warned(&self) -> bool {
        self.phase == DestructiblePhase::Intact && self.touch_count > 0
    }

    /// Standing contact this tick. The counter only advances on the rising
    /// edge, so resting on the surface consumes exactly one touch.
    pub fn touch(&mut self) {
        self.on = true;
        if !self.was_on && self.phase == DestructiblePhase::Intact {
            self.touch_count += 1;
            if self.touch_count >= self.max_touches {
                self.phase = DestructiblePhase::Disintegrating;
                self.timer = 0.0;
            }
        }
    }

    fn update(&mut self, dt: f32) {
        self.was_on = self.on;
        self.on = false;
        if self.phase == DestructiblePhase::Disintegrating {
            self.timer += dt;
            if self.timer >= DISINTEGRATION_DELAY {
                self.phase = DestructiblePhase::Destroyed;
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.max_touches);
    }
}

/// Intermittent surface: visible for one half of its period, invisible for
/// the other, with a flicker warning at the end of each half. Collidability
/// follows opacity, which ramps rather than snapping, so there is a brief
/// grace window around each transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntermittentState {
    pub period: f32,
    pub start_visible: bool,
    pub visible: bool,
    pub warning: bool,
    pub opacity: f32,
    timer: f32,
}

impl IntermittentState {
    pub fn new(period: f32, start_visible: bool) -> Self {
        Self {
            period,
            start_visible,
            visible: start_visible,
            warning: false,
            opacity: if start_visible { 1.0 } else { 0.0 },
            timer: 0.0,
        }
    }

    fn update(&mut self, dt: f32) {
        self.timer += dt;
        let half = self.period / 2.0;
        let in_first_half = self.timer % self.period < half;
        let should_be_visible = in_first_half == self.start_visible;

        if self.timer % half > half - INTERMITTENT_WARNING {
            // Warning flicker is cosmetic: collidability is frozen until the
            // half-cycle actually flips
            self.warning = true;
            self.opacity = 0.3 + 0.7 * (self.timer * FLICKER_RATE).sin().abs();
        } else {
            self.warning = false;
            if should_be_visible {
                self.opacity = (self.opacity + dt * OPACITY_RAMP).min(1.0);
            } else {
                self.opacity = (self.opacity - dt * OPACITY_RAMP).max(0.0);
            }
            self.visible = self.opacity > COLLIDABLE_OPACITY;
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.period, self.start_visible);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAxis {
    Horizontal,
    Vertical,
}

/// Moving surface: oscillates along one axis between its start position and
/// an endpoint, reversing with a clamp at each end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingState {
    pub axis: MoveAxis,
    pub start: Vec2,
    pub end: Vec2,
    pub speed: f32,
    /// +1 toward `end`, -1 back toward `start`
    pub dir: f32,
}

impl MovingState {
    pub fn horizontal(start: Vec2, distance: f32, speed: f32) -> Self {
        Self {
            axis: MoveAxis::Horizontal,
            start,
            end: start + Vec2::new(distance, 0.0),
            speed,
            dir: 1.0,
        }
    }

    pub fn vertical(start: Vec2, distance: f32, speed: f32) -> Self {
        Self {
            axis: MoveAxis::Vertical,
            start,
            end: start + Vec2::new(0.0, distance),
            speed,
            dir: 1.0,
        }
    }

    /// Current platform velocity, transferred to a riding body
    pub fn velocity(&self) -> Vec2 {
        match self.axis {
            MoveAxis::Horizontal => Vec2::new(self.speed * self.dir, 0.0),
            MoveAxis::Vertical => Vec2::new(0.0, self.speed * self.dir),
        }
    }

    fn update(&mut self, rect: &mut Aabb, dt: f32) {
        match self.axis {
            MoveAxis::Horizontal => {
                rect.pos.x += self.speed * self.dir * dt;
                if rect.pos.x >= self.end.x {
                    rect.pos.x = self.end.x;
                    self.dir = -1.0;
                } else if rect.pos.x <= self.start.x {
                    rect.pos.x = self.start.x;
                    self.dir = 1.0;
                }
            }
            MoveAxis::Vertical => {
                rect.pos.y += self.speed * self.dir * dt;
                if rect.pos.y >= self.end.y {
                    rect.pos.y = self.end.y;
                    self.dir = -1.0;
                } else if rect.pos.y <= self.start.y {
                    rect.pos.y = self.start.y;
                    self.dir = 1.0;
                }
            }
        }
    }

    fn reset(&mut self, rect: &mut Aabb) {
        rect.pos = self.start;
        self.dir = 1.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikePhase {
    Hidden,
    Waiting,
    Rising,
    Active,
    Falling,
}

/// Pressure surface: collides like a solid; a landing arms a spike cycle
/// (delay, rise, stay, retract). Spikes are dangerous while rising or fully
/// out. The press depth is cosmetic sink for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureState {
    pub spikes: SpikePhase,
    /// Current spike extension above the surface top, 0..=PRESSURE_SPIKE_HEIGHT
    pub spike_height: f32,
    pub press_depth: f32,
    pub pressed: bool,
    timer: f32,
    cooldown: f32,
    on: bool,
    was_on: bool,
}

impl PressureState {
    pub fn new() -> Self {
        Self {
            spikes: SpikePhase::Hidden,
            spike_height: 0.0,
            press_depth: 0.0,
            pressed: false,
            timer: 0.0,
            cooldown: 0.0,
            on: false,
            was_on: false,
        }
    }

    /// Standing contact this tick. A fresh landing outside the retrigger
    /// cooldown presses the plate and, if the spikes are retracted, arms a
    /// new cycle.
    pub fn on_land(&mut self) {
        self.on = true;
        self.pressed = true;
        if self.cooldown <= 0.0 && !self.was_on && self.spikes == SpikePhase::Hidden {
            self.cooldown = PRESSURE_COOLDOWN;
            self.spikes = SpikePhase::Waiting;
            self.timer = 0.0;
        }
    }

    pub fn dangerous(&self) -> bool {
        matches!(self.spikes, SpikePhase::Rising | SpikePhase::Active)
    }

    /// The box the extended spikes occupy above the surface, when lethal
    pub fn danger_zone(&self, rect: &Aabb) -> Option<Aabb> {
        (self.dangerous() && self.spike_height > 0.0).then(|| {
            Aabb::new(
                rect.pos.x,
                rect.top() - self.spike_height,
                rect.size.x,
                self.spike_height,
            )
        })
    }

    fn update(&mut self, dt: f32) {
        if !self.on {
            self.pressed = false;
        }
        self.was_on = self.on;
        self.on = false;
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }

        let held = matches!(
            self.spikes,
            SpikePhase::Waiting | SpikePhase::Rising | SpikePhase::Active
        );
        if self.pressed || held {
            self.press_depth = (self.press_depth + PRESS_SPEED * dt).min(PRESS_DEPTH_MAX);
        } else {
            self.press_depth = (self.press_depth - PRESS_SPEED * dt).max(0.0);
        }

        match self.spikes {
            SpikePhase::Hidden => {}
            SpikePhase::Waiting => {
                self.timer += dt;
                if self.timer >= SPIKE_DELAY {
                    self.spikes = SpikePhase::Rising;
                    self.timer = 0.0;
                }
            }
            SpikePhase::Rising => {
                self.spike_height =
                    (self.spike_height + SPIKE_RISE_SPEED * dt).min(PRESSURE_SPIKE_HEIGHT);
                if self.spike_height >= PRESSURE_SPIKE_HEIGHT {
                    self.spikes = SpikePhase::Active;
                    self.timer = 0.0;
                }
            }
            SpikePhase::Active => {
                self.timer += dt;
                if self.timer >= SPIKE_STAY {
                    self.spikes = SpikePhase::Falling;
                }
            }
            SpikePhase::Falling => {
                self.spike_height = (self.spike_height - SPIKE_FALL_SPEED * dt).max(0.0);
                if self.spike_height <= 0.0 {
                    self.spikes = SpikePhase::Hidden;
                }
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PressureState {
    fn default() -> Self {
        Self::new()
    }
}
