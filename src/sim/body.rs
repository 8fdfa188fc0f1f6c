//! Player-controlled kinematic body

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tick::TickInput;
use crate::consts::*;

/// Which edge of a surface the body is balancing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerSide {
    Left,
    Right,
}

/// The player-controlled body. An axis-aligned box driven by velocity;
/// horizontal input sets velocity directly (no acceleration curve), vertical
/// motion comes from gravity and jump impulses applied by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    pub rect: Aabb,
    pub vel: Vec2,
    pub speed: f32,
    pub jump_force: f32,
    pub max_jumps: u32,
    /// Jumps consumed since the last grounding
    pub jump_count: u32,
    pub grounded: bool,
    /// Adhered to the side or underside of an adhesive surface; suppresses
    /// gravity while set and not grounded. Re-armed (cleared) every tick
    /// before resolution so detaching is implicit.
    pub stuck_to_adhesive: bool,
    /// Set by landing on an adhesive top; halves the airborne jump budget
    /// until the next non-adhesive grounding
    pub last_jump_from_adhesive: bool,
    /// Corner-balance sub-state, set by a Solid top landing with marginal
    /// overlap and cleared at the start of every resolution phase
    pub corner: Option<CornerSide>,
    corner_time: f32,
    jump_was_held: bool,
}

impl KinematicBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            rect: Aabb {
                pos,
                size: Vec2::new(BODY_WIDTH, BODY_HEIGHT),
            },
            vel: Vec2::ZERO,
            speed: RUN_SPEED,
            jump_force: JUMP_FORCE,
            max_jumps: MAX_JUMPS,
            jump_count: 0,
            grounded: false,
            stuck_to_adhesive: false,
            last_jump_from_adhesive: false,
            corner: None,
            corner_time: 0.0,
            jump_was_held: false,
        }
    }

    /// Jump budget for the current airtime
    pub fn allowed_jumps(&self) -> u32 {
        if self.last_jump_from_adhesive {
            1
        } else {
            self.max_jumps
        }
    }

    /// Apply input, the corner-balance timer and Euler integration for one
    /// tick. Jumps trigger on the rising edge of the jump input only, and
    /// detach the body from any adhesive surface.
    pub fn update(&mut self, input: &TickInput, dt: f32) {
        self.vel.x = if input.left {
            -self.speed
        } else if input.right {
            self.speed
        } else {
            0.0
        };

        if input.jump && !self.jump_was_held && self.jump_count < self.allowed_jumps() {
            self.vel.y = self.jump_force;
            self.jump_count += 1;
            self.grounded = false;
            self.stuck_to_adhesive = false;
        }
        self.jump_was_held = input.jump;

        // Balancing on a corner: after a short idle the body tips off
        // toward the open side
        if let Some(side) = self.corner {
            self.corner_time += dt;
            if self.corner_time > CORNER_BALANCE_TIME && !input.left && !input.right {
                let dir = match side {
                    CornerSide::Left => -1.0,
                    CornerSide::Right => 1.0,
                };
                self.vel.x = dir * self.speed * CORNER_SLIDE_FACTOR;
            }
        } else {
            self.corner_time = 0.0;
        }

        self.rect.pos += self.vel * dt;
    }

    /// Ground the body flush on a surface top and reset its jump state.
    /// `adhesive` records whether the landing surface limits the next jump
    /// budget.
    pub fn land(&mut self, surface_top: f32, adhesive: bool) {
        self.rect.pos.y = surface_top - self.rect.size.y;
        self.vel.y = 0.0;
        self.grounded = true;
        self.jump_count = 0;
        self.last_jump_from_adhesive = adhesive;
    }

    /// Clamp against the left, right and top world edges, zeroing the
    /// velocity component pointing out. The bottom edge stays open; falling
    /// out is the orchestrator's death check.
    pub fn clamp_to_bounds(&mut self, bounds: Vec2) {
        if self.rect.pos.x < 0.0 {
            self.rect.pos.x = 0.0;
            self.vel.x = self.vel.x.max(0.0);
        } else if self.rect.right() > bounds.x {
            self.rect.pos.x = bounds.x - self.rect.size.x;
            self.vel.x = self.vel.x.min(0.0);
        }
        if self.rect.pos.y < 0.0 {
            self.rect.pos.y = 0.0;
            self.vel.y = self.vel.y.max(0.0);
        }
    }
}
