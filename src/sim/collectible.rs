//! Per-level pickup
//!
//! One or more optional pickups per level. Touching one collects it for the
//! current run; the claim only becomes permanent when the run ends in a win,
//! so a death before the goal hands the pickup back. The floating/particle
//! presentation is the renderer's business; only the pickup test and the
//! collected flag live here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub center: Vec2,
    pub radius: f32,
    pub collected: bool,
}

impl Collectible {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            radius: COLLECTIBLE_RADIUS,
            collected: false,
        }
    }

    /// Circle-against-body pickup test: the body's half-extent acts as its
    /// collision radius
    pub fn touches(&self, body: &KinematicBody) -> bool {
        let body_radius = body.rect.size.x.min(body.rect.size.y) / 2.0;
        (body.rect.center() - self.center).length() < self.radius + body_radius
    }

    pub fn reset(&mut self) {
        self.collected = false;
    }
}
