//! AABB collision detection and penetration resolution
//!
//! Everything collidable in the world is an axis-aligned rectangle. An
//! overlapping body/surface pair is corrected along the axis with the
//! smallest penetration, with velocity-direction guards so a rising body is
//! never snapped onto a surface top. Variant-specific side effects (touch
//! counters, adhesion, platform velocity transfer) are applied here so the
//! orchestrator only has to sequence category passes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{CornerSide, KinematicBody};
use super::surface::{Surface, SurfaceCategory, SurfaceKind};
use crate::consts::*;

/// Axis-aligned box. `pos` is the top-left corner; +y points down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The side of a surface the body is pushed out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Body rests on the surface top
    Top,
    /// Body is pushed below the surface
    Bottom,
    /// Body is pushed to the surface's left
    Left,
    /// Body is pushed to the surface's right
    Right,
}

/// The four candidate penetration depths for an overlapping pair
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlap {
    /// Compute penetration depths, or `None` if the pair does not overlap
    pub fn between(body: &Aabb, surface: &Aabb) -> Option<Self> {
        if !body.overlaps(surface) {
            return None;
        }
        Some(Self {
            left: body.right() - surface.left(),
            right: surface.right() - body.left(),
            top: body.bottom() - surface.top(),
            bottom: surface.bottom() - body.top(),
        })
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }

    /// Pick the resolution side for the minimum-penetration axis.
    ///
    /// Top applies only while the body is falling or stationary, bottom only
    /// while rising; left/right have no directional guard. A guard failure
    /// yields no contact at all rather than falling through to another axis.
    pub fn contact(&self, vel: Vec2) -> Option<Contact> {
        let min = self.min();
        if min == self.top {
            (vel.y >= 0.0).then_some(Contact::Top)
        } else if min == self.bottom {
            (vel.y < 0.0).then_some(Contact::Bottom)
        } else if min == self.left {
            Some(Contact::Left)
        } else {
            Some(Contact::Right)
        }
    }
}

/// Resolve the body against every collidable surface of one category.
///
/// Categories run in `SurfaceCategory::RESOLUTION_ORDER`; the last writer
/// for an axis within a tick wins positionally.
pub fn resolve_category(
    body: &mut KinematicBody,
    surfaces: &mut [Surface],
    category: SurfaceCategory,
    dt: f32,
) {
    for surface in surfaces.iter_mut() {
        if surface.category() != category || !surface.is_collidable() {
            continue;
        }
        let Some(overlap) = Overlap::between(&body.rect, &surface.rect) else {
            continue;
        };
        let rect = surface.rect;
        match &mut surface.kind {
            SurfaceKind::Solid => {
                resolve_solid(body, &rect, &overlap, true);
            }
            SurfaceKind::Destructible(state) => {
                if resolve_solid(body, &rect, &overlap, false) == Some(Contact::Top) {
                    state.touch();
                }
            }
            SurfaceKind::Adhesive { .. } => {
                resolve_adhesive(body, &rect, &overlap);
            }
            SurfaceKind::Intermittent(_) => {
                // Invisible surfaces were filtered out by is_collidable()
                resolve_solid(body, &rect, &overlap, false);
            }
            SurfaceKind::Moving(state) => {
                resolve_moving(body, &rect, &overlap, state.velocity(), dt);
            }
            SurfaceKind::Pressure(state) => {
                if resolve_solid(body, &rect, &overlap, false) == Some(Contact::Top) {
                    state.on_land();
                }
            }
        }
    }
}

/// Standard min-overlap resolution. Top contact grounds the body and resets
/// its jump state; `corner_check` enables the corner-balance sub-state for
/// landings with less than `CORNER_THRESHOLD` of the body on the surface.
fn resolve_solid(
    body: &mut KinematicBody,
    rect: &Aabb,
    overlap: &Overlap,
    corner_check: bool,
) -> Option<Contact> {
    let contact = overlap.contact(body.vel)?;
    match contact {
        Contact::Top => {
            body.land(rect.top(), false);
            if corner_check {
                let threshold = body.rect.size.x * CORNER_THRESHOLD;
                // overlap.left small = body hangs off the surface's left edge
                if overlap.left > 0.0 && overlap.left < threshold {
                    body.corner = Some(CornerSide::Left);
                } else if overlap.right > 0.0 && overlap.right < threshold {
                    body.corner = Some(CornerSide::Right);
                }
            }
        }
        Contact::Bottom => {
            body.rect.pos.y = rect.bottom();
            body.vel.y = 0.0;
        }
        Contact::Left => {
            body.rect.pos.x = rect.left() - body.rect.size.x;
            body.vel.x = 0.0;
        }
        Contact::Right => {
            body.rect.pos.x = rect.right();
            body.vel.x = 0.0;
        }
    }
    Some(contact)
}

/// Adhesive resolution: a top landing behaves like a solid landing but marks
/// the jump as adhesive-limited; any other side sticks the body (flush,
/// resolved velocity component zeroed, adhesion flag set). The cross-axis
/// component survives, so a body that hit the wall while falling keeps
/// sliding along it with gravity suppressed. Side sticking requires the body
/// to be moving into the surface.
fn resolve_adhesive(body: &mut KinematicBody, rect: &Aabb, overlap: &Overlap) {
    let min = overlap.min();
    if min == overlap.top && body.vel.y >= 0.0 {
        body.land(rect.top(), true);
    } else if min == overlap.bottom && body.vel.y < 0.0 {
        body.rect.pos.y = rect.bottom();
        body.vel.y = 0.0;
        body.stuck_to_adhesive = true;
    } else if min == overlap.left && body.vel.x > 0.0 {
        body.rect.pos.x = rect.left() - body.rect.size.x;
        body.vel.x = 0.0;
        body.stuck_to_adhesive = true;
    } else if min == overlap.right && body.vel.x < 0.0 {
        body.rect.pos.x = rect.right();
        body.vel.x = 0.0;
        body.stuck_to_adhesive = true;
    }
}

/// Moving-surface resolution: standard axes, plus the surface's own velocity
/// carried into the body's position so it rides (or is pushed by) the
/// platform.
fn resolve_moving(
    body: &mut KinematicBody,
    rect: &Aabb,
    overlap: &Overlap,
    platform_vel: Vec2,
    dt: f32,
) {
    let Some(contact) = overlap.contact(body.vel) else {
        return;
    };
    match contact {
        Contact::Top => {
            body.land(rect.top(), false);
            body.rect.pos += platform_vel * dt;
        }
        Contact::Bottom => {
            body.rect.pos.y = rect.bottom();
            body.vel.y = 0.0;
            body.rect.pos += platform_vel * dt;
        }
        Contact::Left => {
            body.rect.pos.x = rect.left() - body.rect.size.x;
            body.vel.x = 0.0;
            body.rect.pos.y += platform_vel.y * dt;
        }
        Contact::Right => {
            body.rect.pos.x = rect.right();
            body.vel.x = 0.0;
            body.rect.pos.y += platform_vel.y * dt;
        }
    }
}
