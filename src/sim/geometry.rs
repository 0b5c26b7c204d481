//! Axis-aligned boxes for claw, prizes and hazards
//!
//! Field space is the play area's container space: x grows to the right,
//! y grows downward, so `top <= bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in field space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive overlap test: touching edges count as a hit
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Horizontal-only overlap, used for floor placement of prizes
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        !(self.right() < other.left() || self.left() > other.right())
    }
}
