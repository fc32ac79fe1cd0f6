//! Planar and model bounding boxes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Axis-aligned box in the slicing plane.
///
/// `left`/`right` bound x, `back`/`front` bound y.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds2 {
    /// Minimum x.
    pub left: f64,
    /// Maximum x.
    pub right: f64,
    /// Minimum y.
    pub back: f64,
    /// Maximum y.
    pub front: f64,
}

impl Bounds2 {
    /// Smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            left: first.x,
            right: first.x,
            back: first.y,
            front: first.y,
        };
        for p in points {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grow to include `p`.
    pub fn include(&mut self, p: &Point) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.back = self.back.min(p.y);
        self.front = self.front.max(p.y);
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            back: self.back.min(other.back),
            front: self.front.max(other.front),
        }
    }

    /// Union of an iterator of boxes, `None` when it is empty.
    #[must_use]
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Self>, b| {
                Some(acc.map_or(*b, |a| a.union(b)))
            })
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Extent along y.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.front - self.back
    }

    /// Whether `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.back && p.y <= self.front
    }
}

/// Bounds of the whole sliced model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelBounds {
    /// Lowest layer height.
    pub bottom: f64,
    /// Highest layer height.
    pub top: f64,
    /// Union of every layer's planar box. `None` when no layer has regions.
    pub plan: Option<Bounds2>,
}

impl ModelBounds {
    /// Height spanned by the layers.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}
