// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edges of a scrollable viewport and per-edge accessors for kurbo geometry.

use kurbo::{Insets, Point, Vec2};

/// One of the four sides of a scrollable viewport.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// Leading vertical edge.
    Top,
    /// Trailing vertical edge.
    Bottom,
    /// Leading horizontal edge.
    Left,
    /// Trailing horizontal edge.
    Right,
}

/// Scroll axis an [`Edge`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Top and bottom edges.
    Vertical,
    /// Left and right edges.
    Horizontal,
}

impl Edge {
    /// All edges, in `Top, Bottom, Left, Right` order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Axis along which pulling past this edge happens.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Top | Self::Bottom => Direction::Vertical,
            Self::Left | Self::Right => Direction::Horizontal,
        }
    }

    /// Returns `true` for the edges at the start of their axis (top, left).
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// Reads the inset component for this edge.
    #[must_use]
    pub const fn inset_of(self, insets: &Insets) -> f64 {
        match self {
            Self::Top => insets.y0,
            Self::Bottom => insets.y1,
            Self::Left => insets.x0,
            Self::Right => insets.x1,
        }
    }

    /// Mutable access to the inset component for this edge.
    pub fn inset_mut(self, insets: &mut Insets) -> &mut f64 {
        match self {
            Self::Top => &mut insets.y0,
            Self::Bottom => &mut insets.y1,
            Self::Left => &mut insets.x0,
            Self::Right => &mut insets.x1,
        }
    }
}

impl Direction {
    /// Component of `point` along this axis.
    #[must_use]
    pub const fn of_point(self, point: Point) -> f64 {
        match self {
            Self::Vertical => point.y,
            Self::Horizontal => point.x,
        }
    }

    /// Mutable component of `point` along this axis.
    pub fn point_mut(self, point: &mut Point) -> &mut f64 {
        match self {
            Self::Vertical => &mut point.y,
            Self::Horizontal => &mut point.x,
        }
    }

    /// Mutable component of `vec` along this axis.
    pub fn vec_mut(self, vec: &mut Vec2) -> &mut f64 {
        match self {
            Self::Vertical => &mut vec.y,
            Self::Horizontal => &mut vec.x,
        }
    }
}

/// Component-wise sum of two insets.
pub(crate) fn add_insets(a: Insets, b: Insets) -> Insets {
    Insets::new(a.x0 + b.x0, a.y0 + b.y0, a.x1 + b.x1, a.y1 + b.y1)
}

/// Component-wise difference of two insets.
pub(crate) fn sub_insets(a: Insets, b: Insets) -> Insets {
    Insets::new(a.x0 - b.x0, a.y0 - b.y0, a.x1 - b.x1, a.y1 - b.y1)
}
