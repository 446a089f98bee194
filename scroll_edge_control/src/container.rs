// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scrollable-container abstraction consumed by edge controls and headers.

use kurbo::{Insets, Point, Size, Vec2};

use crate::edge::{Edge, sub_insets};

/// Properties of a host scroll view that controls read and write.
///
/// Implementations wrap the real platform view (or, in tests and demos, plain data
/// such as [`ScrollState`]). The inset accessors here are the *raw* stored inset:
/// the composition of user and control-contributed insets is owned by
/// [`ScrollHost`](crate::ScrollHost), which is the only thing that should call
/// [`ScrollContainer::set_content_inset`] once controls are attached.
///
/// An implementation may move the content offset as a side effect of an inset
/// write (as native scroll views sometimes do); the host detects that and treats it
/// like any other offset change.
pub trait ScrollContainer {
    /// Current scroll position of the viewport's origin in content coordinates.
    fn content_offset(&self) -> Point;

    /// Moves the viewport.
    fn set_content_offset(&mut self, offset: Point);

    /// Raw stored content inset.
    fn content_inset(&self) -> Insets;

    /// Replaces the raw stored content inset.
    fn set_content_inset(&mut self, inset: Insets);

    /// Inset actually applied to scrolling, including any system adjustment such as
    /// safe-area insets. Defaults to [`ScrollContainer::content_inset`].
    fn adjusted_content_inset(&self) -> Insets {
        self.content_inset()
    }

    /// Size of the scrollable content.
    fn content_size(&self) -> Size;

    /// Size of the visible viewport.
    fn bounds_size(&self) -> Size;

    /// Safe-area insets of the viewport.
    fn safe_area_insets(&self) -> Insets {
        Insets::ZERO
    }

    /// Returns `true` while the user is touching or dragging the content.
    fn is_tracking(&self) -> bool;

    /// Accumulated translation of the in-flight pan gesture.
    fn pan_translation(&self) -> Vec2;

    /// Overwrites the in-flight pan gesture's recorded translation.
    fn set_pan_translation(&mut self, translation: Vec2);
}

/// A plain-data [`ScrollContainer`].
///
/// Useful for tests, simulations, and hosts that keep scroll state in their own
/// model and apply it to a platform view after each update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// See [`ScrollContainer::content_offset`].
    pub content_offset: Point,
    /// See [`ScrollContainer::content_inset`].
    pub content_inset: Insets,
    /// See [`ScrollContainer::content_size`].
    pub content_size: Size,
    /// See [`ScrollContainer::bounds_size`].
    pub bounds_size: Size,
    /// See [`ScrollContainer::safe_area_insets`].
    pub safe_area_insets: Insets,
    /// When set, [`ScrollContainer::adjusted_content_inset`] includes the safe area.
    pub adjusts_for_safe_area: bool,
    /// See [`ScrollContainer::is_tracking`].
    pub is_tracking: bool,
    /// See [`ScrollContainer::pan_translation`].
    pub pan_translation: Vec2,
}

impl ScrollState {
    /// Creates a resting scroll state with the given viewport and content sizes.
    #[must_use]
    pub fn new(bounds_size: Size, content_size: Size) -> Self {
        Self {
            bounds_size,
            content_size,
            ..Self::default()
        }
    }
}

impl ScrollContainer for ScrollState {
    fn content_offset(&self) -> Point {
        self.content_offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.content_offset = offset;
    }

    fn content_inset(&self) -> Insets {
        self.content_inset
    }

    fn set_content_inset(&mut self, inset: Insets) {
        self.content_inset = inset;
    }

    fn adjusted_content_inset(&self) -> Insets {
        if self.adjusts_for_safe_area {
            crate::edge::add_insets(self.content_inset, self.safe_area_insets)
        } else {
            self.content_inset
        }
    }

    fn content_size(&self) -> Size {
        self.content_size
    }

    fn bounds_size(&self) -> Size {
        self.bounds_size
    }

    fn safe_area_insets(&self) -> Insets {
        self.safe_area_insets
    }

    fn is_tracking(&self) -> bool {
        self.is_tracking
    }

    fn pan_translation(&self) -> Vec2 {
        self.pan_translation
    }

    fn set_pan_translation(&mut self, translation: Vec2) {
        self.pan_translation = translation;
    }
}

/// Signed distance from the viewport's edge to the content's edge, adjusted inset
/// included. Positive when the content is pulled away from `edge`.
pub(crate) fn distance_from<C: ScrollContainer + ?Sized>(container: &C, edge: Edge) -> f64 {
    let offset = container.content_offset();
    let inset = container.adjusted_content_inset();
    let bounds = container.bounds_size();
    let content = container.content_size();
    match edge {
        Edge::Top => -(offset.y + inset.y0),
        Edge::Bottom => {
            let max_y = bounds.height + offset.y;
            -(content.height - max_y + inset.y1)
        }
        Edge::Left => -(offset.x + inset.x0),
        Edge::Right => {
            let max_x = bounds.width + offset.x;
            -(content.width - max_x + inset.x1)
        }
    }
}

/// Penetration past `edge` while rubber-banding; zero or negative when not overscrolled.
///
/// Content shorter than the viewport rests at the leading edge, so the trailing
/// edges subtract that slack before measuring.
pub(crate) fn rubber_banding_length<C: ScrollContainer + ?Sized>(container: &C, edge: Edge) -> f64 {
    let offset = container.content_offset();
    let inset = container.adjusted_content_inset();
    let bounds = container.bounds_size();
    let content = container.content_size();
    match edge {
        Edge::Top | Edge::Left => distance_from(container, edge),
        Edge::Bottom => {
            let slack = (bounds.height - content.height - inset.y0 - inset.y1).max(0.0);
            let max_y = bounds.height + offset.y - slack;
            -(content.height - max_y + inset.y1)
        }
        Edge::Right => {
            let slack = (bounds.width - content.width - inset.x0 - inset.x1).max(0.0);
            let max_x = bounds.width + offset.x - slack;
            -(content.width - max_x + inset.x1)
        }
    }
}

/// Largest resting offset, measured without the control-contributed `local` inset.
pub(crate) fn maximum_content_offset<C: ScrollContainer + ?Sized>(
    container: &C,
    local: Insets,
) -> Point {
    let inset = sub_insets(container.adjusted_content_inset(), local);
    let bounds = container.bounds_size();
    let content = container.content_size();
    Point::new(
        content.width - bounds.width + inset.x1,
        content.height - bounds.height + inset.y1,
    )
}

/// Returns `true` if the content overflows the viewport along `edge`'s axis, given
/// the application's own inset.
pub(crate) fn is_scrollable_along<C: ScrollContainer + ?Sized>(
    container: &C,
    edge: Edge,
    user_inset: Insets,
) -> bool {
    let bounds = container.bounds_size();
    let content = container.content_size();
    if edge.direction() == crate::Direction::Vertical {
        bounds.height - content.height - user_inset.y0 - user_inset.y1 < 0.0
    } else {
        bounds.width - content.width - user_inset.x0 - user_inset.x1 < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ScrollContainer, ScrollState, distance_from, is_scrollable_along, maximum_content_offset,
        rubber_banding_length,
    };
    use crate::Edge;
    use kurbo::{Insets, Point, Size};

    fn tall() -> ScrollState {
        ScrollState::new(Size::new(100.0, 200.0), Size::new(100.0, 1000.0))
    }

    #[test]
    fn top_distance_tracks_overscroll() {
        let mut s = tall();
        assert_eq!(distance_from(&s, Edge::Top), 0.0);
        s.content_offset = Point::new(0.0, -30.0);
        assert_eq!(distance_from(&s, Edge::Top), 30.0);
        assert_eq!(rubber_banding_length(&s, Edge::Top), 30.0);

        s.content_inset = Insets::new(0.0, 20.0, 0.0, 0.0);
        assert_eq!(rubber_banding_length(&s, Edge::Top), 10.0);
    }

    #[test]
    fn bottom_distance_at_end_of_content() {
        let mut s = tall();
        // Max offset is 1000 - 200 = 800.
        s.content_offset = Point::new(0.0, 800.0);
        assert_eq!(rubber_banding_length(&s, Edge::Bottom), 0.0);
        s.content_offset = Point::new(0.0, 840.0);
        assert_eq!(rubber_banding_length(&s, Edge::Bottom), 40.0);
        assert_eq!(distance_from(&s, Edge::Bottom), 40.0);
    }

    #[test]
    fn short_content_measures_bottom_pull_from_rest() {
        // Content shorter than the viewport rests at offset 0.
        let mut s = ScrollState::new(Size::new(100.0, 200.0), Size::new(100.0, 50.0));
        assert_eq!(rubber_banding_length(&s, Edge::Bottom), 0.0);
        s.content_offset = Point::new(0.0, 25.0);
        assert_eq!(rubber_banding_length(&s, Edge::Bottom), 25.0);
        // Without the slack correction the distance would already be positive.
        assert_eq!(distance_from(&s, Edge::Bottom), 175.0);
    }

    #[test]
    fn horizontal_edges_mirror_vertical() {
        let mut s = ScrollState::new(Size::new(200.0, 100.0), Size::new(1000.0, 100.0));
        s.content_offset = Point::new(-12.0, 0.0);
        assert_eq!(rubber_banding_length(&s, Edge::Left), 12.0);
        s.content_offset = Point::new(812.0, 0.0);
        assert_eq!(rubber_banding_length(&s, Edge::Right), 12.0);
    }

    #[test]
    fn max_offset_ignores_local_inset() {
        let mut s = tall();
        s.content_inset = Insets::new(0.0, 0.0, 0.0, 50.0);
        let local = Insets::new(0.0, 0.0, 0.0, 50.0);
        assert_eq!(maximum_content_offset(&s, local), Point::new(0.0, 800.0));
        assert_eq!(
            maximum_content_offset(&s, Insets::ZERO),
            Point::new(0.0, 850.0)
        );
    }

    #[test]
    fn scrollable_checks_axis() {
        let s = tall();
        assert!(is_scrollable_along(&s, Edge::Bottom, Insets::ZERO));
        assert!(!is_scrollable_along(&s, Edge::Right, Insets::ZERO));
    }

    #[test]
    fn adjusted_inset_includes_safe_area_when_requested() {
        let mut s = tall();
        s.content_inset = Insets::new(0.0, 10.0, 0.0, 0.0);
        s.safe_area_insets = Insets::new(0.0, 44.0, 0.0, 34.0);
        assert_eq!(s.adjusted_content_inset(), s.content_inset);
        s.adjusts_for_safe_area = true;
        assert_eq!(
            s.adjusted_content_inset(),
            Insets::new(0.0, 54.0, 0.0, 34.0)
        );
    }
}
