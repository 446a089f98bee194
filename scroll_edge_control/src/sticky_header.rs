// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A header pinned to the top of a scroll container that reserves top inset.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Insets, Point, Rect};
use scroll_edge_spring::{SpringAnimator, SpringConfig};
use tracing::debug;

use crate::container::ScrollContainer;
use crate::context::HostContext;
use crate::edge::Edge;
use crate::observe::{Changes, ObservationToken};
use crate::slots::{ComponentId, HeaderId};

/// How a [`StickyHeader`] follows the content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderConfiguration {
    /// Move up with the content when it is scrolled past the top; otherwise the
    /// header stays pinned.
    pub scrolls_together: bool,
    /// Place the header below the top safe area instead of under it.
    pub attaches_to_safe_area: bool,
}

impl Default for HeaderConfiguration {
    fn default() -> Self {
        Self {
            scrolls_together: true,
            attaches_to_safe_area: false,
        }
    }
}

/// What the header pushes to its content.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentState {
    /// Container offset as last observed.
    pub content_offset: Point,
    /// Whether the header is shown.
    pub is_active: bool,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            content_offset: Point::ZERO,
            is_active: true,
        }
    }
}

/// The view shown inside a [`StickyHeader`].
pub trait StickyContent {
    /// Height the content needs at `width`.
    fn fitting_height(&mut self, width: f64) -> f64;

    /// Receives the header's state whenever it changes. `old` is `None` the first
    /// time.
    fn receive(&mut self, state: &ContentState, old: Option<&ContentState>) {
        let _ = (state, old);
    }
}

/// Where the header's top is anchored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeaderAnchor {
    /// The container's top edge.
    FrameTop,
    /// The bottom of the container's top safe area.
    SafeAreaTop,
}

/// Bookkeeping visible to the application.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeaderComponentState {
    /// Set once on attach and never cleared.
    pub has_attached_to_container: bool,
    /// Container safe area as last observed.
    pub safe_area_insets: Insets,
    /// Container offset as last observed.
    pub content_offset: Point,
    /// Whether the header is shown and reserves inset.
    pub is_active: bool,
    /// Current configuration.
    pub configuration: HeaderConfiguration,
}

/// A header pinned to the top of the container.
///
/// While active it contributes its content's fitting height (minus the top safe
/// area, unless it attaches to the safe area) as top inset, so the content starts
/// below it. Changes of that contribution can be animated.
pub struct StickyHeader {
    state: HeaderComponentState,
    content_state: ContentState,
    content: Option<Box<dyn StickyContent>>,
    animator: SpringAnimator,
    target_inset: f64,
    observation: Option<ObservationToken>,
    anchor: Option<HeaderAnchor>,
    pinned_offset: f64,
    width: f64,
    height: f64,
}

impl fmt::Debug for StickyHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyHeader")
            .field("state", &self.state)
            .field("content_state", &self.content_state)
            .field("has_content", &self.content.is_some())
            .field("target_inset", &self.target_inset)
            .field("anchor", &self.anchor)
            .field("pinned_offset", &self.pinned_offset)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Default for StickyHeader {
    fn default() -> Self {
        Self::new(HeaderConfiguration::default())
    }
}

impl StickyHeader {
    /// Creates a detached, active header without content.
    #[must_use]
    pub fn new(configuration: HeaderConfiguration) -> Self {
        Self {
            state: HeaderComponentState {
                has_attached_to_container: false,
                safe_area_insets: Insets::ZERO,
                content_offset: Point::ZERO,
                is_active: true,
                configuration,
            },
            content_state: ContentState::default(),
            content: None,
            animator: SpringAnimator::new(),
            target_inset: 0.0,
            observation: None,
            anchor: None,
            pinned_offset: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Installs the content before attaching.
    #[must_use]
    pub fn with_content(mut self, content: impl StickyContent + 'static) -> Self {
        let mut content: Box<dyn StickyContent> = Box::new(content);
        content.receive(&self.content_state, None);
        self.content = Some(content);
        self
    }

    /// Shows or hides the header before attaching.
    pub fn set_is_active(&mut self, is_active: bool) {
        self.state.is_active = is_active;
        self.push_content_state(ContentState {
            is_active,
            ..self.content_state
        });
    }

    /// Current configuration.
    #[must_use]
    pub const fn configuration(&self) -> HeaderConfiguration {
        self.state.configuration
    }

    /// Whether the header is shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Attachment and observed container state.
    #[must_use]
    pub const fn component_state(&self) -> &HeaderComponentState {
        &self.state
    }

    /// State last pushed to the content.
    #[must_use]
    pub const fn content_state(&self) -> ContentState {
        self.content_state
    }

    /// Returns `true` once content has been installed.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Where the header's top is anchored; `None` until attached.
    #[must_use]
    pub const fn anchor(&self) -> Option<HeaderAnchor> {
        self.anchor
    }

    /// Vertical shift applied while the content is scrolled past the top. Zero or
    /// negative.
    #[must_use]
    pub const fn pinned_offset(&self) -> f64 {
        self.pinned_offset
    }

    /// Top inset this header is heading toward.
    #[must_use]
    pub const fn target_inset(&self) -> f64 {
        self.target_inset
    }

    /// Returns `true` while the inset contribution is animating.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Frame in the container's frame coordinates.
    #[must_use]
    pub fn frame(&self) -> Rect {
        let top = match self.anchor {
            Some(HeaderAnchor::SafeAreaTop) => self.state.safe_area_insets.y0,
            Some(HeaderAnchor::FrameTop) | None => 0.0,
        };
        let y = top + self.pinned_offset;
        Rect::new(0.0, y, self.width, y + self.height)
    }

    pub(crate) fn attach<C: ScrollContainer>(&mut self, id: HeaderId, cx: &mut HostContext<C>) {
        self.state.has_attached_to_container = true;
        self.observation = Some(cx.observe(
            id.into(),
            Changes::SAFE_AREA | Changes::OFFSET | Changes::BOUNDS,
        ));
        self.state.safe_area_insets = cx.container.safe_area_insets();
        self.observe_offset(cx.container.content_offset());
        self.update(id, cx, None, false);
    }

    /// Stops observing and animating. Contributed inset stays in the ledger.
    pub(crate) fn detach<C: ScrollContainer>(&mut self, cx: &mut HostContext<C>) {
        if let Some(token) = self.observation.take() {
            cx.invalidate(token);
        }
        self.animator.cancel();
    }

    pub(crate) fn handle<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        changes: Changes,
    ) {
        let old = self.state;
        if changes.contains(Changes::SAFE_AREA) {
            self.state.safe_area_insets = cx.container.safe_area_insets();
        }
        if changes.contains(Changes::OFFSET) {
            self.observe_offset(cx.container.content_offset());
        }
        if changes.contains(Changes::BOUNDS) {
            // A new width can change the fitting height.
            self.update(id, cx, None, false);
        } else if self.state != old {
            self.update(id, cx, Some(&old), false);
        }
    }

    pub(crate) fn set_content<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        content: Box<dyn StickyContent>,
    ) {
        self.content = Some(content);
        self.update(id, cx, None, false);
        if let Some(content) = &mut self.content {
            content.receive(&self.content_state, None);
        }
    }

    pub(crate) fn set_active<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        is_active: bool,
        animated: bool,
    ) {
        let old = self.state;
        self.state.is_active = is_active;
        if self.state != old {
            self.update(id, cx, Some(&old), animated);
        }
    }

    pub(crate) fn set_configuration<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        configuration: HeaderConfiguration,
    ) {
        let old = self.state;
        self.state.configuration = configuration;
        if self.state != old {
            self.update(id, cx, Some(&old), false);
        }
    }

    /// Re-measures the content and re-applies everything derived from state.
    pub(crate) fn reload<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        animated: bool,
    ) {
        self.update(id, cx, None, animated);
    }

    /// Advances the inset animation by one frame.
    pub(crate) fn tick<C: ScrollContainer>(&mut self, id: HeaderId, cx: &mut HostContext<C>) {
        let Some(value) = self.animator.tick(cx.now_ms) else {
            return;
        };
        let value = if cx.container.is_tracking() {
            self.animator.cancel();
            self.target_inset
        } else {
            value
        };
        cx.ledger.set_local_inset(id.into(), Edge::Top, value);
        cx.recompose();
    }

    fn observe_offset(&mut self, offset: Point) {
        self.state.content_offset = offset;
        self.push_content_state(ContentState {
            content_offset: offset,
            ..self.content_state
        });
    }

    fn push_content_state(&mut self, state: ContentState) {
        if state == self.content_state {
            return;
        }
        let old = core::mem::replace(&mut self.content_state, state);
        if let Some(content) = &mut self.content {
            content.receive(&self.content_state, Some(&old));
        }
    }

    /// Applies the difference between `old` and the current state. With no `old`,
    /// everything is applied.
    fn update<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        old: Option<&HeaderComponentState>,
        animated: bool,
    ) {
        let state = self.state;
        if old.is_none_or(|o| o.is_active != state.is_active) {
            self.push_content_state(ContentState {
                is_active: state.is_active,
                ..self.content_state
            });
        }
        if !state.has_attached_to_container {
            return;
        }
        self.width = cx.container.bounds_size().width;

        let attaches = state.configuration.attaches_to_safe_area;
        if old.is_none_or(|o| o.configuration.attaches_to_safe_area != attaches) {
            self.anchor = Some(if attaches {
                HeaderAnchor::SafeAreaTop
            } else {
                HeaderAnchor::FrameTop
            });
        }

        let sizing_changed = old.is_none_or(|o| {
            o.safe_area_insets != state.safe_area_insets
                || o.is_active != state.is_active
                || o.configuration != state.configuration
        });
        if sizing_changed {
            if let Some(content) = &mut self.content {
                self.height = content.fitting_height(self.width);
                let target = if !state.is_active {
                    0.0
                } else if attaches {
                    self.height
                } else {
                    (self.height - state.safe_area_insets.y0).max(0.0)
                };
                self.set_target_inset(id, cx, target, animated);
            }
        }

        if old.is_none_or(|o| {
            o.content_offset != state.content_offset || o.configuration != state.configuration
        }) {
            self.pinned_offset = if state.configuration.scrolls_together {
                let top = cx.container.adjusted_content_inset().y0;
                (-(state.content_offset.y + top)).min(0.0)
            } else {
                0.0
            };
        }
    }

    fn set_target_inset<C: ScrollContainer>(
        &mut self,
        id: HeaderId,
        cx: &mut HostContext<C>,
        target: f64,
        animated: bool,
    ) {
        let key = ComponentId::from(id);
        let current = cx.ledger.local_inset_for(key, Edge::Top);
        self.target_inset = target;
        if current == target {
            self.animator.cancel();
            return;
        }
        debug!(from = current, to = target, animated, "sticky header inset");
        if animated {
            self.animator
                .start(current, target, SpringConfig::INSET_TRANSITION, cx.now_ms);
        } else {
            self.animator.cancel();
            cx.ledger.set_local_inset(key, Edge::Top, target);
            cx.recompose();
        }
    }
}
