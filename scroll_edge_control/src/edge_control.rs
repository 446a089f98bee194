// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pull-to-activate controls anchored to one edge of a scroll container.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Rect, Size};
use scroll_edge_spring::{SpringAnimator, SpringConfig};
use tracing::debug;

use crate::container::{
    ScrollContainer, distance_from, is_scrollable_along, maximum_content_offset,
    rubber_banding_length,
};
use crate::context::{HostContext, Task};
use crate::edge::{Direction, Edge, sub_insets};
use crate::observe::{Changes, ObservationToken};
use crate::slots::{ComponentId, ControlId};

/// Extent of the indicator along the pull axis, and the inset an active control adds.
pub const INDICATOR_LENGTH: f64 = 50.0;

/// Pull distance at which triggering progress reaches `1` and the control activates.
pub const TRIGGER_LENGTH: f64 = INDICATOR_LENGTH * 1.6;

/// How close to the edge the viewport must rest for an inset-adding animation to
/// scroll the indicator into view.
pub const AUTO_SCROLL_MARGIN: f64 = 10.0;

/// Delay between a pull activating the control and the activation callback.
pub const ACTIVATION_NOTIFY_DELAY_MS: u64 = 200;

/// Extra pan translation applied after a pull adds the inset, per axis.
const VERTICAL_TRANSLATION_MARGIN: f64 = 10.0;
const HORIZONTAL_TRANSLATION_MARGIN: f64 = 45.0;

/// Where the control sits when the content is not pulled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutMode {
    /// Stays glued to the viewport's edge while the content is pulled away.
    #[default]
    FixesToEdge,
    /// Moves with the content, just outside its edge.
    ScrollsAlongContent,
}

/// Stacking of the control relative to the scrolled content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZLayoutMode {
    /// Drawn above the content.
    Front,
    /// Drawn below the content.
    #[default]
    Back,
}

/// Whether pulling past the edge activates the control.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PullToActivateMode {
    /// Pulling activates; `adds_inset` makes the activation keep the indicator
    /// visible by contributing [`INDICATOR_LENGTH`] of inset.
    Enabled {
        /// Contribute inset on activation.
        adds_inset: bool,
    },
    /// Pulling does nothing; the control only changes state when told to.
    Disabled,
}

impl Default for PullToActivateMode {
    fn default() -> Self {
        Self::Enabled { adds_inset: true }
    }
}

impl PullToActivateMode {
    /// Returns `true` unless [`PullToActivateMode::Disabled`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Returns `true` for `Enabled { adds_inset: true }`.
    #[must_use]
    pub const fn adds_inset(self) -> bool {
        matches!(self, Self::Enabled { adds_inset: true })
    }
}

/// How an [`EdgeControl`] lays itself out and reacts to pulls.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// See [`LayoutMode`].
    pub layout_mode: LayoutMode,
    /// See [`ZLayoutMode`].
    pub z_layout_mode: ZLayoutMode,
    /// See [`PullToActivateMode`].
    pub pull_to_activate_mode: PullToActivateMode,
    /// Distance kept between the control and the edge it is anchored to.
    pub margin_to_edge: f64,
}

impl Configuration {
    /// Starts from the defaults and applies `modify`.
    ///
    /// ```rust
    /// use scroll_edge_control::{Configuration, LayoutMode};
    ///
    /// let config = Configuration::with(|c| c.layout_mode = LayoutMode::ScrollsAlongContent);
    /// assert_eq!(config.margin_to_edge, 0.0);
    /// ```
    #[must_use]
    pub fn with(modify: impl FnOnce(&mut Self)) -> Self {
        let mut config = Self::default();
        modify(&mut config);
        config
    }
}

/// The logical state an application drives a control with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityState {
    /// The activity (refresh, load more, ...) is in progress.
    pub is_active: bool,
    /// The control should contribute inset to keep its indicator visible.
    pub adds_inset: bool,
}

impl ActivityState {
    /// Active with inset.
    pub const ACTIVE: Self = Self::active(true);
    /// Inactive without inset.
    pub const INACTIVE: Self = Self::inactive(false);

    /// Active, optionally contributing inset.
    #[must_use]
    pub const fn active(adds_inset: bool) -> Self {
        Self {
            is_active: true,
            adds_inset,
        }
    }

    /// Inactive, optionally keeping its inset.
    #[must_use]
    pub const fn inactive(adds_inset: bool) -> Self {
        Self {
            is_active: false,
            adds_inset,
        }
    }
}

/// What an indicator should currently present.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivatingState {
    /// The user is pulling; `progress` runs from `0` to `1`.
    Triggering {
        /// Fraction of [`TRIGGER_LENGTH`] pulled so far.
        progress: f64,
    },
    /// The activity is running.
    Active,
    /// The activity finished (or never started).
    Completed,
}

impl ActivatingState {
    /// Triggering with no progress.
    pub const IDLE: Self = Self::Triggering { progress: 0.0 };
}

/// Bookkeeping visible to the application.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComponentState {
    /// Set once on attach and never cleared.
    pub has_attached_to_container: bool,
    /// `true` until the next pull may start; cleared by a pull activation and set
    /// again once the content returns to the edge.
    pub is_idle_awaiting_pull: bool,
    /// Current logical state.
    pub activity_state: ActivityState,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            has_attached_to_container: false,
            is_idle_awaiting_pull: true,
            activity_state: ActivityState::INACTIVE,
        }
    }
}

/// Receives every presentation change of an [`EdgeControl`].
///
/// Implemented for closures, and by [`IndicatorModel`](crate::IndicatorModel).
pub trait ActivityIndicator {
    /// Presents `state`.
    fn update(&mut self, state: ActivatingState);
}

impl<F: FnMut(ActivatingState)> ActivityIndicator for F {
    fn update(&mut self, state: ActivatingState) {
        self(state);
    }
}

/// Impact feedback played when a pull activates a control.
pub trait HapticFeedback {
    /// Warms up the generator; called when the control is attached.
    fn prepare(&mut self) {}

    /// Plays the impact.
    fn impact_occurred(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum InsetTransition {
    Adding,
    Removing,
}

/// A pull-to-activate control attached to one edge of a scroll container.
///
/// Build it, configure it, then hand it to
/// [`ScrollHost::insert_edge_control`](crate::ScrollHost::insert_edge_control).
/// From then on the host owns it and drives it with container changes and frame
/// ticks.
///
/// ```rust
/// use kurbo::{Point, Size};
/// use scroll_edge_control::{ActivatingState, Edge, EdgeControl, ScrollHost, ScrollState};
///
/// let container = ScrollState::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0));
/// let mut host = ScrollHost::new(container);
/// let control = EdgeControl::new(Edge::Top, Default::default(), |_: ActivatingState| {});
/// let id = host.insert_edge_control(control);
///
/// host.update_container(|c| {
///     c.is_tracking = true;
///     c.content_offset = Point::new(0.0, -80.0);
/// });
/// let control = host.edge_control(id).unwrap();
/// assert!(control.is_active());
/// assert_eq!(control.activating_state(), ActivatingState::Active);
/// ```
pub struct EdgeControl {
    edge: Edge,
    configuration: Configuration,
    state: ComponentState,
    activating: ActivatingState,
    indicator: Box<dyn ActivityIndicator>,
    haptics: Option<Box<dyn HapticFeedback>>,
    on_did_activate: Option<Box<dyn FnMut(ControlId)>>,
    animator: SpringAnimator,
    transition: Option<InsetTransition>,
    offset_observation: Option<ObservationToken>,
    layout_observation: Option<ObservationToken>,
    frame: Rect,
    z_position: f64,
}

impl fmt::Debug for EdgeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeControl")
            .field("edge", &self.edge)
            .field("configuration", &self.configuration)
            .field("state", &self.state)
            .field("activating", &self.activating)
            .field("transition", &self.transition)
            .field("frame", &self.frame)
            .field("z_position", &self.z_position)
            .finish_non_exhaustive()
    }
}

impl EdgeControl {
    /// Creates a detached control for `edge`. The indicator immediately receives
    /// [`ActivatingState::Completed`].
    pub fn new(
        edge: Edge,
        configuration: Configuration,
        indicator: impl ActivityIndicator + 'static,
    ) -> Self {
        let mut control = Self {
            edge,
            configuration,
            state: ComponentState::default(),
            activating: ActivatingState::Completed,
            indicator: Box::new(indicator),
            haptics: None,
            on_did_activate: None,
            animator: SpringAnimator::new(),
            transition: None,
            offset_observation: None,
            layout_observation: None,
            frame: Rect::ZERO,
            z_position: 0.0,
        };
        control.indicator.update(control.activating);
        control
    }

    /// Plays `haptics` when a pull activates the control.
    #[must_use]
    pub fn with_haptics(mut self, haptics: impl HapticFeedback + 'static) -> Self {
        self.haptics = Some(Box::new(haptics));
        self
    }

    /// Sets the initial logical state before attaching.
    ///
    /// Only the indicator is updated; the inset is applied on attach.
    pub fn set_activity_state(&mut self, state: ActivityState) {
        self.update_activity(state);
    }

    /// Replaces the configuration before attaching.
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }

    /// Registers the callback run [`ACTIVATION_NOTIFY_DELAY_MS`] after a pull
    /// activates the control.
    pub fn set_on_did_activate(&mut self, handler: impl FnMut(ControlId) + 'static) {
        self.on_did_activate = Some(Box::new(handler));
    }

    /// Replaces the indicator, which immediately receives the current state.
    pub fn set_activity_indicator(&mut self, indicator: impl ActivityIndicator + 'static) {
        self.indicator = Box::new(indicator);
        self.indicator.update(self.activating);
    }

    /// The edge this control is anchored to.
    #[must_use]
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Current configuration.
    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Attachment and pull bookkeeping.
    #[must_use]
    pub const fn component_state(&self) -> &ComponentState {
        &self.state
    }

    /// Current logical state.
    #[must_use]
    pub const fn activity_state(&self) -> ActivityState {
        self.state.activity_state
    }

    /// Shorthand for `activity_state().is_active`.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.activity_state.is_active
    }

    /// What the indicator was last told to present.
    #[must_use]
    pub const fn activating_state(&self) -> ActivatingState {
        self.activating
    }

    /// Frame in content coordinates, as of the last layout.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// `1` when drawn above the content, `-1` below it.
    #[must_use]
    pub const fn z_position(&self) -> f64 {
        self.z_position
    }

    /// Returns `true` while the inset contribution is animating.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub(crate) fn attach<C: ScrollContainer>(&mut self, id: ControlId, cx: &mut HostContext<C>) {
        self.state.has_attached_to_container = true;
        self.start_observing_offset(id, cx);
        self.layout_observation = Some(cx.observe(
            id.into(),
            Changes::INSET | Changes::CONTENT_SIZE | Changes::BOUNDS,
        ));
        if let Some(haptics) = &mut self.haptics {
            haptics.prepare();
        }
        self.layout(cx);
        let state = self.state.activity_state;
        self.apply_activity_state(id, cx, state, false);
    }

    /// Stops observing and animating. Contributed inset stays in the ledger.
    pub(crate) fn detach<C: ScrollContainer>(&mut self, cx: &mut HostContext<C>) {
        self.stop_observing_offset(cx);
        if let Some(token) = self.layout_observation.take() {
            cx.invalidate(token);
        }
        self.animator.cancel();
        self.transition = None;
    }

    pub(crate) fn handle<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
        changes: Changes,
    ) {
        if changes.contains(Changes::OFFSET) {
            self.offset_did_change(id, cx);
        } else {
            self.layout(cx);
        }
    }

    pub(crate) fn update_configuration<C: ScrollContainer>(
        &mut self,
        cx: &mut HostContext<C>,
        configuration: Configuration,
    ) {
        self.configuration = configuration;
        self.layout(cx);
    }

    pub(crate) fn notify_did_activate(&mut self, id: ControlId) {
        if let Some(handler) = &mut self.on_did_activate {
            handler(id);
        }
    }

    /// Applies a new logical state, adding or removing the inset contribution.
    pub(crate) fn apply_activity_state<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
        state: ActivityState,
        animated: bool,
    ) {
        self.update_activity(state);
        if state.adds_inset {
            self.add_local_inset(id, cx, animated);
        } else {
            self.remove_local_inset(id, cx, animated);
        }
    }

    /// Advances the inset animation by one frame.
    pub(crate) fn tick<C: ScrollContainer>(&mut self, id: ControlId, cx: &mut HostContext<C>) {
        let Some(value) = self.animator.tick(cx.now_ms) else {
            return;
        };
        match self.transition {
            Some(InsetTransition::Adding) => self.adding_frame(id, cx, value),
            Some(InsetTransition::Removing) => self.removing_frame(id, cx, value),
            None => {}
        }
        if !self.animator.is_running() {
            self.transition = None;
        }
    }

    fn update_activity(&mut self, state: ActivityState) {
        let previous = self.state.activity_state;
        self.state.activity_state = state;
        if state.is_active && !previous.is_active {
            self.present(ActivatingState::Active);
        } else if !state.is_active && previous.is_active {
            self.present(ActivatingState::Completed);
        }
    }

    fn present(&mut self, state: ActivatingState) {
        if self.activating != state {
            self.activating = state;
            self.indicator.update(state);
        }
    }

    fn offset_did_change<C: ScrollContainer>(&mut self, id: ControlId, cx: &mut HostContext<C>) {
        self.layout(cx);

        let distance = rubber_banding_length(&cx.container, self.edge);
        if distance <= 0.0 {
            self.state.is_idle_awaiting_pull = true;
        }
        if !self.configuration.pull_to_activate_mode.is_enabled()
            || !self.state.is_idle_awaiting_pull
            || self.state.activity_state.is_active
        {
            return;
        }
        let still_triggering =
            matches!(self.activating, ActivatingState::Triggering { progress } if progress > 0.0);
        if !cx.container.is_tracking() && !still_triggering {
            return;
        }

        let progress = (distance / TRIGGER_LENGTH).clamp(0.0, 1.0);
        self.present(ActivatingState::Triggering { progress });
        if progress >= 1.0 {
            self.activate_by_pull(id, cx);
        }
    }

    fn activate_by_pull<C: ScrollContainer>(&mut self, id: ControlId, cx: &mut HostContext<C>) {
        let adds_inset = self.configuration.pull_to_activate_mode.adds_inset();
        self.update_activity(ActivityState::active(adds_inset));
        self.state.is_idle_awaiting_pull = false;
        cx.schedule_after(ACTIVATION_NOTIFY_DELAY_MS, Task::NotifyDidActivate(id));
        if let Some(haptics) = &mut self.haptics {
            haptics.impact_occurred();
        }
        debug!(edge = ?self.edge, adds_inset, "edge control activated by pull");
        if !adds_inset {
            return;
        }

        // The inset grows under the user's finger: keep the offset where it is and
        // move the gesture's origin so the drag continues smoothly.
        self.stop_observing_offset(cx);
        self.animator.cancel();
        self.transition = None;
        cx.ledger
            .set_local_inset(id.into(), self.edge, INDICATOR_LENGTH);
        cx.lock.lock();
        cx.recompose();
        cx.lock.unlock();

        let direction = self.edge.direction();
        let margin = INDICATOR_LENGTH
            + match direction {
                Direction::Vertical => VERTICAL_TRANSLATION_MARGIN,
                Direction::Horizontal => HORIZONTAL_TRANSLATION_MARGIN,
            };
        let mut translation = cx.container.pan_translation();
        *direction.vec_mut(&mut translation) += if self.edge.is_leading() {
            -margin
        } else {
            margin
        };
        cx.container.set_pan_translation(translation);
        self.start_observing_offset(id, cx);
    }

    fn add_local_inset<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
        animated: bool,
    ) {
        self.animator.cancel();
        self.transition = None;
        let current = cx.ledger.local_inset_for(id.into(), self.edge);
        if current == INDICATOR_LENGTH {
            return;
        }
        debug!(edge = ?self.edge, animated, "adding local content inset");
        if animated {
            self.animator.start(
                current,
                INDICATOR_LENGTH,
                SpringConfig::INSET_TRANSITION,
                cx.now_ms,
            );
            self.transition = Some(InsetTransition::Adding);
        } else {
            cx.ledger
                .set_local_inset(id.into(), self.edge, INDICATOR_LENGTH);
            cx.recompose();
        }
    }

    fn remove_local_inset<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
        animated: bool,
    ) {
        self.animator.cancel();
        self.transition = None;
        let current = cx.ledger.local_inset_for(id.into(), self.edge);
        if current == 0.0 {
            return;
        }
        debug!(edge = ?self.edge, animated, "removing local content inset");
        if animated {
            self.animator
                .start(current, 0.0, SpringConfig::INSET_TRANSITION, cx.now_ms);
            self.transition = Some(InsetTransition::Removing);
        } else {
            cx.ledger.set_local_inset(id.into(), self.edge, 0.0);
            cx.recompose();
        }
    }

    fn adding_frame<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
        value: f64,
    ) {
        let key = ComponentId::from(id);
        if cx.container.is_tracking() {
            self.animator.cancel();
            cx.ledger.set_local_inset(key, self.edge, INDICATOR_LENGTH);
            cx.recompose();
            return;
        }

        let captured = sub_insets(cx.container.adjusted_content_inset(), cx.ledger.local_inset());
        cx.ledger.set_local_inset(key, self.edge, value);
        cx.recompose();

        // Reveal the indicator if the viewport rests at this edge.
        let reveal = cx.ledger.local_inset_on(self.edge);
        let offset = cx.container.content_offset();
        let mut target = offset;
        let direction = self.edge.direction();
        let along = direction.of_point(offset);
        if self.edge.is_leading() {
            if along < -INDICATOR_LENGTH + AUTO_SCROLL_MARGIN {
                *direction.point_mut(&mut target) = -(self.edge.inset_of(&captured) + reveal);
            }
        } else if is_scrollable_along(&cx.container, self.edge, cx.ledger.user_inset()) {
            let max = maximum_content_offset(&cx.container, cx.ledger.local_inset());
            let max_along = direction.of_point(max);
            if along > max_along - AUTO_SCROLL_MARGIN {
                *direction.point_mut(&mut target) = max_along + reveal;
            }
        }
        if target != offset {
            cx.set_offset(target);
        }
    }

    fn removing_frame<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
        value: f64,
    ) {
        let key = ComponentId::from(id);
        if !cx.container.is_tracking() {
            cx.ledger.set_local_inset(key, self.edge, value);
            cx.recompose();
            return;
        }

        // A drag interrupts the removal: drop the rest of the inset at once without
        // letting the viewport jump under the finger.
        self.animator.cancel();
        let offset = cx.container.content_offset();
        self.stop_observing_offset(cx);
        cx.ledger.set_local_inset(key, self.edge, 0.0);
        cx.recompose();
        cx.set_offset(offset);
        self.start_observing_offset(id, cx);
        debug!(edge = ?self.edge, "drag interrupted local inset removal");
    }

    fn start_observing_offset<C: ScrollContainer>(
        &mut self,
        id: ControlId,
        cx: &mut HostContext<C>,
    ) {
        if self.offset_observation.is_none() {
            self.offset_observation = Some(cx.observe(id.into(), Changes::OFFSET));
        }
    }

    fn stop_observing_offset<C: ScrollContainer>(&mut self, cx: &mut HostContext<C>) {
        if let Some(token) = self.offset_observation.take() {
            cx.invalidate(token);
        }
    }

    fn layout<C: ScrollContainer>(&mut self, cx: &HostContext<C>) {
        let container = &cx.container;
        let local = cx.ledger.local_inset();
        let bounds = container.bounds_size();
        let content = container.content_size();

        self.z_position = match self.configuration.z_layout_mode {
            ZLayoutMode::Front => 1.0,
            ZLayoutMode::Back => -1.0,
        };
        let margin = self.configuration.margin_to_edge;
        let length = match self.configuration.layout_mode {
            LayoutMode::FixesToEdge => distance_from(container, self.edge) - margin,
            LayoutMode::ScrollsAlongContent => -margin,
        };
        let (origin, size) = match self.edge {
            Edge::Top => (
                Point::new(0.0, -local.y0 - length),
                Size::new(bounds.width, INDICATOR_LENGTH),
            ),
            Edge::Bottom => (
                Point::new(0.0, content.height - INDICATOR_LENGTH + length + local.y1),
                Size::new(bounds.width, INDICATOR_LENGTH),
            ),
            Edge::Left => (
                Point::new(-local.x0 - length, 0.0),
                Size::new(INDICATOR_LENGTH, bounds.height),
            ),
            Edge::Right => (
                Point::new(content.width - INDICATOR_LENGTH + length + local.x1, 0.0),
                Size::new(INDICATOR_LENGTH, bounds.height),
            ),
        };
        self.frame = Rect::from_origin_size(origin, size);
    }
}
