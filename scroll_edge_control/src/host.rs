// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner of a scroll container and everything attached to it.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use kurbo::{Insets, Point, Size};
use tracing::{trace, warn};

use crate::container::ScrollContainer;
use crate::context::{HostContext, Task};
use crate::edge::Edge;
use crate::edge_control::{ActivityIndicator, ActivityState, Configuration, EdgeControl};
use crate::error::AttachError;
use crate::observe::Changes;
use crate::slots::{ComponentId, ControlId, HeaderId, Slots};
use crate::sticky_header::{HeaderConfiguration, StickyContent, StickyHeader};

/// Upper bound on notifications delivered by one flush.
const DISPATCH_BUDGET: usize = 1024;

/// Wraps a [`ScrollContainer`] and drives the components attached to it.
///
/// The host is the single writer of the container's raw inset: it keeps the
/// application's *user* inset and the components' *local* contributions apart in
/// an [`InsetLedger`](crate::InsetLedger) and writes their sum. Inset accessors on
/// the host return that composed value; [`ScrollHost::set_content_inset`] only
/// replaces the user part.
///
/// Every mutation (container updates, state changes, frame ticks) is followed by
/// delivery of the change notifications it caused, in order, before the call
/// returns. Time only advances through [`ScrollHost::tick`].
///
/// The host is confined to the thread that created it.
///
/// ```rust
/// use kurbo::{Insets, Size};
/// use scroll_edge_control::{
///     ActivatingState, ActivityState, Edge, EdgeControl, ScrollHost, ScrollState,
/// };
///
/// let container = ScrollState::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0));
/// let mut host = ScrollHost::new(container);
/// let control = EdgeControl::new(Edge::Bottom, Default::default(), |_: ActivatingState| {});
/// let id = host.insert_edge_control(control);
///
/// host.set_content_inset(Insets::new(0.0, 20.0, 0.0, 0.0));
/// host.set_activity_state(id, ActivityState::ACTIVE, false);
///
/// assert_eq!(host.content_inset(), Insets::new(0.0, 20.0, 0.0, 50.0));
/// assert_eq!(host.user_content_inset(), Insets::new(0.0, 20.0, 0.0, 0.0));
/// ```
pub struct ScrollHost<C: ScrollContainer> {
    cx: HostContext<C>,
    controls: Slots<EdgeControl>,
    headers: Slots<StickyHeader>,
    _not_send: PhantomData<Rc<()>>,
}

impl<C: ScrollContainer + fmt::Debug> fmt::Debug for ScrollHost<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollHost")
            .field("container", &self.cx.container)
            .field("ledger", &self.cx.ledger)
            .field("now_ms", &self.cx.now_ms)
            .field("controls", &self.controls.values().collect::<Vec<_>>())
            .field("headers", &self.headers.values().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Container properties compared before and after an external update.
#[derive(Clone, Copy, PartialEq)]
struct Snapshot {
    offset: Point,
    inset: Insets,
    safe_area: Insets,
    content_size: Size,
    bounds: Size,
    tracking: bool,
}

impl Snapshot {
    fn of<C: ScrollContainer>(c: &C) -> Self {
        Self {
            offset: c.content_offset(),
            inset: c.content_inset(),
            safe_area: c.safe_area_insets(),
            content_size: c.content_size(),
            bounds: c.bounds_size(),
            tracking: c.is_tracking(),
        }
    }
}

impl<C: ScrollContainer> ScrollHost<C> {
    /// Wraps `container`. Its current inset becomes the user inset.
    pub fn new(container: C) -> Self {
        Self {
            cx: HostContext::new(container),
            controls: Slots::default(),
            headers: Slots::default(),
            _not_send: PhantomData,
        }
    }

    /// The wrapped container.
    pub fn container(&self) -> &C {
        &self.cx.container
    }

    /// Unwraps the container, leaving its composed inset in place.
    pub fn into_container(self) -> C {
        self.cx.container
    }

    /// Host clock, as of the last [`ScrollHost::tick`].
    pub fn now_ms(&self) -> u64 {
        self.cx.now_ms
    }

    /// Composed inset: user inset plus every local contribution.
    pub fn content_inset(&self) -> Insets {
        self.cx.ledger.effective_inset()
    }

    /// The inset the application set.
    pub fn user_content_inset(&self) -> Insets {
        self.cx.ledger.user_inset()
    }

    /// Per-edge sum of component contributions.
    pub fn local_content_inset(&self) -> Insets {
        self.cx.ledger.local_inset()
    }

    /// Contribution of one component on `edge`.
    pub fn local_inset_of(&self, component: impl Into<ComponentId>, edge: Edge) -> f64 {
        self.cx.ledger.local_inset_for(component.into(), edge)
    }

    /// Replaces the user inset and applies the new composition.
    pub fn set_content_inset(&mut self, inset: Insets) {
        self.cx.ledger.set_user_inset(inset);
        self.cx.recompose();
        self.flush();
    }

    /// Current content offset.
    pub fn content_offset(&self) -> Point {
        self.cx.container.content_offset()
    }

    /// Moves the viewport.
    pub fn set_content_offset(&mut self, offset: Point) {
        self.cx.set_offset(offset);
        self.flush();
    }

    /// Applies an external change to the container (a scroll, a drag starting or
    /// ending, a resize) and notifies components of whatever changed.
    ///
    /// An edge of the raw inset written here becomes the user inset on that edge.
    /// Edges left untouched keep their user value, so contributions on them are
    /// not folded into the user inset.
    pub fn update_container(&mut self, update: impl FnOnce(&mut C)) -> Changes {
        let before = Snapshot::of(&self.cx.container);
        update(&mut self.cx.container);
        let after = Snapshot::of(&self.cx.container);
        if before == after {
            return Changes::empty();
        }

        let mut changes = Changes::empty();
        changes.set(Changes::SAFE_AREA, before.safe_area != after.safe_area);
        changes.set(Changes::CONTENT_SIZE, before.content_size != after.content_size);
        changes.set(Changes::BOUNDS, before.bounds != after.bounds);
        changes.set(Changes::TRACKING, before.tracking != after.tracking);
        self.cx.observations.emit(changes);

        if before.inset != after.inset {
            changes |= Changes::INSET;
            let mut user = self.cx.ledger.user_inset();
            for edge in Edge::ALL {
                let written = edge.inset_of(&after.inset);
                if written != edge.inset_of(&before.inset) {
                    *edge.inset_mut(&mut user) = written;
                }
            }
            self.cx.ledger.set_user_inset(user);
            self.cx.observations.emit(Changes::INSET);
            self.cx.recompose();
        }
        if before.offset != after.offset {
            changes |= Changes::OFFSET;
        }
        self.cx.offset_did_change(before.offset);
        self.flush();
        changes
    }

    /// Attaches `control`.
    ///
    /// # Panics
    ///
    /// Panics if the control was attached before. See
    /// [`ScrollHost::try_insert_edge_control`].
    pub fn insert_edge_control(&mut self, control: EdgeControl) -> ControlId {
        match self.try_insert_edge_control(control) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Attaches `control`, applying its current activity state without animation.
    pub fn try_insert_edge_control(
        &mut self,
        control: EdgeControl,
    ) -> Result<ControlId, AttachError> {
        if control.component_state().has_attached_to_container {
            return Err(AttachError::ControlAlreadyAttached);
        }
        let id: ControlId = self.controls.insert(control);
        if let Some(control) = self.controls.get_mut(id) {
            control.attach(id, &mut self.cx);
        }
        self.flush();
        Ok(id)
    }

    /// Detaches a control and hands it back. Its inset contribution stays.
    pub fn remove_edge_control(&mut self, id: ControlId) -> Option<EdgeControl> {
        let mut control = self.controls.remove(id)?;
        control.detach(&mut self.cx);
        self.flush();
        Some(control)
    }

    /// An attached control.
    pub fn edge_control(&self, id: ControlId) -> Option<&EdgeControl> {
        self.controls.get(id)
    }

    /// Handles of all attached controls.
    pub fn edge_controls(&self) -> Vec<ControlId> {
        self.controls.keys()
    }

    /// Drives a control's logical state, adding or removing its inset.
    pub fn set_activity_state(&mut self, id: ControlId, state: ActivityState, animated: bool) {
        let Some(control) = self.controls.get_mut(id) else {
            trace!(?id, "activity state for detached control ignored");
            return;
        };
        control.apply_activity_state(id, &mut self.cx, state, animated);
        self.flush();
    }

    /// Replaces a control's configuration and re-lays it out.
    pub fn set_configuration(&mut self, id: ControlId, configuration: Configuration) {
        if let Some(control) = self.controls.get_mut(id) {
            control.update_configuration(&mut self.cx, configuration);
        }
    }

    /// Replaces a control's indicator.
    pub fn set_activity_indicator(
        &mut self,
        id: ControlId,
        indicator: impl ActivityIndicator + 'static,
    ) {
        if let Some(control) = self.controls.get_mut(id) {
            control.set_activity_indicator(indicator);
        }
    }

    /// Replaces a control's activation callback.
    pub fn set_on_did_activate(&mut self, id: ControlId, handler: impl FnMut(ControlId) + 'static) {
        if let Some(control) = self.controls.get_mut(id) {
            control.set_on_did_activate(handler);
        }
    }

    /// Attaches `header`.
    ///
    /// # Panics
    ///
    /// Panics if the header was attached before.
    pub fn insert_sticky_header(&mut self, header: StickyHeader) -> HeaderId {
        match self.try_insert_sticky_header(header) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Attaches `header` and applies its inset without animation.
    pub fn try_insert_sticky_header(
        &mut self,
        header: StickyHeader,
    ) -> Result<HeaderId, AttachError> {
        if header.component_state().has_attached_to_container {
            return Err(AttachError::HeaderAlreadyAttached);
        }
        let id: HeaderId = self.headers.insert(header);
        if let Some(header) = self.headers.get_mut(id) {
            header.attach(id, &mut self.cx);
        }
        self.flush();
        Ok(id)
    }

    /// Detaches a header and hands it back. Its inset contribution stays.
    pub fn remove_sticky_header(&mut self, id: HeaderId) -> Option<StickyHeader> {
        let mut header = self.headers.remove(id)?;
        header.detach(&mut self.cx);
        self.flush();
        Some(header)
    }

    /// An attached header.
    pub fn sticky_header(&self, id: HeaderId) -> Option<&StickyHeader> {
        self.headers.get(id)
    }

    /// Installs or replaces a header's content, then reloads it.
    pub fn set_header_content(&mut self, id: HeaderId, content: impl StickyContent + 'static) {
        if let Some(header) = self.headers.get_mut(id) {
            header.set_content(id, &mut self.cx, Box::new(content));
            self.flush();
        }
    }

    /// Shows or hides a header, growing or shrinking its inset.
    pub fn set_header_active(&mut self, id: HeaderId, is_active: bool, animated: bool) {
        let Some(header) = self.headers.get_mut(id) else {
            trace!(?id, "activity for detached header ignored");
            return;
        };
        header.set_active(id, &mut self.cx, is_active, animated);
        self.flush();
    }

    /// Replaces a header's configuration.
    pub fn set_header_configuration(&mut self, id: HeaderId, configuration: HeaderConfiguration) {
        if let Some(header) = self.headers.get_mut(id) {
            header.set_configuration(id, &mut self.cx, configuration);
            self.flush();
        }
    }

    /// Re-measures a header's content after it changed size.
    pub fn request_update_sizing(&mut self, id: HeaderId, animated: bool) {
        if let Some(header) = self.headers.get_mut(id) {
            header.reload(id, &mut self.cx, animated);
            self.flush();
        }
    }

    /// Returns `true` while any inset animation is running.
    pub fn is_animating(&self) -> bool {
        self.controls.values().any(EdgeControl::is_animating)
            || self.headers.values().any(StickyHeader::is_animating)
    }

    /// Returns `true` while deferred work is waiting for the clock.
    pub fn has_pending_tasks(&self) -> bool {
        !self.cx.scheduler.is_empty()
    }

    /// Advances the host clock to `now_ms`: runs one animation frame for every
    /// component, then any deferred work that has come due.
    ///
    /// The clock never moves backwards.
    pub fn tick(&mut self, now_ms: u64) {
        self.cx.now_ms = self.cx.now_ms.max(now_ms);

        for id in self.controls.keys::<ControlId>() {
            if let Some(control) = self.controls.get_mut(id) {
                control.tick(id, &mut self.cx);
            }
            self.flush();
        }
        for id in self.headers.keys::<HeaderId>() {
            if let Some(header) = self.headers.get_mut(id) {
                header.tick(id, &mut self.cx);
            }
            self.flush();
        }

        while let Some(task) = self.cx.scheduler.pop_due(self.cx.now_ms) {
            self.run(task);
            self.flush();
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::NotifyDidActivate(id) => match self.controls.get_mut(id) {
                Some(control) => control.notify_did_activate(id),
                None => trace!(?id, "activation callback for detached control skipped"),
            },
        }
    }

    /// Delivers pending notifications, including the ones handlers cause.
    fn flush(&mut self) {
        let mut budget = DISPATCH_BUDGET;
        while let Some(notification) = self.cx.observations.next_pending() {
            if budget == 0 {
                let dropped = 1 + self.cx.observations.clear_pending();
                warn!(dropped, "notification budget exhausted, dropping the rest");
                return;
            }
            budget -= 1;
            match notification.observer {
                ComponentId::Control(id) => {
                    if let Some(control) = self.controls.get_mut(id) {
                        control.handle(id, &mut self.cx, notification.changes);
                    }
                }
                ComponentId::Header(id) => {
                    if let Some(header) = self.headers.get_mut(id) {
                        header.handle(id, &mut self.cx, notification.changes);
                    }
                }
            }
        }
    }
}
