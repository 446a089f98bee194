// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll Edge Control: pull-to-activate controls and sticky headers for scrollable
//! containers.
//!
//! The crate is built around a few pieces:
//! - [`ScrollContainer`]: the scroll view being decorated. [`ScrollState`] is a
//!   plain-data implementation.
//! - [`ScrollHost`]: owns the container and every component attached to it, routes
//!   container changes to them, and advances their animations and deferred work
//!   from [`ScrollHost::tick`].
//! - [`EdgeControl`]: a control anchored to one [`Edge`]. Pulling the content past
//!   that edge reports [`ActivatingState::Triggering`] progress and, at
//!   [`TRIGGER_LENGTH`], activates the control. An active control can contribute
//!   [`INDICATOR_LENGTH`] of inset so its indicator stays visible.
//! - [`StickyHeader`]: a header pinned to the top that contributes its height as
//!   top inset while shown.
//! - [`InsetLedger`]: how contributions compose. The container always applies the
//!   application's own inset plus the sum of contributions, so several controls
//!   on one container never overwrite each other or the application's inset.
//!
//! ## Minimal example
//!
//! A pull-to-refresh flow on the top edge:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use scroll_edge_control::{
//!     ActivityState, Edge, EdgeControl, IndicatorModel, ScrollHost, ScrollState,
//!     ACTIVATION_NOTIFY_DELAY_MS,
//! };
//!
//! let container = ScrollState::new(Size::new(320.0, 480.0), Size::new(320.0, 2000.0));
//! let mut host = ScrollHost::new(container);
//!
//! let indicator = IndicatorModel::new();
//! let refreshes = Rc::new(Cell::new(0));
//! let mut control = EdgeControl::new(Edge::Top, Default::default(), indicator.clone());
//! let counter = refreshes.clone();
//! control.set_on_did_activate(move |_| counter.set(counter.get() + 1));
//! let id = host.insert_edge_control(control);
//!
//! // The user drags the content down by 80 points.
//! host.update_container(|c| {
//!     c.is_tracking = true;
//!     c.content_offset = Point::new(0.0, -80.0);
//! });
//! assert_eq!(indicator.label(), "refreshing");
//! assert_eq!(host.content_inset().y0, 50.0);
//!
//! // The activation callback runs once its delay has passed.
//! host.tick(ACTIVATION_NOTIFY_DELAY_MS);
//! assert_eq!(refreshes.get(), 1);
//!
//! // The refresh finishes: the inset animates away.
//! host.update_container(|c| c.is_tracking = false);
//! host.set_activity_state(id, ActivityState::INACTIVE, true);
//! let mut now = ACTIVATION_NOTIFY_DELAY_MS;
//! while host.is_animating() {
//!     now += 16;
//!     host.tick(now);
//! }
//! assert_eq!(host.content_inset().y0, 0.0);
//! assert_eq!(indicator.label(), "completed");
//! ```
//!
//! ## Model
//!
//! Nothing happens on its own. Container changes enter through
//! [`ScrollHost::update_container`], time through [`ScrollHost::tick`], and
//! application decisions through methods like [`ScrollHost::set_activity_state`].
//! Each call delivers the notifications it causes before returning. A component
//! that stops observing before a write is never told about that write, which is
//! what lets a control change the inset without seeing the offset jump it causes.
//!
//! ## Features
//!
//! - `std` (default): enables `std` in `kurbo`.
//! - `libm`: `no_std` float support for `kurbo`.
//! - `serde`: derives `Serialize`/`Deserialize` for configuration and state values.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod container;
mod context;
mod edge;
mod edge_control;
mod error;
mod host;
mod indicator;
mod ledger;
mod observe;
mod scheduler;
mod scroll_lock;
mod slots;
mod sticky_header;


pub use container::{ScrollContainer, ScrollState};
pub use edge::{Direction, Edge};
pub use edge_control::{
    ACTIVATION_NOTIFY_DELAY_MS, AUTO_SCROLL_MARGIN, ActivatingState, ActivityIndicator,
    ActivityState, ComponentState, Configuration, EdgeControl, HapticFeedback, INDICATOR_LENGTH,
    LayoutMode, PullToActivateMode, TRIGGER_LENGTH, ZLayoutMode,
};
pub use error::AttachError;
pub use host::ScrollHost;
pub use indicator::{INDICATOR_FADE_MS, IndicatorModel, Presentation};
pub use ledger::InsetLedger;
pub use observe::Changes;
pub use scroll_edge_spring::SpringConfig;
pub use scroll_lock::ScrollLock;
pub use slots::{ComponentId, ControlId, HeaderId};
pub use sticky_header::{
    ContentState, HeaderAnchor, HeaderComponentState, HeaderConfiguration, StickyContent,
    StickyHeader,
};
