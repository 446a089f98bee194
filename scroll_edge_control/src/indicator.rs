// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A renderer-agnostic model of the default activity indicator.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use crate::edge_control::{ActivatingState, ActivityIndicator};

/// Duration of the cross-fade between the progress ring and the spinner.
pub const INDICATOR_FADE_MS: u64 = 200;

/// What the default indicator draws: a progress ring while pulling and a spinner
/// while active.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Last state received.
    pub state: ActivatingState,
    /// Opacity of the progress ring.
    pub ring_opacity: f64,
    /// Filled fraction of the progress ring.
    pub ring_progress: f64,
    /// Opacity of the spinner.
    pub spinner_opacity: f64,
    /// Whether the spinner rotates.
    pub spinner_animating: bool,
    /// A cross-fade of [`INDICATOR_FADE_MS`] should accompany the next redraw.
    pub fade_requested: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            state: ActivatingState::Completed,
            ring_opacity: 0.0,
            ring_progress: 0.0,
            spinner_opacity: 0.0,
            spinner_animating: false,
            fade_requested: false,
        }
    }
}

impl Presentation {
    fn apply(&mut self, state: ActivatingState) {
        self.state = state;
        match state {
            ActivatingState::Triggering { progress } => {
                self.spinner_opacity = 0.0;
                self.spinner_animating = false;
                if progress > 0.0 {
                    self.ring_opacity = 1.0;
                    self.ring_progress = progress;
                } else if self.ring_opacity != 0.0 {
                    self.ring_opacity = 0.0;
                    self.fade_requested = true;
                }
            }
            ActivatingState::Active => {
                self.spinner_opacity = 1.0;
                self.spinner_animating = true;
                self.ring_opacity = 0.0;
                self.fade_requested = true;
            }
            ActivatingState::Completed => {
                self.spinner_animating = false;
                self.ring_progress = 0.0;
                self.ring_opacity = 0.0;
            }
        }
    }
}

/// Shared handle to a [`Presentation`].
///
/// Clone it: hand one clone to an [`EdgeControl`](crate::EdgeControl) as its
/// indicator and keep another to draw from.
///
/// ```rust
/// use scroll_edge_control::{ActivatingState, ActivityIndicator, IndicatorModel};
///
/// let model = IndicatorModel::new();
/// let mut indicator = model.clone();
/// indicator.update(ActivatingState::Triggering { progress: 0.5 });
/// assert_eq!(model.presentation().ring_progress, 0.5);
/// assert_eq!(model.label(), "triggering 0.5");
/// ```
#[derive(Clone, Debug, Default)]
pub struct IndicatorModel {
    presentation: Rc<Cell<Presentation>>,
}

impl IndicatorModel {
    /// Creates a model presenting [`ActivatingState::Completed`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current presentation.
    #[must_use]
    pub fn presentation(&self) -> Presentation {
        self.presentation.get()
    }

    /// Returns whether a fade was requested since the last call, and clears it.
    pub fn take_fade(&self) -> bool {
        let mut p = self.presentation.get();
        let fade = p.fade_requested;
        p.fade_requested = false;
        self.presentation.set(p);
        fade
    }

    /// Short text describing the current state, for logs and text renderers.
    #[must_use]
    pub fn label(&self) -> String {
        match self.presentation.get().state {
            ActivatingState::Triggering { progress } => format!("triggering {progress}"),
            ActivatingState::Active => String::from("refreshing"),
            ActivatingState::Completed => String::from("completed"),
        }
    }
}

impl ActivityIndicator for IndicatorModel {
    fn update(&mut self, state: ActivatingState) {
        let mut p = self.presentation.get();
        p.apply(state);
        self.presentation.set(p);
    }
}
