// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damped spring simulation over a single scalar.

/// Physical parameters of a damped spring.
///
/// The force applied each step is `-tension * displacement - damping * velocity`,
/// divided by `mass`. With `damping >= 2 * sqrt(tension * mass)` the spring is
/// critically or over-damped and settles without oscillating.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
    /// Stiffness of the spring.
    pub tension: f64,
    /// Resistance proportional to velocity.
    pub damping: f64,
    /// Mass attached to the spring.
    pub mass: f64,
    /// Both velocity and displacement must fall under this value for the
    /// spring to be considered settled.
    pub threshold: f64,
}

impl SpringConfig {
    /// Tension 1200 and damping 120: a fast, non-oscillating settle used for
    /// content-inset transitions.
    pub const INSET_TRANSITION: Self = Self::new(1200.0, 120.0);

    /// Creates a spring with unit mass and the default settle threshold.
    #[must_use]
    pub const fn new(tension: f64, damping: f64) -> Self {
        Self {
            tension,
            damping,
            mass: 1.0,
            threshold: 0.1,
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::INSET_TRANSITION
    }
}

/// Integration step in seconds.
const STEP: f64 = 0.001;

/// Live state of a spring moving a value toward `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    /// Creates a spring at rest at `value`, pulling toward `target`.
    #[must_use]
    pub const fn new(value: f64, target: f64, config: SpringConfig) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity, in units per second.
    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Value the spring pulls toward.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    /// Spring parameters.
    #[must_use]
    pub const fn config(&self) -> SpringConfig {
        self.config
    }

    /// Returns `true` once velocity and displacement are both under the threshold.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        let t = self.config.threshold;
        within(self.velocity, t) && within(self.target - self.value, t)
    }

    /// Advances the simulation by `dt` seconds in fixed sub-steps.
    ///
    /// Snaps to the target and returns `true` once settled.
    pub fn advance(&mut self, dt: f64) -> bool {
        let mut remaining = dt;
        while remaining > 0.0 {
            if self.is_settled() {
                break;
            }
            let h = remaining.min(STEP);
            let displacement = self.value - self.target;
            let force = -self.config.tension * displacement - self.config.damping * self.velocity;
            // Semi-implicit Euler: velocity first, then position with the new velocity.
            self.velocity += force / self.config.mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            true
        } else {
            false
        }
    }
}

fn within(v: f64, threshold: f64) -> bool {
    -threshold < v && v < threshold
}
