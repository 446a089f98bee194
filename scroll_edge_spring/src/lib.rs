// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll Edge Spring: frame-driven damped spring animation for scalar values.
//!
//! - [`SpringConfig`]: tension, damping, mass and settle threshold.
//! - [`Spring`]: the simulation state, advanced in fixed sub-steps.
//! - [`SpringAnimator`]: owns at most one running [`Spring`] and turns display
//!   refresh callbacks (`tick(now_ms)`) into values to apply.
//!
//! Animators are independent of each other: each owner keeps its own and starting
//! a new simulation cancels only that owner's previous one. The crate knows nothing
//! about what the value means; callers decide how to apply each frame, and may
//! [`SpringAnimator::cancel`] mid-flight to snap to a final value themselves.
//!
//! ```rust
//! use scroll_edge_spring::{Spring, SpringConfig};
//!
//! let mut spring = Spring::new(50.0, 0.0, SpringConfig::new(1200.0, 120.0));
//! while !spring.advance(1.0 / 60.0) {}
//! assert_eq!(spring.value(), 0.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate std;

mod animator;
mod spring;

pub use animator::SpringAnimator;
pub use spring::{Spring, SpringConfig};
