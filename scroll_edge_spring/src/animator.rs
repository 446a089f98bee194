// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A frame-driven driver around [`Spring`].

use crate::{Spring, SpringConfig};

/// Drives at most one [`Spring`] from display-refresh callbacks.
///
/// Owners call [`SpringAnimator::tick`] once per frame with a monotonic clock in
/// milliseconds and apply the returned value. The animator stops on its own after
/// delivering the exact target value once the spring has settled.
///
/// ```rust
/// use scroll_edge_spring::{SpringAnimator, SpringConfig};
///
/// let mut animator = SpringAnimator::new();
/// animator.start(0.0, 50.0, SpringConfig::INSET_TRANSITION, 1_000);
///
/// let mut now = 1_000;
/// let mut last = 0.0;
/// while let Some(value) = animator.tick(now) {
///     last = value;
///     now += 16;
/// }
/// assert_eq!(last, 50.0);
/// assert!(!animator.is_running());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpringAnimator {
    running: Option<Running>,
}

#[derive(Clone, Copy, Debug)]
struct Running {
    spring: Spring,
    last_ms: u64,
}

impl SpringAnimator {
    /// Creates an idle animator.
    #[must_use]
    pub const fn new() -> Self {
        Self { running: None }
    }

    /// Starts a simulation from `initial` toward `target`, replacing any running one.
    pub fn start(&mut self, initial: f64, target: f64, config: SpringConfig, now_ms: u64) {
        self.cancel();
        self.running = Some(Running {
            spring: Spring::new(initial, target, config),
            last_ms: now_ms,
        });
    }

    /// Stops the running simulation, if any. The next tick yields nothing.
    pub fn cancel(&mut self) {
        self.running = None;
    }

    /// Returns `true` while a simulation is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Target of the running simulation.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.running.map(|r| r.spring.target())
    }

    /// Advances to `now_ms` and returns the value for this frame.
    ///
    /// Returns `None` when idle. The frame that settles the spring returns the
    /// target and leaves the animator idle.
    pub fn tick(&mut self, now_ms: u64) -> Option<f64> {
        let running = self.running.as_mut()?;
        let elapsed = now_ms.saturating_sub(running.last_ms);
        running.last_ms = now_ms;
        #[allow(
            clippy::cast_precision_loss,
            reason = "Frame deltas are far below 2^52 milliseconds."
        )]
        let settled = running.spring.advance(elapsed as f64 / 1000.0);
        let value = running.spring.value();
        if settled {
            self.running = None;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::SpringAnimator;
    use crate::SpringConfig;

    fn run_to_end(animator: &mut SpringAnimator, mut now: u64) -> Vec<f64> {
        let mut trace = Vec::new();
        while let Some(v) = animator.tick(now) {
            trace.push(v);
            now += 16;
            assert!(now < 60_000, "animation did not converge");
        }
        trace
    }

    #[test]
    fn idle_animator_yields_nothing() {
        let mut animator = SpringAnimator::new();
        assert!(!animator.is_running());
        assert_eq!(animator.tick(10), None);
        assert_eq!(animator.target(), None);
    }

    #[test]
    fn delivers_target_and_stops() {
        let mut animator = SpringAnimator::new();
        animator.start(50.0, 0.0, SpringConfig::INSET_TRANSITION, 0);
        assert_eq!(animator.target(), Some(0.0));
        let trace = run_to_end(&mut animator, 0);
        // First frame has no elapsed time yet.
        assert_eq!(trace.first(), Some(&50.0));
        assert_eq!(trace.last(), Some(&0.0));
        assert!(trace.len() > 2, "expected intermediate frames");
        assert!(
            trace.windows(2).all(|w| w[1] <= w[0]),
            "removal must not overshoot: {trace:?}"
        );
        assert!(!animator.is_running());
    }

    #[test]
    fn cancel_stops_immediately() {
        let mut animator = SpringAnimator::new();
        animator.start(0.0, 50.0, SpringConfig::INSET_TRANSITION, 0);
        let _ = animator.tick(16);
        animator.cancel();
        assert_eq!(animator.tick(32), None);
    }

    #[test]
    fn restart_replaces_running_simulation() {
        let mut animator = SpringAnimator::new();
        animator.start(0.0, 50.0, SpringConfig::INSET_TRANSITION, 0);
        let mid = animator.tick(48).unwrap();
        animator.start(mid, 0.0, SpringConfig::INSET_TRANSITION, 48);
        assert_eq!(animator.target(), Some(0.0));
        let trace = run_to_end(&mut animator, 64);
        assert_eq!(trace.last(), Some(&0.0));
        assert!(trace[0] <= mid, "new run heads toward the new target");
    }

    #[test]
    fn large_frame_gap_converges_in_one_tick() {
        let mut animator = SpringAnimator::new();
        animator.start(0.0, 50.0, SpringConfig::INSET_TRANSITION, 0);
        assert_eq!(animator.tick(5_000), Some(50.0));
        assert!(!animator.is_running());
    }
}
