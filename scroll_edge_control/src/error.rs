// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`ScrollHost`](crate::ScrollHost).

use thiserror::Error;

/// Why a component could not be attached to a host.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    /// The edge control was already attached to a container once.
    ///
    /// Edge controls are attached at most once in their lifetime, even after
    /// being removed again.
    #[error("edge control has already been attached to a scroll container")]
    ControlAlreadyAttached,
    /// The sticky header was already attached to a container once.
    #[error("sticky header has already been attached to a scroll container")]
    HeaderAlreadyAttached,
}
