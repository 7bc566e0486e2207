// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw coalescing.
//!
//! Any number of redraw requests between two frames collapse into one
//! pending repaint. The host's idle hook runs once when the first request of
//! a frame arrives, and the stage clears the pending state when it repaints.

use alloc::boxed::Box;
use core::fmt;

/// Callback the host uses to schedule a repaint on its main loop.
pub type IdleHook = Box<dyn FnMut()>;

/// A pending flag plus a single registration with the host's idle source.
#[derive(Default)]
pub struct RedrawScheduler {
    pending: bool,
    hook: Option<IdleHook>,
}

impl fmt::Debug for RedrawScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedrawScheduler")
            .field("pending", &self.pending)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl RedrawScheduler {
    /// A scheduler with nothing pending and no hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or remove the idle hook.
    ///
    /// A request that is already pending is not re-announced to a new hook.
    pub fn set_hook(&mut self, hook: Option<IdleHook>) {
        self.hook = hook;
    }

    /// Request a repaint. Returns `true` if this request scheduled one.
    pub fn queue(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        log::trace!("scheduling redraw");
        if let Some(hook) = self.hook.as_mut() {
            hook();
        }
        true
    }

    /// Whether a repaint is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear the pending state; returns whether a repaint was scheduled.
    pub fn take(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }
}
