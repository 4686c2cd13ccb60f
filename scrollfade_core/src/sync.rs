// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update state machine.
//!
//! A [`Synchronizer`] owns a list of [`TargetSpec`]s and the [`Host`] they are
//! resolved against. [`apply_now`](Synchronizer::apply_now) runs one full
//! pass; [`on_scroll`](Synchronizer::on_scroll) and
//! [`on_frame`](Synchronizer::on_frame) implement frame coalescing:
//!
//! ```text
//!            scroll / RequestFrame          frame / apply_now
//!   Idle ─────────────────────────► Pending ───────────────────► Idle
//!                                     │ ▲
//!                                     └─┘ scroll / Absorbed (Coalesce)
//!                                         scroll / RequestFrame (RequestPerEvent)
//!
//!   any ── dispose ──► Disposed (terminal)
//! ```
//!
//! The synchronizer does not schedule anything itself; it tells the caller
//! what to do through [`ScrollAction`]. [`Driver`](crate::driver::Driver)
//! does that wiring for hosts with a [`FrameScheduler`](crate::host::FrameScheduler).

use alloc::vec::Vec;

use crate::error::OpacityError;
use crate::geometry::Geometry;
use crate::host::Host;
use crate::opacity::compute_opacity;
use crate::target::TargetSpec;
use crate::time::HostTime;
#[cfg(feature = "trace-rich")]
use crate::trace::OpacityEvent;
use crate::trace::{
    DisposeEvent, PassBeginEvent, PassSummary, PassTrigger, ScrollEvent, SkipEvent, SkipReason,
    Tracer,
};

/// Controls what a scroll event does while a frame is already pending.
///
/// Passed to the [`Synchronizer`] via [`SyncConfig::coalesce`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoalescePolicy {
    /// Absorb the event; the pending frame will read fresh geometry anyway.
    Coalesce,
    /// Request another frame for every event. Each request runs its own pass,
    /// so bursts do redundant work but end in the same visual state.
    RequestPerEvent,
}

/// Configuration for the [`Synchronizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Policy for scroll events that arrive while a frame is pending.
    pub coalesce: CoalescePolicy,
}

impl SyncConfig {
    /// At most one pending frame at a time.
    #[must_use]
    pub const fn coalescing() -> Self {
        Self {
            coalesce: CoalescePolicy::Coalesce,
        }
    }

    /// One frame request per scroll event.
    #[must_use]
    pub const fn per_event() -> Self {
        Self {
            coalesce: CoalescePolicy::RequestPerEvent,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::coalescing()
    }
}

/// Where the synchronizer is in its frame cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// No frame callback outstanding.
    Idle,
    /// Frame callbacks requested but not yet run.
    Pending {
        /// Outstanding requests (always 1 under [`CoalescePolicy::Coalesce`]).
        requests: u32,
    },
    /// Torn down; every further call is a no-op.
    Disposed,
}

/// What the caller must do after a scroll event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAction {
    /// Request a frame callback that calls [`Synchronizer::on_frame`].
    RequestFrame,
    /// Nothing; an already requested frame covers this event.
    Absorbed,
    /// Nothing; the synchronizer is disposed.
    Ignored,
}

impl From<OpacityError> for SkipReason {
    fn from(err: OpacityError) -> Self {
        match err {
            OpacityError::ZeroWaypoint => Self::ZeroWaypoint,
            OpacityError::DegenerateViewport => Self::DegenerateViewport,
        }
    }
}

/// Applies scroll-driven opacity to every configured target.
///
/// # Usage
///
/// ```rust,ignore
/// let mut sync = Synchronizer::new(host, targets, SyncConfig::coalescing());
/// sync.apply_now(PassTrigger::Eager, now(), &mut Tracer::none());
///
/// // on every scroll event:
/// if sync.on_scroll(now(), &mut tracer) == ScrollAction::RequestFrame {
///     request_frame(|| sync.on_frame(now(), &mut tracer));
/// }
/// ```
pub struct Synchronizer<H: Host> {
    host: H,
    targets: Vec<TargetSpec>,
    config: SyncConfig,
    state: FrameState,
    passes: u64,
    scrolls: u64,
}

impl<H: Host> core::fmt::Debug for Synchronizer<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("targets", &self.targets)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("passes", &self.passes)
            .field("scrolls", &self.scrolls)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Synchronizer<H> {
    /// Creates an idle synchronizer. No pass runs until
    /// [`apply_now`](Self::apply_now) is called.
    #[must_use]
    pub fn new(host: H, targets: impl IntoIterator<Item = TargetSpec>, config: SyncConfig) -> Self {
        Self {
            host,
            targets: targets.into_iter().collect(),
            config,
            state: FrameState::Idle,
            passes: 0,
            scrolls: 0,
        }
    }

    /// Runs one pass over every target and writes the resulting opacities.
    ///
    /// Failures are isolated: a target that matches nothing, a detached
    /// element, or an element whose waypoint resolves to zero is skipped and
    /// the pass continues. Returns `None` once disposed.
    pub fn apply_now(
        &mut self,
        trigger: PassTrigger,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Option<PassSummary> {
        if self.state == FrameState::Disposed {
            return None;
        }
        let pass_index = self.passes;
        self.passes += 1;

        let viewport_height = self.host.viewport_height();
        let mut summary = PassSummary {
            pass_index,
            trigger,
            timestamp: now,
            targets: count(self.targets.len()),
            unmatched_targets: 0,
            elements_updated: 0,
            elements_skipped: 0,
        };
        tracer.pass_begin(&PassBeginEvent {
            pass_index,
            trigger,
            timestamp: now,
            viewport_height,
            targets: summary.targets,
        });

        for (target_index, target) in self.targets.iter().enumerate() {
            let target_index = count(target_index);
            let elements = self.host.resolve(target.selector());
            if elements.is_empty() {
                summary.unmatched_targets += 1;
                tracer.skip(&SkipEvent {
                    pass_index,
                    target_index,
                    element_index: None,
                    reason: SkipReason::NoMatch,
                });
                continue;
            }

            for (element_index, element) in elements.iter().enumerate() {
                let element_index = count(element_index);
                let result = match self.host.bounding_rect(element) {
                    Some(rect) => {
                        let geometry = Geometry::from_rect(rect, viewport_height);
                        compute_opacity(&geometry, target.options()).map_err(SkipReason::from)
                    }
                    None => Err(SkipReason::Detached),
                };
                match result {
                    Ok(opacity) => {
                        self.host.set_opacity(element, opacity);
                        summary.elements_updated += 1;
                        #[cfg(feature = "trace-rich")]
                        tracer.opacity(&OpacityEvent {
                            pass_index,
                            target_index,
                            element_index,
                            opacity,
                        });
                    }
                    Err(reason) => {
                        summary.elements_skipped += 1;
                        tracer.skip(&SkipEvent {
                            pass_index,
                            target_index,
                            element_index: Some(element_index),
                            reason,
                        });
                    }
                }
            }
        }

        tracer.pass_summary(&summary);
        Some(summary)
    }

    /// Records a scroll event and says whether a frame must be requested.
    pub fn on_scroll(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> ScrollAction {
        let action = match (self.state, self.config.coalesce) {
            (FrameState::Disposed, _) => ScrollAction::Ignored,
            (FrameState::Idle, _) => {
                self.state = FrameState::Pending { requests: 1 };
                ScrollAction::RequestFrame
            }
            (FrameState::Pending { .. }, CoalescePolicy::Coalesce) => ScrollAction::Absorbed,
            (FrameState::Pending { requests }, CoalescePolicy::RequestPerEvent) => {
                self.state = FrameState::Pending {
                    requests: requests.saturating_add(1),
                };
                ScrollAction::RequestFrame
            }
        };
        let scroll_index = self.scrolls;
        self.scrolls += 1;
        tracer.scroll(&ScrollEvent {
            scroll_index,
            timestamp: now,
            action,
        });
        action
    }

    /// Runs the pass for one requested frame.
    ///
    /// Returns `None` when no frame was pending (or after disposal).
    pub fn on_frame(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> Option<PassSummary> {
        let FrameState::Pending { requests } = self.state else {
            return None;
        };
        self.state = if requests > 1 {
            FrameState::Pending {
                requests: requests - 1,
            }
        } else {
            FrameState::Idle
        };
        self.apply_now(PassTrigger::Frame, now, tracer)
    }

    /// Tears the synchronizer down and drops its targets.
    ///
    /// Later passes, scroll events and frames are ignored. Calling this more
    /// than once is harmless.
    pub fn dispose(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        if self.state == FrameState::Disposed {
            return;
        }
        self.state = FrameState::Disposed;
        self.targets = Vec::new();
        tracer.dispose(&DisposeEvent {
            timestamp: now,
            passes: self.passes,
        });
    }

    /// Returns the configured targets (empty once disposed).
    #[must_use]
    pub fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> SyncConfig {
        self.config
    }

    /// Returns the current frame state.
    #[must_use]
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state == FrameState::Disposed
    }

    /// Returns the number of passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
