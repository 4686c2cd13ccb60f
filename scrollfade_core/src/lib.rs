// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-synchronized opacity for document elements.
//!
//! `scrollfade_core` keeps the opacity of one or more elements proportional to
//! how far each has travelled through a configurable *waypoint* distance
//! relative to the viewport. It is `no_std` compatible (with `alloc`) and knows
//! nothing about any particular document model: hosts plug in element lookup,
//! geometry, style writes and frame scheduling through small traits.
//!
//! # Architecture
//!
//! ```text
//!   TargetSpec[] ──► Synchronizer::apply_now()
//!                        │  per target: Host::resolve(selector)
//!                        │  per element: Host::bounding_rect() ──► Geometry
//!                        ▼
//!                 compute_opacity(Geometry, Options) ──► Host::set_opacity()
//!
//!   scroll event ──► Driver::handle_scroll() ──► Synchronizer::on_scroll()
//!                        │ RequestFrame
//!                        ▼
//!                 FrameScheduler::request_frame() ──► Synchronizer::on_frame()
//! ```
//!
//! **[`options`]** — [`Direction`](options::Direction),
//! [`Waypoint`](options::Waypoint) and the closed
//! [`Options`](options::Options) structure, including JSON parsing of
//! declarative option blobs.
//!
//! **[`geometry`]** — The per-pass [`Geometry`](geometry::Geometry) snapshot.
//!
//! **[`opacity`]** — The pure opacity calculator.
//!
//! **[`target`]** — [`TargetSpec`](target::TargetSpec) and
//! [`ScrollSource`](target::ScrollSource).
//!
//! **[`markup`]** — Turning `fade-on-scroll` marker elements into target specs.
//!
//! **[`host`]** — The [`Host`](host::Host) and
//! [`FrameScheduler`](host::FrameScheduler) contracts that backends implement.
//!
//! **[`sync`]** — The [`Synchronizer`](sync::Synchronizer) state machine
//! (idle/pending/disposed) and its [`SyncConfig`](sync::SyncConfig) presets.
//!
//! **[`driver`]** — [`Driver`](driver::Driver), which wires a synchronizer to a
//! frame scheduler so scroll bursts collapse into one pass per frame.
//!
//! **[`pacing`]** — Timer-based frame pacing for hosts without a native
//! animation-frame primitive.
//!
//! **[`time`]** — Monotonic host time and timebase conversion.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! update-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-element
//!   opacity events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod driver;
pub mod error;
pub mod geometry;
pub mod host;
pub mod markup;
pub mod opacity;
pub mod options;
pub mod pacing;
pub mod sync;
pub mod target;
pub mod time;
pub mod trace;

#[cfg(test)]
mod testing;
