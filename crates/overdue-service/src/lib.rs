// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Todo lifecycle orchestration for the Overdue service.
//!
//! [`TodoService`] is the lookup-and-mutate gateway used by request
//! handlers: fetch by identity, apply one transition, persist.
//! [`PastDueSweep`] runs independently on a fixed interval and is the only
//! actor that moves items into the past-due state.

pub mod service;
pub mod shutdown;
pub mod sweep;

pub use service::TodoService;
pub use sweep::{PastDueSweep, SweepReport};
