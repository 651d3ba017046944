//! Multi-strategy audio download.
//!
//! A download walks an ordered list of provider strategies, from the most
//! fully featured to the most minimal, and stops at the first one that
//! succeeds:
//!
//! ```text
//! Decoding → Attempting(1) → Attempting(2) → Attempting(3) → Exhausted
//!                 ↓               ↓               ↓              ↓
//!                 └───────────────┴──── Locating ─┘         classify
//!                                          ↓
//!                                     Normalizing → Done
//! ```
//!
//! Only the last strategy's fault is ever surfaced, classified into an
//! [`ErrorCategory`](crate::error::ErrorCategory).

mod classify;
mod orchestrator;
mod quality;
mod request;
mod strategy;

pub use classify::{classify, classify_failure, BOT_MARKERS};
pub use orchestrator::{AttemptOutcome, DownloadOrchestrator, DownloadOutcome, StrategyAttempt};
pub use quality::AudioQuality;
pub use request::{decode_url, DownloadRequest};
pub use strategy::{default_strategies, StrategyDescriptor};
