//! Adapter implementations for port traits.
//!
//! - `live/` — Real API implementation (requires the `live` feature)
//! - `recording/` — Record interactions to cassettes
//! - `replaying/` — Replay interactions from cassettes
//! - `unavailable` — Stand-in when no remote client is compiled in

#[cfg(feature = "live")]
pub mod live;
pub mod recording;
pub mod replaying;
pub mod unavailable;
