//! Application services for the Courtside platform: session booking and
//! resolution, schedule views, tournament management, the friend graph,
//! coach registration, and identity-directory sync.
//!
//! Services orchestrate the store contracts from `courtside-db` and the
//! outbound ports in [`ports`]. Wherever the current instant matters it is
//! an explicit `now` argument, so every flow is replayable in tests.

pub mod coaches;
pub mod error;
pub mod friends;
pub mod ports;
pub mod sessions;
pub mod sync;
pub mod tournaments;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;
