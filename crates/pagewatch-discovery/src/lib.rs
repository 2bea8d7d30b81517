//! # PageWatch Discovery
//!
//! The discovery stage: six complementary URL-enumeration techniques
//! fused into one deduplicated, provenance-tagged candidate set, then
//! probed for liveness.
//!
//! This stage deliberately runs on OS threads with blocking I/O; the
//! inspection stage has its own async-native crawler and validator.
//! Callers on an async runtime should drive [`Enumerator::enumerate`]
//! through `spawn_blocking`.

pub mod bruteforce;
pub mod config;
pub mod enumerator;
pub mod js_parser;
pub mod live_crawler;
pub mod robots;
pub mod validator;
pub mod wayback;

pub use config::DiscoveryConfig;
pub use enumerator::Enumerator;
pub use validator::{is_alive_status, LivenessValidator, Probe};
