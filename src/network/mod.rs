//! ## Network module
//!
//! Nodes talk only through periodic UDP broadcasts of their full [crate::world_view::StatusMessage].
//! There are no acknowledgements and no retransmissions: the next broadcast replaces a lost one.
//!
//! ## Sub-modules
//! - [udp_broadcast]: Broadcaster and listener tasks
//! - [liveness]: Sequence gate and watchdog, owned by the control loop
//!
//! ## Key Features
//! - Every node publishes its state every [crate::config::BROADCAST_PERIOD].
//! - Stale, duplicated and reordered packets are dropped by the sequence gate.
//! - Peers silent for longer than [crate::config::PEER_TIMEOUT] are declared dead.

pub mod udp_broadcast;
pub mod liveness;
