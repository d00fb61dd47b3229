#![warn(missing_docs)]
//! # This projects library
//!
//! A leaderless elevator node. Every node broadcasts its full order state, merges what its peers
//! report with a tri-state rule, keeps a backup of its peers' cab orders, and runs its own cab.
//!
//! ## Overview
//! - **Config**: Constants and print switches.
//! - **Init**: Command line arguments and boot time.
//! - **Print**: Colour coded terminal output.
//! - **Elevio**: Interface for elevator I/O.
//! - **World View**: Order states, status messages and the merge rule.
//! - **Backup**: Cab order backup of peers and restart recovery.
//! - **Network**: UDP broadcast, acceptance gate and watchdog.
//! - **Manager**: Hall request assignment.
//! - **Elevator Logic**: Motion decisions, door timer and lamps.
//! - **Control Loop**: The single task owning all state.

/// Global variables
pub mod config;

/// Initialize functions
pub mod init;

/// Print functions with color coding
pub mod print;

/// Interface for elevator input/output. Only changes are documented here. For source code see: [https://github.com/TTK4145/driver-rust/tree/master/src/elevio]
pub mod elevio;

/// Management of the system's world view.
pub mod world_view;

pub mod backup;

/// Network communication via UDP broadcast.
pub mod network;

pub mod manager;

/// Elevator control logic.
pub mod elevator_logic;

pub mod control_loop;
