//! # config.rs – Centralized Parameter Store
//!
//! This module holds all static program parameters used throughout the node.
//! Keeping configuration in one place makes tuning, experimentation, and testing easier.
//! Runtime-selectable values (node id, ports, solver path) live in [crate::init::NodeConfig].

use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;

//
// ──────────────────────────────────────────────────────────────
//   1. NETWORK SETTINGS
// ──────────────────────────────────────────────────────────────
//

/// Port the status broadcast is sent and received on
pub const BROADCAST_PORT: u16 = 20013;

/// UDP broadcast listen address (bind address)
pub static BC_LISTEN_ADDR: &str = "0.0.0.0";

/// Broadcast address used for status messages
pub static BC_ADDR: &str = "255.255.255.255";

/// Key prefixed to every status packet, used to filter out foreign traffic
pub const KEY_STR: &str = "Gruppe 25";

/// Size of UDP receive buffer in bytes
pub const UDP_BUFFER: usize = u16::MAX as usize;

/// Default node id, also the port of the local elevator server
pub const DEFAULT_NODE_ID: u16 = 15657;

//
// ──────────────────────────────────────────────────────────────
//   2. SYSTEM & ELEVATOR PARAMETERS
// ──────────────────────────────────────────────────────────────
//

/// Number of floors served by every cab in the network
pub const NUM_FLOORS: usize = 4;

/// Index of the top floor
pub const TOP_FLOOR: u8 = (NUM_FLOORS - 1) as u8;

/// Duration between elevator hardware polls
pub const ELEV_POLL: Duration = Duration::from_millis(20);

/// How long the door is held open after stopping at a floor
pub const DOOR_OPEN_DURATION: Duration = Duration::from_secs(3);

//
// ──────────────────────────────────────────────────────────────
//   3. TIMING & TIMEOUTS & INTERVALS
// ──────────────────────────────────────────────────────────────
//

/// Time interval between status broadcasts
pub const BROADCAST_PERIOD: Duration = Duration::from_millis(10);

/// How often the watchdog checks for silent peers. Must be shorter than [PEER_TIMEOUT]
pub const WATCHDOG_PERIOD: Duration = Duration::from_millis(250);

/// A peer not heard from within this duration is declared dead
pub const PEER_TIMEOUT: Duration = Duration::from_millis(1000);

/// Upper bound on how long one run of the hall request assigner may take
pub const SOLVER_TIMEOUT: Duration = Duration::from_secs(2);

/// Number of own broadcasts during which peers' cab backups may reactivate our cab calls
pub const CAB_RECOVERY_WINDOW: u64 = 100;

/// Directory the hall_request_assigner executables are looked up in
pub static SOLVER_DIR: &str = "./cost_fns/hall_request_assigner";

//
// ──────────────────────────────────────────────────────────────
//   4. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of order matrices and peer tables
pub static PRINT_WV_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable miscellaneous debug prints
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));
