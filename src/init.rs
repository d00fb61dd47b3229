//! Startup helpers: command line arguments and process start time.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};

use crate::config;


/// Runtime settings of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Numeric identity of the node, sent on the wire as a string
    pub node_id: u16,
    /// Address of the elevator server
    pub elevator_addr: String,
    /// Port for status broadcasts
    pub broadcast_port: u16,
    /// Directory holding the hall request assigner executables
    pub solver_dir: PathBuf,
}

impl NodeConfig {
    /// Settings for node `node_id` with every other value at its default
    pub fn with_id(node_id: u16) -> Self {
        Self {
            node_id,
            elevator_addr: format!("localhost:{}", node_id),
            broadcast_port: config::BROADCAST_PORT,
            solver_dir: PathBuf::from(config::SOLVER_DIR),
        }
    }

    /// Id used in status messages and in the assigner input
    pub fn sender_id(&self) -> String {
        self.node_id.to_string()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::with_id(config::DEFAULT_NODE_ID)
    }
}

/// Result of reading the arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Args {
    /// Start the node
    Run(NodeConfig),
    /// Only print the help text
    Help,
}


fn set(flag: &std::sync::Mutex<bool>, value: bool) {
    *flag.lock().unwrap_or_else(|e| e.into_inner()) = value;
}

/// Parses `key::value` arguments (program name not included).
///
/// `print_*` and `debug` switch the print levels in [config] directly.
pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut node = NodeConfig::default();
    let mut elevator_addr = None;

    for arg in args {
        let lower = arg.to_lowercase();
        if lower == "help" {
            return Ok(Args::Help);
        }
        if lower == "debug" {
            // Debug modus: Kun error-meldingar
            set(&config::PRINT_WV_ON, false);
            set(&config::PRINT_WARN_ON, false);
            set(&config::PRINT_OK_ON, false);
            set(&config::PRINT_INFO_ON, false);
            set(&config::PRINT_ELSE_ON, false);
            continue;
        }

        let Some((key, value)) = arg.split_once("::") else {
            bail!("unknown argument '{}', try 'help'", arg);
        };
        let is_true = value.to_lowercase() == "true";
        match key.to_lowercase().as_str() {
            "id" => {
                node.node_id = value.parse().with_context(|| format!("invalid node id '{}'", value))?;
            }
            "port" => {
                node.broadcast_port = value.parse().with_context(|| format!("invalid port '{}'", value))?;
            }
            "elev" => elevator_addr = Some(value.to_string()),
            "solver" => node.solver_dir = PathBuf::from(value),
            "print_wv" => set(&config::PRINT_WV_ON, is_true),
            "print_err" => set(&config::PRINT_ERR_ON, is_true),
            "print_warn" => set(&config::PRINT_WARN_ON, is_true),
            "print_ok" => set(&config::PRINT_OK_ON, is_true),
            "print_info" => set(&config::PRINT_INFO_ON, is_true),
            "print_else" => set(&config::PRINT_ELSE_ON, is_true),
            _ => bail!("unknown argument '{}', try 'help'", arg),
        }
    }

    node.elevator_addr = elevator_addr.unwrap_or_else(|| format!("localhost:{}", node.node_id));
    Ok(Args::Run(node))
}

/// ### Reads arguments from `cargo run`
///
/// Available options:
///
/// `id::<n>` &rarr; Node id, also the port of the local elevator server (default 15657)
/// `elev::<host:port>` &rarr; Elevator server address (default `localhost:<id>`)
/// `port::<n>` &rarr; Broadcast port (default 20013)
/// `solver::<dir>` &rarr; Directory with the hall request assigner executables
/// `print_wv::(true/false)` &rarr; Prints order matrices and peer tables
/// `print_err::(true/false)` &rarr; Prints error messages
/// `print_warn::(true/false)` &rarr; Prints warning messages
/// `print_ok::(true/false)` &rarr; Prints OK messages
/// `print_info::(true/false)` &rarr; Prints informational messages
/// `print_else::(true/false)` &rarr; Prints other messages
/// `debug` &rarr; Disables all prints except error messages
/// `help` &rarr; Displays all possible arguments without starting the program
///
/// Exits the process after `help`, or on an invalid argument.
pub fn parse_args() -> NodeConfig {
    match parse_from(env::args().skip(1)) {
        Ok(Args::Run(node)) => node,
        Ok(Args::Help) => {
            println!("Tilgjengelige argument:");
            println!("  id::<nodeid>            (default {})", config::DEFAULT_NODE_ID);
            println!("  elev::<host:port>       (default localhost:<id>)");
            println!("  port::<broadcastport>   (default {})", config::BROADCAST_PORT);
            println!("  solver::<dir>           (default {})", config::SOLVER_DIR);
            println!("  print_wv::true/false");
            println!("  print_err::true/false");
            println!("  print_warn::true/false");
            println!("  print_ok::true/false");
            println!("  print_info::true/false");
            println!("  print_else::true/false");
            println!("  debug (kun error-meldingar vises)");
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(2);
        }
    }
}

/// Milliseconds since the UNIX epoch, taken once at startup
pub fn boot_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> anyhow::Result<Args> {
        parse_from(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(args(&[]).unwrap(), Args::Run(NodeConfig::default()));
        assert_eq!(NodeConfig::default().elevator_addr, "localhost:15657");
    }

    #[test]
    fn id_moves_elevator_address() {
        let Args::Run(node) = args(&["id::15658", "port::30000", "solver::/opt/hra"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(node.sender_id(), "15658");
        assert_eq!(node.elevator_addr, "localhost:15658");
        assert_eq!(node.broadcast_port, 30000);
        assert_eq!(node.solver_dir, PathBuf::from("/opt/hra"));
    }

    #[test]
    fn explicit_elevator_address_wins() {
        let Args::Run(node) = args(&["elev::10.0.0.3:15657", "id::2"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(node.elevator_addr, "10.0.0.3:15657");
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(args(&["id::abc"]).is_err());
        assert!(args(&["frobnicate"]).is_err());
        assert_eq!(args(&["HELP"]).unwrap(), Args::Help);
    }
}
