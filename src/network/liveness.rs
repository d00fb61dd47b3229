//! Acceptance gate and watchdog for peer status messages.
//!
//! A message is accepted only if it is not our own and its `(boot_time, msg_id)` pair is
//! strictly greater than the last one accepted from that sender. Within one incarnation of a
//! peer this is plain sequence gating. A peer that restarts comes back with a larger
//! `boot_time`, so its counter restarting from zero is still accepted.
//!
//! Time is passed in by the caller, nothing in here reads the clock.

use std::collections::HashMap;
use std::time::{Duration, Instant};


/// Bookkeeping for one peer
#[derive(Debug, Clone)]
struct PeerState {
    /// Last accepted `(boot_time, msg_id)`
    last: (u64, u64),
    last_seen: Instant,
    alive: bool,
}

/// Verdict of [Liveness::accept]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Own, stale or duplicate message
    Rejected,
    /// Message accepted. `came_alive` is set if the sender was unknown or dead.
    Accepted { came_alive: bool },
}

/// Last-seen table for every peer ever heard from
#[derive(Debug, Clone)]
pub struct Liveness {
    self_id: String,
    peers: HashMap<String, PeerState>,
}

impl Liveness {
    /// Creates an empty table for node `self_id`
    pub fn new(self_id: String) -> Self {
        Self {
            self_id,
            peers: HashMap::new(),
        }
    }

    /// Runs a received message through the gate, stamping the sender as seen at `now` if accepted.
    pub fn accept(&mut self, sender: &str, boot_time: u64, msg_id: u64, now: Instant) -> Acceptance {
        if sender == self.self_id {
            return Acceptance::Rejected;
        }
        let key = (boot_time, msg_id);
        match self.peers.get_mut(sender) {
            Some(state) => {
                if key <= state.last {
                    return Acceptance::Rejected;
                }
                let came_alive = !state.alive;
                state.last = key;
                state.last_seen = now;
                state.alive = true;
                Acceptance::Accepted { came_alive }
            }
            None => {
                self.peers.insert(sender.to_string(), PeerState { last: key, last_seen: now, alive: true });
                Acceptance::Accepted { came_alive: true }
            }
        }
    }

    /// Marks every live peer not heard from within `timeout` as dead.
    ///
    /// ## Returns
    /// The ids of the peers that died on this tick
    pub fn sweep(&mut self, now: Instant, timeout: Duration) -> Vec<String> {
        let mut died = Vec::new();
        for (id, state) in self.peers.iter_mut() {
            if state.alive && now.saturating_duration_since(state.last_seen) > timeout {
                state.alive = false;
                died.push(id.clone());
            }
        }
        died.sort();
        died
    }

    /// `true` if `id` is currently considered alive
    pub fn is_alive(&self, id: &str) -> bool {
        self.peers.get(id).is_some_and(|s| s.alive)
    }

    /// Ids of all live peers, sorted
    pub fn alive_peers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.peers.keys()
            .filter(|id| self.is_alive(id))
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// `(id, alive, time since last seen)` for every peer ever heard from, sorted by id
    pub fn table(&self, now: Instant) -> Vec<(String, bool, Duration)> {
        let mut rows: Vec<_> = self.peers.iter()
            .map(|(id, s)| (id.clone(), s.alive, now.saturating_duration_since(s.last_seen)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }
}
