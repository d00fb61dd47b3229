//! ## WorldView Module
//!
//! This module defines the central data structures of a node: the tri-state [OrderStatus],
//! the hall and cab order matrices, the [StatusMessage] broadcast on the network, and the
//! [WorldView] holding everything the control loop owns.
//!
//! Only the control loop mutates a [WorldView]. Other parts of the program receive copies
//! (a [StatusMessage] snapshot, or the solver input built in [crate::manager]).
//!
//! ## Sub-modules
//! - [serial]: Wire encoding of [StatusMessage]
//! - [world_view_update]: Merging a peer's orders into the local matrices

pub mod serial;
pub mod world_view_update;

use serde::{Serialize, Deserialize};
use std::collections::HashMap;

use crate::config;
use crate::network::liveness::Liveness;


/// Lifecycle of one order slot, as seen by a single node.
///
/// A slot moves `Inactive -> Pending -> Active -> Inactive`. See [OrderStatus::merge].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// No order
    #[default]
    Inactive,
    /// Order seen locally, not yet corroborated by a peer
    Pending,
    /// Order corroborated, lamp is lit and the order may be serviced
    Active,
}

/// Side effect on the physical lamp of a slot after a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampEffect {
    /// Leave the lamp as it is
    Unchanged,
    /// Turn the lamp on
    On,
    /// Turn the lamp off
    Off,
}

impl OrderStatus {
    /// The tri-state merge rule.
    ///
    /// | local    | peer              | new local | lamp |
    /// |----------|-------------------|-----------|------|
    /// | Inactive | Pending           | Pending   | -    |
    /// | Pending  | Pending or Active | Active    | on   |
    /// | Active   | Inactive          | Inactive  | off  |
    ///
    /// Every other combination leaves the local status unchanged.
    ///
    /// # Example
    /// ```
    /// use elevatorpeer::world_view::{OrderStatus, LampEffect};
    ///
    /// let (status, lamp) = OrderStatus::Pending.merge(OrderStatus::Active);
    /// assert_eq!(status, OrderStatus::Active);
    /// assert_eq!(lamp, LampEffect::On);
    /// ```
    pub fn merge(self, peer: OrderStatus) -> (OrderStatus, LampEffect) {
        match (self, peer) {
            (OrderStatus::Inactive, OrderStatus::Pending) => (OrderStatus::Pending, LampEffect::Unchanged),
            (OrderStatus::Pending, OrderStatus::Pending | OrderStatus::Active) => (OrderStatus::Active, LampEffect::On),
            (OrderStatus::Active, OrderStatus::Inactive) => (OrderStatus::Inactive, LampEffect::Off),
            (local, _) => (local, LampEffect::Unchanged),
        }
    }

    /// `true` only for [OrderStatus::Active]. Pending orders are never serviced or sent to the solver.
    pub fn is_active(self) -> bool {
        self == OrderStatus::Active
    }
}

/// Hall orders, indexed `[floor][CallType::HallUp | CallType::HallDown]`
pub type HallOrders = [[OrderStatus; 2]; config::NUM_FLOORS];

/// This node's cab orders, indexed by floor
pub type CabOrders = [OrderStatus; config::NUM_FLOORS];

/// Per peer copy of that peer's cab orders
pub type CabBackupMap = HashMap<String, CabOrders>;

/// Hall orders the solver gave to this node
pub type AssignedOrders = [[bool; 2]; config::NUM_FLOORS];


#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
/// Direction of travel. Sent on the wire as -1/0/1.
pub enum Dirn {
    Down = -1,
    Stop = 0,
    Up = 1,
}

impl Dirn {
    /// Direction label used by the hall request assigner
    pub fn label(self) -> &'static str {
        match self {
            Dirn::Up => "up",
            Dirn::Down => "down",
            Dirn::Stop => "stop",
        }
    }
}

impl From<Dirn> for i8 {
    fn from(dirn: Dirn) -> i8 {
        dirn as i8
    }
}

impl TryFrom<i8> for Dirn {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Dirn::Down),
            0 => Ok(Dirn::Stop),
            1 => Ok(Dirn::Up),
            other => Err(format!("invalid direction {}", other)),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Struct describing the current behaviour of an elevator.
///
/// Never stored, always derived from [MotionState].
pub enum ElevatorBehaviour {
    Idle,
    Moving,
    DoorOpen,
}

impl ElevatorBehaviour {
    /// Behaviour tag used by the hall request assigner
    pub fn as_str(self) -> &'static str {
        match self {
            ElevatorBehaviour::Idle => "idle",
            ElevatorBehaviour::Moving => "moving",
            ElevatorBehaviour::DoorOpen => "doorOpen",
        }
    }
}


/// Physical state of the local cab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionState {
    /// Last floor seen by the floor sensor
    pub floor: u8,
    /// Current direction
    pub dirn: Dirn,
    /// Direction before the last change of [MotionState::dirn]
    pub prev_dirn: Dirn,
    /// Door open flag
    pub door_open: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            floor: 0,
            dirn: Dirn::Stop,
            prev_dirn: Dirn::Stop,
            door_open: false,
        }
    }
}

impl MotionState {
    /// Door open beats moving beats idle.
    pub fn behaviour(&self) -> ElevatorBehaviour {
        if self.door_open {
            ElevatorBehaviour::DoorOpen
        } else if self.dirn != Dirn::Stop {
            ElevatorBehaviour::Moving
        } else {
            ElevatorBehaviour::Idle
        }
    }

    /// Sets a new direction. [MotionState::prev_dirn] only changes when the direction does,
    /// so repeated Stop commands keep the memory of where the cab came from.
    pub fn set_dirn(&mut self, dirn: Dirn) {
        if dirn != self.dirn {
            self.prev_dirn = self.dirn;
            self.dirn = dirn;
        }
    }
}


/// One node's broadcast report of its motion and order state.
///
/// Built fresh every broadcast tick, never modified after sending.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusMessage {
    /// Id of the sending node
    pub sender_id: String,
    /// When the sender process started (ms since UNIX epoch). Orders incarnations of one node.
    pub boot_time: u64,
    /// Strictly increasing per sender incarnation
    pub msg_id: u64,
    /// Last floor of the sender
    pub floor: u8,
    /// Direction of the sender
    pub dirn: Dirn,
    /// Door open flag of the sender
    pub door_open: bool,
    /// Derived behaviour of the sender
    pub behaviour: ElevatorBehaviour,
    /// The sender's hall orders
    pub hall_orders: HallOrders,
    /// The sender's own cab orders
    pub cab_orders: CabOrders,
    /// The sender's backup of every cab it knows of
    pub cab_backup: CabBackupMap,
}


/// Everything the control loop owns.
#[derive(Debug, Clone)]
pub struct WorldView {
    /// Id of this node
    pub self_id: String,
    /// Start time of this process, see [StatusMessage::boot_time]
    pub boot_time: u64,
    /// Number of status messages sent so far
    pub msg_count: u64,
    /// State of the local cab
    pub motion: MotionState,
    /// Local hall order matrix
    pub hall_orders: HallOrders,
    /// Local cab orders
    pub cab_orders: CabOrders,
    /// Backup of the peers' cab orders
    pub cab_backup: CabBackupMap,
    /// Hall orders assigned to this node by the solver
    pub assigned: AssignedOrders,
    /// Latest accepted snapshot of every live peer
    pub peers: HashMap<String, StatusMessage>,
    /// Sequence gate and last-seen bookkeeping
    pub liveness: Liveness,
    /// Obstruction switch state
    pub obstruction: bool,
    /// Stop button state
    pub stop_pressed: bool,
}

impl WorldView {
    /// Creates an empty worldview for node `self_id`
    pub fn new(self_id: String, boot_time: u64) -> Self {
        Self {
            liveness: Liveness::new(self_id.clone()),
            self_id,
            boot_time,
            msg_count: 0,
            motion: MotionState::default(),
            hall_orders: [[OrderStatus::Inactive; 2]; config::NUM_FLOORS],
            cab_orders: [OrderStatus::Inactive; config::NUM_FLOORS],
            cab_backup: HashMap::new(),
            assigned: [[false; 2]; config::NUM_FLOORS],
            peers: HashMap::new(),
            obstruction: false,
            stop_pressed: false,
        }
    }

    /// Builds the next status message and advances the message counter.
    pub fn next_snapshot(&mut self) -> StatusMessage {
        let msg = StatusMessage {
            sender_id: self.self_id.clone(),
            boot_time: self.boot_time,
            msg_id: self.msg_count,
            floor: self.motion.floor,
            dirn: self.motion.dirn,
            door_open: self.motion.door_open,
            behaviour: self.motion.behaviour(),
            hall_orders: self.hall_orders,
            cab_orders: self.cab_orders,
            cab_backup: self.cab_backup.clone(),
        };
        self.msg_count += 1;
        msg
    }

    /// `true` while the motor must not run
    pub fn halted(&self) -> bool {
        self.obstruction || self.stop_pressed
    }

    /// Hall orders at `floor` this node may service: assigned to it and still Active locally.
    pub fn serviceable_hall(&self, floor: usize) -> [bool; 2] {
        [
            self.assigned[floor][0] && self.hall_orders[floor][0].is_active(),
            self.assigned[floor][1] && self.hall_orders[floor][1].is_active(),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_follows_table() {
        use OrderStatus::*;
        assert_eq!(Inactive.merge(Pending), (Pending, LampEffect::Unchanged));
        assert_eq!(Pending.merge(Pending), (Active, LampEffect::On));
        assert_eq!(Pending.merge(Active), (Active, LampEffect::On));
        assert_eq!(Active.merge(Inactive), (Inactive, LampEffect::Off));

        assert_eq!(Inactive.merge(Inactive), (Inactive, LampEffect::Unchanged));
        assert_eq!(Inactive.merge(Active), (Inactive, LampEffect::Unchanged));
        assert_eq!(Pending.merge(Inactive), (Pending, LampEffect::Unchanged));
        assert_eq!(Active.merge(Pending), (Active, LampEffect::Unchanged));
        assert_eq!(Active.merge(Active), (Active, LampEffect::Unchanged));
    }

    #[test]
    fn behaviour_is_derived() {
        let mut motion = MotionState::default();
        assert_eq!(motion.behaviour(), ElevatorBehaviour::Idle);

        motion.set_dirn(Dirn::Up);
        assert_eq!(motion.behaviour(), ElevatorBehaviour::Moving);

        motion.door_open = true;
        assert_eq!(motion.behaviour(), ElevatorBehaviour::DoorOpen);
    }

    #[test]
    fn prev_dirn_survives_repeated_stop() {
        let mut motion = MotionState::default();
        motion.set_dirn(Dirn::Up);
        motion.set_dirn(Dirn::Stop);
        motion.set_dirn(Dirn::Stop);
        assert_eq!(motion.prev_dirn, Dirn::Up);
    }

    #[test]
    fn snapshot_counts_messages() {
        let mut wv = WorldView::new("1".to_string(), 10);
        let first = wv.next_snapshot();
        let second = wv.next_snapshot();
        assert_eq!(first.msg_id, 0);
        assert_eq!(second.msg_id, 1);
        assert_eq!(wv.msg_count, 2);
        assert_eq!(second.behaviour, ElevatorBehaviour::Idle);
    }

    #[test]
    fn dirn_rejects_unknown_values() {
        assert_eq!(Dirn::try_from(-1), Ok(Dirn::Down));
        assert!(Dirn::try_from(2).is_err());
    }
}
