//! Input and output schema of the hall request assigner.
//!
//! ```json
//! {
//!   "hallRequests": [[false, false], [true, false], [false, false], [false, true]],
//!   "states": {
//!     "15657": { "behaviour": "moving", "floor": 2, "direction": "up", "cabRequests": [false, false, true, true] }
//!   }
//! }
//! ```
//! The output maps every id in `states` to its share of `hallRequests`.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

use crate::config;
use crate::world_view::{CabOrders, Dirn, ElevatorBehaviour, HallOrders, WorldView};


/// State of one elevator as the assigner wants it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignerState {
    /// `idle`, `moving` or `doorOpen`
    pub behaviour: ElevatorBehaviour,
    /// Last known floor
    pub floor: u8,
    /// `up`, `down` or `stop`
    pub direction: String,
    /// Active cab orders of this elevator
    pub cab_requests: [bool; config::NUM_FLOORS],
}

/// Complete assigner input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignerInput {
    /// Active hall calls, `[up, down]` per floor
    pub hall_requests: [[bool; 2]; config::NUM_FLOORS],
    /// Elevators taking part, keyed by node id
    pub states: HashMap<String, AssignerState>,
}

/// Assigner output: hall orders per elevator id
pub type AssignerOutput = HashMap<String, [[bool; 2]; config::NUM_FLOORS]>;


fn active_hall(hall: &HallOrders) -> [[bool; 2]; config::NUM_FLOORS] {
    hall.map(|row| row.map(|status| status.is_active()))
}

fn active_cab(cab: &CabOrders) -> [bool; config::NUM_FLOORS] {
    cab.map(|status| status.is_active())
}

fn state(behaviour: ElevatorBehaviour, floor: u8, dirn: Dirn, cab: &CabOrders) -> AssignerState {
    AssignerState {
        behaviour,
        floor: floor.min(config::TOP_FLOOR),
        direction: dirn.label().to_string(),
        cab_requests: active_cab(cab),
    }
}

/// Builds the assigner input from the worldview.
///
/// Hall requests are the local hall matrix with only Active slots set. States hold this node and
/// every live peer, each with its own reported cab orders.
pub fn create_hall_request_input(wv: &WorldView) -> AssignerInput {
    let mut states = HashMap::new();
    states.insert(
        wv.self_id.clone(),
        state(wv.motion.behaviour(), wv.motion.floor, wv.motion.dirn, &wv.cab_orders),
    );
    for id in wv.liveness.alive_peers() {
        if let Some(peer) = wv.peers.get(&id) {
            states.insert(id, state(peer.behaviour, peer.floor, peer.dirn, &peer.cab_orders));
        }
    }

    AssignerInput {
        hall_requests: active_hall(&wv.hall_orders),
        states,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_view::OrderStatus;
    use std::time::Instant;

    #[test]
    fn only_active_orders_and_live_nodes_are_sent() {
        let mut wv = WorldView::new("a".to_string(), 1);
        wv.hall_orders[1][0] = OrderStatus::Active;
        wv.hall_orders[2][1] = OrderStatus::Pending;
        wv.cab_orders[3] = OrderStatus::Active;
        wv.motion.floor = 1;
        wv.motion.set_dirn(Dirn::Up);

        let mut peer = WorldView::new("b".to_string(), 1);
        peer.motion.door_open = true;
        let msg = peer.next_snapshot();
        wv.liveness.accept("b", msg.boot_time, msg.msg_id, Instant::now());
        wv.peers.insert("b".to_string(), msg);

        let input = create_hall_request_input(&wv);
        assert_eq!(input.hall_requests, [[false, false], [true, false], [false, false], [false, false]]);
        assert_eq!(input.states.len(), 2);
        assert_eq!(input.states["a"], AssignerState {
            behaviour: ElevatorBehaviour::Moving,
            floor: 1,
            direction: "up".to_string(),
            cab_requests: [false, false, false, true],
        });
        assert_eq!(input.states["b"].behaviour, ElevatorBehaviour::DoorOpen);
    }

    #[test]
    fn json_uses_assigner_field_names() {
        let wv = WorldView::new("15657".to_string(), 1);
        let json = serde_json::to_value(create_hall_request_input(&wv)).unwrap();
        assert_eq!(json["states"]["15657"]["behaviour"], "idle");
        assert_eq!(json["states"]["15657"]["direction"], "stop");
        assert!(json["states"]["15657"]["cabRequests"].is_array());
        assert!(json["hallRequests"].is_array());

        let output: AssignerOutput = serde_json::from_str(
            r#"{"15657": [[true,false],[false,false],[false,false],[false,true]]}"#
        ).unwrap();
        assert_eq!(output["15657"][3], [false, true]);
    }
}
