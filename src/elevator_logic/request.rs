//! Elevator request evaluation and direction decision logic.
//!
//! Everything in here is a pure function of a [MotionState] and a [Requests] snapshot, so the
//! decision can be tested without hardware, timers or network. [super::fsm] applies the result.
//!
//! # Overview
//! - [requests]: the orders this cab may serve, taken from the worldview
//! - [execute_order]: what the cab should do next
//!
//! # Example
//! ```
//! use elevatorpeer::elevator_logic::request::{self, Action};
//! use elevatorpeer::world_view::{Dirn, MotionState};
//!
//! let motion = MotionState { floor: 1, dirn: Dirn::Stop, prev_dirn: Dirn::Up, door_open: false };
//! let mut requests = request::no_requests();
//! requests[3][request::HALL_UP] = true;
//! assert_eq!(request::execute_order(&motion, &requests), Action::Move(Dirn::Up));
//! ```

use crate::config;
use crate::world_view::{Dirn, MotionState, WorldView};

/// Index of the hall up button in a [Requests] row
pub const HALL_UP: usize = 0;
/// Index of the hall down button in a [Requests] row
pub const HALL_DOWN: usize = 1;
/// Index of the cab button in a [Requests] row
pub const CAB: usize = 2;

/// Serviceable orders per floor, indexed `[floor][HALL_UP | HALL_DOWN | CAB]`
pub type Requests = [[bool; 3]; config::NUM_FLOORS];

/// What the cab should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop here, open the door and clear the marked slots (`[HALL_UP, HALL_DOWN, CAB]`)
    ServeFloor { clear: [bool; 3] },
    /// Drive in the given direction
    Move(Dirn),
    /// Nothing to do
    Stop,
}

/// A snapshot without any orders
pub fn no_requests() -> Requests {
    [[false; 3]; config::NUM_FLOORS]
}

/// Builds the serviceable orders: assigned hall calls that are still Active, and Active cab calls.
pub fn requests(wv: &WorldView) -> Requests {
    let mut req = no_requests();
    for (floor, row) in req.iter_mut().enumerate() {
        let [up, down] = wv.serviceable_hall(floor);
        row[HALL_UP] = up;
        row[HALL_DOWN] = down;
        row[CAB] = wv.cab_orders[floor].is_active();
    }
    req
}

fn has_order(row: &[bool; 3]) -> bool {
    row.iter().any(|&r| r)
}

/// `true` if any order exists strictly above `floor`
fn above(requests: &Requests, floor: usize) -> bool {
    requests.iter().skip(floor + 1).any(has_order)
}

/// `true` if any order exists strictly below `floor`
fn below(requests: &Requests, floor: usize) -> bool {
    requests.iter().take(floor).any(has_order)
}

/// `true` if an order at the current floor should be served now.
///
/// A cab call always is. A hall call is when it points the way the cab is going, or when the
/// cab is standing still.
fn here(motion: &MotionState, requests: &Requests) -> bool {
    let row = &requests[motion.floor as usize];
    row[CAB]
        || match motion.dirn {
            Dirn::Up => row[HALL_UP],
            Dirn::Down => row[HALL_DOWN],
            Dirn::Stop => row[HALL_UP] || row[HALL_DOWN],
        }
}

/// Slots cleared when serving the current floor
fn cleared(motion: &MotionState, requests: &Requests) -> [bool; 3] {
    let row = &requests[motion.floor as usize];
    [
        row[HALL_UP] && motion.dirn != Dirn::Down,
        row[HALL_DOWN] && motion.dirn != Dirn::Up,
        row[CAB],
    ]
}

/// Decides the next action of the cab.
///
/// 1. An eligible order here: serve the floor.
/// 2. An order above: go up, unless the cab is already going down and still has orders below, or it
///    is standing still after coming down and has orders below. Up is the default from the ground floor.
/// 3. An order below: go down.
/// 4. Otherwise stop.
///
/// Up is only chosen with an order above and Down only with an order below, so the cab never
/// leaves the shaft.
pub fn execute_order(motion: &MotionState, requests: &Requests) -> Action {
    let floor = (motion.floor as usize).min(config::NUM_FLOORS - 1);
    let motion = &MotionState { floor: floor as u8, ..*motion };

    if here(motion, requests) {
        return Action::ServeFloor { clear: cleared(motion, requests) };
    }

    let has_below = below(requests, floor);
    if above(requests, floor) {
        let keep_down = match motion.dirn {
            Dirn::Down => has_below,
            Dirn::Stop => motion.prev_dirn == Dirn::Down && has_below && floor != 0,
            Dirn::Up => false,
        };
        return Action::Move(if keep_down { Dirn::Down } else { Dirn::Up });
    }
    if has_below {
        return Action::Move(Dirn::Down);
    }
    Action::Stop
}
