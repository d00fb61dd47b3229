//! Applies the decisions of [request::execute_order] to the worldview and the hardware.
//!
//! All functions here are called from the control loop only. They return `true` when the order
//! matrices changed, which means a new assignment is due.

use tokio::time::Instant;

use crate::config;
use crate::elevio::ElevatorIo;
use crate::print;
use crate::world_view::{world_view_update, Dirn, WorldView};

use super::request::{self, Action};
use super::{lights, timer::Timer};


/// Runs the motion decision and carries it out.
///
/// Does nothing while the door is open. If the cab was moving and the decision is to stop, the
/// decision is taken once more with the cab standing still, so a hall call here pointing the other
/// way is served right away instead of at the next event.
pub fn execute_order<IO: ElevatorIo>(wv: &mut WorldView, io: &IO, door: &mut Timer, now: Instant) -> bool {
    if wv.motion.door_open {
        return false;
    }
    for _ in 0..2 {
        match request::execute_order(&wv.motion, &request::requests(wv)) {
            Action::ServeFloor { clear } => {
                wv.motion.set_dirn(Dirn::Stop);
                io.motor_direction(Dirn::Stop);
                wv.motion.door_open = true;
                io.door_light(true);
                door.timer_start(now);
                print::info(format!("Door opening at floor {}", wv.motion.floor));

                let outcome = world_view_update::clear_served(&mut wv.hall_orders, &mut wv.cab_orders, wv.motion.floor, clear);
                lights::apply(io, &outcome.lamps);
                return outcome.changed;
            }
            Action::Move(dirn) => {
                wv.motion.set_dirn(dirn);
                io.motor_direction(if wv.halted() { Dirn::Stop } else { dirn });
                return false;
            }
            Action::Stop => {
                let was_moving = wv.motion.dirn != Dirn::Stop;
                wv.motion.set_dirn(Dirn::Stop);
                io.motor_direction(Dirn::Stop);
                if !was_moving {
                    return false;
                }
            }
        }
    }
    false
}

/// New floor from the floor sensor.
///
/// A floor outside the shaft is reported and ignored.
pub fn on_floor_arrival<IO: ElevatorIo>(wv: &mut WorldView, io: &IO, door: &mut Timer, floor: u8, now: Instant) -> bool {
    if floor as usize >= config::NUM_FLOORS {
        print::cosmic_err(format!("on_floor_arrival, floor {}", floor));
        return false;
    }
    wv.motion.floor = floor;
    io.floor_indicator(floor);
    execute_order(wv, io, door, now)
}

/// Door timer ran out: close the door and decide what to do next
pub fn on_door_timeout<IO: ElevatorIo>(wv: &mut WorldView, io: &IO, door: &mut Timer, now: Instant) -> bool {
    door.timer_stop();
    wv.motion.door_open = false;
    io.door_light(false);
    print::info("Door closing".to_string());
    execute_order(wv, io, door, now)
}

/// Obstruction switch or stop button changed.
///
/// While halted the motor is held stopped but the direction is kept. When released, the cab resumes
/// its direction, or runs the decision again if it was standing still.
pub fn on_halt_changed<IO: ElevatorIo>(wv: &mut WorldView, io: &IO, door: &mut Timer, now: Instant) -> bool {
    if wv.halted() {
        io.motor_direction(Dirn::Stop);
        return false;
    }
    if wv.motion.door_open {
        return false;
    }
    match wv.motion.dirn {
        Dirn::Stop => execute_order(wv, io, door, now),
        dirn => {
            io.motor_direction(dirn);
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevio::CallType;
    use crate::elevator_logic::timer;
    use crate::world_view::OrderStatus;
    use std::cell::RefCell;
    use tokio::time::Duration;

    #[derive(Default)]
    struct Recorder {
        motor: RefCell<Vec<Dirn>>,
        door: RefCell<Vec<bool>>,
        lamps: RefCell<Vec<(u8, CallType, bool)>>,
    }

    impl ElevatorIo for Recorder {
        fn motor_direction(&self, dirn: Dirn) { self.motor.borrow_mut().push(dirn); }
        fn call_button_light(&self, floor: u8, call_type: CallType, on: bool) { self.lamps.borrow_mut().push((floor, call_type, on)); }
        fn floor_indicator(&self, _floor: u8) {}
        fn door_light(&self, on: bool) { self.door.borrow_mut().push(on); }
        fn stop_button_light(&self, _on: bool) {}
    }

    fn setup() -> (WorldView, Recorder, Timer) {
        (WorldView::new("1".to_string(), 0), Recorder::default(), timer::new(Duration::from_secs(3)))
    }

    #[test]
    fn arrival_at_cab_call_opens_door_and_clears() {
        let (mut wv, io, mut door) = setup();
        let now = Instant::now();
        wv.cab_orders[2] = OrderStatus::Active;
        wv.motion.set_dirn(Dirn::Up);

        assert!(on_floor_arrival(&mut wv, &io, &mut door, 2, now));
        assert!(wv.motion.door_open);
        assert_eq!(wv.motion.dirn, Dirn::Stop);
        assert_eq!(wv.cab_orders[2], OrderStatus::Inactive);
        assert_eq!(door.deadline(), Some(now + Duration::from_secs(3)));
        assert_eq!(*io.motor.borrow(), vec![Dirn::Stop]);
        assert_eq!(*io.lamps.borrow(), vec![(2, CallType::Cab, false)]);
    }

    #[test]
    fn floor_outside_the_shaft_is_ignored() {
        let (mut wv, io, mut door) = setup();
        wv.motion.floor = 3;
        wv.cab_orders[3] = OrderStatus::Active;
        wv.motion.set_dirn(Dirn::Up);

        assert!(!on_floor_arrival(&mut wv, &io, &mut door, config::NUM_FLOORS as u8, Instant::now()));
        assert!(!on_floor_arrival(&mut wv, &io, &mut door, u8::MAX, Instant::now()));
        assert_eq!(wv.motion.floor, 3);
        assert_eq!(wv.cab_orders[3], OrderStatus::Active);
        assert!(!wv.motion.door_open);
        assert!(io.motor.borrow().is_empty());
    }

    #[test]
    fn unassigned_or_pending_hall_calls_are_not_served() {
        let (mut wv, io, mut door) = setup();
        wv.hall_orders[1][0] = OrderStatus::Active;
        wv.hall_orders[2][0] = OrderStatus::Pending;
        wv.assigned[2][0] = true;

        assert!(!execute_order(&mut wv, &io, &mut door, Instant::now()));
        assert_eq!(wv.motion.dirn, Dirn::Stop);
        assert!(!wv.motion.door_open);
    }

    #[test]
    fn stopping_for_opposite_hall_call_reruns_stationary() {
        let (mut wv, io, mut door) = setup();
        wv.motion.set_dirn(Dirn::Up);
        wv.hall_orders[3][1] = OrderStatus::Active;
        wv.assigned[3][1] = true;

        assert!(on_floor_arrival(&mut wv, &io, &mut door, 3, Instant::now()));
        assert!(wv.motion.door_open);
        assert_eq!(wv.hall_orders[3][1], OrderStatus::Inactive);
    }

    #[test]
    fn door_timeout_closes_and_moves_on() {
        let (mut wv, io, mut door) = setup();
        let now = Instant::now();
        wv.motion.door_open = true;
        wv.motion.floor = 1;
        wv.cab_orders[3] = OrderStatus::Active;
        door.timer_start(now);

        assert!(!on_door_timeout(&mut wv, &io, &mut door, now + Duration::from_secs(3)));
        assert!(!wv.motion.door_open);
        assert_eq!(door.deadline(), None);
        assert_eq!(wv.motion.dirn, Dirn::Up);
        assert_eq!(*io.door.borrow(), vec![false]);
        assert_eq!(*io.motor.borrow(), vec![Dirn::Up]);
    }

    #[test]
    fn obstruction_holds_motor_but_keeps_direction() {
        let (mut wv, io, mut door) = setup();
        let now = Instant::now();
        wv.cab_orders[3] = OrderStatus::Active;
        execute_order(&mut wv, &io, &mut door, now);

        wv.obstruction = true;
        on_halt_changed(&mut wv, &io, &mut door, now);
        assert_eq!(wv.motion.dirn, Dirn::Up);

        wv.obstruction = false;
        on_halt_changed(&mut wv, &io, &mut door, now);
        assert_eq!(*io.motor.borrow(), vec![Dirn::Up, Dirn::Stop, Dirn::Up]);
    }
}
