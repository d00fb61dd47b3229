use crate::config;
use crate::elevio::{CallType, ElevatorIo};
use crate::world_view::world_view_update::LampUpdate;
use crate::world_view::HallOrders;


/// Applies lamp changes produced by a merge or a clear
pub fn apply<IO: ElevatorIo>(io: &IO, lamps: &[LampUpdate]) {
    for lamp in lamps {
        io.call_button_light(lamp.floor, lamp.call_type, lamp.on);
    }
}

/// Sets all hall lights from the hall order matrix.
///
/// ## Behavior
/// A lamp is lit iff the slot is Active. The down lamp at the ground floor and the up lamp at the
/// top floor do not exist and are skipped.
pub fn set_hall_lights<IO: ElevatorIo>(io: &IO, hall: &HallOrders) {
    for (i, [up, down]) in hall.iter().enumerate() {
        let floor = i as u8;
        if floor != config::TOP_FLOOR {
            io.call_button_light(floor, CallType::HallUp, up.is_active());
        }
        if floor != 0 {
            io.call_button_light(floor, CallType::HallDown, down.is_active());
        }
    }
}

/// Turns every call button lamp, the door lamp and the stop lamp off
pub fn clear_all<IO: ElevatorIo>(io: &IO) {
    for floor in 0..config::NUM_FLOORS as u8 {
        for call_type in [CallType::HallUp, CallType::HallDown, CallType::Cab] {
            io.call_button_light(floor, call_type, false);
        }
    }
    io.door_light(false);
    io.stop_button_light(false);
}
