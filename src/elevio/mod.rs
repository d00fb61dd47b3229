//! ## Elevator I/O module for the local elevator
//!
//! The hardware adapter speaks fixed 4-byte frames to the elevator server (see [elev]).
//! [poll] turns the query side into edge-triggered events, and [ElevatorIo] is the
//! actuation side as seen by the state machine.
//!
//! ## Overview
//! - `ElevMessage`: Enum representing the different elevator events.
//! - `CallType`: Enum for representing call button types.
//! - `CallButton`: Struct for representing call button presses.
//! - `ElevatorIo`: Fire-and-forget actuation of motor, lamps and door.

pub mod elev;
pub mod poll;

use serde::{Serialize, Deserialize};

use crate::world_view::Dirn;


/// Represents an event read from the elevator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevMessage {
    /// Call button press event.
    CallButton(CallButton),
    /// Floor sensor event, the floor just arrived at.
    FloorSensor(u8),
    /// Stop button changed (`true` if pressed).
    StopButton(bool),
    /// Obstruction switch changed (`true` if obstructed).
    Obstruction(bool),
}

/// Represents the type of call for an elevator.
///
/// The discriminant is the button code used by the elevator server, and the index
/// into a hall order row for the two hall variants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CallType {
    /// Hall call to go up.
    HallUp = 0,

    /// Hall call to go down.
    HallDown = 1,

    /// Call from inside the elevator.
    Cab = 2,
}

impl TryFrom<u8> for CallType {
    type Error = u8;

    /// Converts a button code into a `CallType`
    ///
    /// # Examples
    /// ```
    /// # use elevatorpeer::elevio::CallType;
    /// assert_eq!(CallType::try_from(0), Ok(CallType::HallUp));
    /// assert_eq!(CallType::try_from(10), Err(10));
    /// ```
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CallType::HallUp),
            1 => Ok(CallType::HallDown),
            2 => Ok(CallType::Cab),
            other => Err(other),
        }
    }
}

/// Represents a button press on the local elevator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallButton {
    /// The floor where the call was made.
    pub floor: u8,

    /// The type of call (up, down or cab).
    pub call_type: CallType,
}


/// Actuation side of the elevator.
///
/// All commands are fire-and-forget. An implementation talking to real hardware treats a lost
/// connection as fatal, so nothing is returned to the caller.
pub trait ElevatorIo {
    /// Sets the motor direction
    fn motor_direction(&self, dirn: Dirn);
    /// Sets a call button lamp
    fn call_button_light(&self, floor: u8, call_type: CallType, on: bool);
    /// Sets the floor indicator
    fn floor_indicator(&self, floor: u8);
    /// Sets the door open lamp
    fn door_light(&self, on: bool);
    /// Sets the stop button lamp
    fn stop_button_light(&self, on: bool);
}
