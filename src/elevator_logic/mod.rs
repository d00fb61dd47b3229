//! # Local elevator logic
//!
//! Turns the worldview into motor, door and lamp commands for the local cab.
//!
//! ## Sub-modules
//! - [request]: Pure decision of the next action
//! - [fsm]: Carries a decision out on the worldview and the hardware
//! - [lights]: Lamp helpers
//! - [timer]: Door timer
//! - [self_elevator]: Connection to the elevator server and hardware pollers

pub mod fsm;
pub mod request;
pub mod timer;
pub mod lights;
pub mod self_elevator;
