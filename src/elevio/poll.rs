//! Edge-triggered pollers for the elevator inputs.
//!
//! Each poller runs on its own thread, samples one input every `period` and sends only
//! changes. A poller returns when its receiver is gone. A failed read on the server
//! connection terminates the node, see [super::elev::link_lost].

use crossbeam_channel as cbc;
use std::thread;
use std::time;

use super::elev::{self, Elevator};
use super::{CallButton, CallType};


const CALL_TYPES: [CallType; 3] = [CallType::HallUp, CallType::HallDown, CallType::Cab];


/// Sends a [CallButton] on every press (rising edge) of any call button.
pub fn call_buttons(elev: Elevator, ch: cbc::Sender<CallButton>, period: time::Duration) {
    let mut prev = vec![[false; 3]; elev.num_floors.into()];
    loop {
        for f in 0..elev.num_floors {
            for call_type in CALL_TYPES {
                let v = elev.call_button(f, call_type).unwrap_or_else(|e| elev::link_lost(e));
                let was = &mut prev[f as usize][call_type as usize];
                if v && !*was && ch.send(CallButton { floor: f, call_type }).is_err() {
                    return;
                }
                *was = v;
            }
        }
        thread::sleep(period)
    }
}

/// Sends the floor number every time the cab arrives at a new floor.
pub fn floor_sensor(elev: Elevator, ch: cbc::Sender<u8>, period: time::Duration) {
    let mut prev = u8::MAX;
    loop {
        if let Some(f) = elev.floor_sensor().unwrap_or_else(|e| elev::link_lost(e)) {
            if f != prev {
                if ch.send(f).is_err() {
                    return;
                }
                prev = f;
            }
        }
        thread::sleep(period)
    }
}

/// Sends the stop button state on both edges.
pub fn stop_button(elev: Elevator, ch: cbc::Sender<bool>, period: time::Duration) {
    let mut prev = false;
    loop {
        let v = elev.stop_button().unwrap_or_else(|e| elev::link_lost(e));
        if prev != v {
            if ch.send(v).is_err() {
                return;
            }
            prev = v;
        }
        thread::sleep(period)
    }
}

/// Sends the obstruction switch state on both edges.
pub fn obstruction(elev: Elevator, ch: cbc::Sender<bool>, period: time::Duration) {
    let mut prev = false;
    loop {
        let v = elev.obstruction().unwrap_or_else(|e| elev::link_lost(e));
        if prev != v {
            if ch.send(v).is_err() {
                return;
            }
            prev = v;
        }
        thread::sleep(period)
    }
}
