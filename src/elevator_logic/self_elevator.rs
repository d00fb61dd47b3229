//! # Local Elevator
//!
//! Connects to the elevator server and starts the hardware pollers.
//!
//! ## Overview
//! Each poller in [elevio::poll] runs on its own OS thread and reports on a `crossbeam` channel.
//! One more thread merges those channels into [elevio::ElevMessage]s on the control loop's
//! `tokio` queue.

use std::io;
use std::thread;

use crossbeam_channel as cbc;
use tokio::sync::mpsc;

use crate::config;
use crate::elevio::{self, elev as e, ElevMessage};
use crate::print;


struct LocalElevTxs {
    call_button: cbc::Sender<elevio::CallButton>,
    floor_sensor: cbc::Sender<u8>,
    stop_button: cbc::Sender<bool>,
    obstruction: cbc::Sender<bool>,
}

struct LocalElevRxs {
    call_button: cbc::Receiver<elevio::CallButton>,
    floor_sensor: cbc::Receiver<u8>,
    stop_button: cbc::Receiver<bool>,
    obstruction: cbc::Receiver<bool>,
}

struct LocalElevChannels {
    pub rxs: LocalElevRxs,
    pub txs: LocalElevTxs,
}

impl LocalElevChannels {
    pub fn new() -> Self {
        let (call_button_tx, call_button_rx) = cbc::unbounded::<elevio::CallButton>();
        let (floor_sensor_tx, floor_sensor_rx) = cbc::unbounded::<u8>();
        let (stop_button_tx, stop_button_rx) = cbc::unbounded::<bool>();
        let (obstruction_tx, obstruction_rx) = cbc::unbounded::<bool>();

        LocalElevChannels {
            rxs: LocalElevRxs { call_button: call_button_rx, floor_sensor: floor_sensor_rx, stop_button: stop_button_rx, obstruction: obstruction_rx },
            txs: LocalElevTxs { call_button: call_button_tx, floor_sensor: floor_sensor_tx, stop_button: stop_button_tx, obstruction: obstruction_tx },
        }
    }
}


/// Connects to the elevator server at `addr` and starts polling it.
///
/// ## Returns
/// The elevator handle and the floor the cab is at right now (`None` if between floors).
/// Events are sent on `local_elev_tx` from then on.
pub fn init(addr: &str, local_elev_tx: mpsc::Sender<ElevMessage>) -> io::Result<(e::Elevator, Option<u8>)> {
    let elevator = e::Elevator::init(addr, config::NUM_FLOORS as u8)?;
    let floor_at_boot = elevator.floor_sensor()?;
    print::ok(format!("Connected to elevator server at {}", addr));

    let chs = LocalElevChannels::new();

    // ______START:: READ BUTTONS_______________
    {
        let elevator = elevator.clone();
        let tx = chs.txs.call_button;
        thread::spawn(move || elevio::poll::call_buttons(elevator, tx, config::ELEV_POLL));
    }
    {
        let elevator = elevator.clone();
        let tx = chs.txs.floor_sensor;
        thread::spawn(move || elevio::poll::floor_sensor(elevator, tx, config::ELEV_POLL));
    }
    {
        let elevator = elevator.clone();
        let tx = chs.txs.stop_button;
        thread::spawn(move || elevio::poll::stop_button(elevator, tx, config::ELEV_POLL));
    }
    {
        let elevator = elevator.clone();
        let tx = chs.txs.obstruction;
        thread::spawn(move || elevio::poll::obstruction(elevator, tx, config::ELEV_POLL));
    }
    // ______STOPP:: READ BUTTONS_______________

    let rxs = chs.rxs;
    thread::spawn(move || read_from_local_elevator(rxs, local_elev_tx));

    Ok((elevator, floor_at_boot))
}

/// Forwards messages from the pollers to the control loop until either side hangs up.
fn read_from_local_elevator(rxs: LocalElevRxs, local_elev_tx: mpsc::Sender<ElevMessage>) {
    loop {
        let msg = cbc::select! {
            recv(rxs.call_button) -> m => m.map(ElevMessage::CallButton),
            recv(rxs.floor_sensor) -> m => m.map(ElevMessage::FloorSensor),
            recv(rxs.stop_button) -> m => m.map(ElevMessage::StopButton),
            recv(rxs.obstruction) -> m => m.map(ElevMessage::Obstruction),
        };
        let Ok(msg) = msg else {
            return;
        };
        if local_elev_tx.blocking_send(msg).is_err() {
            return;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poller_events_reach_the_loop_queue() {
        let chs = LocalElevChannels::new();
        let (tx, mut rx) = mpsc::channel(8);
        let txs = chs.txs;
        let forwarder = thread::spawn(move || read_from_local_elevator(chs.rxs, tx));

        txs.floor_sensor.send(2).unwrap();
        assert_eq!(rx.blocking_recv(), Some(ElevMessage::FloorSensor(2)));
        txs.obstruction.send(true).unwrap();
        assert_eq!(rx.blocking_recv(), Some(ElevMessage::Obstruction(true)));

        drop(rx);
        txs.stop_button.send(true).unwrap();
        forwarder.join().unwrap();
    }
}
