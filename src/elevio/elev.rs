//! Driver for the elevator server.
//!
//! Every request is a 4-byte frame `[code, a, b, c]`. Commands (1..=5) get no reply,
//! queries (6..=9) are answered with one 4-byte frame. The socket is shared between the
//! pollers and the actuators, so a request and its reply are done under one lock.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::print;
use crate::world_view::Dirn;

use super::{CallType, ElevatorIo};


const CMD_MOTOR_DIRECTION: u8 = 1;
const CMD_BUTTON_LIGHT: u8 = 2;
const CMD_FLOOR_INDICATOR: u8 = 3;
const CMD_DOOR_LIGHT: u8 = 4;
const CMD_STOP_LIGHT: u8 = 5;
const QUERY_BUTTON: u8 = 6;
const QUERY_FLOOR: u8 = 7;
const QUERY_STOP: u8 = 8;
const QUERY_OBSTRUCTION: u8 = 9;


/// Handle to the elevator server. Cheap to clone, all clones share one connection.
#[derive(Clone)]
pub struct Elevator {
    socket: Arc<Mutex<TcpStream>>,
    /// Number of floors served
    pub num_floors: u8,
}

impl fmt::Debug for Elevator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.lock().peer_addr().map(|a| a.to_string()).unwrap_or_else(|_| "?".to_string());
        write!(f, "Elevator({}, {} floors)", addr, self.num_floors)
    }
}

impl Elevator {
    /// Connects to the elevator server at `addr` (typically `localhost:15657`).
    pub fn init(addr: &str, num_floors: u8) -> io::Result<Elevator> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            socket: Arc::new(Mutex::new(stream)),
            num_floors,
        })
    }

    fn lock(&self) -> MutexGuard<'_, TcpStream> {
        // Frames are written whole, so a poisoned lock is still usable.
        self.socket.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, frame: [u8; 4]) -> io::Result<()> {
        self.lock().write_all(&frame)
    }

    fn query(&self, frame: [u8; 4]) -> io::Result<[u8; 4]> {
        let mut sock = self.lock();
        sock.write_all(&frame)?;
        let mut reply = [0u8; 4];
        sock.read_exact(&mut reply)?;
        Ok(reply)
    }

    /// Sets the motor direction.
    pub fn set_motor_direction(&self, dirn: Dirn) -> io::Result<()> {
        self.write([CMD_MOTOR_DIRECTION, i8::from(dirn) as u8, 0, 0])
    }

    /// Sets one call button lamp.
    pub fn set_call_button_light(&self, floor: u8, call_type: CallType, on: bool) -> io::Result<()> {
        self.write([CMD_BUTTON_LIGHT, call_type as u8, floor, on as u8])
    }

    /// Sets the floor indicator.
    pub fn set_floor_indicator(&self, floor: u8) -> io::Result<()> {
        self.write([CMD_FLOOR_INDICATOR, floor, 0, 0])
    }

    /// Sets the door open lamp.
    pub fn set_door_light(&self, on: bool) -> io::Result<()> {
        self.write([CMD_DOOR_LIGHT, on as u8, 0, 0])
    }

    /// Sets the stop button lamp.
    pub fn set_stop_button_light(&self, on: bool) -> io::Result<()> {
        self.write([CMD_STOP_LIGHT, on as u8, 0, 0])
    }

    /// Reads one call button.
    pub fn call_button(&self, floor: u8, call_type: CallType) -> io::Result<bool> {
        let reply = self.query([QUERY_BUTTON, call_type as u8, floor, 0])?;
        Ok(reply[1] != 0)
    }

    /// Reads the floor sensor. `None` when between floors.
    pub fn floor_sensor(&self) -> io::Result<Option<u8>> {
        let reply = self.query([QUERY_FLOOR, 0, 0, 0])?;
        Ok(if reply[1] != 0 { Some(reply[2]) } else { None })
    }

    /// Reads the stop button.
    pub fn stop_button(&self) -> io::Result<bool> {
        let reply = self.query([QUERY_STOP, 0, 0, 0])?;
        Ok(reply[1] != 0)
    }

    /// Reads the obstruction switch.
    pub fn obstruction(&self) -> io::Result<bool> {
        let reply = self.query([QUERY_OBSTRUCTION, 0, 0, 0])?;
        Ok(reply[1] != 0)
    }
}


/// Terminates the node. A node without its own actuators or sensors cannot do anything useful.
pub fn link_lost(e: io::Error) -> ! {
    print::err(format!("Lost connection to elevator server: {}", e));
    std::process::exit(1);
}

impl ElevatorIo for Elevator {
    fn motor_direction(&self, dirn: Dirn) {
        self.set_motor_direction(dirn).unwrap_or_else(|e| link_lost(e));
    }

    fn call_button_light(&self, floor: u8, call_type: CallType, on: bool) {
        self.set_call_button_light(floor, call_type, on).unwrap_or_else(|e| link_lost(e));
    }

    fn floor_indicator(&self, floor: u8) {
        self.set_floor_indicator(floor).unwrap_or_else(|e| link_lost(e));
    }

    fn door_light(&self, on: bool) {
        self.set_door_light(on).unwrap_or_else(|e| link_lost(e));
    }

    fn stop_button_light(&self, on: bool) {
        self.set_stop_button_light(on).unwrap_or_else(|e| link_lost(e));
    }
}
