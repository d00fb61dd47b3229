//! ## The control loop
//!
//! One task owns the [WorldView] and handles every event in turn:
//! - hardware events from the pollers
//! - status messages from the broadcast listener
//! - the broadcast tick, which sends a fresh [StatusMessage]
//! - the watchdog tick, which declares silent peers dead
//! - the door timer, armed only while the door is open
//!
//! After an event that may change the best assignment the hall request assigner is awaited
//! before the next event is taken. Nothing else mutates the worldview, so there are no locks.

use tokio::sync::mpsc;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use crate::backup::{self, RecoveryGuard};
use crate::config;
use crate::elevator_logic::{fsm, lights, timer::{self, Timer}};
use crate::elevio::{ElevMessage, ElevatorIo};
use crate::manager::{self, HallAssigner};
use crate::network::liveness::Acceptance;
use crate::print;
use crate::world_view::{world_view_update, Dirn, StatusMessage, WorldView};


/// Channels between the control loop and the tasks around it
pub struct LoopChannels {
    /// Events from the local elevator
    pub elev_rx: mpsc::Receiver<ElevMessage>,
    /// Status messages from the broadcast listener, not yet filtered
    pub status_rx: mpsc::Receiver<StatusMessage>,
    /// Snapshots to the broadcaster
    pub broadcast_tx: mpsc::Sender<StatusMessage>,
}

/// Senders held by the tasks feeding a [LoopChannels]
pub struct LoopFeeds {
    /// Given to [crate::elevator_logic::self_elevator::init]
    pub elev_tx: mpsc::Sender<ElevMessage>,
    /// Given to [crate::network::udp_broadcast::start_udp_listener]
    pub status_tx: mpsc::Sender<StatusMessage>,
    /// Given to [crate::network::udp_broadcast::start_udp_broadcaster]
    pub broadcast_rx: mpsc::Receiver<StatusMessage>,
}

impl LoopChannels {
    /// Creates the loop's channels together with the ends for the other tasks
    pub fn new() -> (Self, LoopFeeds) {
        let (elev_tx, elev_rx) = mpsc::channel(300);
        let (status_tx, status_rx) = mpsc::channel(300);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(300);
        (
            LoopChannels { elev_rx, status_rx, broadcast_tx },
            LoopFeeds { elev_tx, status_tx, broadcast_rx },
        )
    }
}


/// The node's state and the seams to hardware and assigner
pub struct ControlLoop<IO: ElevatorIo, A: HallAssigner> {
    wv: WorldView,
    io: IO,
    assigner: A,
    door: Timer,
    reassign_due: bool,
}

impl<IO: ElevatorIo, A: HallAssigner> ControlLoop<IO, A> {
    /// Creates the loop for node `self_id` started at `boot_time`
    pub fn new(self_id: String, boot_time: u64, io: IO, assigner: A) -> Self {
        Self {
            wv: WorldView::new(self_id, boot_time),
            io,
            assigner,
            door: timer::new(config::DOOR_OPEN_DURATION),
            reassign_due: false,
        }
    }

    /// Read access to the worldview
    pub fn world_view(&self) -> &WorldView {
        &self.wv
    }

    /// The hardware seam
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// `true` if an event since the last assignment may have changed it
    pub fn reassign_due(&self) -> bool {
        self.reassign_due
    }

    /// When the door closes, if it is open
    pub fn door_deadline(&self) -> Option<Instant> {
        self.door.deadline()
    }

    /// Puts the hardware in a known state.
    ///
    /// All lamps go off. Between floors the cab is driven down until the first floor arrival,
    /// where the motion decision stops it.
    pub fn start(&mut self, floor_at_boot: Option<u8>) {
        lights::clear_all(&self.io);
        match floor_at_boot {
            Some(floor) => {
                self.wv.motion.floor = floor;
                self.io.floor_indicator(floor);
                self.io.motor_direction(Dirn::Stop);
            }
            None => {
                print::info("Between floors, moving down".to_string());
                self.wv.motion.set_dirn(Dirn::Down);
                self.io.motor_direction(Dirn::Down);
            }
        }
    }

    /// Handles one event from the local elevator
    pub fn on_elev_message(&mut self, msg: ElevMessage, now: Instant) {
        let changed = match msg {
            ElevMessage::CallButton(button) => {
                world_view_update::add_request(&mut self.wv.hall_orders, &mut self.wv.cab_orders, button.floor, button.call_type)
            }
            ElevMessage::FloorSensor(floor) => fsm::on_floor_arrival(&mut self.wv, &self.io, &mut self.door, floor, now),
            ElevMessage::StopButton(pressed) => {
                self.wv.stop_pressed = pressed;
                self.io.stop_button_light(pressed);
                fsm::on_halt_changed(&mut self.wv, &self.io, &mut self.door, now)
            }
            ElevMessage::Obstruction(active) => {
                self.wv.obstruction = active;
                fsm::on_halt_changed(&mut self.wv, &self.io, &mut self.door, now)
            }
        };
        if changed {
            self.reassign_due = true;
            self.serve_if_idle(now);
        }
    }

    /// Handles one status message from the network.
    ///
    /// Own, stale and duplicate messages are dropped without a trace. Accepted ones update the
    /// peer backup, recover our own cab orders, and are merged into the hall orders.
    pub fn on_status_message(&mut self, msg: StatusMessage, now: Instant) {
        match self.wv.liveness.accept(&msg.sender_id, msg.boot_time, msg.msg_id, now.into_std()) {
            Acceptance::Rejected => return,
            Acceptance::Accepted { came_alive } => {
                if came_alive {
                    print::ok(format!("Node {} is alive", msg.sender_id));
                    print::peer_table(&self.wv.liveness.table(now.into_std()));
                    self.reassign_due = true;
                }
            }
        }

        let mut changed = backup::update_peer_backup(&mut self.wv.cab_backup, &msg.sender_id, &msg.cab_orders, msg.msg_id);

        if let Some(our_copy) = msg.cab_backup.get(&self.wv.self_id) {
            let guard = RecoveryGuard {
                msg_count: self.wv.msg_count,
                floor: self.wv.motion.floor,
                door_open: self.wv.motion.door_open,
            };
            let outcome = backup::reconcile_own_cab(&mut self.wv.cab_orders, our_copy, guard);
            lights::apply(&self.io, &outcome.lamps);
            changed |= outcome.changed;
        }

        let outcome = world_view_update::merge_hall_orders(&mut self.wv.hall_orders, &msg.hall_orders);
        lights::apply(&self.io, &outcome.lamps);
        changed |= outcome.changed;

        let orders_differ = self
            .wv
            .peers
            .get(&msg.sender_id)
            .map_or(true, |last| last.hall_orders != msg.hall_orders || last.cab_orders != msg.cab_orders);
        if orders_differ {
            print::order_matrix(&msg);
        }

        // A peer's cab orders are part of the assigner input
        self.reassign_due |= changed || orders_differ;
        self.wv.peers.insert(msg.sender_id.clone(), msg);
        if changed {
            self.serve_if_idle(now);
        }
    }

    /// Door timer ran out
    pub fn on_door_timeout(&mut self, now: Instant) {
        if !self.door.timer_timeouted(now) {
            return;
        }
        self.reassign_due |= fsm::on_door_timeout(&mut self.wv, &self.io, &mut self.door, now);
    }

    /// Declares peers dead that have been silent for [config::PEER_TIMEOUT].
    ///
    /// Their backups are kept.
    pub fn on_watchdog_tick(&mut self, now: Instant) {
        let dead = self.wv.liveness.sweep(now.into_std(), config::PEER_TIMEOUT);
        if dead.is_empty() {
            return;
        }
        for id in &dead {
            self.wv.peers.remove(id);
            print::warn(format!("Node {} is dead", id));
        }
        print::peer_table(&self.wv.liveness.table(now.into_std()));
        self.reassign_due = true;
    }

    /// The next status message to broadcast
    pub fn next_snapshot(&mut self) -> StatusMessage {
        self.wv.next_snapshot()
    }

    /// Runs the assigner if something changed since the last run.
    ///
    /// On success the hall lamps are refreshed from the hall orders. On failure the old assignment
    /// stays and the failure is logged. Either way an idle cab then acts on what it has.
    pub async fn reassign_if_due(&mut self, now: Instant) {
        if !self.reassign_due {
            return;
        }
        self.reassign_due = false;

        match manager::update_assignment(&mut self.wv, &mut self.assigner).await {
            Ok(()) => lights::set_hall_lights(&self.io, &self.wv.hall_orders),
            Err(e) => print::err(format!("Hall assignment failed: {:#}", e)),
        }
        self.serve_if_idle(now);
    }

    /// Runs the motion decision if the cab stands still with the door closed.
    ///
    /// A moving cab decides at its next floor arrival.
    fn serve_if_idle(&mut self, now: Instant) {
        if self.wv.motion.dirn != Dirn::Stop {
            return;
        }
        if fsm::execute_order(&mut self.wv, &self.io, &mut self.door, now) {
            self.reassign_due = true;
        }
    }

    /// Runs the loop until one of its input channels closes.
    ///
    /// A closed hardware channel means the link to the elevator is gone, which ends the node.
    pub async fn run(mut self, mut chs: LoopChannels) -> anyhow::Result<()> {
        let mut broadcast_tick = interval(config::BROADCAST_PERIOD);
        broadcast_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut watchdog_tick = interval(config::WATCHDOG_PERIOD);
        watchdog_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let door_deadline = self.door.deadline();
            tokio::select! {
                msg = chs.elev_rx.recv() => {
                    let Some(msg) = msg else {
                        anyhow::bail!("elevator event channel closed");
                    };
                    self.on_elev_message(msg, Instant::now());
                }
                msg = chs.status_rx.recv() => {
                    let Some(msg) = msg else {
                        anyhow::bail!("status channel closed");
                    };
                    self.on_status_message(msg, Instant::now());
                }
                _ = sleep_until(door_deadline.unwrap_or_else(Instant::now)), if door_deadline.is_some() => {
                    self.on_door_timeout(Instant::now());
                }
                _ = broadcast_tick.tick() => {
                    let snapshot = self.next_snapshot();
                    match chs.broadcast_tx.try_send(snapshot) {
                        Ok(()) => {}
                        // Next tick sends a newer one
                        Err(mpsc::error::TrySendError::Full(_)) => {}
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            anyhow::bail!("broadcaster stopped");
                        }
                    }
                }
                _ = watchdog_tick.tick() => {
                    self.on_watchdog_tick(Instant::now());
                }
            }
            self.reassign_if_due(Instant::now()).await;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevio::{CallButton, CallType};
    use crate::manager::json_serial::{AssignerInput, AssignerOutput};
    use crate::world_view::OrderStatus;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Silent {
        motor: RefCell<Vec<Dirn>>,
    }

    impl ElevatorIo for Silent {
        fn motor_direction(&self, dirn: Dirn) { self.motor.borrow_mut().push(dirn); }
        fn call_button_light(&self, _floor: u8, _call_type: CallType, _on: bool) {}
        fn floor_indicator(&self, _floor: u8) {}
        fn door_light(&self, _on: bool) {}
        fn stop_button_light(&self, _on: bool) {}
    }

    struct Everything;

    impl HallAssigner for Everything {
        async fn assign(&mut self, input: &AssignerInput) -> anyhow::Result<AssignerOutput> {
            Ok(input.states.keys().map(|id| (id.clone(), input.hall_requests)).collect())
        }
    }

    fn node(id: &str) -> ControlLoop<Silent, Everything> {
        ControlLoop::new(id.to_string(), 1, Silent::default(), Everything)
    }

    #[test]
    fn start_between_floors_drives_down() {
        let mut cl = node("a");
        cl.start(None);
        assert_eq!(*cl.io().motor.borrow(), vec![Dirn::Down]);
        assert_eq!(cl.world_view().motion.dirn, Dirn::Down);

        cl.on_elev_message(ElevMessage::FloorSensor(1), Instant::now());
        assert_eq!(cl.world_view().motion.dirn, Dirn::Stop);
        assert_eq!(cl.world_view().motion.floor, 1);
    }

    #[test]
    fn own_messages_are_ignored() {
        let mut cl = node("a");
        cl.on_elev_message(ElevMessage::CallButton(CallButton { floor: 2, call_type: CallType::HallUp }), Instant::now());
        let own = cl.next_snapshot();
        cl.on_status_message(own, Instant::now());
        assert_eq!(cl.world_view().hall_orders[2][0], OrderStatus::Pending);
        assert!(cl.world_view().peers.is_empty());
    }

    #[tokio::test]
    async fn corroborated_call_is_served() {
        let mut a = node("a");
        let mut b = node("b");
        a.start(Some(0));
        b.start(Some(3));
        let now = Instant::now();

        a.on_elev_message(ElevMessage::CallButton(CallButton { floor: 0, call_type: CallType::HallUp }), now);
        b.on_status_message(a.next_snapshot(), now);
        a.on_status_message(b.next_snapshot(), now);
        assert_eq!(a.world_view().hall_orders[0][0], OrderStatus::Active);

        a.reassign_if_due(now).await;
        assert!(a.world_view().motion.door_open);
        assert_eq!(a.world_view().hall_orders[0][0], OrderStatus::Inactive);
        // Clearing changes the hall orders again
        assert!(a.reassign_due());
    }
}
