use elevatorpeer::control_loop::{ControlLoop, LoopChannels};
use elevatorpeer::elevator_logic::self_elevator;
use elevatorpeer::manager::hall_request_assigner::ExternalAssigner;
use elevatorpeer::network::udp_broadcast;
use elevatorpeer::{init, print};


#[tokio::main]
async fn main() {
    let node = init::parse_args();
    let boot_time = init::boot_time();
    print::info(format!("Starter node {} (boot {})", node.node_id, boot_time));

    /* START ----------- Init av channels til kontroll-løkka ---------------------- */
    let (chs, feeds) = LoopChannels::new();
    /* SLUTT ----------- Init av channels til kontroll-løkka ---------------------- */

    // Heisen må vere tilkopla før noko anna startar
    let (elevator, floor_at_boot) = match self_elevator::init(&node.elevator_addr, feeds.elev_tx) {
        Ok(res) => res,
        Err(e) => {
            print::err(format!("Could not connect to elevator at {}: {}", node.elevator_addr, e));
            std::process::exit(1);
        }
    };

/* START ----------- Starte Eksterne Nettverkstasks ---------------------- */
    //Task som hører etter UDP-broadcasts
    {
        let port = node.broadcast_port;
        let status_tx = feeds.status_tx;
        let _listen_task = tokio::spawn(async move {
            print::info("Starter å høre etter UDP-broadcast".to_string());
            if let Err(e) = udp_broadcast::start_udp_listener(port, status_tx).await {
                print::err(format!("UDP listener failed: {}", e));
                std::process::exit(1);
            }
        });
    }

    //Task som starter egen UDP-broadcaster
    {
        let port = node.broadcast_port;
        let broadcast_rx = feeds.broadcast_rx;
        let _broadcast_task = tokio::spawn(async move {
            print::info("Starter UDP-broadcaster".to_string());
            if let Err(e) = udp_broadcast::start_udp_broadcaster(port, broadcast_rx).await {
                print::err(format!("UDP broadcaster failed: {}", e));
                std::process::exit(1);
            }
        });
    }
/* SLUTT ----------- Starte Eksterne Nettverkstasks ---------------------- */

    let assigner = ExternalAssigner::in_dir(&node.solver_dir);
    let mut control_loop = ControlLoop::new(node.sender_id(), boot_time, elevator, assigner);
    control_loop.start(floor_at_boot);

    // Kontroll-løkka eig all tilstand og køyrer på main-tasken
    if let Err(e) = control_loop.run(chs).await {
        print::err(format!("Control loop stopped: {:#}", e));
        std::process::exit(1);
    }
}
