//! ## Cab backup and recovery
//!
//! Every node keeps a shadow copy of each peer's cab orders, [CabBackupMap], built from what the
//! peers report about themselves. The whole map is broadcast, so a node that restarts and has
//! forgotten its cab orders finds them again in its peers' copies of it.
//!
//! Two rules live here:
//! - [update_peer_backup]: a peer's self-reported cab vector is merged into our copy of it with the
//!   usual tri-state rule, except that a peer in its own recovery window cannot clear our copy.
//! - [reconcile_own_cab]: a peer's copy of *our* cab vector is compared with our own. Pending meeting
//!   a Pending copy is corroborated to Active. A peer's Active copy only raises our slot during the
//!   first [config::CAB_RECOVERY_WINDOW] messages after boot, and never for the ground floor while
//!   the door is open at the ground floor (the position the node parks in right after startup).
//!   Peers never clear our cab orders.
//!
//! Entries are never removed, also not when a peer dies.

use crate::config;
use crate::elevio::CallType;
use crate::world_view::world_view_update::{self, LampUpdate, MergeOutcome};
use crate::world_view::{CabBackupMap, CabOrders, OrderStatus};


/// Merges `peer_id`'s self-reported cab orders into our backup of that peer.
///
/// The first report from a peer is taken as is. While the peer is inside its own recovery window
/// (`peer_msg_id` below [config::CAB_RECOVERY_WINDOW]) an Inactive report does not clear an Active
/// backup slot: a freshly restarted peer reports empty cab orders until it has read our copy.
///
/// ## Returns
/// `true` if the backup changed
pub fn update_peer_backup(backup: &mut CabBackupMap, peer_id: &str, reported: &CabOrders, peer_msg_id: u64) -> bool {
    let Some(entry) = backup.get_mut(peer_id) else {
        backup.insert(peer_id.to_string(), *reported);
        return true;
    };

    let mut effective = *reported;
    if peer_msg_id < config::CAB_RECOVERY_WINDOW {
        for (theirs, ours) in effective.iter_mut().zip(entry.iter()) {
            if *ours == OrderStatus::Active && *theirs == OrderStatus::Inactive {
                *theirs = OrderStatus::Active;
            }
        }
    }
    world_view_update::merge_cab_orders(entry, &effective).changed
}


/// The parts of the local state that decide whether restart recovery may raise a cab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryGuard {
    /// Number of status messages sent since boot
    pub msg_count: u64,
    /// Current floor
    pub floor: u8,
    /// Door open flag
    pub door_open: bool,
}

impl RecoveryGuard {
    fn may_recover(&self, floor: usize) -> bool {
        if self.msg_count >= config::CAB_RECOVERY_WINDOW {
            return false;
        }
        !(floor == 0 && self.floor == 0 && self.door_open)
    }
}

/// Reconciles our own cab orders against a peer's backup of them.
pub fn reconcile_own_cab(own: &mut CabOrders, peer_copy: &CabOrders, guard: RecoveryGuard) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for (floor, (slot, theirs)) in own.iter_mut().zip(peer_copy.iter()).enumerate() {
        let raise = match (*slot, *theirs) {
            (OrderStatus::Pending, OrderStatus::Pending) => true,
            (OrderStatus::Pending | OrderStatus::Inactive, OrderStatus::Active) => guard.may_recover(floor),
            _ => false,
        };
        if raise {
            *slot = OrderStatus::Active;
            outcome.changed = true;
            outcome.lamps.push(LampUpdate { floor: floor as u8, call_type: CallType::Cab, on: true });
        }
    }
    outcome
}
