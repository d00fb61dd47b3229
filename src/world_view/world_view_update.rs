//! Help functions to update the local order matrices.
//!
//! Local button presses only ever move a slot from Inactive to Pending, servicing only moves
//! it from Active to Inactive, and everything else is driven by peers through
//! [OrderStatus::merge]. No function here touches hardware: lamp changes are returned
//! as [LampUpdate]s for [crate::elevator_logic::lights] to apply.

use crate::elevio::CallType;
use crate::world_view::{CabOrders, HallOrders, LampEffect, OrderStatus};


/// A lamp that must change after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampUpdate {
    /// Floor of the lamp
    pub floor: u8,
    /// Which button the lamp belongs to
    pub call_type: CallType,
    /// New lamp state
    pub on: bool,
}

/// Result of merging or clearing orders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// `true` if any slot changed status
    pub changed: bool,
    /// Lamps to switch
    pub lamps: Vec<LampUpdate>,
}

impl MergeOutcome {
    fn record(&mut self, floor: usize, call_type: CallType, old: OrderStatus, new: OrderStatus, lamp: LampEffect) {
        if old != new {
            self.changed = true;
        }
        match lamp {
            LampEffect::On => self.lamps.push(LampUpdate { floor: floor as u8, call_type, on: true }),
            LampEffect::Off => self.lamps.push(LampUpdate { floor: floor as u8, call_type, on: false }),
            LampEffect::Unchanged => {}
        }
    }

    /// Appends the result of another update
    pub fn extend(&mut self, other: MergeOutcome) {
        self.changed |= other.changed;
        self.lamps.extend(other.lamps);
    }
}


/// Merges a peer's hall matrix into the local one, slot by slot.
pub fn merge_hall_orders(local: &mut HallOrders, peer: &HallOrders) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for (floor, (local_row, peer_row)) in local.iter_mut().zip(peer.iter()).enumerate() {
        for (btn, call_type) in [CallType::HallUp, CallType::HallDown].into_iter().enumerate() {
            let old = local_row[btn];
            let (new, lamp) = old.merge(peer_row[btn]);
            local_row[btn] = new;
            outcome.record(floor, call_type, old, new, lamp);
        }
    }
    outcome
}

/// Merges `peer` into a per-floor vector of cab orders with the full tri-state rule.
///
/// Used for the backup copies of peers' cab orders, see [crate::backup].
pub fn merge_cab_orders(local: &mut CabOrders, peer: &CabOrders) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for (floor, (slot, peer_status)) in local.iter_mut().zip(peer.iter()).enumerate() {
        let old = *slot;
        let (new, lamp) = old.merge(*peer_status);
        *slot = new;
        outcome.record(floor, CallType::Cab, old, new, lamp);
    }
    outcome
}

/// Registers a button press. Only an Inactive slot becomes Pending.
///
/// ## Returns
/// `true` if the slot changed
pub fn add_request(hall: &mut HallOrders, cab: &mut CabOrders, floor: u8, call_type: CallType) -> bool {
    let slot = match call_type {
        CallType::HallUp | CallType::HallDown => &mut hall[floor as usize][call_type as usize],
        CallType::Cab => &mut cab[floor as usize],
    };
    if *slot == OrderStatus::Inactive {
        *slot = OrderStatus::Pending;
        true
    } else {
        false
    }
}

/// Clears serviced orders at `floor`. `served` is indexed `[HallUp, HallDown, Cab]`.
///
/// Only Active slots are cleared: a slot never goes to Inactive without having been Active.
pub fn clear_served(hall: &mut HallOrders, cab: &mut CabOrders, floor: u8, served: [bool; 3]) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let f = floor as usize;
    for call_type in [CallType::HallUp, CallType::HallDown, CallType::Cab] {
        if !served[call_type as usize] {
            continue;
        }
        let slot = match call_type {
            CallType::Cab => &mut cab[f],
            _ => &mut hall[f][call_type as usize],
        };
        if slot.is_active() {
            *slot = OrderStatus::Inactive;
            outcome.record(f, call_type, OrderStatus::Active, OrderStatus::Inactive, LampEffect::Off);
        }
    }
    outcome
}
