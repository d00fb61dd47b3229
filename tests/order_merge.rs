//! Property tests for the tri-state order merge
//!
//! - Convergence: the settled status depends only on the multiset of peer reports
//! - Clearing: a slot only becomes Inactive from Active
//! - Progress: one merge moves a slot at most one step along Inactive -> Pending -> Active

use elevatorpeer::world_view::world_view_update::merge_hall_orders;
use elevatorpeer::world_view::{HallOrders, LampEffect, OrderStatus};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn any_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Inactive),
        Just(OrderStatus::Pending),
        Just(OrderStatus::Active),
    ]
}

fn raising_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![Just(OrderStatus::Pending), Just(OrderStatus::Active)]
}

/// A list of reports and a shuffled copy of it
fn reports_and_permutation<S>(status: S) -> impl Strategy<Value = (Vec<OrderStatus>, Vec<OrderStatus>)>
where
    S: Strategy<Value = OrderStatus>,
{
    prop::collection::vec(status, 1..12)
        .prop_flat_map(|reports| (Just(reports.clone()), Just(reports).prop_shuffle()))
}

fn any_hall() -> impl Strategy<Value = HallOrders> {
    prop::array::uniform4(prop::array::uniform2(any_status()))
}

/// Applies the reports again and again until the local status stops changing
fn settle(mut local: OrderStatus, reports: &[OrderStatus]) -> OrderStatus {
    loop {
        let before = local;
        for report in reports {
            local = local.merge(*report).0;
        }
        if local == before {
            return local;
        }
    }
}

fn next(status: OrderStatus) -> OrderStatus {
    match status {
        OrderStatus::Inactive => OrderStatus::Pending,
        OrderStatus::Pending => OrderStatus::Active,
        OrderStatus::Active => OrderStatus::Inactive,
    }
}

// ============================================================================
// Convergence
// ============================================================================

proptest! {
    /// Pending and Active reports settle to the same status in any order
    #[test]
    fn raising_reports_are_confluent(
        local in any_status(),
        (reports, shuffled) in reports_and_permutation(raising_status())
    ) {
        let settled = settle(local, &reports);
        prop_assert_eq!(settled, settle(local, &shuffled));

        // A call seen Pending anywhere ends up Active
        if local != OrderStatus::Inactive || reports.contains(&OrderStatus::Pending) {
            prop_assert_eq!(settled, OrderStatus::Active);
        }
    }

    /// Once Active, any Inactive report among Active ones clears the slot, in any order
    #[test]
    fn clearing_reports_are_confluent(
        (reports, shuffled) in reports_and_permutation(prop_oneof![Just(OrderStatus::Active), Just(OrderStatus::Inactive)])
    ) {
        prop_assume!(reports.contains(&OrderStatus::Inactive));
        prop_assert_eq!(settle(OrderStatus::Active, &reports), OrderStatus::Inactive);
        prop_assert_eq!(settle(OrderStatus::Active, &shuffled), OrderStatus::Inactive);
    }
}

// ============================================================================
// Single step invariants
// ============================================================================

proptest! {
    /// CORE INVARIANT: Inactive is only reached from Active, and only then is the lamp turned off
    #[test]
    fn no_premature_clearing(local in any_status(), peer in any_status()) {
        let (new, lamp) = local.merge(peer);
        if new == OrderStatus::Inactive && local != OrderStatus::Inactive {
            prop_assert_eq!(local, OrderStatus::Active);
        }
        prop_assert_eq!(lamp == LampEffect::Off, local == OrderStatus::Active && new == OrderStatus::Inactive);
        prop_assert_eq!(lamp == LampEffect::On, local == OrderStatus::Pending && new == OrderStatus::Active);
    }

    /// A merge never skips a step of the cycle
    #[test]
    fn at_most_one_step(local in any_status(), peers in prop::collection::vec(any_status(), 1..20)) {
        let mut status = local;
        for peer in peers {
            let (new, _) = status.merge(peer);
            prop_assert!(new == status || new == next(status));
            status = new;
        }
    }

    /// Matrix merge reports a change exactly when a slot changed, and one lamp per lit or cleared slot
    #[test]
    fn matrix_merge_reports_its_changes(local in any_hall(), peer in any_hall()) {
        let mut merged = local;
        let outcome = merge_hall_orders(&mut merged, &peer);
        prop_assert_eq!(outcome.changed, merged != local);

        let lamp_slots = local
            .iter()
            .flatten()
            .zip(merged.iter().flatten())
            .filter(|(old, new)| old != new && (old.is_active() || new.is_active()))
            .count();
        prop_assert_eq!(outcome.lamps.len(), lamp_slots);
        for lamp in &outcome.lamps {
            let new = merged[lamp.floor as usize][lamp.call_type as usize];
            prop_assert_eq!(lamp.on, new.is_active());
        }
    }
}
