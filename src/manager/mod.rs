//! ## Hall request assignment
//!
//! Hall calls are distributed by an assignment strategy behind the [HallAssigner] trait. The
//! default strategy is the external `hall_request_assigner` executable, see
//! [hall_request_assigner::ExternalAssigner].
//!
//! A failed assignment never takes the node down: the previous assignment is kept.

pub mod json_serial;
pub mod hall_request_assigner;

use anyhow::Context;

use crate::world_view::WorldView;

use json_serial::{AssignerInput, AssignerOutput};


/// Strategy that splits the hall requests between the live elevators
#[allow(async_fn_in_trait)]
pub trait HallAssigner {
    /// Computes the hall orders of every elevator in `input.states`
    async fn assign(&mut self, input: &AssignerInput) -> anyhow::Result<AssignerOutput>;
}

/// Runs `assigner` on the current worldview and stores this node's share in `wv.assigned`.
///
/// On error `wv.assigned` is left untouched.
pub async fn update_assignment<A: HallAssigner>(wv: &mut WorldView, assigner: &mut A) -> anyhow::Result<()> {
    let input = json_serial::create_hall_request_input(wv);
    let mut output = assigner.assign(&input).await?;
    let mine = output
        .remove(&wv.self_id)
        .with_context(|| format!("no assignment for {} in assigner output", wv.self_id))?;
    wv.assigned = mine;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_view::OrderStatus;

    struct Fixed(anyhow::Result<AssignerOutput>);

    impl HallAssigner for Fixed {
        async fn assign(&mut self, _input: &AssignerInput) -> anyhow::Result<AssignerOutput> {
            match &self.0 {
                Ok(out) => Ok(out.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    #[tokio::test]
    async fn own_share_replaces_assignment() {
        let mut wv = WorldView::new("a".to_string(), 0);
        wv.hall_orders[2][0] = OrderStatus::Active;
        let mut output = AssignerOutput::new();
        output.insert("a".to_string(), [[false, false], [false, false], [true, false], [false, false]]);
        output.insert("b".to_string(), [[false; 2]; 4]);

        update_assignment(&mut wv, &mut Fixed(Ok(output))).await.unwrap();
        assert!(wv.assigned[2][0]);
    }

    #[tokio::test]
    async fn failure_keeps_previous_assignment() {
        let mut wv = WorldView::new("a".to_string(), 0);
        wv.assigned[1][1] = true;

        assert!(update_assignment(&mut wv, &mut Fixed(Err(anyhow::anyhow!("crashed")))).await.is_err());
        assert!(update_assignment(&mut wv, &mut Fixed(Ok(AssignerOutput::new()))).await.is_err());
        assert!(wv.assigned[1][1]);
    }
}
