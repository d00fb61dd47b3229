//! Serialization and Deserialization for [StatusMessage]
//!
//! A packet on the wire is [config::KEY_STR] followed by the `bincode` encoding of the message.

use crate::config;
use crate::print;
use crate::world_view::StatusMessage;


/// Serializes a `StatusMessage` into a keyed binary packet.
///
/// ## Returns
/// - `Some(Vec<u8>)` containing the packet, `None` if `bincode` fails (logged).
pub fn serialize_status(msg: &StatusMessage) -> Option<Vec<u8>> {
    match bincode::serialize(msg) {
        Ok(encoded) => {
            let mut packet = Vec::with_capacity(config::KEY_STR.len() + encoded.len());
            packet.extend_from_slice(config::KEY_STR.as_bytes());
            packet.extend_from_slice(&encoded);
            Some(packet)
        }
        Err(e) => {
            print::err(format!("Serialization failed: {} (serial.rs, serialize_status())", e));
            None
        }
    }
}

/// Deserializes a `StatusMessage` from a keyed binary packet.
///
/// Packets without the key, or whose payload does not decode, give `None`.
/// Such packets are transport faults and are dropped without logging.
pub fn deserialize_status(packet: &[u8]) -> Option<StatusMessage> {
    let payload = packet.strip_prefix(config::KEY_STR.as_bytes())?;
    bincode::deserialize(payload).ok()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_view::{OrderStatus, WorldView};

    #[test]
    fn packet_carries_full_snapshot() {
        let mut wv = WorldView::new("15657".to_string(), 1234);
        wv.hall_orders[2][1] = OrderStatus::Active;
        wv.cab_orders[3] = OrderStatus::Pending;
        wv.cab_backup.insert("15658".to_string(), [OrderStatus::Active; 4]);
        let msg = wv.next_snapshot();

        let packet = serialize_status(&msg).expect("serializes");
        assert!(packet.starts_with(config::KEY_STR.as_bytes()));
        assert_eq!(deserialize_status(&packet), Some(msg));
    }

    #[test]
    fn foreign_and_truncated_packets_are_dropped() {
        assert_eq!(deserialize_status(b"hello world"), None);

        let msg = WorldView::new("1".to_string(), 0).next_snapshot();
        let packet = serialize_status(&msg).expect("serializes");
        assert_eq!(deserialize_status(&packet[..packet.len() - 3]), None);
    }
}
