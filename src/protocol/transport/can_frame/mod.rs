//! In-memory representation of a classic CAN data frame as sent to the DIM.
use crate::protocol::transport::can_id::CanId;
use embedded_can::Id;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN frame. The cluster only ever receives eight-byte payloads.
pub struct CanFrame {
    /// Standard or extended identifier.
    pub id: CanId,
    /// Payload buffer; bytes past `len` are zero.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Full eight-byte data frame.
    pub fn data_frame(id: CanId, data: [u8; 8]) -> Self {
        Self { id, data, len: 8 }
    }

    /// Valid part of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        let mut buffer = [0u8; 8];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into().into(),
            data: buffer,
            len: data.len(),
        })
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        self.id.is_extended()
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id.into()
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_can::Frame;

    #[test]
    /// Short payloads are zero-padded and keep their DLC.
    fn test_new_pads_with_zero() {
        let frame = <CanFrame as Frame>::new(CanId::extended(0x1800008), &[0xA7, 0x00]).unwrap();
        assert_eq!(frame.dlc(), 2);
        assert_eq!(frame.data, [0xA7, 0x00, 0, 0, 0, 0, 0, 0]);
        assert!(frame.is_extended());
    }

    #[test]
    /// Classic CAN cannot carry more than eight bytes.
    fn test_new_rejects_oversized_payload() {
        assert!(<CanFrame as Frame>::new(CanId::standard(0x10), &[0u8; 9]).is_none());
    }
}
