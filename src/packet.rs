use crate::error::RconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    // SERVERDATA_AUTH
    Auth,
    // SERVERDATA_EXECCOMMAND, also SERVERDATA_AUTH_RESPONSE on the way back
    ExecCommand,
    // SERVERDATA_RESPONSE_VALUE
    Response,
    Other(i32),
}

impl PacketType {
    pub fn value(&self) -> i32 {
        match self {
            PacketType::Auth => 3,
            PacketType::ExecCommand => 2,
            PacketType::Response => 0,
            PacketType::Other(value) => *value,
        }
    }

    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.value().to_le_bytes()
    }
}

// Total: unknown types are carried, never rejected.
impl From<i32> for PacketType {
    fn from(value: i32) -> Self {
        match value {
            3 => PacketType::Auth,
            2 => PacketType::ExecCommand,
            0 => PacketType::Response,
            other => PacketType::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    packet_type: PacketType,
    body: String,
}

impl Packet {
    pub const BASE_PACKAGE_SIZE: i32 = 10;

    /// Bytes taken by the id and type fields at the start of a frame.
    pub const HEADER_SIZE: usize = 8;

    const AUTH_FAILURE_ID: i32 = -1;
    const ACK_ID: i32 = 0x10;

    pub fn new(id: i32, packet_type: PacketType, body: impl Into<String>) -> Self {
        Packet {
            id,
            packet_type,
            body: body.into(),
        }
    }

    /// Reply sent when an auth packet carries the wrong password.
    pub fn auth_failure() -> Self {
        Packet::new(Self::AUTH_FAILURE_ID, PacketType::ExecCommand, "")
    }

    /// Reply sent for a successful auth and for every other packet.
    pub fn ack() -> Self {
        Packet::new(Self::ACK_ID, PacketType::ExecCommand, "")
    }

    /// Decodes one frame: everything that follows the 4-byte length field.
    ///
    /// The last two bytes of the body region are the terminators and are
    /// dropped without being inspected. A body region shorter than the
    /// terminators decodes as an empty body.
    pub fn unpack(frame: &[u8]) -> Result<Self, RconError> {
        if frame.len() < Self::HEADER_SIZE {
            return Err(RconError::MalformedPacketHeader(frame.len()));
        }

        let (header, rest) = frame.split_at(Self::HEADER_SIZE);
        let id = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let packet_type = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let body = &rest[..rest.len().saturating_sub(2)];
        let body = std::str::from_utf8(body)?;

        Ok(Packet::new(id, packet_type.into(), body))
    }

    // Since the only one of these values that can change in length is the body,
    // an easy way to calculate the size of a packet is to find the byte-length
    // of the packet body, then add 10 to it.
    pub fn size(&self) -> i32 {
        self.body.len() as i32 + Self::BASE_PACKAGE_SIZE
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn body(&self) -> &str {
        self.body.as_ref()
    }

    pub fn pack(&self) -> Vec<u8> {
        // Size, ID, Type, Body, Terminator
        let mut payload = Vec::<u8>::with_capacity(self.size() as usize + 4);
        payload.extend_from_slice(&self.size().to_le_bytes());
        payload.extend_from_slice(&self.id().to_le_bytes());
        payload.extend_from_slice(&self.packet_type().to_le_bytes());
        payload.extend_from_slice(self.body().as_bytes());
        // null terminate the body, then null terminate the entire package
        payload.extend_from_slice(&[0u8, 0u8]);
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_matches_wire_bytes() {
        assert_eq!(
            hex::encode(Packet::auth_failure().pack()),
            "0a000000ffffffff020000000000"
        );
    }

    #[test]
    fn ack_matches_wire_bytes() {
        assert_eq!(
            hex::encode(Packet::ack().pack()),
            "0a00000010000000020000000000"
        );
    }

    #[test]
    fn size_counts_body_bytes() {
        let packet = Packet::new(1, PacketType::ExecCommand, "status");
        assert_eq!(packet.size(), 16);
        assert_eq!(packet.pack().len(), 20);
    }

    #[test]
    fn unpack_reads_frame_after_length() {
        let packet = Packet::new(7, PacketType::Auth, "secret");
        let bytes = packet.pack();

        let decoded = Packet::unpack(&bytes[4..]).unwrap();
        assert_eq!(decoded.id(), 7);
        assert_eq!(decoded.packet_type(), PacketType::Auth);
        assert_eq!(decoded.body(), "secret");
    }

    #[test]
    fn unpack_keeps_unknown_types() {
        let bytes = Packet::new(1, PacketType::Other(42), "x").pack();
        let decoded = Packet::unpack(&bytes[4..]).unwrap();
        assert_eq!(decoded.packet_type(), PacketType::Other(42));
        assert_eq!(decoded.packet_type().value(), 42);
    }

    #[test]
    fn unpack_strips_terminators_without_checking_them() {
        let mut frame = vec![0u8; 8];
        frame.extend_from_slice(b"hiXY");
        let decoded = Packet::unpack(&frame).unwrap();
        assert_eq!(decoded.body(), "hi");
    }

    #[test]
    fn unpack_short_body_region_is_empty() {
        let mut frame = vec![1, 0, 0, 0, 2, 0, 0, 0];
        assert_eq!(Packet::unpack(&frame).unwrap().body(), "");

        frame.push(0);
        assert_eq!(Packet::unpack(&frame).unwrap().body(), "");
    }

    #[test]
    fn unpack_rejects_truncated_header() {
        let err = Packet::unpack(&[1, 0, 0, 0, 2]).unwrap_err();
        assert!(matches!(err, RconError::MalformedPacketHeader(5)));
    }

    #[test]
    fn unpack_rejects_invalid_utf8() {
        let mut frame = vec![1, 0, 0, 0, 2, 0, 0, 0];
        frame.extend_from_slice(&[0xff, 0xfe, 0, 0]);
        let err = Packet::unpack(&frame).unwrap_err();
        assert!(matches!(err, RconError::MalformedPacketBody(_)));
    }
}
