use std::{io::Write, sync::Arc};

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    config::Config,
    error::RconError,
    packet::{Packet, PacketType},
};

// Upper bound on the up-front allocation for a frame; larger frames grow as they arrive.
const FRAME_PREALLOC: usize = 4096;

/// How a session ended when it did not fail on a bad packet.
#[derive(Debug)]
pub enum SessionEnd {
    /// The client closed the connection between packets.
    PeerClosed,
    /// A response could not be written back, so the client is gone.
    SendFailed(std::io::Error),
}

/// Handles one accepted connection: reads packets one at a time, echoes
/// command bodies to `output` and answers every packet with exactly one
/// response, in request order.
///
/// There is no auth gating. Commands are acknowledged whether or not the
/// client has authenticated.
pub struct Session<S, W> {
    stream: S,
    output: W,
    config: Arc<Config>,
}

impl<S, W> Session<S, W>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: Write,
{
    pub fn new(stream: S, output: W, config: Arc<Config>) -> Self {
        Session {
            stream,
            output,
            config,
        }
    }

    /// Runs until the peer goes away or a packet cannot be decoded.
    ///
    /// Decode failures and short reads are returned as errors and close the
    /// connection without a response.
    pub async fn run(mut self) -> Result<SessionEnd, RconError> {
        loop {
            let length = match self.read_length().await? {
                Some(length) => length,
                None => return Ok(SessionEnd::PeerClosed),
            };

            // keepalive, nothing else follows
            if length == 0 {
                trace!("skipping zero length packet");
                continue;
            }

            if length < Packet::HEADER_SIZE {
                return Err(RconError::MalformedPacketHeader(length));
            }

            let frame = self.read_frame(length).await?;
            let packet = Packet::unpack(&frame)?;
            trace!(
                "receive packet id {} type {}",
                packet.id(),
                packet.packet_type().value()
            );

            self.echo(&packet)?;

            let response = response_for(&packet, &self.config.password);
            if let Err(e) = self.stream.write_all(&response.pack()).await {
                debug!("cannot send response: {}", e);
                return Ok(SessionEnd::SendFailed(e));
            }
        }
    }

    /// Reads the 4-byte length field. `None` means the stream ended cleanly
    /// before any byte of a new packet arrived.
    async fn read_length(&mut self) -> Result<Option<usize>, RconError> {
        let mut buf = [0u8; 4];
        let mut filled = 0;

        while filled < buf.len() {
            let n = self
                .stream
                .read(&mut buf[filled..])
                .await
                .map_err(RconError::ReceiveError)?;

            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(RconError::ShortRead {
                    expected: buf.len(),
                    received: filled,
                });
            }
            filled += n;
        }

        Ok(Some(u32::from_le_bytes(buf) as usize))
    }

    /// Reads exactly `length` bytes (id, type, body and terminators).
    async fn read_frame(&mut self, length: usize) -> Result<Vec<u8>, RconError> {
        let mut frame = Vec::with_capacity(length.min(FRAME_PREALLOC));
        (&mut self.stream)
            .take(length as u64)
            .read_to_end(&mut frame)
            .await
            .map_err(RconError::ReceiveError)?;

        if frame.len() < length {
            return Err(RconError::ShortRead {
                expected: length,
                received: frame.len(),
            });
        }

        Ok(frame)
    }

    fn echo(&mut self, packet: &Packet) -> Result<(), RconError> {
        if packet.packet_type() != PacketType::ExecCommand || packet.body().is_empty() {
            return Ok(());
        }

        // one write per line so concurrent sessions never split a line
        let line = format!("{}\n", packet.body());
        self.output
            .write_all(line.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(RconError::OutputError)
    }
}

/// Picks the reply for a received packet: the failure packet for an auth
/// attempt with the wrong password, the generic ack for anything else.
pub fn response_for(packet: &Packet, password: &str) -> Packet {
    match packet.packet_type() {
        PacketType::Auth if packet.body() != password => Packet::auth_failure(),
        _ => Packet::ack(),
    }
}
