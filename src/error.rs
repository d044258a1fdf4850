use thiserror::Error;

/// Possible errors for the package.
#[derive(Error, Debug)]
pub enum RconError {
    /// Returned if the declared packet length is too small to hold the id and
    /// type fields.
    #[error("packet header malformed (declared length {0} is smaller than id + type)")]
    MalformedPacketHeader(usize),
    /// Returned if the body is not valid utf-8.
    #[error("packet body malformed (not valid ascii or utf-8)")]
    MalformedPacketBody(#[from] std::str::Utf8Error),
    /// Returned if the peer closed the stream in the middle of a packet.
    #[error("short read: expected {expected} bytes, received {received}")]
    ShortRead { expected: usize, received: usize },
    /// Internal error used if the stream was successfully established, but
    /// there was a problem reading from the socket.
    #[error("cannot receive packet from client")]
    ReceiveError(#[source] std::io::Error),
    /// Returned if an echoed command cannot be written to the output sink.
    #[error("cannot write command to output")]
    OutputError(#[source] std::io::Error),
    /// Returned if the listening socket cannot be opened.
    #[error("cannot bind listener")]
    BindError(#[source] std::io::Error),
    /// Returned if the listener fails to accept a connection.
    #[error("cannot accept connection: {0}")]
    AcceptError(#[source] std::io::Error),
}
