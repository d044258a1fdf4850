//! Mock server for the [Source RCON protocol](https://developer.valvesoftware.com/wiki/Source_RCON_Protocol),
//! meant to be driven by the test suite of an rcon client.
//!
//! Every command body is printed to standard output, every auth packet is
//! checked against a single password and every packet gets a fixed reply.
pub mod config;
pub mod error;
pub mod logger;
pub mod packet;
pub mod server;
pub mod session;
