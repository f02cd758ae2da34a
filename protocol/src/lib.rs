//! Messages exchanged between a build frontend and the gatebridge forwarder,
//! plus the compact framing used to carry them over a byte pipe.

#[macro_use]
extern crate serde;

#[cfg(test)]
mod tests;

pub mod buffer;
pub mod de;
pub mod ser;

mod messages;
mod types;

pub use messages::*;
pub use types::*;
