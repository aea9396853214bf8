//! Alkahest contract bindings and clients.
//!
//! Typed clients for the Alkahest escrow, payment, barter and arbiter contracts
//! deployed on top of EAS, plus the event-await utility they share: scan past
//! logs for a matching event and fall back to a polling watch until one arrives.
//!
//! Start from [`AlkahestClient`], which resolves contract addresses for the
//! provider's chain and hands out per-contract clients.

#[rustfmt::skip]
#[allow(unused)]
mod bindings;
mod sol_types;

pub mod addresses;
pub mod arbiters;
pub mod client;
pub mod codec;
pub mod error;
pub mod events;
pub mod obligations;
pub mod provider;

pub use client::{AlkahestClient, AttestedReceipt};
pub use codec::AbiCodec;
pub use error::{Error, Result};
pub use sol_types::*;
