//! Providers Module - External Data Sources
//!
//! Jalur data: Solana JSON-RPC client untuk balance, token accounts,
//! dan network stats yang dipakai analytics collector.

pub mod solana;

pub use solana::*;
