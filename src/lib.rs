//! Jyotish Graph - Kundli page MCP server
//!
//! The presentation side of a Vedic astrology app: a birth details form with
//! debounced place search, the North Indian chart, planet table, Vimshottari
//! dasha timeline and birth details of a Kundli computed by a remote backend.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod server;

pub use server::JyotishServer;
