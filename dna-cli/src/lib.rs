//! Transports for the DNA Analysis server.
//!
//! The `dna-mcp` binary speaks the Model Context Protocol over stdio by
//! default and can alternatively serve the same operations over HTTP.

pub mod cli;
pub mod logging;
pub mod mcp;
pub mod server;
