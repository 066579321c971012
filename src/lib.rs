//! `lsp-core`: the concurrent dispatcher, JSON-RPC/LSP codec, and schema
//! registry that sit at the center of a Language Server Protocol server.
//!
//! This crate does not speak for any particular language. It owns the
//! message pump and response-ordering scheduler (see [`dispatcher`]), the
//! bidirectional transform between the wire's untyped JSON and the LSP
//! 3.17 type tree (see [`codec`] and [`any_value`]), and the closed
//! taxonomy of method names and enums the protocol defines (see
//! [`schema`]). What actually happens in response to a
//! `textDocument/completion` is supplied by a [`handler::Handler`]
//! implementation linked in by the embedding binary — `lsp-core` only
//! defines the boundary.
//!
//! A minimal demonstration binary wiring this library to stdio lives in
//! `src/main.rs`; it is not part of the library's public contract.

pub mod any_value;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod framing;
pub mod handler;
pub mod logging;
pub mod message;
pub mod pool;
pub mod queue;
pub mod schema;

pub use any_value::AnyValue;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::LspError;
pub use handler::{Handler, Outgoing};
pub use message::{Message, MessageParams, RequestId, ResponseId, SendId};
