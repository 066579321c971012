//! The `Handler` contract: the external collaborator that
//! supplies per-method business logic. `lsp-core` never defines what a
//! `textDocument/completion` response actually contains — it only defines
//! the boundary a language-analysis layer plugs into.
//!
//! A `Handler` sees [`AnyValue`]-backed params rather than a typed struct
//! per method, because the ~200 typed shapes only exist on the caller's
//! side of this boundary; `lsp-core` has no way to know at compile time
//! which one a given method needs. Implementations decode with
//! [`crate::codec::params_to`] (or [`crate::codec::any_to`] on an object
//! pulled out of a `MessageParams`) as the very first line of each handled
//! method — the same codec the [`crate::dispatcher::Dispatcher`] otherwise
//! never exposes to callers.

use crate::any_value::AnyValue;
use crate::error::LspError;
use crate::message::MessageParams;
use crate::schema::{IncomingNotification, IncomingRequest, OutgoingNotification, OutgoingRequest};

/// Per-method business logic, discovered by the Dispatcher through method
/// classification rather than a registry of function pointers — the
/// registry is just the closed [`IncomingRequest`]/[`IncomingNotification`]
/// enums dispatched over in a `match`.
///
/// Both methods run on a request-pool worker thread; neither may block on
/// another request's slot. Long-running work belongs on the worker pool
/// reachable through the [`Outgoing`] handle passed at construction time —
/// the Dispatcher does not schedule or await it.
pub trait Handler: Send + Sync {
    /// Produce the typed result (as an [`AnyValue`]) or LSP error for an
    /// inbound request. A panic here is caught by the request pool and
    /// surfaced as `InternalError`; it does not need to be caught here.
    fn handle_request(&self, method: IncomingRequest, params: Option<&MessageParams>) -> Result<AnyValue, LspError>;

    /// Handle an inbound notification. There is no result to return;
    /// `mark_ready` is called regardless of what happens here, so a panic
    /// is still caught and logged but never produces a response (there is
    /// none to produce).
    fn handle_notification(&self, method: IncomingNotification, params: Option<&MessageParams>);
}

/// The Handler's way of reaching back across the wire: emitting a
/// server-initiated request or notification. Implemented by the
/// [`crate::dispatcher::Dispatcher`] and handed to a `Handler` at
/// construction (not per call), so that work offloaded onto the worker
/// pool can still emit once it finishes — such work must call `send`
/// explicitly if it needs to emit.
///
/// Unlike inbound requests, outgoing sends never participate in SendId
/// ordering — they are not responses to anything the client sent, so
/// there is no slot to wait for.
pub trait Outgoing: Send + Sync {
    /// Fire a server→client notification immediately.
    fn notify(&self, method: OutgoingNotification, params: AnyValue);

    /// Fire a server→client request. The returned `id` is what the
    /// eventual client response will carry back; correlating that
    /// response to a waiting caller is the Handler's responsibility —
    /// `lsp-core` only guarantees the request is framed and enqueued with
    /// that id.
    fn request(&self, method: OutgoingRequest, params: AnyValue) -> crate::message::RequestId;

    /// Submit a job to the worker pool, available to the Handler but
    /// opaque to the Dispatcher. `description` is used only for the panic
    /// log line if the job panics.
    fn spawn(&self, description: String, job: Box<dyn FnOnce() + Send + 'static>);
}
