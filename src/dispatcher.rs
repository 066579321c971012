//! The message pump and response-ordering scheduler.
//!
//! Owns the inbound/outbound [`MessageQueue`]s and the request/worker
//! [`ThreadPool`]s, assigns each inbound message a [`SendId`], and holds
//! the strict-ordering guarantee: the response for SendId `k` is never
//! emitted before every response for SendId `< k`. A condition-variable
//! handshake on a single watermark does this rather than a
//! priority-queue-by-SendId: parallelism is bounded by the request pool
//! size, so the extra heap a priority queue would need buys nothing here.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::codec;
use crate::error::LspError;
use crate::handler::{Handler, Outgoing};
use crate::message::{Message, MessageParams, RequestId, ResponseId, SendId, SendIdGenerator};
use crate::pool::ThreadPool;
use crate::queue::{MessageQueue, QueueError};
use crate::schema::{classify_incoming, IncomingMethod, IncomingNotification, IncomingRequest, OutgoingNotification, OutgoingRequest};

/// Tuning knobs independent of any single message. Request pool size and
/// worker pool size are independent configuration values.
#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    pub request_pool_size: usize,
    pub worker_pool_size: usize,
    /// `0` means unbounded, matching [`MessageQueue::new`].
    pub inbound_queue_capacity: usize,
    /// `0` means unbounded, matching [`MessageQueue::new`].
    pub outbound_queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            request_pool_size: 4,
            worker_pool_size: 4,
            inbound_queue_capacity: 0,
            outbound_queue_capacity: 0,
        }
    }
}

/// Ordering handshake: `pending` is the lowest SendId not yet emitted,
/// `condvar` wakes every waiter each time it advances. The mutex protects
/// only the wait/notify handshake, not the rest of the dispatcher's state.
struct SlotGate {
    pending: Mutex<i64>,
    condvar: Condvar,
}

impl SlotGate {
    fn new() -> Self {
        Self {
            pending: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }

    /// Blocks until `send_id` is the next slot to emit, or `terminated`
    /// flips. Returns `false` if termination won the race.
    fn wait_for_turn(&self, send_id: SendId, terminated: &AtomicBool) -> bool {
        let mut pending = self.pending.lock();
        while *pending != send_id.0 as i64 {
            if terminated.load(Ordering::SeqCst) {
                return false;
            }
            self.condvar.wait(&mut pending);
        }
        !terminated.load(Ordering::SeqCst)
    }

    /// Advances the watermark past `send_id` and wakes every waiter,
    /// whether or not a payload was actually emitted.
    fn advance_past(&self, send_id: SendId) {
        let mut pending = self.pending.lock();
        debug_assert_eq!(*pending, send_id.0 as i64, "SendId slots must advance in order");
        *pending = send_id.0 as i64 + 1;
        self.condvar.notify_all();
    }

    fn wake_all(&self) {
        self.condvar.notify_all();
    }
}

/// Owns the queues, pools, and ordering state for one session. Constructed
/// once per session; `run` drives the listener loop to completion (transport EOF or
/// `terminate()`), after which the Dispatcher is spent.
pub struct Dispatcher {
    inbound: MessageQueue<String>,
    outbound: MessageQueue<String>,
    request_pool: ThreadPool,
    worker_pool: Arc<ThreadPool>,
    send_ids: SendIdGenerator,
    gate: Arc<SlotGate>,
    terminated: Arc<AtomicBool>,
    /// Set once `initialize` has been handled successfully. Any other
    /// request arriving first is rejected with `ServerNotInitialized`;
    /// `exit` and `initialize` itself are exempt.
    initialized: AtomicBool,
    next_outgoing_request_id: AtomicI64,
    /// Lets `&self` methods hand a task closure an owned, `'static` handle
    /// back to the Dispatcher itself without requiring callers to juggle
    /// an explicit `Arc<Dispatcher>` at every call site.
    self_handle: Weak<Dispatcher>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Arc<Self> {
        Arc::new_cyclic(|self_handle| Self {
            inbound: MessageQueue::new(config.inbound_queue_capacity),
            outbound: MessageQueue::new(config.outbound_queue_capacity),
            request_pool: ThreadPool::new("request", config.request_pool_size),
            worker_pool: Arc::new(ThreadPool::new("worker", config.worker_pool_size)),
            send_ids: SendIdGenerator::new(),
            gate: Arc::new(SlotGate::new()),
            terminated: Arc::new(AtomicBool::new(false)),
            initialized: AtomicBool::new(false),
            next_outgoing_request_id: AtomicI64::new(1),
            self_handle: self_handle.clone(),
        })
    }

    fn arc(&self) -> Arc<Dispatcher> {
        self.self_handle
            .upgrade()
            .expect("Dispatcher is always held behind the Arc it was constructed with")
    }

    /// A handle producers can use to feed raw framed payloads in, and an
    /// outbound handle consumers drain framed payloads from. The listener
    /// thread (owned by the caller, typically reading a [`crate::framing::FramedReader`])
    /// pushes here; the writer thread pulls from [`Dispatcher::outbound`].
    pub fn inbound(&self) -> &MessageQueue<String> {
        &self.inbound
    }

    pub fn outbound(&self) -> &MessageQueue<String> {
        &self.outbound
    }

    /// Assigns the next SendId and submits a parse-and-handle task to the
    /// request pool. Never parses inline.
    pub fn accept(&self, raw_message: String, handler: Arc<dyn Handler>) {
        if self.terminated.load(Ordering::SeqCst) {
            return;
        }
        let send_id = self.send_ids.next();
        let dispatcher = self.arc();
        self.request_pool.execute(format!("handle send_id={send_id}"), move || {
            dispatcher.handle(raw_message, send_id, handler);
        });
    }

    /// Runs on a request-pool worker: decodes, classifies, and dispatches
    /// one message end to end. Guarantees the slot is released (via
    /// [`SlotGate::advance_past`]) on
    /// every exit path — including decode failures and missing request
    /// ids — so a stuck `handle` can never deadlock later SendIds.
    fn handle(&self, raw_message: String, send_id: SendId, handler: Arc<dyn Handler>) {
        if self.terminated.load(Ordering::SeqCst) {
            // No slot-watermark bookkeeping needed: every waiter in
            // `wait_for_turn` re-checks `terminated` on each wakeup, so a
            // task abandoned here can never deadlock one behind it.
            return;
        }

        let decoded = codec::decode_envelope(&raw_message);
        let message = match decoded {
            Ok(message) => message,
            Err(error) => {
                warn!(%send_id, %error, "failed to decode inbound message");
                self.send(encode_parse_error_response(&error), send_id);
                return;
            }
        };

        match message {
            Message::Notification { method, params } => {
                self.dispatch_notification(&method, params.as_ref(), &handler);
                // No payload to send; still release the slot.
                self.gate.advance_past(send_id);
            }
            Message::Request { id, method, params } => {
                let outcome = self.dispatch_request(&method, params.as_ref(), &handler);
                let payload = encode_response(id, outcome);
                self.send(payload, send_id);
            }
            Message::Response { .. } => {
                // A response routed back in (e.g., to a server-initiated
                // request) carries no SendId of its own to wait on; it
                // still consumes this inbound slot.
                debug!(%send_id, "received a Response message, ignoring (no outgoing-request correlation registered)");
                self.gate.advance_past(send_id);
            }
        }
    }

    fn dispatch_notification(&self, method: &str, params: Option<&MessageParams>, handler: &Arc<dyn Handler>) {
        match classify_incoming(method) {
            Ok(IncomingMethod::Notification(notification)) => {
                if notification != IncomingNotification::Exit && !self.initialized.load(Ordering::SeqCst) {
                    warn!(%method, "notification received before initialize completed; ignoring");
                    return;
                }
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler.handle_notification(notification, params)
                }));
                if let Err(payload) = outcome {
                    error!(%method, reason = %panic_message(&payload), "handler panicked handling a notification");
                }
            }
            Ok(IncomingMethod::Request(_)) => {
                warn!(%method, "method classified as a request but arrived with no id; dropping");
            }
            Err(error) => warn!(%method, %error, "unrecognized notification method"),
        }
    }

    /// A panic escaping `Handler::handle_request` is caught here rather
    /// than left to the request pool's own `catch_unwind`: that one wraps
    /// the whole `handle` call, which runs after this function returns, so
    /// by the time it catches anything the SendId slot would already be
    /// stuck waiting forever. Catching here keeps the slot-release path
    /// (`send`) on every exit, turning a panic into an `InternalError`
    /// response instead of a deadlock for every later SendId.
    fn dispatch_request(
        &self,
        method: &str,
        params: Option<&MessageParams>,
        handler: &Arc<dyn Handler>,
    ) -> Result<crate::any_value::AnyValue, LspError> {
        match classify_incoming(method)? {
            IncomingMethod::Request(request) => {
                if request != IncomingRequest::Initialize && !self.initialized.load(Ordering::SeqCst) {
                    return Err(LspError::ServerNotInitialized);
                }
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler.handle_request(request, params)
                }));
                let outcome = match outcome {
                    Ok(result) => result,
                    Err(payload) => {
                        let reason = panic_message(&payload);
                        error!(%method, %reason, "handler panicked handling a request");
                        Err(LspError::InternalError(format!("handler panicked: {reason}")))
                    }
                };
                if request == IncomingRequest::Initialize && outcome.is_ok() {
                    self.initialized.store(true, Ordering::SeqCst);
                }
                outcome
            }
            IncomingMethod::Notification(_) => Err(LspError::InvalidRequest(format!(
                "{method} is a notification method but was sent with an id"
            ))),
        }
    }

    /// Waits for this SendId's turn, then enqueues on the outbound queue
    /// and advances the watermark. If
    /// termination wins the wait, nothing is emitted.
    fn send(&self, payload: String, send_id: SendId) {
        if !self.gate.wait_for_turn(send_id, &self.terminated) {
            return;
        }
        if self.outbound.enqueue(payload).is_err() {
            // Outbound queue was cancelled out from under us; nothing left
            // to do but still release the slot below.
        }
        self.gate.advance_past(send_id);
    }

    /// Flips the termination flag, wakes every waiter, cancels both
    /// queues so blocked `enqueue`/`dequeue` calls
    /// return immediately. In-flight tasks observe termination at their
    /// next checkpoint (the slot wait, or the top of `handle`) and abort
    /// without emitting.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
        self.gate.wake_all();
        self.inbound.cancel();
        self.outbound.cancel();
        info!("dispatcher termination requested");
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Builds the [`Outgoing`] handle passed to a `Handler` at
    /// construction so it can emit server-initiated traffic and offload
    /// work to the worker pool, which is available to the Handler but
    /// opaque to the Dispatcher.
    pub fn outgoing(&self) -> Arc<dyn Outgoing> {
        Arc::new(OutgoingHandle { dispatcher: self.arc() })
    }

    /// Drives the listener loop: blocking-dequeue from `inbound`, `accept`
    /// each message, until cancellation or transport EOF. Intended to run
    /// on its own thread; callers feed `inbound()` from a
    /// [`crate::framing::FramedReader`] on a separate reader thread.
    pub fn run_listener(&self, handler: Arc<dyn Handler>) {
        loop {
            if self.terminated.load(Ordering::SeqCst) {
                break;
            }
            match self.inbound.dequeue() {
                Ok(raw_message) => self.accept(raw_message, Arc::clone(&handler)),
                Err(QueueError::Cancelled) => break,
            }
        }
    }
}

struct OutgoingHandle {
    dispatcher: Arc<Dispatcher>,
}

impl Outgoing for OutgoingHandle {
    fn notify(&self, method: OutgoingNotification, params: crate::any_value::AnyValue) {
        let message = Message::Notification {
            method: method.as_str().to_owned(),
            params: params_from_any(params),
        };
        self.enqueue_now(&message);
    }

    fn request(&self, method: OutgoingRequest, params: crate::any_value::AnyValue) -> RequestId {
        let id = RequestId::Int(self.dispatcher.next_outgoing_request_id.fetch_add(1, Ordering::SeqCst));
        let message = Message::Request {
            id: id.clone(),
            method: method.as_str().to_owned(),
            params: params_from_any(params),
        };
        self.enqueue_now(&message);
        id
    }

    fn spawn(&self, description: String, job: Box<dyn FnOnce() + Send + 'static>) {
        self.dispatcher.worker_pool.execute(description, move || job());
    }
}

impl OutgoingHandle {
    fn enqueue_now(&self, message: &Message) {
        if self.dispatcher.terminated.load(Ordering::SeqCst) {
            return;
        }
        match codec::encode_envelope(message) {
            Ok(payload) => {
                if self.dispatcher.outbound.enqueue(payload).is_err() {
                    debug!("outbound queue cancelled while emitting a server-initiated message");
                }
            }
            Err(error) => error!(%error, "failed to encode server-initiated message"),
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

fn params_from_any(value: crate::any_value::AnyValue) -> Option<MessageParams> {
    if value.is_null() {
        return None;
    }
    MessageParams::from_any(value).ok()
}

fn encode_response(id: RequestId, outcome: Result<crate::any_value::AnyValue, LspError>) -> String {
    let message = match outcome {
        Ok(result) => Message::Response {
            id: ResponseId::from(id),
            result: Some(result),
            error: None,
        },
        Err(error) => Message::Response {
            id: ResponseId::from(id),
            result: None,
            error: Some(error),
        },
    };
    codec::encode_envelope(&message).unwrap_or_else(|error| {
        error!(%error, "failed to encode a response that itself failed to encode; emitting a bare InternalError");
        format!(
            r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"failed to encode response"}}}}"#,
            crate::error::code::INTERNAL_ERROR
        )
    })
}

/// A parse error leaves no recoverable request id, so the
/// response id is `Null` rather than tied to any SendId's originating
/// request.
fn encode_parse_error_response(error: &LspError) -> String {
    let message = Message::Response {
        id: ResponseId::Null,
        result: None,
        error: Some(error.clone()),
    };
    codec::encode_envelope(&message).unwrap_or_else(|_| {
        format!(
            r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"parse error"}}}}"#,
            crate::error::code::PARSE_ERROR
        )
    })
}

#[cfg(test)]
mod test {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::time::Duration;

    use super::*;
    use crate::handler::test::EchoHandler;

    fn dispatcher(request_pool_size: usize) -> Arc<Dispatcher> {
        Dispatcher::new(DispatcherConfig {
            request_pool_size,
            worker_pool_size: 1,
            inbound_queue_capacity: 0,
            outbound_queue_capacity: 0,
        })
    }

    #[test]
    fn initialize_flow_produces_matching_response() {
        let dispatcher = self::dispatcher(1);
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: Arc::new(AtomicUsize::new(0)),
        });

        let raw = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"capabilities":{}}}"#.to_owned();
        dispatcher.accept(raw, handler);

        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains(r#""id":1"#));
        assert!(response.contains("result"));
    }

    #[test]
    fn notification_releases_its_slot_without_emitting() {
        let dispatcher = self::dispatcher(1);
        let seen = Arc::new(AtomicUsize::new(0));
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: seen.clone(),
        });

        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#.to_owned(), handler.clone());
        let init_response = dispatcher.outbound().dequeue().unwrap();
        assert!(init_response.contains(r#""id":1"#));

        dispatcher.accept(r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#.to_owned(), handler.clone());
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#.to_owned(), handler);

        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains(r#""id":2"#));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn responses_emit_in_send_id_order_even_when_handlers_finish_out_of_order() {
        // A handler that blocks on request 1 until request 2 has definitely
        // been submitted, simulating a slow id=1 racing a fast id=2.
        struct ReorderingHandler {
            barrier: Arc<Barrier>,
        }
        impl Handler for ReorderingHandler {
            fn handle_request(&self, method: IncomingRequest, params: Option<&MessageParams>) -> Result<crate::any_value::AnyValue, LspError> {
                if method == IncomingRequest::Initialize {
                    self.barrier.wait();
                    thread::sleep(Duration::from_millis(20));
                }
                Ok(params.map(|p| p.clone().into_any()).unwrap_or(crate::any_value::AnyValue::Null))
            }
            fn handle_notification(&self, _method: IncomingNotification, _params: Option<&MessageParams>) {}
        }

        let dispatcher = self::dispatcher(2);
        let barrier = Arc::new(Barrier::new(2));
        let handler: Arc<dyn Handler> = Arc::new(ReorderingHandler { barrier: barrier.clone() });

        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#.to_owned(), handler.clone());
        barrier.wait();
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#.to_owned(), handler);

        let first = dispatcher.outbound().dequeue().unwrap();
        let second = dispatcher.outbound().dequeue().unwrap();
        assert!(first.contains(r#""id":1"#));
        assert!(second.contains(r#""id":2"#));
    }

    #[test]
    fn panicking_handler_still_releases_the_slot_for_a_later_send_id() {
        struct PanickingHandler;
        impl Handler for PanickingHandler {
            fn handle_request(&self, _method: IncomingRequest, _params: Option<&MessageParams>) -> Result<crate::any_value::AnyValue, LspError> {
                panic!("handler blew up");
            }
            fn handle_notification(&self, _method: IncomingNotification, _params: Option<&MessageParams>) {}
        }

        let dispatcher = self::dispatcher(2);
        let handler: Arc<dyn Handler> = Arc::new(PanickingHandler);

        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_owned(), handler.clone());
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#.to_owned(), handler);

        let first = dispatcher.outbound().dequeue().unwrap();
        let second = dispatcher.outbound().dequeue().unwrap();
        assert!(first.contains(r#""id":1"#));
        assert!(first.contains("-32603"));
        assert!(second.contains(r#""id":2"#));
        assert!(second.contains("-32603"));
    }

    #[test]
    fn panicking_notification_handler_still_unblocks_a_later_send_id() {
        struct PanickingNotifyHandler;
        impl Handler for PanickingNotifyHandler {
            fn handle_request(&self, _method: IncomingRequest, params: Option<&MessageParams>) -> Result<crate::any_value::AnyValue, LspError> {
                Ok(params.map(|p| p.clone().into_any()).unwrap_or(crate::any_value::AnyValue::Null))
            }
            fn handle_notification(&self, _method: IncomingNotification, _params: Option<&MessageParams>) {
                panic!("notification handler blew up");
            }
        }

        let dispatcher = self::dispatcher(2);
        let handler: Arc<dyn Handler> = Arc::new(PanickingNotifyHandler);

        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_owned(), handler.clone());
        dispatcher.outbound().dequeue().unwrap();

        dispatcher.accept(r#"{"jsonrpc":"2.0","method":"initialized"}"#.to_owned(), handler.clone());
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#.to_owned(), handler);

        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains(r#""id":2"#));
    }

    #[test]
    fn request_before_initialize_is_server_not_initialized() {
        let dispatcher = self::dispatcher(1);
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: Arc::new(AtomicUsize::new(0)),
        });
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#.to_owned(), handler);
        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains("-32002"));
        assert!(!dispatcher.is_initialized());
    }

    #[test]
    fn initialize_then_other_requests_succeed() {
        let dispatcher = self::dispatcher(1);
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: Arc::new(AtomicUsize::new(0)),
        });
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#.to_owned(), handler.clone());
        let first = dispatcher.outbound().dequeue().unwrap();
        assert!(first.contains(r#""id":1"#));
        assert!(dispatcher.is_initialized());

        dispatcher.accept(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#.to_owned(), handler);
        let second = dispatcher.outbound().dequeue().unwrap();
        assert!(second.contains(r#""id":2"#));
        assert!(!second.contains("-32002"));
    }

    #[test]
    fn notification_before_initialize_is_dropped_without_reaching_the_handler() {
        let dispatcher = self::dispatcher(1);
        let seen = Arc::new(AtomicUsize::new(0));
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: seen.clone(),
        });
        dispatcher.accept(r#"{"jsonrpc":"2.0","method":"textDocument/didOpen","params":{}}"#.to_owned(), handler.clone());
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#.to_owned(), handler);
        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains(r#""id":1"#));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_required_parameter_surfaces_invalid_params() {
        let dispatcher = self::dispatcher(1);
        struct PickyHandler;
        impl Handler for PickyHandler {
            fn handle_request(&self, _method: IncomingRequest, params: Option<&MessageParams>) -> Result<crate::any_value::AnyValue, LspError> {
                crate::codec::params_to::<lsp_types::TextDocumentPositionParams>("DefinitionParams", params)
                    .map(|_| crate::any_value::AnyValue::Null)
            }
            fn handle_notification(&self, _method: IncomingNotification, _params: Option<&MessageParams>) {}
        }
        let handler: Arc<dyn Handler> = Arc::new(PickyHandler);
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_owned(), handler.clone());
        dispatcher.outbound().dequeue().unwrap();

        let raw = r#"{"jsonrpc":"2.0","id":9,"method":"textDocument/definition","params":{"textDocument":{"uri":"file:///a.rs"}}}"#.to_owned();
        dispatcher.accept(raw, handler);

        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains("-32602"));
        assert!(response.contains("position"));
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let dispatcher = self::dispatcher(1);
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: Arc::new(AtomicUsize::new(0)),
        });
        dispatcher.accept(
            r#"{"jsonrpc":"2.0","id":1,"method":"textDocument/frobnicate"}"#.to_owned(),
            handler,
        );
        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains("-32601"));
    }

    #[test]
    fn malformed_json_gets_a_null_id_parse_error() {
        let dispatcher = self::dispatcher(1);
        let handler: Arc<dyn Handler> = Arc::new(EchoHandler {
            notifications_seen: Arc::new(AtomicUsize::new(0)),
        });
        dispatcher.accept("{not json".to_owned(), handler);
        let response = dispatcher.outbound().dequeue().unwrap();
        assert!(response.contains(r#""id":null"#));
        assert!(response.contains("-32700"));
    }

    #[test]
    fn terminate_unblocks_a_waiter_stuck_on_its_slot() {
        // id=1 never arrives; id=2's `send` should block in wait_for_turn
        // until terminate() wakes it.
        let dispatcher = self::dispatcher(2);
        let entered = Arc::new(Barrier::new(2));

        struct BlockingFirstHandler {
            entered: Arc<Barrier>,
        }
        impl Handler for BlockingFirstHandler {
            fn handle_request(&self, _method: IncomingRequest, _params: Option<&MessageParams>) -> Result<crate::any_value::AnyValue, LspError> {
                self.entered.wait();
                thread::sleep(Duration::from_millis(500));
                Ok(crate::any_value::AnyValue::Null)
            }
            fn handle_notification(&self, _method: IncomingNotification, _params: Option<&MessageParams>) {}
        }

        let handler: Arc<dyn Handler> = Arc::new(BlockingFirstHandler { entered: entered.clone() });
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_owned(), handler.clone());
        entered.wait();
        dispatcher.accept(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#.to_owned(), handler);

        thread::sleep(Duration::from_millis(20));
        dispatcher.terminate();

        // Neither response should ever appear; give both tasks a moment to
        // observe termination and confirm the outbound queue stays empty.
        thread::sleep(Duration::from_millis(600));
        assert!(dispatcher.outbound().is_empty());
    }
}
