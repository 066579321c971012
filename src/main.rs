//! A thin demonstration binary: wires [`lsp_core::Dispatcher`] to a stdio
//! [`lsp_core::framing`] transport and a minimal stub [`lsp_core::Handler`].
//! This is not a language-analysis layer — it only proves the core runs
//! end to end. A real server links `lsp-core` as a library and supplies
//! its own `Handler`.

use std::io::{stdin, stdout};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use lsp_core::any_value::AnyValue;
use lsp_core::codec;
use lsp_core::config::Config;
use lsp_core::dispatcher::{Dispatcher, DispatcherConfig};
use lsp_core::error::LspError;
use lsp_core::framing::{FramedReader, FramedWriter, FramingError};
use lsp_core::handler::{Handler, Outgoing};
use lsp_core::logging;
use lsp_core::message::MessageParams;
use lsp_core::queue::QueueError;
use lsp_core::schema::{IncomingNotification, IncomingRequest};
use tracing::{debug, error, info, warn};

/// CLI surface for the demo binary, following the pack's `clap`-derive
/// convention for repeatable verbosity flags.
#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = "Demonstration stdio host for lsp-core's Dispatcher")]
struct Args {
    /// Increase log verbosity; repeatable (`-v`, `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Override the request pool's worker count.
    #[arg(long)]
    request_pool_size: Option<usize>,

    /// Override the worker pool's worker count.
    #[arg(long)]
    worker_pool_size: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = Config::default();
    if let Some(size) = args.request_pool_size {
        config.request_pool_size = size;
    }
    if let Some(size) = args.worker_pool_size {
        config.worker_pool_size = size;
    }

    let dispatcher = Dispatcher::new(DispatcherConfig::from(&config));
    let handler: Arc<dyn Handler> = Arc::new(StubHandler {
        outgoing: dispatcher.outgoing(),
        dispatcher: dispatcher.clone(),
    });

    info!(
        request_pool_size = config.request_pool_size,
        worker_pool_size = config.worker_pool_size,
        "starting lsp-core demo server on stdio"
    );

    let writer = {
        let dispatcher = dispatcher.clone();
        thread::Builder::new().name("outbound-writer".into()).spawn(move || {
            let mut writer = FramedWriter::new(stdout());
            loop {
                match dispatcher.outbound().dequeue() {
                    Ok(payload) => {
                        if let Err(error) = writer.write_message(&payload) {
                            error!(%error, "failed to write a framed message to stdout");
                            dispatcher.terminate();
                            break;
                        }
                    }
                    Err(QueueError::Cancelled) => break,
                }
            }
        })?
    };

    let reader = {
        let dispatcher = dispatcher.clone();
        thread::Builder::new().name("inbound-reader".into()).spawn(move || {
            let mut reader = FramedReader::new(stdin());
            loop {
                match reader.read_message() {
                    Ok(raw) => {
                        if dispatcher.inbound().enqueue(raw).is_err() {
                            break;
                        }
                    }
                    Err(FramingError::Eof) => {
                        debug!("stdin closed cleanly, terminating");
                        dispatcher.terminate();
                        break;
                    }
                    Err(error) => {
                        warn!(%error, "framing error reading stdin, terminating");
                        dispatcher.terminate();
                        break;
                    }
                }
            }
        })?
    };

    dispatcher.run_listener(handler);

    let _ = reader.join();
    let _ = writer.join();
    Ok(())
}

/// Just enough `Handler` to answer the handshake and prove the Dispatcher
/// runs end to end; every other request method errors with `InternalError`
/// naming itself as unimplemented, rather than silently returning a
/// plausible-looking empty result.
struct StubHandler {
    #[allow(dead_code)]
    outgoing: Arc<dyn Outgoing>,
    dispatcher: Arc<Dispatcher>,
}

impl Handler for StubHandler {
    fn handle_request(&self, method: IncomingRequest, params: Option<&MessageParams>) -> Result<AnyValue, LspError> {
        match method {
            IncomingRequest::Initialize => {
                let params: lsp_types::InitializeParams = codec::params_to("InitializeParams", params)?;
                debug!(?params.client_info, "initialize received");
                let result = lsp_types::InitializeResult {
                    capabilities: lsp_types::ServerCapabilities {
                        text_document_sync: Some(lsp_types::TextDocumentSyncCapability::Kind(
                            lsp_types::TextDocumentSyncKind::FULL,
                        )),
                        ..Default::default()
                    },
                    server_info: Some(lsp_types::ServerInfo {
                        name: "lsp-core-demo".to_owned(),
                        version: Some(env!("CARGO_PKG_VERSION").to_owned()),
                    }),
                };
                codec::to_any(&result)
            }
            IncomingRequest::Shutdown => Ok(AnyValue::Null),
            other => Err(LspError::InternalError(format!(
                "{other} is not implemented by the demo handler"
            ))),
        }
    }

    fn handle_notification(&self, method: IncomingNotification, _params: Option<&MessageParams>) {
        match method {
            IncomingNotification::Exit => {
                info!("exit received, terminating dispatcher");
                self.dispatcher.terminate();
            }
            IncomingNotification::Initialized => info!("client finished initialization"),
            other => debug!(%other, "notification ignored by the demo handler"),
        }
    }
}
