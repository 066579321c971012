//! `tracing` initialization: write to the file named by `LOG_FILE`
//! when set, otherwise stderr (stdout is reserved for the LSP wire
//! protocol itself). A repeatable `-v` flag raises the filter level past
//! whatever `RUST_LOG` alone would give, since a multi-threaded dispatcher
//! like this one is diagnosed from logs, not a debugger attached to one
//! thread.

use std::env;
use std::fs::File;
use std::io;

use tracing_subscriber::EnvFilter;

/// `verbosity` is typically a repeated `-v` CLI flag's count: `0` leaves
/// `RUST_LOG` (or the default `info`) alone, `1` forces `debug`, `2+`
/// forces `trace`.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var("LOG_FILE").map(File::create) {
        Ok(Ok(log_file)) => builder.with_writer(log_file).init(),
        _ => builder.with_writer(io::stderr).init(),
    }
}
