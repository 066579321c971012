//! Static enumerations of LSP 3.17 methods and enums; name↔string-or-integer
//! value maps. Immutable after process start — no synchronization is
//! needed to read them.

pub mod enums;
pub mod error_codes;
pub mod methods;

pub use enums::*;
pub use error_codes::{ErrorCodes, LspErrorCodes};
pub use methods::{classify_incoming, IncomingMethod, IncomingNotification, IncomingRequest, OutgoingNotification, OutgoingRequest};
