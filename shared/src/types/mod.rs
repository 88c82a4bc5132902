//! Type definitions module
//!
//! - `language` - Language selection for client-facing messages
//! - `response` - Response envelope and structured error details

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{ErrorDetail, ResponseEnvelope};
