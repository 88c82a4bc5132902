//! Response rendering and error mapping at the HTTP boundary

pub mod response;

pub use response::{
    domain_error_envelope, extract_language, json_error_handler, not_found, respond,
};
