//! Request and response bodies

pub mod sms;

pub use sms::{SendCodeRequest, VerifyCodeRequest, VerifyCodeResponse};
