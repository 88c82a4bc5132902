//! HTTP layer of the SMS verification code service

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod validation;
