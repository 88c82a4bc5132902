//! Middleware applied to every route

pub mod recovery;

pub use recovery::Recovery;
