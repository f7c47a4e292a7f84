//! Request middleware.
//!
//! [`Trace`] scopes a correlation identifier around each request.

pub mod trace;

pub use trace::Trace;
