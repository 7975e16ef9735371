//! Handlers for the streaming binding

pub mod calls;
pub mod stream;
