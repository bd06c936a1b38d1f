//! Connection accept loop.

pub mod listener;
