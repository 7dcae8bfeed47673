// Frameworks layer: configuration, tracing and the terminal event loop.

pub mod config;
pub mod terminal;
