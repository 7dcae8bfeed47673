// Use cases layer: admin session and console workflows.

pub mod console;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use console::{Console, ConsoleView, Notice};
pub use session::AdminSession;
