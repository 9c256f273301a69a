//! V1 API handlers.

mod system;
mod todos;

#[cfg(test)]
mod system_test;

pub use system::*;
pub use todos::*;
