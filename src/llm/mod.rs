//! Schema-constrained completions.
//!
//! A [`TaskInvoker`] sends one system prompt plus one user message to a
//! [`CompletionBackend`] and returns a JSON value that has been checked
//! against a [`TaskSchema`] before anything downstream trusts it.

mod client;
mod error;
mod invoker;
mod schema;

pub use client::{CompletionBackend, CompletionRequest, LlmClient, LlmConfig, LlmProvider};
pub use error::TaskError;
pub use invoker::TaskInvoker;
pub use schema::TaskSchema;

#[cfg(test)]
pub(crate) use invoker::testing;
