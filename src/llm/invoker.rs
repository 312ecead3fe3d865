//! The one place a task reaches the completion service.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::{CompletionBackend, CompletionRequest, TaskError, TaskSchema};

/// Sends prompts to a backend and validates what comes back.
#[derive(Clone)]
pub struct TaskInvoker {
    backend: Arc<dyn CompletionBackend>,
}

impl TaskInvoker {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_label(&self) -> String {
        self.backend.label()
    }

    /// Run one completion and return a reply that conforms to `schema`.
    ///
    /// Blank prompts are rejected before any network call. The reply is
    /// parsed and validated locally even though the provider was asked to
    /// honour the schema.
    pub async fn invoke(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &TaskSchema,
    ) -> Result<Value, TaskError> {
        if system_prompt.trim().is_empty() {
            return Err(TaskError::InvalidRequest(
                "System prompt is required".to_string(),
            ));
        }
        if user_message.trim().is_empty() {
            return Err(TaskError::InvalidRequest(
                "User message is required".to_string(),
            ));
        }

        info!("Invoking '{}' via {}", schema.name(), self.backend.label());
        let started = Instant::now();

        let content = self
            .backend
            .complete(CompletionRequest {
                system_prompt,
                user_message,
                schema,
            })
            .await?;

        let value = parse_reply(&content)?;
        schema.validate(&value)?;

        debug!(
            "'{}' answered in {}ms",
            schema.name(),
            started.elapsed().as_millis()
        );
        Ok(value)
    }

    /// Like [`invoke`](Self::invoke), then deserialize into the paired type.
    pub async fn invoke_typed<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &TaskSchema,
    ) -> Result<T, TaskError> {
        let value = self.invoke(system_prompt, user_message, schema).await?;
        serde_json::from_value(value).map_err(|e| {
            TaskError::MalformedResponse(format!(
                "reply does not fit '{}': {}",
                schema.name(),
                e
            ))
        })
    }
}

/// Parse reply content as JSON, tolerating a surrounding code fence.
fn parse_reply(content: &str) -> Result<Value, TaskError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced)
        .map_err(|e| TaskError::MalformedResponse(format!("content is not JSON: {}", e)))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend that counts calls.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    pub struct ScriptedBackend {
        reply: Result<String, fn(String) -> TaskError>,
        calls: AtomicUsize,
        last_system_prompt: Mutex<Option<String>>,
    }

    impl ScriptedBackend {
        /// Always answer with `content`.
        pub fn replying(content: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(content.into()),
                calls: AtomicUsize::new(0),
                last_system_prompt: Mutex::new(None),
            })
        }

        /// Always answer with `reply` serialized.
        pub fn replying_json(reply: Value) -> Arc<Self> {
            Self::replying(reply.to_string())
        }

        /// Always fail with the given error kind.
        pub fn failing(kind: fn(String) -> TaskError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(kind),
                calls: AtomicUsize::new(0),
                last_system_prompt: Mutex::new(None),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_system_prompt(&self) -> Option<String> {
            self.last_system_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        fn label(&self) -> String {
            "scripted".to_string()
        }

        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TaskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system_prompt.lock().unwrap() = Some(request.system_prompt.to_string());
            match &self.reply {
                Ok(content) => Ok(content.clone()),
                Err(kind) => Err(kind("scripted failure".to_string())),
            }
        }
    }
}
