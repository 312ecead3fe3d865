//! AI-assisted features.
//!
//! Every feature follows the same flow: check the request against the
//! dataset, assemble a prompt, invoke the completion service with a closed
//! JSON Schema, then join the identifiers in the reply back to records.
//! Each feature supplies only the parts that differ through
//! [`AssistantTask`]; [`run_task`] drives the flow.

mod compare;
mod drying_advice;
mod faq_search;
mod match_campsites;
mod packing_list;
mod plan_trip;
mod seo_copy;
mod trail_fitness;

pub use compare::{Compare, CompareRequest, CompareResponse};
pub use drying_advice::{DryingAdvice, DryingAdviceRequest, DryingAdviceResponse};
pub use faq_search::{FaqSearch, FaqSearchRequest, FaqSearchResponse};
pub use match_campsites::{MatchCampsites, MatchCampsitesRequest, MatchCampsitesResponse};
pub use packing_list::{PackingList, PackingListRequest, PackingListResponse};
pub use plan_trip::{PlanTrip, PlanTripRequest, PlanTripResponse};
pub use seo_copy::{SeoCopy, SeoCopyRequest, SeoCopyResponse};
pub use trail_fitness::{TrailFitness, TrailFitnessRequest, TrailFitnessResponse};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dataset::Dataset;
use crate::llm::{TaskError, TaskInvoker, TaskSchema};
use crate::models::Entity;

/// Shared, read-only inputs available to every task.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub dataset: &'a Dataset,
    /// Human-readable region name used in prompts.
    pub region: &'a str,
    /// Character budget for each dataset excerpt in a prompt.
    pub max_context_chars: usize,
}

/// The two messages sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// One AI-assisted feature.
pub trait AssistantTask: Send + Sync + 'static {
    /// JSON body accepted from the caller.
    type Request: DeserializeOwned + Send + Sync;
    /// Typed twin of [`schema`](Self::schema).
    type Reply: DeserializeOwned;
    /// JSON body returned to the caller.
    type Response: Serialize + Send;

    /// Schema name sent to the provider.
    const NAME: &'static str;

    fn schema() -> Value;

    /// Validate the request and build the prompt.
    ///
    /// Runs before any network call, so every missing field or dangling
    /// reference must be reported here.
    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError>;

    /// Turn a validated reply into the response, resolving identifiers.
    fn respond(request: &Self::Request, reply: Self::Reply, ctx: &TaskContext<'_>)
        -> Self::Response;
}

/// Run one task end to end.
pub async fn run_task<T: AssistantTask>(
    invoker: &TaskInvoker,
    ctx: &TaskContext<'_>,
    request: &T::Request,
) -> Result<T::Response, TaskError> {
    let prompt = T::prepare(request, ctx)?;
    let schema = TaskSchema::new(T::NAME, T::schema())?;

    debug!(
        "Task '{}' prompt: {} system chars, {} user chars",
        T::NAME,
        prompt.system.len(),
        prompt.user.len()
    );

    let reply: T::Reply = invoker
        .invoke_typed(&prompt.system, &prompt.user, &schema)
        .await?;

    Ok(T::respond(request, reply, ctx))
}

/// Minimal reference to a record, for responses that only need to name it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl EntitySummary {
    pub fn of<T: Entity>(entity: &T) -> Self {
        Self {
            id: entity.id().to_string(),
            name: entity.name().to_string(),
            slug: entity.slug().to_string(),
        }
    }
}

/// Trimmed value of a required text field.
pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, TaskError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(TaskError::InvalidRequest(message.to_string())),
    }
}

/// Trimmed value of an optional text field, `None` when blank.
pub(crate) fn optional(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Render a list for a prompt, or `fallback` when empty.
pub(crate) fn list_or(items: &[String], fallback: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}
