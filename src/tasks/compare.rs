//! Side-by-side comparison of two or three campsites or trails.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{required, AssistantTask, EntitySummary, Prompt, TaskContext};
use crate::dataset::{Dataset, Record};
use crate::llm::TaskError;
use crate::models::{Campsite, Trail};
use crate::prompt::{PromptBlock, BLOCK_SEPARATOR};

const MIN_ITEMS: usize = 2;
const MAX_ITEMS: usize = 3;

pub struct Compare;

/// What is being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareKind {
    Campsite,
    Trail,
}

impl CompareKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campsite => "campsite",
            Self::Trail => "trail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "campsite" | "campsites" => Some(Self::Campsite),
            "trail" | "trails" => Some(Self::Trail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectValue {
    pub id: String,
    pub value: String,
    pub winner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub aspect: String,
    pub items: Vec<AspectValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestFor {
    pub id: String,
    pub suits: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareReply {
    narrative: String,
    comparison_points: Vec<ComparisonPoint>,
    best_for: Vec<BestFor>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub narrative: String,
    pub comparison_points: Vec<ComparisonPoint>,
    pub best_for: Vec<BestFor>,
    pub items: Vec<EntitySummary>,
}

impl CompareRequest {
    fn parsed_kind(&self) -> Result<CompareKind, TaskError> {
        let kind = required(&self.kind, "type and ids (array of 2-3) are required")?;
        CompareKind::from_str(kind)
            .ok_or_else(|| TaskError::InvalidRequest(format!("Invalid type '{}'", kind)))
    }

    fn trimmed_ids(&self) -> Vec<&str> {
        self.ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Look up every id, failing on the first one that is missing.
fn resolve<'a, T: Record>(dataset: &'a Dataset, ids: &[&str]) -> Result<Vec<&'a T>, TaskError> {
    ids.iter()
        .map(|id| {
            dataset.find::<T>(id).ok_or_else(|| {
                TaskError::NotFound(format!("{} '{}' not found", T::KIND.as_str(), id))
            })
        })
        .collect()
}

fn summaries(kind: CompareKind, ids: &[&str], dataset: &Dataset) -> Vec<EntitySummary> {
    match kind {
        CompareKind::Campsite => resolve::<Campsite>(dataset, ids)
            .map(|items| items.into_iter().map(EntitySummary::of).collect())
            .unwrap_or_default(),
        CompareKind::Trail => resolve::<Trail>(dataset, ids)
            .map(|items| items.into_iter().map(EntitySummary::of).collect())
            .unwrap_or_default(),
    }
}

impl AssistantTask for Compare {
    type Request = CompareRequest;
    type Reply = CompareReply;
    type Response = CompareResponse;

    const NAME: &'static str = "compare_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "narrative": { "type": "string", "description": "Short comparison narrative (2-3 sentences)" },
                "comparison_points": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "aspect": { "type": "string" },
                            "items": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "id": { "type": "string" },
                                        "value": { "type": "string" },
                                        "winner": { "type": "boolean" }
                                    },
                                    "required": ["id", "value", "winner"],
                                    "additionalProperties": false
                                }
                            }
                        },
                        "required": ["aspect", "items"],
                        "additionalProperties": false
                    }
                },
                "best_for": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "suits": { "type": "string" }
                        },
                        "required": ["id", "suits"],
                        "additionalProperties": false
                    },
                    "description": "Who each option is best suited for"
                }
            },
            "required": ["narrative", "comparison_points", "best_for"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let kind = request.parsed_kind()?;
        let ids = request.trimmed_ids();

        if ids.len() < MIN_ITEMS {
            return Err(TaskError::InvalidRequest(
                "type and ids (array of 2-3) are required".to_string(),
            ));
        }
        if ids.len() > MAX_ITEMS {
            return Err(TaskError::InvalidRequest(format!(
                "Maximum {} items can be compared",
                MAX_ITEMS
            )));
        }
        let distinct: HashSet<&str> = ids.iter().copied().collect();
        if distinct.len() != ids.len() {
            return Err(TaskError::InvalidRequest(
                "ids must be distinct".to_string(),
            ));
        }

        let blocks: Vec<String> = match kind {
            CompareKind::Campsite => resolve::<Campsite>(ctx.dataset, &ids)?
                .into_iter()
                .map(|item| item.prompt_block())
                .collect(),
            CompareKind::Trail => resolve::<Trail>(ctx.dataset, &ids)?
                .into_iter()
                .map(|item| item.prompt_block())
                .collect(),
        };

        let system = format!(
            "You are helping campers compare {kind}s around {region}.\n\n\
             Compare these {kind}s:\n\n{items}\n\n\
             Provide:\n\
             1. A narrative comparison (2-3 sentences, conversational)\n\
             2. Key comparison points (price, facilities, location, etc.)\n\
             3. Who each option is best suited for\n\n\
             Refer to each {kind} by its exact ID. Be practical and focus on tangible differences.",
            kind = kind.as_str(),
            region = ctx.region,
            items = blocks.join(BLOCK_SEPARATOR),
        );
        let user = format!(
            "Compare these {} {}s and tell me the key differences.",
            ids.len(),
            kind.as_str()
        );

        Ok(Prompt { system, user })
    }

    fn respond(
        request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        let ids = request.trimmed_ids();
        let compared: HashSet<&str> = ids.iter().copied().collect();
        let items = match request.parsed_kind() {
            Ok(kind) => summaries(kind, &ids, ctx.dataset),
            Err(_) => Vec::new(),
        };

        let comparison_points = reply
            .comparison_points
            .into_iter()
            .map(|point| ComparisonPoint {
                aspect: point.aspect,
                items: point
                    .items
                    .into_iter()
                    .filter(|item| compared.contains(item.id.trim()))
                    .collect(),
            })
            .filter(|point| !point.items.is_empty())
            .collect();

        let best_for = reply
            .best_for
            .into_iter()
            .filter(|entry| compared.contains(entry.id.trim()))
            .collect();

        CompareResponse {
            narrative: reply.narrative,
            comparison_points,
            best_for,
            items,
        }
    }
}
