//! Seasonal packing lists.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{list_or, optional, AssistantTask, Prompt, TaskContext};
use crate::llm::TaskError;

pub struct PackingList;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackingListRequest {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub trip_style: Option<String>,
    #[serde(default)]
    pub party_type: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingSection {
    pub category: String,
    pub items: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingListResponse {
    pub sections: Vec<PackingSection>,
    pub tips: Vec<String>,
}

impl AssistantTask for PackingList {
    type Request = PackingListRequest;
    type Reply = PackingListResponse;
    type Response = PackingListResponse;

    const NAME: &'static str = "packing_list_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "category": { "type": "string" },
                            "items": { "type": "array", "items": { "type": "string" } },
                            "note": { "type": ["string", "null"], "description": "Optional advice for this category" }
                        },
                        "required": ["category", "items", "note"],
                        "additionalProperties": false
                    }
                },
                "tips": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["sections", "tips"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let when = match (optional(&request.month), optional(&request.season)) {
            (Some(month), Some(season)) => format!("{} ({})", month, season),
            (Some(month), None) => month.to_string(),
            (None, Some(season)) => season.to_string(),
            (None, None) => {
                return Err(TaskError::InvalidRequest(
                    "season or month is required".to_string(),
                ))
            }
        };

        let system = format!(
            "You are an experienced outdoor guide for {region}. Write practical packing lists for camping trips.\n\n\
             Group items into a few clear categories (core camping gear, clothing, moisture and drying, \
             food and cooking, safety). Use the note field for advice that applies to a whole category, \
             otherwise null. Keep lists specific to the conditions: rain, wind, midges and cold nights \
             are all common. Finish with a handful of short tips.",
            region = ctx.region,
        );

        let user = format!(
            "When: {}\nTrip style: {}\nParty: {}\nActivities: {}",
            when,
            optional(&request.trip_style).unwrap_or("not specified"),
            optional(&request.party_type).unwrap_or("not specified"),
            list_or(&request.activities, "general camping"),
        );

        Ok(Prompt { system, user })
    }

    fn respond(
        _request: &Self::Request,
        reply: Self::Reply,
        _ctx: &TaskContext<'_>,
    ) -> Self::Response {
        reply
    }
}
