//! Damp and drying advice for accommodation providers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{optional, required, AssistantTask, EntitySummary, Prompt, TaskContext};
use crate::llm::TaskError;

/// Campsites with drying rooms shown as examples.
const EXAMPLE_CAMPSITES: usize = 3;

pub struct DryingAdvice;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DryingAdviceRequest {
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub guest_count: Option<u32>,
    #[serde(default)]
    pub main_issue: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DryingAdviceReply {
    assessment: String,
    ventilation: Vec<String>,
    drying_area: Vec<String>,
    equipment: Vec<String>,
    quick_wins: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DryingAdviceResponse {
    pub assessment: String,
    pub ventilation: Vec<String>,
    pub drying_area: Vec<String>,
    pub equipment: Vec<String>,
    pub quick_wins: Vec<String>,
    /// Local campsites that already run a drying room.
    pub examples: Vec<EntitySummary>,
}

fn advice_list(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

impl AssistantTask for DryingAdvice {
    type Request = DryingAdviceRequest;
    type Reply = DryingAdviceReply;
    type Response = DryingAdviceResponse;

    const NAME: &'static str = "drying_advice_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "assessment": { "type": "string", "description": "Analysis of their situation (2-3 sentences)" },
                "ventilation": advice_list("Airflow recommendations"),
                "drying_area": advice_list("How to set up an effective drying space"),
                "equipment": advice_list("Dehumidifiers, heaters or air movers suited to the budget"),
                "quick_wins": advice_list("Low-cost improvements they can make today")
            },
            "required": ["assessment", "ventilation", "drying_area", "equipment", "quick_wins"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let message = "property_type and main_issue are required";
        let property_type = required(&request.property_type, message)?;
        let main_issue = required(&request.main_issue, message)?;

        let system = format!(
            "You are an expert in drying solutions for accommodation providers around {region}. \
             Give practical, actionable advice for managing damp and wet gear.\n\n\
             Consider the local climate:\n\
             - Frequent rain year-round\n\
             - High humidity, especially near water\n\
             - Guests often arrive with wet hiking gear, boots and clothing\n\
             - Condensation is a major concern in pods and caravans\n\n\
             Keep each list item short and specific. Tailor advice to the property type and budget.",
            region = ctx.region,
        );

        let user = format!(
            "Property type: {}\nSize/capacity: {}\nGuest count: {}\nMain issue: {}\nBudget level: {}",
            property_type,
            optional(&request.size).unwrap_or("Not specified"),
            request
                .guest_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
            main_issue,
            optional(&request.budget).unwrap_or("medium"),
        );

        Ok(Prompt { system, user })
    }

    fn respond(
        _request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        let examples = ctx
            .dataset
            .campsites()
            .iter()
            .filter(|c| c.has_drying_room())
            .take(EXAMPLE_CAMPSITES)
            .map(EntitySummary::of)
            .collect();

        DryingAdviceResponse {
            assessment: reply.assessment,
            ventilation: reply.ventilation,
            drying_area: reply.drying_area,
            equipment: reply.equipment,
            quick_wins: reply.quick_wins,
            examples,
        }
    }
}
