//! Day-by-day itineraries.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{list_or, optional, required, AssistantTask, Prompt, TaskContext};
use crate::dataset::{enrich, JoinKey};
use crate::llm::TaskError;
use crate::models::{Campsite, Extra, Trail};
use crate::prompt::context_for;

const MAX_TRIP_DAYS: u32 = 14;

pub struct PlanTrip;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanTripRequest {
    #[serde(default, alias = "origin_city")]
    pub origin: Option<String>,
    #[serde(default)]
    pub trip_length_days: Option<u32>,
    #[serde(default)]
    pub travel_style: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub party_type: Option<String>,
}

impl PlanTripRequest {
    fn days(&self) -> Result<u32, TaskError> {
        match self.trip_length_days {
            Some(days) if (1..=MAX_TRIP_DAYS).contains(&days) => Ok(days),
            Some(_) => Err(TaskError::InvalidRequest(format!(
                "trip_length_days must be between 1 and {}",
                MAX_TRIP_DAYS
            ))),
            None => Err(TaskError::InvalidRequest(
                "origin and trip_length_days are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlannedDay {
    day: u32,
    title: String,
    description: String,
    campsite_ids: Vec<String>,
    trail_ids: Vec<String>,
    extra_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlanTripReply {
    summary: String,
    days: Vec<PlannedDay>,
    packing_tips: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub description: String,
    pub campsites: Vec<Campsite>,
    pub trails: Vec<Trail>,
    pub extras: Vec<Extra>,
}

#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    pub summary: String,
    pub days: Vec<ItineraryDay>,
    pub packing_tips: Vec<String>,
}

fn id_list(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

impl AssistantTask for PlanTrip {
    type Request = PlanTripRequest;
    type Reply = PlanTripReply;
    type Response = PlanTripResponse;

    const NAME: &'static str = "trip_plan_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string", "description": "One paragraph overview of the trip" },
                "days": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "day": { "type": "integer" },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "campsite_ids": id_list("Campsite IDs for tonight's stay"),
                            "trail_ids": id_list("Trail IDs walked today"),
                            "extra_ids": id_list("Activity or attraction IDs visited today")
                        },
                        "required": ["day", "title", "description", "campsite_ids", "trail_ids", "extra_ids"],
                        "additionalProperties": false
                    }
                },
                "packing_tips": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["summary", "days", "packing_tips"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let origin = required(&request.origin, "origin and trip_length_days are required")?;
        let days = request.days()?;

        // Three excerpts share one budget.
        let budget = ctx.max_context_chars / 3;
        let campsites = context_for("campsites", ctx.dataset.campsites(), budget);
        let trails = context_for("trails", ctx.dataset.trails(), budget);
        let extras = context_for("extras", ctx.dataset.extras(), budget);

        let system = format!(
            "You are a trip planner for {region}. Build realistic day-by-day camping itineraries.\n\n\
             Campsites:\n\n{campsites}\n\n\
             Trails:\n\n{trails}\n\n\
             Activities and attractions:\n\n{extras}\n\n\
             Rules:\n\
             1. Plan exactly one entry per day, numbered from 1\n\
             2. Account for travel time from the origin on day 1\n\
             3. Only use IDs from the lists above, exactly as written\n\
             4. Suggest at most one campsite per night and keep daily walking realistic\n\
             5. Finish with a few packing tips for the season",
            region = ctx.region,
            campsites = campsites,
            trails = trails,
            extras = extras,
        );

        let user = format!(
            "Origin: {}\nTrip length: {} days\nTravel style: {}\nMonth: {}\nParty: {}\nInterests: {}",
            origin,
            days,
            optional(&request.travel_style).unwrap_or("not specified"),
            optional(&request.month).unwrap_or("not specified"),
            optional(&request.party_type).unwrap_or("not specified"),
            list_or(&request.interests, "not specified"),
        );

        Ok(Prompt { system, user })
    }

    fn respond(
        request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        let limit = request.days().map(|d| d as usize).unwrap_or(reply.days.len());

        let days = reply
            .days
            .into_iter()
            .take(limit)
            .map(|day| ItineraryDay {
                day: day.day,
                title: day.title,
                description: day.description,
                campsites: enrich::<Campsite, _>(ctx.dataset, &day.campsite_ids, JoinKey::Id)
                    .into_iter()
                    .cloned()
                    .collect(),
                trails: enrich::<Trail, _>(ctx.dataset, &day.trail_ids, JoinKey::Id)
                    .into_iter()
                    .cloned()
                    .collect(),
                extras: enrich::<Extra, _>(ctx.dataset, &day.extra_ids, JoinKey::Id)
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();

        PlanTripResponse {
            summary: reply.summary,
            days,
            packing_tips: reply.packing_tips,
        }
    }
}
