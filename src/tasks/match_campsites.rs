//! Free-text campsite matching.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{required, AssistantTask, Prompt, TaskContext};
use crate::dataset::{enrich, JoinKey};
use crate::llm::TaskError;
use crate::models::{Campsite, PriceBand};
use crate::prompt::context_for;

/// Most campsites returned in full.
const TOP_CAMPSITES: usize = 5;

pub struct MatchCampsites;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchCampsitesRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Filters the model read out of the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFilters {
    pub area_id: Option<String>,
    pub stay_types: Vec<String>,
    pub facility_tags: Vec<String>,
    pub price_band: Option<PriceBand>,
    pub near_water: bool,
}

#[derive(Debug, Deserialize)]
pub struct MatchCampsitesReply {
    filters: ExtractedFilters,
    ranked_campsite_ids: Vec<String>,
    explanation: String,
}

#[derive(Debug, Serialize)]
pub struct MatchCampsitesResponse {
    pub filters: ExtractedFilters,
    /// Ranked identifiers that resolved to a campsite.
    pub ranked_campsite_ids: Vec<String>,
    pub explanation: String,
    pub top_campsites: Vec<Campsite>,
}

impl AssistantTask for MatchCampsites {
    type Request = MatchCampsitesRequest;
    type Reply = MatchCampsitesReply;
    type Response = MatchCampsitesResponse;

    const NAME: &'static str = "campsite_match_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "filters": {
                    "type": "object",
                    "properties": {
                        "area_id": { "type": ["string", "null"], "description": "Area filter if mentioned" },
                        "stay_types": { "type": "array", "items": { "type": "string" } },
                        "facility_tags": { "type": "array", "items": { "type": "string" } },
                        "price_band": { "type": ["string", "null"], "enum": ["budget", "midrange", "premium", null] },
                        "near_water": { "type": "boolean", "description": "Whether being close to the water matters" }
                    },
                    "required": ["area_id", "stay_types", "facility_tags", "price_band", "near_water"],
                    "additionalProperties": false
                },
                "ranked_campsite_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Campsite IDs sorted by relevance, max 5"
                },
                "explanation": { "type": "string", "description": "Why these were chosen" }
            },
            "required": ["filters", "ranked_campsite_ids", "explanation"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let query = required(&request.query, "Query is required")?;

        let campsites = context_for("campsites", ctx.dataset.campsites(), ctx.max_context_chars);
        let system = format!(
            "You are a helpful camping expert for {region}. You match campers to campsites based on their needs.\n\n\
             Price bands: budget, midrange, premium\n\n\
             Here are all available campsites:\n\n{campsites}\n\n\
             Based on the user's request, identify:\n\
             1. Any filters that apply (area, stay type, facilities, price, closeness to water)\n\
             2. The top 3-5 most suitable campsites (by ID), ranked by relevance\n\
             3. A brief explanation of your choices\n\n\
             Only recommend campsites from the provided list. Use exact IDs.",
            region = ctx.region,
            campsites = campsites,
        );

        Ok(Prompt {
            system,
            user: query.to_string(),
        })
    }

    fn respond(
        _request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        let ranked: Vec<&Campsite> = enrich(ctx.dataset, &reply.ranked_campsite_ids, JoinKey::Id);

        MatchCampsitesResponse {
            filters: reply.filters,
            ranked_campsite_ids: ranked.iter().map(|c| c.id.clone()).collect(),
            explanation: reply.explanation,
            top_campsites: ranked.into_iter().take(TOP_CAMPSITES).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedBackend;
    use crate::llm::TaskInvoker;
    use crate::tasks::{fixtures, run_task};

    fn reply(ids: &[&str]) -> Value {
        json!({
            "filters": {
                "area_id": null,
                "stay_types": ["pod"],
                "facility_tags": [],
                "price_band": "budget",
                "near_water": true
            },
            "ranked_campsite_ids": ids,
            "explanation": "Pods near the water."
        })
    }

    fn request(query: &str) -> MatchCampsitesRequest {
        MatchCampsitesRequest {
            query: Some(query.to_string()),
        }
    }

    #[tokio::test]
    async fn test_enriches_in_model_order() {
        let ds = fixtures::dataset();
        let backend = ScriptedBackend::replying_json(reply(&["glen-pods", "ghost", "lochside"]));
        let invoker = TaskInvoker::new(backend.clone());

        let response = run_task::<MatchCampsites>(&invoker, &fixtures::context(&ds), &request("pods by the loch"))
            .await
            .unwrap();

        assert_eq!(response.ranked_campsite_ids, vec!["glen-pods", "lochside"]);
        let names: Vec<&str> = response.top_campsites.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Glen Pods", "Lochside Camping"]);
        assert_eq!(response.filters.price_band, Some(PriceBand::Budget));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_top_campsites_capped() {
        let ds = fixtures::dataset();
        let ctx = fixtures::context(&ds);
        let reply: MatchCampsitesReply = serde_json::from_value(reply(&[
            "lochside", "glen-pods", "forest-park",
        ]))
        .unwrap();
        let response = MatchCampsites::respond(&request("x"), reply, &ctx);
        assert!(response.top_campsites.len() <= TOP_CAMPSITES);
        assert_eq!(response.top_campsites.len(), 3);
    }

    #[test]
    fn test_prompt_lists_every_campsite() {
        let ds = fixtures::dataset();
        let prompt = MatchCampsites::prepare(&request("quiet tent pitch"), &fixtures::context(&ds)).unwrap();
        assert!(prompt.system.contains("ID: lochside"));
        assert!(prompt.system.contains("ID: forest-park"));
        assert!(prompt.system.contains("Loch Ness, Scotland"));
        assert_eq!(prompt.user, "quiet tent pitch");
    }

    #[test]
    fn test_blank_query_rejected() {
        let ds = fixtures::dataset();
        let err = MatchCampsites::prepare(&request("   "), &fixtures::context(&ds)).unwrap_err();
        assert!(matches!(err, TaskError::InvalidRequest(_)));
    }
}
