//! Checking whether a trail suits a walker's fitness.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{optional, required, AssistantTask, EntitySummary, Prompt, TaskContext};
use crate::dataset::{enrich, JoinKey};
use crate::llm::TaskError;
use crate::models::Trail;

pub struct TrailFitness;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrailFitnessRequest {
    #[serde(default)]
    pub trail_id: Option<String>,
    #[serde(default)]
    pub trail_slug: Option<String>,
    #[serde(default)]
    pub fitness_description: Option<String>,
}

impl TrailFitnessRequest {
    /// The trail being asked about, by id first, then by slug.
    fn trail<'a>(&self, ctx: &TaskContext<'a>) -> Result<&'a Trail, TaskError> {
        let found = match (optional(&self.trail_id), optional(&self.trail_slug)) {
            (Some(id), _) => ctx.dataset.find::<Trail>(id),
            (None, Some(slug)) => ctx.dataset.find_by_slug::<Trail>(slug),
            (None, None) => {
                return Err(TaskError::InvalidRequest(
                    "trail_id or trail_slug and fitness_description are required".to_string(),
                ))
            }
        };
        found.ok_or_else(|| TaskError::NotFound("Trail not found".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Suitable,
    Borderline,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

#[derive(Debug, Deserialize)]
pub struct TrailFitnessReply {
    rating: u8,
    verdict: Verdict,
    explanation: String,
    alternative_trail_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TrailFitnessResponse {
    /// 1 (not suitable) to 5 (perfect match).
    pub rating: u8,
    pub verdict: Verdict,
    pub explanation: String,
    pub trail: Option<EntitySummary>,
    pub alternative_trail_ids: Vec<String>,
    pub alternatives: Vec<Trail>,
}

impl AssistantTask for TrailFitness {
    type Request = TrailFitnessRequest;
    type Reply = TrailFitnessReply;
    type Response = TrailFitnessResponse;

    const NAME: &'static str = "trail_fitness_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "rating": {
                    "type": "integer",
                    "enum": [1, 2, 3, 4, 5],
                    "description": "Suitability rating 1-5 (1=not suitable, 5=perfect match)"
                },
                "verdict": {
                    "type": "string",
                    "enum": ["Suitable", "Borderline", "Not Recommended"]
                },
                "explanation": { "type": "string", "description": "Plain English explanation (2-3 sentences)" },
                "alternative_trail_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "IDs of easier or more suitable alternatives"
                }
            },
            "required": ["rating", "verdict", "explanation", "alternative_trail_ids"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let description = required(
            &request.fitness_description,
            "trail_id or trail_slug and fitness_description are required",
        )?;
        let trail = request.trail(ctx)?;

        let others: Vec<String> = ctx
            .dataset
            .trails()
            .iter()
            .filter(|t| t.id != trail.id)
            .map(|t| {
                format!(
                    "ID: {} | {}: {:.1}mi, {}, {}",
                    t.id,
                    t.name,
                    t.miles(),
                    t.difficulty.as_str(),
                    t.area_id
                )
            })
            .collect();

        let mut subject = format!(
            "- Name: {}\n- Distance: {:.1} miles\n- Difficulty: {}\n- Area: {}",
            trail.name,
            trail.miles(),
            trail.difficulty.as_str(),
            trail.area_id
        );
        if let Some(ascent) = trail.ascent_m {
            subject.push_str(&format!("\n- Ascent: {:.0}m", ascent));
        }
        if !trail.summary.is_empty() {
            subject.push_str(&format!("\n- Description: {}", trail.summary));
        }

        let system = format!(
            "You are a hiking expert for {region} helping people assess if a trail is suitable for their fitness level.\n\n\
             The user wants to hike this trail:\n{subject}\n\n\
             Available alternative trails (use exact IDs if suggesting):\n{others}\n\n\
             Based on the user's fitness description:\n\
             1. Rate how suitable this trail is (1-5)\n\
             2. Give a clear verdict (Suitable / Borderline / Not Recommended)\n\
             3. Explain in plain English why (2-3 sentences, be specific about challenges)\n\
             4. If not suitable or borderline, suggest 1-2 alternative trail IDs that would be better\n\n\
             Be honest but friendly. Consider local conditions such as boggy ground, exposed sections and changeable weather.",
            region = ctx.region,
            subject = subject,
            others = others.join("\n"),
        );

        Ok(Prompt {
            system,
            user: description.to_string(),
        })
    }

    fn respond(
        request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        let checked = request.trail(ctx).ok();
        let alternatives: Vec<&Trail> =
            enrich::<Trail, _>(ctx.dataset, &reply.alternative_trail_ids, JoinKey::Id)
                .into_iter()
                .filter(|t| checked.map_or(true, |c| c.id != t.id))
                .collect();

        TrailFitnessResponse {
            rating: reply.rating,
            verdict: reply.verdict,
            explanation: reply.explanation,
            trail: checked.map(EntitySummary::of),
            alternative_trail_ids: alternatives.iter().map(|t| t.id.clone()).collect(),
            alternatives: alternatives.into_iter().cloned().collect(),
        }
    }
}
