//! Page titles and meta descriptions for site editors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{list_or, optional, required, AssistantTask, EntitySummary, Prompt, TaskContext};
use crate::llm::TaskError;
use crate::models::{Campsite, Trail};
use crate::prompt::PromptBlock;

/// Longest meta description search engines show in full.
const META_DESCRIPTION_CHARS: usize = 160;

pub struct SeoCopy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoPageType {
    Campsite,
    Trail,
    Guide,
    Area,
}

impl SeoPageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campsite => "campsite",
            Self::Trail => "trail",
            Self::Guide => "guide",
            Self::Area => "area",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "campsite" => Some(Self::Campsite),
            "trail" => Some(Self::Trail),
            "guide" => Some(Self::Guide),
            "area" => Some(Self::Area),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoCopyRequest {
    #[serde(default)]
    pub page_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Existing campsite or trail the page is about.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Resolved page subject: its summary and prompt description.
type Subject = (EntitySummary, String);

impl SeoCopyRequest {
    fn page_type(&self) -> Result<SeoPageType, TaskError> {
        let raw = required(&self.page_type, "page_type and name are required")?;
        SeoPageType::from_str(raw)
            .ok_or_else(|| TaskError::InvalidRequest(format!("Invalid page_type '{}'", raw)))
    }

    fn subject(&self, ctx: &TaskContext<'_>) -> Result<Option<Subject>, TaskError> {
        let Some(slug) = optional(&self.slug) else {
            return Ok(None);
        };
        let found = match self.page_type()? {
            SeoPageType::Campsite => ctx
                .dataset
                .find_by_slug::<Campsite>(slug)
                .map(|c| (EntitySummary::of(c), c.prompt_block())),
            SeoPageType::Trail => ctx
                .dataset
                .find_by_slug::<Trail>(slug)
                .map(|t| (EntitySummary::of(t), t.prompt_block())),
            SeoPageType::Guide | SeoPageType::Area => return Ok(None),
        };
        found
            .map(Some)
            .ok_or_else(|| TaskError::NotFound(format!("No page found for slug '{}'", slug)))
    }
}

#[derive(Debug, Deserialize)]
pub struct SeoCopyReply {
    title: String,
    h1: String,
    meta_description: String,
    faq_suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SeoCopyResponse {
    pub page_type: SeoPageType,
    pub title: String,
    pub h1: String,
    pub meta_description: String,
    pub faq_suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<EntitySummary>,
}

impl AssistantTask for SeoCopy {
    type Request = SeoCopyRequest;
    type Reply = SeoCopyReply;
    type Response = SeoCopyResponse;

    const NAME: &'static str = "seo_copy_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Title tag, under 60 characters" },
                "h1": { "type": "string" },
                "meta_description": { "type": "string", "description": "Under 160 characters" },
                "faq_suggestions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Questions visitors are likely to ask"
                }
            },
            "required": ["title", "h1", "meta_description", "faq_suggestions"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let page_type = request.page_type()?;
        let name = required(&request.name, "page_type and name are required")?;
        let subject = request.subject(ctx)?;

        let mut system = format!(
            "You write search-friendly copy for a camping and hiking guide to {region}.\n\n\
             For the page described by the user, produce:\n\
             1. A title tag under 60 characters\n\
             2. An H1 heading\n\
             3. A meta description under {meta} characters that invites the click\n\
             4. Four or five FAQ questions visitors are likely to ask\n\n\
             Write naturally. Do not stuff keywords or invent facts.",
            region = ctx.region,
            meta = META_DESCRIPTION_CHARS,
        );
        if let Some((_, details)) = &subject {
            system.push_str(&format!("\n\nKnown details about this page:\n\n{}", details));
        }

        let user = format!(
            "Page type: {}\nName: {}\nArea: {}\nKeywords: {}",
            page_type.as_str(),
            name,
            optional(&request.area).unwrap_or(ctx.region),
            list_or(&request.keywords, "none"),
        );

        Ok(Prompt { system, user })
    }

    fn respond(
        request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        SeoCopyResponse {
            page_type: request.page_type().unwrap_or(SeoPageType::Guide),
            title: reply.title,
            h1: reply.h1,
            meta_description: reply.meta_description,
            faq_suggestions: reply.faq_suggestions,
            subject: request.subject(ctx).ok().flatten().map(|(summary, _)| summary),
        }
    }
}
