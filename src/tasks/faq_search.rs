//! Answering visitor questions from the FAQ.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{required, AssistantTask, Prompt, TaskContext};
use crate::dataset::{enrich, JoinKey};
use crate::llm::TaskError;
use crate::models::{Campsite, FaqItem, Trail};
use crate::prompt::context_for;

pub struct FaqSearch;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqSearchRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Campsite,
    Trail,
    Guide,
    Faq,
}

/// A site page the model suggests visiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPage {
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub path: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct FaqSearchReply {
    answer: String,
    relevant_faq_slugs: Vec<String>,
    suggested_pages: Vec<SuggestedPage>,
}

#[derive(Debug, Serialize)]
pub struct FaqSearchResponse {
    pub answer: String,
    pub faqs: Vec<FaqItem>,
    pub suggested_pages: Vec<SuggestedPage>,
}

impl AssistantTask for FaqSearch {
    type Request = FaqSearchRequest;
    type Reply = FaqSearchReply;
    type Response = FaqSearchResponse;

    const NAME: &'static str = "faq_search_response";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "answer": { "type": "string", "description": "Direct answer to the question (2-4 sentences)" },
                "relevant_faq_slugs": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Slugs of relevant FAQ items"
                },
                "suggested_pages": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": { "type": "string", "enum": ["campsite", "trail", "guide", "faq"] },
                            "path": { "type": "string" },
                            "label": { "type": "string" }
                        },
                        "required": ["type", "path", "label"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["answer", "relevant_faq_slugs", "suggested_pages"],
            "additionalProperties": false
        })
    }

    fn prepare(request: &Self::Request, ctx: &TaskContext<'_>) -> Result<Prompt, TaskError> {
        let question = required(&request.question, "Question is required")?;

        let faqs = context_for("faq", ctx.dataset.faqs(), ctx.max_context_chars);
        let system = format!(
            "You are a helpful assistant for a camping and hiking guide to {region}.\n\
             Answer questions about camping around {region} using the FAQ content below and your general knowledge.\n\n\
             Available FAQs (use exact slugs when referencing):\n\n{faqs}\n\n\
             Available page types to link (use these paths):\n\
             - Campsites: /campsites/[slug] or /campsites (list)\n\
             - Trails: /trails/[slug] or /trails (list)\n\
             - FAQ: /faq#[slug]\n\
             - Guides: /guides (if relevant)\n\n\
             Rules:\n\
             1. Answer directly and helpfully in 2-4 sentences\n\
             2. Reference relevant FAQ slugs if they apply\n\
             3. Suggest 1-3 relevant pages to explore\n\
             4. If you don't know something specific, say so",
            region = ctx.region,
            faqs = faqs,
        );

        Ok(Prompt {
            system,
            user: question.to_string(),
        })
    }

    fn respond(
        _request: &Self::Request,
        reply: Self::Reply,
        ctx: &TaskContext<'_>,
    ) -> Self::Response {
        let faqs: Vec<&FaqItem> = enrich(ctx.dataset, &reply.relevant_faq_slugs, JoinKey::Slug);
        let suggested_pages = reply
            .suggested_pages
            .into_iter()
            .filter(|page| page_exists(page, ctx))
            .collect();

        FaqSearchResponse {
            answer: reply.answer,
            faqs: faqs.into_iter().cloned().collect(),
            suggested_pages,
        }
    }
}

/// Whether a suggested link points at something the site has.
///
/// List pages and guides are always kept; detail links must name a record.
fn page_exists(page: &SuggestedPage, ctx: &TaskContext<'_>) -> bool {
    let path = page.path.trim().trim_end_matches('/');
    match page.page_type {
        PageType::Campsite => match path.strip_prefix("/campsites") {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('/')
                .is_some_and(|slug| ctx.dataset.find_by_slug::<Campsite>(slug).is_some()),
            None => false,
        },
        PageType::Trail => match path.strip_prefix("/trails") {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('/')
                .is_some_and(|slug| ctx.dataset.find_by_slug::<Trail>(slug).is_some()),
            None => false,
        },
        PageType::Faq => match path.strip_prefix("/faq") {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('#')
                .is_some_and(|slug| ctx.dataset.find_by_slug::<FaqItem>(slug).is_some()),
            None => false,
        },
        PageType::Guide => path.starts_with("/guides"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fixtures;

    fn reply() -> FaqSearchReply {
        serde_json::from_value(json!({
            "answer": "Midges peak in summer.",
            "relevant_faq_slugs": ["midges", "bears", "midges"],
            "suggested_pages": [
                { "type": "faq", "path": "/faq#midges", "label": "Midges" },
                { "type": "campsite", "path": "/campsites/lochside", "label": "Lochside" },
                { "type": "campsite", "path": "/campsites/imaginary", "label": "Nowhere" },
                { "type": "trail", "path": "/trails/", "label": "All trails" },
                { "type": "guide", "path": "/guides", "label": "Guides" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_faqs_joined_by_slug() {
        let ds = fixtures::dataset();
        let request = FaqSearchRequest {
            question: Some("midges?".into()),
        };
        let response = FaqSearch::respond(&request, reply(), &fixtures::context(&ds));

        let slugs: Vec<&str> = response.faqs.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, vec!["midges"]);
        assert_eq!(response.answer, "Midges peak in summer.");
    }

    #[test]
    fn test_dangling_page_links_dropped() {
        let ds = fixtures::dataset();
        let request = FaqSearchRequest::default();
        let response = FaqSearch::respond(&request, reply(), &fixtures::context(&ds));

        let paths: Vec<&str> = response.suggested_pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/faq#midges", "/campsites/lochside", "/trails/", "/guides"]);
    }

    #[test]
    fn test_prompt_includes_faq_slugs() {
        let ds = fixtures::dataset();
        let request = FaqSearchRequest {
            question: Some("Can I camp anywhere?".into()),
        };
        let prompt = FaqSearch::prepare(&request, &fixtures::context(&ds)).unwrap();
        assert!(prompt.system.contains("SLUG: wild-camping"));
        assert_eq!(prompt.user, "Can I camp anywhere?");
    }

    #[test]
    fn test_question_required() {
        let ds = fixtures::dataset();
        let err = FaqSearch::prepare(&FaqSearchRequest::default(), &fixtures::context(&ds)).unwrap_err();
        assert_eq!(err.to_string(), "Question is required");
    }
}
