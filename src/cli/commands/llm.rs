//! LLM-related commands.

use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::dataset::Dataset;
use crate::llm::{LlmClient, TaskInvoker};
use crate::tasks::{run_task, FaqSearch, FaqSearchRequest, TaskContext};

use super::super::helpers::truncate;

/// Show LLM configuration and list available models.
pub async fn cmd_llm_models(settings: &Settings) -> anyhow::Result<()> {
    let config = &settings.llm;
    let llm_client = LlmClient::new(config.clone())?;

    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {}",
        "Enabled:",
        if config.enabled { "Yes" } else { "No" }
    );
    println!("{:<20} {}", "Provider:", config.provider.as_str());
    println!("{:<20} {}", "Endpoint:", config.endpoint);
    println!(
        "{:<20} {}",
        "API Key:",
        if config.api_key.is_some() {
            "Set"
        } else {
            "Not set"
        }
    );
    println!("{:<20} {}", "Current Model:", config.model);
    println!("{:<20} {}", "Max Tokens:", config.max_tokens);
    println!("{:<20} {:.2}", "Temperature:", config.temperature);
    println!("{:<20} {}s", "Timeout:", config.timeout_secs);

    if !llm_client.is_available().await {
        println!(
            "\n{} Completion service not reachable at {}",
            style("!").yellow(),
            config.endpoint
        );
        return Ok(());
    }

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    match llm_client.list_models().await {
        Ok(models) => {
            if models.is_empty() {
                println!("  No models available");
            } else {
                for model in models {
                    let marker = if model == config.model {
                        style("*").green().to_string()
                    } else {
                        " ".to_string()
                    };
                    println!("{} {}", marker, model);
                }
            }
        }
        Err(e) => {
            println!("{} Failed to list models: {}", style("✗").red(), e);
        }
    }

    Ok(())
}

/// Answer a question from the FAQ through the completion service.
pub async fn cmd_faq(settings: &Settings, question: &str, json: bool) -> anyhow::Result<()> {
    let dataset = Dataset::load(&settings.data_dir)?;
    let invoker = TaskInvoker::new(Arc::new(LlmClient::new(settings.llm.clone())?));
    let ctx = TaskContext {
        dataset: &dataset,
        region: &settings.region,
        max_context_chars: settings.llm.max_context_chars,
    };

    let request = FaqSearchRequest {
        question: Some(question.to_string()),
    };
    let response = run_task::<FaqSearch>(&invoker, &ctx, &request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("\n{}\n", response.answer);

    if !response.faqs.is_empty() {
        println!("{}", style("Related questions").bold());
        for faq in &response.faqs {
            println!("  {} {}", style("•").cyan(), truncate(&faq.question, 70));
        }
    }

    if !response.suggested_pages.is_empty() {
        println!("{}", style("See also").bold());
        for page in &response.suggested_pages {
            println!("  {} {} ({})", style("→").cyan(), page.label, page.path);
        }
    }

    Ok(())
}
