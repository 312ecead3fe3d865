//! Web server command.

use console::style;

use crate::config::Settings;
use crate::dataset::Dataset;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    // Fail fast on bad data before binding
    println!(
        "{} Loading dataset from {}...",
        style("→").cyan(),
        settings.data_dir.display()
    );
    match Dataset::load(&settings.data_dir) {
        Ok(_) => println!("  {} Dataset ready", style("✓").green()),
        Err(e) => {
            eprintln!("  {} Dataset failed to load: {}", style("✗").red(), e);
            return Err(e.into());
        }
    }

    if !settings.llm.enabled {
        println!(
            "  {} LLM disabled; AI-assisted endpoints will return errors",
            style("!").yellow()
        );
    }

    println!(
        "{} Starting lochguide at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &format!("{}:{}", host, port)).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), 3030))
}
