use anyhow::Result;
use colored::Colorize;
use docsage_application::{AppBootstrap, BootstrapOptions};
use docsage_infrastructure::OriginSource;

pub async fn run(options: BootstrapOptions, json: bool) -> Result<()> {
    let AppBootstrap { app, paths, config } = AppBootstrap::run(options).await?;
    let info = app.session_info();

    if json {
        let report = serde_json::json!({
            "backendOrigin": config.config.backend_origin,
            "originExplicit": config.origin_source != OriginSource::Fallback,
            "insecureRemote": config.is_insecure_remote(),
            "home": paths.base_dir(),
            "session": info,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "=== Docsage Diagnostics ===".bright_magenta().bold());
    println!("{} {}", "Backend origin:".bright_black(), config.describe_origin());
    if config.is_insecure_remote() {
        println!(
            "{}",
            "Warning: plain http:// to a remote host; use https:// outside local development"
                .yellow()
        );
    }
    println!("{} {}", "Config directory:".bright_black(), paths.base_dir().display());

    if info.session_id.is_empty() {
        println!("{} {}", "Session:".bright_black(), "not yet available".yellow());
    } else {
        println!("{} {}", "Session:".bright_black(), info.session_id);
        println!(
            "{} {}",
            "Created:".bright_black(),
            info.created_at.as_deref().unwrap_or("unknown")
        );
    }

    println!();
    println!("{}", "If requests fail:".bright_black());
    for hint in docsage_core::DocsageError::BackendUnreachable.troubleshooting_hints() {
        println!("  - {}", hint);
    }
    Ok(())
}
