use anyhow::Result;
use colored::Colorize;
use docsage_application::{AppBootstrap, BootstrapOptions};

pub async fn show(options: BootstrapOptions) -> Result<()> {
    let AppBootstrap { app, .. } = AppBootstrap::run(options).await?;
    let info = app.session_info();

    if info.session_id.is_empty() {
        println!("{}", "Session not yet available".yellow());
        return Ok(());
    }

    println!("{} {}", "Session:".bright_black(), info.session_id.to_string().bright_cyan());
    if let Some(created_at) = info.created_at {
        println!("{} {}", "Created:".bright_black(), created_at);
    }
    Ok(())
}

pub async fn reset(options: BootstrapOptions) -> Result<()> {
    let AppBootstrap { app, .. } = AppBootstrap::run(options).await?;
    let previous = app.context().session_id().clone();

    let app = app.reset_session().await?;
    println!("{} {}", "Ended session".bright_black(), previous);
    println!(
        "{} {}",
        "New session:".bright_green(),
        app.context().session_id().to_string().bright_cyan()
    );
    Ok(())
}
