use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use docsage_application::{AppBootstrap, BootstrapOptions};
use docsage_core::status::SummaryStatus;

use crate::render;

pub async fn run(options: BootstrapOptions, paths: Vec<PathBuf>, summarize: bool) -> Result<()> {
    let AppBootstrap { app, .. } = AppBootstrap::run(options).await?;
    let workspace = app.workspace();
    let files = super::load_files(&paths).await?;

    println!("{}", format!("Uploading {} file(s)...", files.len()).bright_black());
    let result = if summarize {
        workspace.upload_and_summarize(files).await
    } else {
        workspace.upload(files).await
    };

    let snapshot = workspace.snapshot().await;
    render::upload_report(&snapshot);
    if let Err(e) = result {
        render::hints(&e);
        anyhow::bail!(e);
    }

    if summarize {
        println!();
        render::summary_panel(&snapshot);
        if snapshot.summary_status == SummaryStatus::Failed {
            anyhow::bail!("Summarization did not complete");
        }
    }

    Ok(())
}
