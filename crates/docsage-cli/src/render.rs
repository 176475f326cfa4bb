//! Terminal rendering of workspace state and chat messages.

use chrono::Utc;
use colored::Colorize;
use docsage_application::{SummaryPanel, WorkspaceSnapshot};
use docsage_core::DocsageError;
use docsage_core::chat::{Message, MessageRole};
use docsage_core::status::count_noun;

pub fn summary_panel(snapshot: &WorkspaceSnapshot) {
    match snapshot.summary_panel() {
        SummaryPanel::Empty => {
            println!("{}", SummaryPanel::EMPTY_TITLE.bright_black());
            println!(
                "{}",
                "Upload documents to see their combined summary here.".bright_black()
            );
        }
        SummaryPanel::Pending { headline } => {
            println!("{}", headline.bright_magenta());
            println!("{}", "No summary yet.".bright_black());
        }
        SummaryPanel::Loading { headline, detail } => {
            println!("{}", headline.bright_magenta());
            println!("{}", "Generating summary...".yellow());
            println!("{}", detail.bright_black());
        }
        SummaryPanel::Failed { headline, message } => {
            println!("{}", headline.bright_magenta());
            println!("{}", "Summarization failed".red().bold());
            println!("{}", message.red());
        }
        SummaryPanel::Ready {
            headline,
            summary,
            citations,
        } => {
            println!("{}", headline.bright_magenta().bold());
            for line in summary.lines() {
                println!("{}", line.bright_blue());
            }
            if !citations.is_empty() {
                let labels: Vec<String> = citations.iter().map(|c| c.label()).collect();
                println!("{}", format!("Sources: {}", labels.join(", ")).bright_black());
            }
        }
    }
}

pub fn documents(snapshot: &WorkspaceSnapshot) {
    println!("{}", snapshot.selection_header().bright_black());
    let now = Utc::now();
    for (index, doc) in snapshot.documents.iter().enumerate() {
        let mark = if doc.selected { "[x]" } else { "[ ]" };
        let line = format!(
            "{:>2}. {} {} ({}, {})",
            index + 1,
            mark,
            doc.filename,
            count_noun(doc.page_count as usize, "page"),
            doc.uploaded_ago(now)
        );
        if doc.selected {
            println!("{}", line.green());
        } else {
            println!("{}", line.bright_black());
        }
    }
}

pub fn upload_report(snapshot: &WorkspaceSnapshot) {
    if let Some(lines) = snapshot.upload_report() {
        let mut lines = lines.into_iter();
        if let Some(headline) = lines.next() {
            println!("{}", headline.bright_green());
        }
        for line in lines {
            println!("  {}", line.green());
        }
    } else if let Some(error) = &snapshot.upload_error {
        println!("{}", error.red());
    }
}

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant if message.is_error() => {
            println!("{}", message.content.red());
            if let Some(error) = message.error() {
                hints(error);
            }
        }
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            for citation in &message.citations {
                match &citation.text {
                    Some(text) => println!(
                        "{}",
                        format!("  [{}] {}", citation.label(), text).bright_black()
                    ),
                    None => println!("{}", format!("  [{}]", citation.label()).bright_black()),
                }
            }
            if let Some(badge) = message.chunk_badge() {
                println!("{}", badge.bright_black().italic());
            }
        }
    }
}

pub fn hints(error: &DocsageError) {
    for hint in error.troubleshooting_hints() {
        println!("{}", format!("  - {}", hint).yellow());
    }
}

/// The error text followed by any troubleshooting hints.
fn failure_lines(error: &DocsageError) -> Vec<String> {
    std::iter::once(error.to_string())
        .chain(
            error
                .troubleshooting_hints()
                .iter()
                .map(|hint| format!("  - {}", hint)),
        )
        .collect()
}

/// Prints a failed background request, including refusals that never
/// reached the workspace state.
pub fn failure(error: &DocsageError) {
    let mut lines = failure_lines(error).into_iter();
    if let Some(message) = lines.next() {
        println!("{}", message.red());
    }
    for hint in lines {
        println!("{}", hint.yellow());
    }
}
