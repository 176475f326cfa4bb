//! Interactive workspace.
//!
//! Uploads and questions run as background tasks so the prompt stays usable
//! (selection can change while an upload is in flight). Workspace events are
//! printed by a dedicated task that is replaced whenever the session resets.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use docsage_application::{
    AppBootstrap, BootstrapOptions, ChatSession, ChatSurface, DocsageApp, SendOutcome, Workspace,
    WorkspaceEvent,
};

use crate::render;

const COMMANDS: &[&str] = &[
    "/upload",
    "/summary",
    "/docs",
    "/toggle",
    "/toggle-all",
    "/all",
    "/none",
    "/remove",
    "/primary",
    "/drawer",
    "/history",
    "/session",
    "/reset",
    "/help",
];

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prints workspace events as they arrive.
fn spawn_event_printer(workspace: &Workspace) -> JoinHandle<()> {
    let workspace = workspace.clone();
    let mut events = workspace.subscribe();

    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("[Repl] Skipped {} workspace event(s)", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            match event {
                WorkspaceEvent::UploadStarted { files } => {
                    println!("{}", format!("Uploading {} file(s)...", files).bright_black());
                }
                WorkspaceEvent::UploadCompleted { .. } => {
                    render::upload_report(&workspace.snapshot().await);
                }
                WorkspaceEvent::UploadFailed { .. } => {
                    println!("{}", "Upload failed".red().bold());
                }
                WorkspaceEvent::SummarizeStarted => {
                    println!("{}", "Indexing Documents...".yellow());
                }
                WorkspaceEvent::SummarizeCompleted => {
                    let snapshot = workspace.snapshot().await;
                    render::summary_panel(&snapshot);
                    println!("{}", snapshot.chat_hint().bright_black());
                }
                WorkspaceEvent::SummarizeFailed { message } => {
                    println!("{}", "Summarization failed".red().bold());
                    println!("{}", message.red());
                }
                WorkspaceEvent::SelectionChanged { .. } => {}
            }
        }
    })
}

fn spawn_question(chat: &ChatSession, workspace: &Workspace) {
    let chat = chat.clone();
    let workspace = workspace.clone();

    tokio::spawn(async move {
        match chat.submit().await {
            SendOutcome::Rejected(reason) => {
                println!("{}", format!("Not sent: {}", reason).yellow());
                println!("{}", workspace.snapshot().await.chat_hint().bright_black());
            }
            SendOutcome::Answered(reply) | SendOutcome::Failed(reply) => {
                render::message(&reply);
            }
        }
    });
}

/// Resolves a 1-based list position to a document id.
async fn document_id(workspace: &Workspace, arg: &str) -> Option<String> {
    let index: usize = arg.trim().parse().ok()?;
    let documents = workspace.documents().await;
    documents
        .get(index.checked_sub(1)?)
        .map(|doc| doc.id.clone())
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  /upload <file.pdf>...   upload and summarize PDFs");
    println!("  /summary                show the combined summary");
    println!("  /docs                   list documents and selection");
    println!("  /toggle <n>             toggle selection of document n");
    println!("  /toggle-all             select all, or deselect all when all are selected");
    println!("  /all, /none             select or deselect every document");
    println!("  /remove <n>             remove document n from the list");
    println!("  /primary, /drawer       switch chat surface");
    println!("  /history                show this surface's transcript");
    println!("  /session                show session details");
    println!("  /reset                  end this session and start a new one");
    println!("  quit                    exit");
    println!("{}", "Anything else is sent as a question.".bright_black());
}

async fn print_history(chat: &ChatSession) {
    let transcript = chat.transcript().await;
    if transcript.is_empty() {
        println!("{}", format!("No messages on the {} surface yet.", chat.surface()).bright_black());
    }
    for message in &transcript {
        render::message(message);
    }
}

fn print_session(app: &DocsageApp) {
    let info = app.session_info();
    println!("{} {}", "Session:".bright_black(), info.session_id.to_string().bright_cyan());
    if let Some(created_at) = info.created_at {
        println!("{} {}", "Created:".bright_black(), created_at);
    }
}

pub async fn run(options: BootstrapOptions) -> Result<()> {
    let AppBootstrap {
        mut app, config, ..
    } = AppBootstrap::run(options).await?;

    if config.is_insecure_remote() {
        println!(
            "{}",
            "Warning: backend uses plain http:// to a remote host".yellow()
        );
    }

    let mut printer = spawn_event_printer(app.workspace());
    let mut surface = ChatSurface::Primary;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Docsage ===".bright_magenta().bold());
    println!("{} {}", "Backend:".bright_black(), config.describe_origin());
    print_session(&app);
    println!(
        "{}",
        "Type '/upload <file.pdf>' to begin, '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        let status = app.workspace().snapshot().await.chatbot_status();
        let readline = rl.readline(&format!("{} ({})> ", surface, status));

        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            println!("{}", "Goodbye!".bright_green());
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        let (command, arg) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        let workspace = app.workspace().clone();

        match command {
            "/upload" => {
                let paths: Vec<PathBuf> = arg.split_whitespace().map(PathBuf::from).collect();
                let files = match crate::commands::load_files(&paths).await {
                    Ok(files) => files,
                    Err(e) => {
                        println!("{}", format!("{:#}", e).red());
                        continue;
                    }
                };
                workspace.acknowledge_upload().await;
                tokio::spawn(async move {
                    if let Err(e) = workspace.upload_and_summarize(files).await {
                        render::failure(&e);
                    }
                });
            }
            "/summary" => render::summary_panel(&workspace.snapshot().await),
            "/docs" => render::documents(&workspace.snapshot().await),
            "/toggle" | "/remove" => {
                let Some(id) = document_id(&workspace, arg).await else {
                    println!("{}", format!("No document at position '{}'", arg).yellow());
                    continue;
                };
                if command == "/toggle" {
                    workspace.toggle_document(&id).await;
                } else if let Some(removed) = workspace.remove_document(&id).await {
                    println!("{}", format!("Removed {}", removed.filename).bright_black());
                }
                render::documents(&workspace.snapshot().await);
            }
            "/toggle-all" | "/all" | "/none" => {
                match command {
                    "/all" => workspace.select_all().await,
                    "/none" => workspace.deselect_all().await,
                    _ => workspace.toggle_all().await,
                }
                render::documents(&workspace.snapshot().await);
            }
            "/primary" | "/drawer" => {
                surface = if command == "/primary" {
                    ChatSurface::Primary
                } else {
                    ChatSurface::Drawer
                };
                print_history(app.chat(surface)).await;
            }
            "/history" => print_history(app.chat(surface)).await,
            "/session" => print_session(&app),
            "/reset" => {
                printer.abort();
                app = app.reset_session().await?;
                printer = spawn_event_printer(app.workspace());
                surface = ChatSurface::Primary;
                println!("{}", "Started a new session.".bright_green());
                print_session(&app);
            }
            "/help" => print_help(),
            _ if command.starts_with('/') => {
                println!("{}", "Unknown command. Type '/help'.".bright_black());
            }
            _ => {
                let chat = app.chat(surface);
                chat.set_input(trimmed).await;
                spawn_question(chat, &workspace);
            }
        }
    }

    printer.abort();
    Ok(())
}
