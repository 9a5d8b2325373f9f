use std::{fs, io::Read, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::ProgressBar;
use output::{OutputFormat, Renderer};
use practice_core::catalog::list_by_difficulty;
use practice_core::link::classify;
use practice_core::settings::Settings;
use practice_core::{
    bootstrap, sanitize, sanitize_with_resolution, Command as CoreCommand, CommandExecutor,
    Difficulty, ServerConfig, ServerMode,
};
use progress::spinner;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "practice-link",
    version,
    about = "Resolve practice problems to one verified link and clean generated replies."
)]
struct Cli {
    /// Settings file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Preferred renderer for command output.
    #[arg(long, global = true, value_enum, default_value = "markdown")]
    format: OutputFormat,
    /// Disable ANSI colors in CLI output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    /// Disable progress indicators for long-running tasks.
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Run the JSON-RPC server over STDIO.
    Serve,
    /// Resolve a problem title (or a random problem) to one link.
    Resolve {
        /// Problem title or keyword.
        #[arg(required_unless_present = "random", conflicts_with = "random")]
        keyword: Option<String>,
        /// Pick a random catalog problem instead.
        #[arg(long)]
        random: bool,
        /// Restrict the random pick to one difficulty.
        #[arg(long, requires = "random")]
        difficulty: Option<String>,
    },
    /// Resolve a catalog problem by id.
    ResolveId { id: u64 },
    /// Clean generated text down to at most one canonical link.
    Sanitize {
        /// Read the text from a file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Classify a URL as a problem page, listing, local link or neither.
    Validate { url: String },
    /// Send one chat message through intent classification.
    Chat {
        message: String,
        #[arg(long, default_value = "cli")]
        session: String,
    },
    /// List catalog problems.
    Catalog {
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Debug, Serialize)]
struct ValidationReport {
    url: String,
    valid: bool,
    kind: practice_core::LinkKind,
}

impl Cli {
    fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let renderer = Renderer::new(cli.format);
    match &cli.command {
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "practice-link", &mut std::io::stdout());
            return Ok(());
        }
        Command::Sanitize { file } => return handle_sanitize(file.as_ref(), &cli, &renderer),
        Command::Validate { url } => return handle_validate(url, &cli, &renderer),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let config = ServerConfig {
        settings,
        mode: match cli.command {
            Command::Serve => ServerMode::Stdio,
            _ => ServerMode::Headless,
        },
        ..ServerConfig::default()
    };
    let runtime = bootstrap(config).await?;
    let executor = runtime.executor();

    match &cli.command {
        Command::Serve => runtime.serve().await,
        Command::Resolve {
            keyword,
            random,
            difficulty,
        } => {
            let command = if *random {
                CoreCommand::RandomLookup {
                    difficulty: parse_difficulty(difficulty.as_deref())?,
                }
            } else {
                let keyword = keyword.as_deref().map(str::trim).unwrap_or_default();
                if keyword.is_empty() {
                    anyhow::bail!("keyword must not be blank");
                }
                CoreCommand::TitleLookup {
                    keyword: keyword.to_string(),
                }
            };
            handle_lookup(command, &cli, &renderer, &executor).await
        }
        Command::ResolveId { id } => {
            handle_lookup(CoreCommand::IdLookup { id: *id }, &cli, &renderer, &executor).await
        }
        Command::Chat { message, session } => {
            let spinner = spinner(cli.progress_enabled(), "Thinking...");
            let reply = runtime.chat().reply(session, message).await;
            finish_spinner(spinner, None);
            if !cli.quiet {
                renderer.chat_reply(&reply)?;
            }
            Ok(())
        }
        Command::Catalog { difficulty } => {
            let difficulty = parse_difficulty(difficulty.as_deref())?;
            let problems = executor.context().resolver.catalog().list_all().await?;
            let selected: Vec<_> = match difficulty {
                Some(difficulty) => list_by_difficulty(&problems, difficulty)
                    .into_iter()
                    .cloned()
                    .collect(),
                None => problems,
            };
            if !cli.quiet {
                renderer.catalog(&selected)?;
            }
            Ok(())
        }
        Command::Completions { .. } | Command::Sanitize { .. } | Command::Validate { .. } => {
            Ok(())
        }
    }
}

async fn handle_lookup(
    command: CoreCommand,
    cli: &Cli,
    renderer: &Renderer,
    executor: &CommandExecutor,
) -> Result<()> {
    let label = match &command {
        CoreCommand::TitleLookup { keyword } => format!("Resolving `{keyword}`..."),
        CoreCommand::IdLookup { id } => format!("Looking up problem {id}..."),
        _ => "Picking a problem...".to_string(),
    };
    let spinner = spinner(cli.progress_enabled(), label);
    let outcome = match executor.execute(&command).await {
        Ok(outcome) => outcome,
        Err(error) => {
            finish_spinner(spinner, None);
            return Err(anyhow!(error).context(format!("`{}` failed", command.name())));
        }
    };
    let found = outcome.resolution.as_ref().is_some_and(|r| r.found);
    let status = if found { "Resolved" } else { "No verified match" };
    finish_spinner(spinner, Some(status.to_string()));

    info!(target: "practice_cli", command = command.name(), found, "lookup finished");
    if cli.quiet {
        return Ok(());
    }
    let sanitized = match &outcome.resolution {
        Some(resolution) => sanitize_with_resolution(&outcome.text, resolution),
        None => sanitize(&outcome.text),
    };
    renderer.resolution(outcome.resolution.as_ref(), &sanitized)
}

fn handle_sanitize(file: Option<&PathBuf>, cli: &Cli, renderer: &Renderer) -> Result<()> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    let sanitized = sanitize(&raw);
    if !cli.quiet {
        renderer.sanitized(&sanitized)?;
    }
    Ok(())
}

fn handle_validate(url: &str, cli: &Cli, renderer: &Renderer) -> Result<()> {
    let url = url.trim();
    let kind = classify(url);
    let report = ValidationReport {
        url: url.to_string(),
        valid: kind.is_page(),
        kind,
    };
    if !cli.quiet {
        renderer.validation(&report)?;
    }
    if report.valid {
        Ok(())
    } else {
        Err(anyhow!("not a problem page: {url}"))
    }
}

fn parse_difficulty(raw: Option<&str>) -> Result<Option<Difficulty>> {
    match raw {
        None => Ok(None),
        Some(raw) => Difficulty::from_str_loose(raw)
            .map(Some)
            .ok_or_else(|| anyhow!("unknown difficulty `{raw}` (expected easy, medium or hard)")),
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,practice_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn finish_spinner(spinner: Option<ProgressBar>, message: Option<String>) {
    if let Some(progress) = spinner {
        if let Some(msg) = message {
            progress.finish_with_message(msg);
        } else {
            progress.finish_and_clear();
        }
    }
}

mod output {
    use std::fmt::Write;

    use anyhow::Result;
    use clap::ValueEnum;
    use practice_core::{ChatReply, Problem, ResolutionResult, SanitizedResponse};
    use serde_json::json;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
    pub enum OutputFormat {
        Json,
        Markdown,
        Table,
        Text,
    }

    #[derive(Copy, Clone, Debug)]
    pub struct Renderer {
        format: OutputFormat,
    }

    impl Renderer {
        pub fn new(format: OutputFormat) -> Self {
            Self { format }
        }

        pub fn resolution(
            &self,
            resolution: Option<&ResolutionResult>,
            sanitized: &SanitizedResponse,
        ) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({
                        "resolution": resolution,
                        "text": sanitized.rendered(),
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    println!("{}", sanitized.rendered());
                }
                OutputFormat::Table => {
                    let rows = match resolution {
                        Some(result) => vec![
                            vec!["Title".to_string(), result.title.clone()],
                            vec![
                                "Source".to_string(),
                                result
                                    .source
                                    .map_or_else(|| "none".to_string(), |s| format!("{s:?}")),
                            ],
                            vec!["Found".to_string(), result.found.to_string()],
                            vec![
                                "URL".to_string(),
                                result.url.clone().unwrap_or_else(|| "-".to_string()),
                            ],
                        ],
                        None => vec![vec!["Found".to_string(), "false".to_string()]],
                    };
                    render_table(&["Field", "Value"], &rows);
                }
            }
            Ok(())
        }

        pub fn sanitized(&self, sanitized: &SanitizedResponse) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(sanitized)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    println!("{}", sanitized.rendered());
                }
                OutputFormat::Table => {
                    let rows = vec![
                        vec!["Body".to_string(), truncate(&flatten(&sanitized.body), 80)],
                        vec![
                            "Title".to_string(),
                            sanitized.title.clone().unwrap_or_else(|| "-".to_string()),
                        ],
                        vec![
                            "URL".to_string(),
                            sanitized.url.clone().unwrap_or_else(|| "-".to_string()),
                        ],
                    ];
                    render_table(&["Field", "Value"], &rows);
                }
            }
            Ok(())
        }

        pub fn validation(&self, report: &crate::ValidationReport) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(report)?);
                }
                OutputFormat::Markdown => {
                    println!("| Property | Value |");
                    println!("| --- | --- |");
                    println!("| URL | `{}` |", report.url);
                    println!("| Valid | {} |", report.valid);
                    println!("| Kind | {:?} |", report.kind);
                }
                OutputFormat::Table => {
                    let rows = vec![
                        vec!["URL".to_string(), report.url.clone()],
                        vec!["Valid".to_string(), report.valid.to_string()],
                        vec!["Kind".to_string(), format!("{:?}", report.kind)],
                    ];
                    render_table(&["Property", "Value"], &rows);
                }
                OutputFormat::Text => {
                    println!("{} ({:?})", if report.valid { "valid" } else { "invalid" }, report.kind);
                }
            }
            Ok(())
        }

        pub fn chat_reply(&self, reply: &ChatReply) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(reply)?);
                }
                OutputFormat::Markdown | OutputFormat::Text | OutputFormat::Table => {
                    println!("{}", reply.text);
                }
            }
            Ok(())
        }

        pub fn catalog(&self, problems: &[Problem]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(problems)?);
                }
                OutputFormat::Markdown => {
                    println!("| ID | Title | Difficulty |");
                    println!("| ---: | --- | --- |");
                    for problem in problems {
                        println!(
                            "| {} | {} | {} |",
                            problem.id,
                            problem.title,
                            problem.difficulty_label()
                        );
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = problems
                        .iter()
                        .map(|problem| {
                            vec![
                                problem.id.to_string(),
                                truncate(&problem.title, 40),
                                problem.difficulty_label().to_string(),
                            ]
                        })
                        .collect();
                    render_table(&["ID", "Title", "Difficulty"], &rows);
                }
                OutputFormat::Text => {
                    if problems.is_empty() {
                        println!("Catalog is empty.");
                    }
                    for problem in problems {
                        println!(
                            "{:>5}  {} [{}]",
                            problem.id,
                            problem.title,
                            problem.difficulty_label()
                        );
                    }
                }
            }
            Ok(())
        }
    }

    fn render_table(headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
        for row in rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.chars().count());
            }
        }

        fn render_line(columns: &[&str], widths: &[usize]) -> String {
            let mut line = String::new();
            for (idx, value) in columns.iter().enumerate() {
                let width = widths[idx];
                let _ = write!(line, "| {value:width$} ");
            }
            line.push('|');
            line
        }

        let header_line = render_line(headers, &widths);
        println!("{header_line}");
        let separator: String = widths
            .iter()
            .map(|width| format!("|{:-^1$}", "", width + 2))
            .collect::<Vec<_>>()
            .join("");
        println!("{separator}|");

        for row in rows {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            println!("{}", render_line(&cols, &widths));
        }
    }

    fn flatten(value: &str) -> String {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn truncate(value: &str, max: usize) -> String {
        if value.chars().count() <= max {
            value.to_string()
        } else {
            let mut truncated = value
                .chars()
                .take(max.saturating_sub(1))
                .collect::<String>();
            truncated.push('…');
            truncated
        }
    }
}

mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    pub fn spinner(message_enabled: bool, message: impl Into<String>) -> Option<ProgressBar> {
        if !message_enabled {
            return None;
        }
        let progress = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.set_message(message.into());
        progress.enable_steady_tick(Duration::from_millis(80));
        Some(progress)
    }
}
