use anyhow::{Context, Result, bail};
use changelog::{parse, parse_strict};
use clap::{Args, Parser, Subcommand};
use gh_bot_config::BotConfig;
use history_bot::events::{self, CreateEvent, IssueCommentEvent, ReleaseEvent};
use history_bot::{
    MergeAndLabel, Outcome, close_milestone_on_release, create_release_on_tag, release_notes,
};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Merge pull requests on command and keep History.markdown in sync
#[derive(Parser)]
#[command(name = "history-bot", version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: .history-bot.toml in the working directory, then $HOME)
    #[arg(long, global = true, env = "HISTORY_BOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle an issue_comment event: merge, delete branch, label, update history
    MergeAndLabel(PayloadArgs),

    /// Handle a create event: publish a release for a version tag
    Release(PayloadArgs),

    /// Handle a release event: close the milestone named after the tag
    CloseMilestone(PayloadArgs),

    /// Rewrite a changelog in canonical form
    Fmt {
        /// Changelog file
        file: PathBuf,

        /// Fail instead of rewriting when the file is not canonical
        #[arg(long)]
        check: bool,

        /// Reject lines the lenient parser would silently absorb
        #[arg(long)]
        strict: bool,
    },

    /// Print the release body a tag would get
    Notes {
        /// Changelog file
        file: PathBuf,

        /// Version tag, e.g. v3.0.1
        tag: String,
    },
}

#[derive(Args)]
pub struct PayloadArgs {
    /// Webhook JSON payload file, or - for stdin
    #[arg(long, default_value = "-")]
    pub payload: String,
}

impl Cli {
    pub fn load_config(&self) -> Result<BotConfig> {
        match &self.config {
            Some(path) => BotConfig::from_path(path),
            None => Ok(BotConfig::load()),
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    match cli.command {
        Commands::MergeAndLabel(args) => {
            let event: IssueCommentEvent = events::from_json(&read_payload(&args.payload)?)?;
            let client = gh_client::connect(config.host.as_deref()).await?;
            match MergeAndLabel::new(&client, &config).handle(&event).await? {
                Outcome::NotApplicable(reason) => println!("Nothing to do: {}", reason),
                Outcome::Handled(report) => {
                    println!("Merged {} (section: {})", report.reference, report.section);
                    println!("  delete branch: {}", report.delete_branch);
                    println!("  labels:        {}", report.labels);
                    println!("  history:       {}", report.history);
                    if report.has_failures() {
                        log::warn!("{} merged, but some follow-up steps failed", report.reference);
                    }
                }
            }
        }
        Commands::Release(args) => {
            let event: CreateEvent = events::from_json(&read_payload(&args.payload)?)?;
            let client = gh_client::connect(config.host.as_deref()).await?;
            match create_release_on_tag(&client, &config, &event).await? {
                Outcome::NotApplicable(reason) => println!("Nothing to do: {}", reason),
                Outcome::Handled(notes) => {
                    println!("Released {} from {}", notes.tag, notes.version)
                }
            }
        }
        Commands::CloseMilestone(args) => {
            let event: ReleaseEvent = events::from_json(&read_payload(&args.payload)?)?;
            let client = gh_client::connect(config.host.as_deref()).await?;
            match close_milestone_on_release(&client, &event).await? {
                Outcome::NotApplicable(reason) => println!("Nothing to do: {}", reason),
                Outcome::Handled(closed) => println!("Closed milestones: {:?}", closed),
            }
        }
        Commands::Fmt {
            file,
            check,
            strict,
        } => format_file(&file, check, strict)?,
        Commands::Notes { file, tag } => {
            let text = read_file(&file)?;
            let notes = release_notes(&parse(&text), &tag, &file.display().to_string())?;
            println!("{}", notes.body);
        }
    }

    Ok(())
}

fn format_file(file: &Path, check: bool, strict: bool) -> Result<()> {
    let text = read_file(file)?;

    let changes = if strict {
        match parse_strict(&text) {
            Ok(changes) => changes,
            Err(violations) => {
                for violation in &violations {
                    eprintln!("{}:{}: {}", file.display(), violation.line(), violation);
                }
                bail!("{} has {} problem(s)", file.display(), violations.len());
            }
        }
    } else {
        parse(&text)
    };

    let rendered = changes.to_string();
    if rendered == text {
        log::info!("{} is already formatted", file.display());
        return Ok(());
    }
    if check {
        bail!("{} is not formatted", file.display());
    }

    std::fs::write(file, rendered)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    log::info!("Formatted {}", file.display());
    Ok(())
}

fn read_file(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn read_payload(source: &str) -> Result<String> {
    if source == "-" {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("Failed to read payload from stdin")?;
        Ok(payload)
    } else {
        read_file(Path::new(source))
    }
}
