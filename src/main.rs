use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use impact_core::{Commit, FileAnalysisOverrides, HistoryConfig, ImpactConfig, OutputFormat};
use impact_pulse::analyzer::{analyze_file, analyze_repository, FileAnalysis};
use impact_pulse::mining::{mine_history, MiningOptions};
use impact_pulse::risk::RiskLevel;
use impact_reports::standup::generate_standup;
use impact_reports::store::{default_data_path, ActivityLog};
use impact_reports::summary::{generate_summary, Period};

#[derive(Parser)]
#[command(
    name = "impact",
    version,
    about = "Developer activity journal and file risk analysis",
    long_about = "impact turns your commit history into standups, period summaries,\n\
                   and change-risk signals for individual files.\n\n\
                   Reads the activity data synced from GitHub (~/.impact-journal/data.json),\n\
                   or mines a local git repository directly.\n\n\
                   Examples:\n  \
                     impact file-risk src/net/client.rs       How risky is this file to change?\n  \
                     impact file-risk src/lib.rs --repo .     Same, from local git history\n  \
                     impact hotspots --repo . --limit 10      Rank recently touched files by risk\n  \
                     impact standup                           Yesterday's commits and open PRs\n  \
                     impact summary --period month            This month's activity\n  \
                     impact mcp                               Serve the tools over MCP"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .impact.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the synced activity data (default: ~/.impact-journal/data.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Assess how risky it is to change a file
    #[command(long_about = "Assess how risky it is to change a file.\n\n\
        Compares the file's commits in the recent window against repository averages,\n\
        measures the share of bug-fix commits, and checks whether activity is rising\n\
        relative to the preceding baseline window. Reports HIGH, MEDIUM, LOW, or UNKNOWN\n\
        with the reasons behind the verdict.\n\n\
        The path must match commit history exactly (no normalization).\n\n\
        Examples:\n  impact file-risk bluetooth/connection.ts\n  impact file-risk src/lib.rs --repo . --recent-days 30\n  impact file-risk src/api.rs --keyword fix --keyword regression")]
    FileRisk {
        /// File path as recorded in commit history
        file: String,

        /// Analyze this local git repository instead of synced data
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Recent window length in days (default: 90)
        #[arg(long)]
        recent_days: Option<u32>,

        /// Baseline window length in days (default: 90)
        #[arg(long)]
        baseline_days: Option<u32>,

        /// Bug-fix keyword (repeatable; replaces the default list)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Rank recently touched files by risk
    #[command(long_about = "Rank recently touched files by risk.\n\n\
        Runs the file risk analysis for every file touched in the recent window,\n\
        most risky first.\n\n\
        Examples:\n  impact hotspots\n  impact hotspots --repo . --limit 10 --format json")]
    Hotspots {
        /// Analyze this local git repository instead of synced data
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Maximum results to show (default: 20)
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show yesterday's commits and open pull requests
    Standup,
    /// Summarize activity for today, this week, or this month
    #[command(long_about = "Summarize activity for today, this week, or this month.\n\n\
        Weeks start on Sunday. Commits are grouped by repository.\n\n\
        Examples:\n  impact summary\n  impact summary --period today")]
    Summary {
        /// Period to summarize: today, week, month
        #[arg(long, default_value = "week")]
        period: Period,
    },
    /// Start the MCP server (stdio transport)
    #[command(long_about = "Start the MCP server on stdio transport.\n\n\
        Exposes file_risk, get_hotspots, get_standup, and get_summary to IDEs and agents.\n\n\
        Example configuration:\n  {\"mcpServers\": {\"impact\": {\"command\": \"impact\", \"args\": [\"mcp\"]}}}")]
    Mcp {
        /// Repository root that local `repo` arguments resolve against
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Create a default .impact.toml configuration file
    #[command(long_about = "Create a default .impact.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .impact.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1mimpact\x1b[0m v{version}: your commit history as a journal\n");

        println!("Quick start:");
        println!("  \x1b[36mimpact init\x1b[0m                   Create a .impact.toml config file");
        println!("  \x1b[36mimpact standup\x1b[0m                Yesterday's commits and open PRs");
        println!("  \x1b[36mimpact file-risk <FILE>\x1b[0m       How risky is this file to change?\n");

        println!("All commands:");
        println!("  \x1b[32mfile-risk\x1b[0m  Risk verdict for a single file");
        println!("  \x1b[32mhotspots\x1b[0m   Recently touched files ranked by risk");
        println!("  \x1b[32mstandup\x1b[0m    Yesterday's commits and open pull requests");
        println!("  \x1b[32msummary\x1b[0m    Activity for today, this week, or this month");
        println!("  \x1b[32mmcp\x1b[0m        MCP server for IDEs and agents");
        println!("  \x1b[32minit\x1b[0m       Create a configuration file\n");
    } else {
        println!("impact v{version}: your commit history as a journal\n");

        println!("Quick start:");
        println!("  impact init                   Create a .impact.toml config file");
        println!("  impact standup                Yesterday's commits and open PRs");
        println!("  impact file-risk <FILE>       How risky is this file to change?\n");

        println!("All commands:");
        println!("  file-risk  Risk verdict for a single file");
        println!("  hotspots   Recently touched files ranked by risk");
        println!("  standup    Yesterday's commits and open pull requests");
        println!("  summary    Activity for today, this week, or this month");
        println!("  mcp        MCP server for IDEs and agents");
        println!("  init       Create a configuration file\n");
    }

    println!("Run 'impact <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries command output and the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ImpactConfig> {
    match path {
        Some(path) => Ok(ImpactConfig::from_file(path)?),
        None => {
            let default_path = Path::new(".impact.toml");
            if default_path.exists() {
                Ok(ImpactConfig::from_file(default_path)?)
            } else {
                Ok(ImpactConfig::default())
            }
        }
    }
}

fn load_commits(
    repo: Option<&Path>,
    data_path: &Path,
    history: &HistoryConfig,
) -> Result<Vec<Commit>> {
    match repo {
        Some(path) => {
            if !path.join(".git").exists() {
                miette::bail!(miette::miette!(
                    help = "Point --repo at a git working tree, or drop --repo to use synced data",
                    "Not a git repository: {}",
                    path.display()
                ));
            }
            let options = MiningOptions::from(history);
            match options.since_days {
                Some(days) => eprintln!(
                    "Mining git history at {} (last {days} days)...",
                    path.display()
                ),
                None => eprintln!("Mining git history at {}...", path.display()),
            }
            let commits = mine_history(path, &options, Utc::now())?;
            eprintln!("Analyzed {} commits.", commits.len());
            Ok(commits)
        }
        None => Ok(ActivityLog::load_required(data_path)?.all_commits()),
    }
}

fn paint_level(level: RiskLevel, use_color: bool) -> String {
    if !use_color {
        return level.to_string();
    }
    let code = match level {
        RiskLevel::High => "31",
        RiskLevel::Medium => "33",
        RiskLevel::Low => "32",
        RiskLevel::Unknown => "90",
    };
    format!("\x1b[1;{code}m{level}\x1b[0m")
}

fn print_hotspots(hotspots: &[FileAnalysis], recent_days: u32, use_color: bool) {
    if hotspots.is_empty() {
        println!("No files changed in the last {recent_days} days.");
        return;
    }

    println!(
        "{:<8} {:>6} {:>6} {:>5} {:<17} FILE",
        "RISK", "RECENT", "xAVG", "BUG%", "TREND"
    );
    for h in hotspots {
        let level = format!("{:<8}", h.risk_level);
        let level = if use_color {
            level.replacen(
                &h.risk_level.to_string(),
                &paint_level(h.risk_level, true),
                1,
            )
        } else {
            level
        };
        println!(
            "{level} {:>6} {:>6} {:>4}% {:<17} {}",
            h.recent_commits,
            format!("{}x", h.activity_multiplier),
            h.bug_fix_percentage,
            format!("{} ({}%)", h.trend_direction, h.trend_percentage),
            h.filename
        );
    }
}

fn print_hotspots_markdown(hotspots: &[FileAnalysis]) {
    println!("# Hotspots\n");
    println!("| Risk | File | Recent | Multiplier | Bug fixes | Trend |");
    println!("|------|------|--------|------------|-----------|-------|");
    for h in hotspots {
        println!(
            "| {} | `{}` | {} | {}x | {}% | {} ({}%) |",
            h.risk_level,
            h.filename,
            h.recent_commits,
            h.activity_multiplier,
            h.bug_fix_percentage,
            h.trend_direction,
            h.trend_percentage
        );
    }
}

const DEFAULT_CONFIG: &str = r#"# impact configuration

[analysis]
# Days counted as "recent" activity.
# recent_window_days = 90
# Days before the recent window used as the comparison baseline.
# baseline_window_days = 90
# Commit message keywords marking a bug fix (replaces the defaults).
# bug_fix_keywords = ["fix", "bug", "bugfix", "hotfix", "patch", "issue", "revert", "rollback"]

[data]
# Synced GitHub activity (default: ~/.impact-journal/data.json)
# path = "/path/to/data.json"

[history]
# Used with --repo: only mine the last N days (default: whole history)
# since_days = 365
# Skip commits touching more files than this
# max_files_per_commit = 25
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let data_path = cli
        .data
        .clone()
        .or_else(|| config.data.path.clone())
        .unwrap_or_else(default_data_path);

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    tracing::debug!(format = %cli.format, data = %data_path.display(), "resolved settings");

    match cli.command {
        None => {
            print_welcome(use_color);
        }
        Some(Command::FileRisk {
            ref file,
            ref repo,
            recent_days,
            baseline_days,
            ref keywords,
        }) => {
            let overrides = FileAnalysisOverrides {
                recent_window_days: recent_days,
                baseline_window_days: baseline_days,
                bug_fix_keywords: (!keywords.is_empty()).then(|| keywords.clone()),
            };
            let analysis_config = overrides.layered_over(&config.analysis).resolve();

            let commits = load_commits(repo.as_deref(), &data_path, &config.history)?;
            let analysis = analyze_file(file, &commits, &analysis_config, Utc::now());

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&analysis).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => print!("{}", analysis.to_markdown()),
                OutputFormat::Text => {
                    if analysis.total_commits == 0 {
                        eprintln!(
                            "warning: no commits touch '{file}'. Paths must match history exactly."
                        );
                    }
                    print!("{analysis}");
                }
            }
        }
        Some(Command::Hotspots { ref repo, limit }) => {
            let analysis_config = config.analysis.resolve();
            let commits = load_commits(repo.as_deref(), &data_path, &config.history)?;
            let mut hotspots = analyze_repository(&commits, &analysis_config, Utc::now());
            hotspots.truncate(limit);

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&hotspots).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => print_hotspots_markdown(&hotspots),
                OutputFormat::Text => {
                    print_hotspots(&hotspots, analysis_config.recent_window_days, use_color)
                }
            }
        }
        Some(Command::Standup) => {
            let log = ActivityLog::load_required(&data_path)?;
            let standup = generate_standup(&log, &Local::now());
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&standup).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => print!("{}", standup.to_markdown()),
                OutputFormat::Text => println!("{standup}"),
            }
        }
        Some(Command::Summary { period }) => {
            let log = ActivityLog::load_required(&data_path)?;
            let summary = generate_summary(&log, period, &Local::now());
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&summary).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => print!("{}", summary.to_markdown()),
                OutputFormat::Text => println!("{summary}"),
            }
        }
        Some(Command::Mcp { ref path }) => {
            let server = impact_mcp::tools::ImpactServer::new(path.clone(), data_path)
                .with_analysis(config.analysis.resolve())
                .with_history(config.history.clone());
            impact_mcp::server::run_server(server).await?;
        }
        Some(Command::Init) => {
            let path = Path::new(".impact.toml");
            if path.exists() {
                miette::bail!(".impact.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .impact.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "impact", &mut std::io::stdout());
        }
    }

    Ok(())
}
