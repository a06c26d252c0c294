//! Allocator dump visualizer CLI
//!
//! Renders dumps as folded trees in the terminal, either from a local file
//! or from a running visualizer server.
//!
//! # Usage
//!
//! ```bash
//! # Render every frame of a local dump, two levels deep
//! viz_cli show dump.json --depth 2
//!
//! # Allocation listing with reachability flags
//! viz_cli allocs dump.json
//!
//! # Browse a server's dumps, largest first
//! viz_cli remote list --server http://localhost:3000 --query run
//! viz_cli remote show runs/main.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};

use alloc_viz::config::DEFAULT_SERVER_URL;
use alloc_viz::graph::FlatForest;
use alloc_viz::source::{
    DocumentSource, ListingQuery, RemoteSource, SortCriterion, SortField,
};
use alloc_viz::visualizer::{LineStyle, RenderOptions, TextLine, Viewer};

#[derive(Parser)]
#[command(name = "viz_cli")]
#[command(version = "0.1.0")]
#[command(about = "Explore allocator state dumps as cycle-safe trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: pretty (default) or json
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Filename,
    Size,
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Collapse nodes at this depth and below (roots are depth 0)
    #[arg(long)]
    depth: Option<usize>,

    /// Print long type names, byte dumps and messages in full, with node anchors
    #[arg(long)]
    full: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every frame of a local dump
    Show {
        path: PathBuf,
        #[command(flatten)]
        args: ShowArgs,
    },

    /// List allocations and whether anything references them
    Allocs { path: PathBuf },

    /// Work with dumps served by a visualizer server
    Remote {
        /// Server base URL
        #[arg(long, env = "VIZ_SERVER", default_value = DEFAULT_SERVER_URL, global = true)]
        server: String,

        #[command(subcommand)]
        command: RemoteCommands,
    },
}

#[derive(Subcommand)]
enum RemoteCommands {
    /// List the server's dump files
    List {
        /// Only show filenames containing this text
        #[arg(long, short, default_value = "")]
        query: String,

        #[arg(long, value_enum, default_value = "size")]
        sort: SortArg,

        /// Sort smallest / A-Z first
        #[arg(long)]
        ascending: bool,
    },

    /// Fetch a dump and render it
    Show {
        name: String,
        #[command(flatten)]
        args: ShowArgs,
    },
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alloc_viz=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Show { path, args } => cmd_show(&path, &args, cli.format),
        Commands::Allocs { path } => cmd_allocs(&path, cli.format),
        Commands::Remote { server, command } => match command {
            RemoteCommands::List {
                query,
                sort,
                ascending,
            } => cmd_remote_list(&server, query, sort, ascending, cli.format).await,
            RemoteCommands::Show { name, args } => {
                cmd_remote_show(&server, &name, &args, cli.format).await
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn load_local(path: &PathBuf) -> anyhow::Result<Viewer> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut viewer = Viewer::new();
    viewer.load_text(&text)?;
    Ok(viewer)
}

fn cmd_show(path: &PathBuf, args: &ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut viewer = load_local(path)?;
    print_viewer(&mut viewer, args, format)
}

fn cmd_allocs(path: &PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let viewer = load_local(path)?;
    let Some(report) = viewer.allocation_report() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Pretty => {
            println!("{}", report.header().bold());
            for row in &report.rows {
                let flag = match (row.reachable, row.reachable_from_roots) {
                    (true, true) => "reachable".green(),
                    (true, false) => "reachable (not from roots)".yellow(),
                    (false, _) => "unreferenced".red(),
                };
                println!("  alloc {:>6}  {:>8} bytes  {}", row.id.get(), row.size, flag);
            }
        }
    }
    Ok(())
}

async fn cmd_remote_list(
    server: &str,
    query: String,
    sort: SortArg,
    ascending: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let remote = RemoteSource::new(server)?;
    let files = remote.list().await?;

    let field = match sort {
        SortArg::Filename => SortField::Filename,
        SortArg::Size => SortField::Size,
    };
    let view = ListingQuery::new(
        query,
        SortCriterion {
            field,
            descending: !ascending,
        },
    )
    .apply(files);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.entries)?),
        OutputFormat::Pretty => {
            for entry in &view.entries {
                println!("{:>12} bytes  {}", entry.size, entry.filename);
            }
            if view.is_truncated() {
                println!(
                    "{}",
                    format!(
                        "Only first {} of {} results shown.",
                        view.entries.len(),
                        view.total_matches
                    )
                    .dimmed()
                );
            }
        }
    }
    Ok(())
}

async fn cmd_remote_show(
    server: &str,
    name: &str,
    args: &ShowArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let remote = RemoteSource::new(server)?;
    let text = remote
        .fetch(name)
        .await
        .with_context(|| format!("failed to fetch {name} from {server}"))?;
    let mut viewer = Viewer::new();
    viewer.load_text(&text)?;
    print_viewer(&mut viewer, args, format)
}

fn print_viewer(viewer: &mut Viewer, args: &ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        let forest = FlatForest::from_frames(viewer.frames());
        println!("{}", serde_json::to_string_pretty(&forest)?);
        return Ok(());
    }

    if let Some(depth) = args.depth {
        viewer.collapse_below(depth);
    }
    let options = RenderOptions {
        full_text: args.full,
    };
    for line in viewer.render(&options) {
        println!("{}", paint(&line));
    }
    Ok(())
}

fn paint(line: &TextLine) -> ColoredString {
    let text = line.to_string();
    match line.style {
        LineStyle::Frame => text.bold(),
        LineStyle::Header | LineStyle::Bytes => text.normal(),
        LineStyle::Loop => text.green(),
        LineStyle::Missing => text.yellow(),
        LineStyle::Info => text.blue(),
        LineStyle::Error => text.red(),
    }
}
