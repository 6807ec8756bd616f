mod logging;
mod source;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, info};

use commitgraph_core::{EdgeStyle, GraphConfig, ImageFormat, DEFAULT_CONFIG_FILE};
use commitgraph_extract::mining::threshold_days_ago;
use commitgraph_render::Renderer;

#[derive(Parser)]
#[command(
    name = "commitgraph",
    version,
    about = "Render recent git history as a PlantUML graph",
    long_about = "Extract the commits of a git repository made within a recency window,\n\
                   write them as a PlantUML diagram description, and render it to an image\n\
                   with the PlantUML jar.\n\n\
                   Examples:\n  \
                     commitgraph graph --renderer plantuml.jar --repo .\n  \
                     commitgraph graph --renderer plantuml.jar --repo https://github.com/owner/project.git --days 7\n  \
                     commitgraph extract --repo . --output build\n  \
                     commitgraph render --renderer plantuml.jar --document build/graph.puml\n  \
                     commitgraph init"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .commitgraph.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Extract recent commits and render them to an image
    #[command(long_about = "Extract recent commits and render them to an image.\n\n\
        Rendering only runs when extraction succeeded.\n\n\
        Examples:\n  commitgraph graph --renderer plantuml.jar --repo .\n  commitgraph graph --repo git@github.com:owner/project.git --format svg")]
    Graph {
        #[command(flatten)]
        extract: ExtractArgs,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Write the PlantUML description of recent commits
    #[command(long_about = "Write the PlantUML description of recent commits.\n\n\
        Examples:\n  commitgraph extract --repo .\n  commitgraph extract --repo . --days 90 --edges parents")]
    Extract {
        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Render an existing PlantUML description
    #[command(long_about = "Render an existing PlantUML description.\n\n\
        The image is written next to the document with the same base name.\n\n\
        Examples:\n  commitgraph render --renderer plantuml.jar\n  commitgraph render --document build/graph.puml --format svg")]
    Render {
        /// Document to render (default: <output.dir>/<output.file_name>)
        #[arg(long)]
        document: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Create a .commitgraph.toml configuration file
    Init,
}

#[derive(Args)]
struct ExtractArgs {
    /// Repository path or remote URL (default: current directory)
    #[arg(long, default_value = ".")]
    repo: String,

    /// Output directory for the document, the image and any clone
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only include commits from the last N days (default: 30)
    #[arg(long)]
    days: Option<u32>,

    /// How commits are drawn: self-loop or parents
    #[arg(long)]
    edges: Option<EdgeStyle>,
}

#[derive(Args)]
struct RenderArgs {
    /// Path to the PlantUML jar
    #[arg(long)]
    renderer: Option<PathBuf>,

    /// Program used to launch the jar (default: java)
    #[arg(long)]
    java: Option<String>,

    /// Image format: png or svg
    #[arg(long)]
    format: Option<ImageFormat>,
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

const DEFAULT_CONFIG: &str = r#"# commitgraph configuration
# See: commitgraph --help

[renderer]
# Path to the PlantUML jar
# jar = "/opt/plantuml/plantuml.jar"
# Program used to launch the jar
java = "java"
# Image format: "png" or "svg"
format = "png"

[history]
# Only include commits from the last N days
since_days = 30
# How commits are drawn: "self-loop" or "parents"
edges = "self-loop"

[output]
# Directory for the document, the image and any cloned repository
dir = "output"
# Name of the PlantUML document
file_name = "graph.puml"
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };
    logging::setup_logger(cli.verbose, use_color);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        None => {
            println!("commitgraph v{}: run `commitgraph --help` for usage", env!("CARGO_PKG_VERSION"));
        }
        Some(Command::Init) => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                miette::bail!(miette::miette!(
                    help = "Edit the existing file or remove it first",
                    "{DEFAULT_CONFIG_FILE} already exists"
                ));
            }
            std::fs::write(path, DEFAULT_CONFIG)
                .into_diagnostic()
                .wrap_err(format!("Failed to write {DEFAULT_CONFIG_FILE}"))?;
            println!("Created {DEFAULT_CONFIG_FILE}");
        }
        Some(Command::Extract { extract }) => {
            apply_extract_args(&mut config, &extract);
            run_extract(&config, &extract.repo)?;
        }
        Some(Command::Render { document, render }) => {
            apply_render_args(&mut config, &render);
            let document = document.unwrap_or_else(|| config.document_path());
            run_render(&config, &document)?;
        }
        Some(Command::Graph { extract, render }) => {
            apply_extract_args(&mut config, &extract);
            apply_render_args(&mut config, &render);
            // Fail before touching the repository if rendering cannot happen.
            renderer_for(&config)?;
            let document = run_extract(&config, &extract.repo)?;
            run_render(&config, &document)?;
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<GraphConfig> {
    let config = match explicit {
        Some(path) => GraphConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                GraphConfig::from_file(default_path)?
            } else {
                GraphConfig::default()
            }
        }
    };
    debug!(?config, "loaded configuration");
    Ok(config)
}

fn apply_extract_args(config: &mut GraphConfig, args: &ExtractArgs) {
    if let Some(dir) = &args.output {
        config.output.dir = dir.clone();
    }
    if let Some(days) = args.days {
        config.history.since_days = days;
    }
    if let Some(edges) = args.edges {
        config.history.edges = edges;
    }
}

fn apply_render_args(config: &mut GraphConfig, args: &RenderArgs) {
    if let Some(jar) = &args.renderer {
        config.renderer.jar = Some(jar.clone());
    }
    if let Some(java) = &args.java {
        config.renderer.java = java.clone();
    }
    if let Some(format) = args.format {
        config.renderer.format = format;
    }
}

fn renderer_for(config: &GraphConfig) -> Result<Renderer> {
    let Some(jar) = &config.renderer.jar else {
        miette::bail!(miette::miette!(
            help = "Pass --renderer /path/to/plantuml.jar or set renderer.jar in .commitgraph.toml",
            "No PlantUML jar configured"
        ));
    };
    Ok(Renderer::new(jar)
        .with_java(&config.renderer.java)
        .with_format(config.renderer.format))
}

fn run_extract(config: &GraphConfig, source: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.output.dir)
        .into_diagnostic()
        .wrap_err(format!(
            "Failed to create output directory {}",
            config.output.dir.display()
        ))?;

    let repo_path = source::resolve(source, &config.output.dir)?;
    let document = config.document_path();
    let threshold = threshold_days_ago(config.history.since_days);

    info!(
        repo = %repo_path.display(),
        days = config.history.since_days,
        "extracting commit history"
    );
    let report = commitgraph_extract::extract_with(
        &repo_path,
        &document,
        threshold,
        config.history.edges,
    )?;
    eprintln!(
        "Wrote {} ({} of {} commits)",
        report.document.display(),
        report.commits_included,
        report.commits_seen
    );
    Ok(report.document)
}

fn run_render(config: &GraphConfig, document: &Path) -> Result<()> {
    let outcome = renderer_for(config)?.render(document)?;
    eprintln!("Rendered {}", outcome.image.display());
    Ok(())
}
