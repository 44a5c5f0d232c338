use clap::{Parser, Subcommand};
use quire::{config, output, pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Static site generator for essays published as ordered sequences")]
#[command(long_about = "\
Static site generator for essays published as ordered sequences

Markdown files become pages. Documents that share a `sequence` frontmatter key
are published together as a series with navigation; everything else is a
standalone page at the site root.

Site structure:

  site/
  ├── config.toml                      # Site config (optional)
  ├── contributors.json                # Author profile links (optional)
  └── posts/
      ├── 2024-03-01-hello.md          # Standalone → hello.html
      ├── about.md                     # Built, hidden from the home page
      └── quickstart/
          ├── sequence-metadata.yaml   # Sequence title, authors, colors
          ├── 01-intro.md              # sequence: quickstart → quickstart/intro.html
          └── 02-setup.md

Metadata resolution (first available wins):
  Slug:   frontmatter → filename without date/number prefix
  Title:  frontmatter → first `# ` heading → slug
  Date:   frontmatter → filename date prefix

Outputs: one page per document, index.html, openquestions.html, feed.xml.

Run 'quire gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full site: metadata pass, render pass, aggregate pages
    Build,
    /// Resolve the content graph without rendering anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            println!("==> Reading {}", cli.source.display());
            let site = pipeline::load_site(&cli.source)?;
            init_thread_pool(&site.config.processing);

            println!("==> Rendering \u{2192} {}", cli.output.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = pipeline::build_site(
                &site,
                &quire::render::MarkdownRenderer,
                &cli.output,
                Some(tx),
            );
            printer.join().ok();
            output::print_build_summary(&report?);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site = pipeline::load_site(&cli.source)?;
            output::print_check_output(&site);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the `-v` level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Size the global rayon pool from `[processing] max_processes`.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
