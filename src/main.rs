// src/main.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use differ::packages::{PackageList, dpkg};
use differ::{DiffOptions, DiffResult, FieldOrdering, Image, VersionComponents};
use std::cmp::Ordering;
use std::fs;
use std::io::{self, Read};
use tracing::info;

/// Output format for diff reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "differ")]
#[command(author, version, about = "Package-level diffs between image releases", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two package-list JSON documents
    Diff {
        /// Package list of the older release
        baseline: String,
        /// Package list of the newer release
        current: String,
        /// Compare all-digit version fields numerically
        #[arg(short, long)]
        numeric: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Diff two releases of an image JSON document
    ReleaseDiff {
        /// Image document ({"name", "url", "releases": [...]})
        image: String,
        /// Digest of the older release
        old_digest: String,
        /// Digest of the newer release
        new_digest: String,
        /// Compare all-digit version fields numerically
        #[arg(short, long)]
        numeric: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Show the most recent release of an image JSON document
    Latest {
        /// Image document
        image: String,
    },
    /// Compare two version strings
    Compare {
        a: String,
        b: String,
        /// Compare all-digit version fields numerically
        #[arg(short, long)]
        numeric: bool,
    },
    /// Convert dpkg output into a package-list JSON document
    DpkgImport {
        /// Input file (reads stdin if omitted)
        input: Option<String>,
        /// Input is the dpkg status database instead of `dpkg -l` output
        #[arg(short, long)]
        status: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

fn diff_options(numeric: bool) -> DiffOptions {
    if numeric {
        DiffOptions::with_ordering(FieldOrdering::Numeric)
    } else {
        DiffOptions::default()
    }
}

fn load_image(path: &str) -> Result<Image> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid image document: {}", path))
}

fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path)),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Render a diff as a human-readable report
fn render_text(result: &DiffResult) -> String {
    let mut out = String::new();

    for entry in &result.added {
        out.push_str(&format!(
            "+ {} {}\n",
            entry.name,
            entry.new_version.as_deref().unwrap_or_default()
        ));
    }
    for (marker, entries) in [("^", &result.upgraded), ("v", &result.downgraded)] {
        for entry in entries {
            out.push_str(&format!(
                "{} {} {} -> {}\n",
                marker,
                entry.name,
                entry.previous_version.as_deref().unwrap_or_default(),
                entry.new_version.as_deref().unwrap_or_default()
            ));
        }
    }
    for entry in &result.removed {
        out.push_str(&format!(
            "- {} {}\n",
            entry.name,
            entry.previous_version.as_deref().unwrap_or_default()
        ));
    }

    out.push_str(&format!(
        "\n{} added, {} upgraded, {} downgraded, {} removed\n",
        result.added.len(),
        result.upgraded.len(),
        result.downgraded.len(),
        result.removed.len()
    ));
    out
}

fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Diff {
            baseline,
            current,
            numeric,
            format,
        }) => {
            info!("Diffing {} against {}", current, baseline);

            let baseline = PackageList::load(&baseline)?.package_set();
            let current = PackageList::load(&current)?.package_set();
            let result = differ::diff_with(&current, &baseline, &diff_options(numeric));

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => print!("{}", render_text(&result)),
            }

            Ok(())
        }
        Some(Commands::ReleaseDiff {
            image,
            old_digest,
            new_digest,
            numeric,
            format,
        }) => {
            let image = load_image(&image)?;
            info!(
                "Diffing release {} against {} of image {}",
                new_digest, old_digest, image.name
            );

            let report = image.diff_releases(&old_digest, &new_digest, &diff_options(numeric))?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    println!("{} -> {}", report.old_digest, report.new_digest);
                    print!("{}", render_text(&report.diff));
                }
            }

            Ok(())
        }
        Some(Commands::Latest { image }) => {
            let image = load_image(&image)?;

            match image.latest_release() {
                Some(release) => {
                    println!("{} {}", release.digest, release.date.to_rfc3339());
                    println!("  Packages: {}", release.packages.len());
                }
                None => println!("Image {} has no releases.", image.name),
            }

            Ok(())
        }
        Some(Commands::Compare { a, b, numeric }) => {
            let ordering = diff_options(numeric).ordering;
            let left = VersionComponents::parse(&a);
            let right = VersionComponents::parse(&b);

            println!("{} {} {}", a, ordering_symbol(left.compare_with(&right, ordering)), b);
            println!("  {}: {:?}", a, left);
            println!("  {}: {:?}", b, right);

            Ok(())
        }
        Some(Commands::DpkgImport { input, status }) => {
            let content = read_input(input.as_deref())?;

            let packages = if status {
                dpkg::parse_status_file(&content)?
            } else {
                dpkg::parse_dpkg_list(&content)
            };
            info!("Imported {} packages", packages.len());

            println!("{}", PackageList::new(packages).to_json_pretty()?);
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "differ", &mut io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Differ v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'differ --help' for usage information");
            Ok(())
        }
    }
}
