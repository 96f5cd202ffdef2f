use clap::{Parser, Subcommand};
use coursegen::{config, generate, output, scan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coursegen")]
#[command(about = "Static site generator for programming-course websites")]
#[command(long_about = "\
Static site generator for programming-course websites

Your filesystem is the data source. Numbered markdown files become lessons,
numbered directories become chapters, and vocabulary.toml becomes a
cross-linked glossary and bibliography.

Content structure:

  course/
  ├── config.toml                  # Site config (optional)
  ├── vocabulary.toml              # Terms + bibliography (optional)
  ├── 010-getting-started.md       # Lesson (numbered = shown in nav)
  ├── 020-variables.md
  ├── 030-Control-Flow/            # Chapter (one level of nesting)
  │   ├── 010-if-else.md
  │   └── 020-loops.md
  └── drafts/                      # No number prefix = hidden from nav
      └── scratch.md

Lesson markdown may reference vocabulary with [[Name]] or [[Name|display
text]]; references resolve to links and feed the glossary's back-links.

Run 'coursegen gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Course content directory
    #[arg(long, default_value = "course", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for the intermediate manifest
    #[arg(long, default_value = ".coursegen-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the course directory into a manifest
    Scan,
    /// Produce the final HTML site from an existing manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content and vocabulary without writing the site
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let report = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate_site(&manifest, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);
            // Dry-run generation into a scratch dir surfaces unresolved
            // references and duplicate-vocabulary warnings.
            let scratch = tempdir_for_check(&cli.temp_dir)?;
            let result = generate::generate_site(&manifest, &scratch);
            std::fs::remove_dir_all(&scratch)?;
            let report = result?;
            output::print_generate_output(&report);
            if report.warnings.is_empty() {
                println!("==> Content is valid");
            } else {
                println!("==> Content has {} warning(s)", report.warnings.len());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Scratch output directory for `check` dry runs.
fn tempdir_for_check(temp_dir: &std::path::Path) -> std::io::Result<PathBuf> {
    let scratch = temp_dir.join("check-output");
    std::fs::create_dir_all(&scratch)?;
    Ok(scratch)
}
