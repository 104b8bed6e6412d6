//! docoutline CLI - document outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docoutline::batch::collect_inputs;
use docoutline::render::{links_to_json, links_to_text, outline_to_text, to_json};
use docoutline::structure::FontStatistics;
use docoutline::{Docoutline, HeadingLevel, JsonFormat, OutlineOptions, Warning};

#[derive(Parser)]
#[command(name = "docoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document outlines and semantic heading links", long_about = None)]
struct Cli {
    /// JSON file with extraction options
    #[arg(long, global = true, value_name = "FILE", env = "DOCOUTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Linear heading classifier artifact (enables the classifier fallback)
    #[arg(long, global = true, value_name = "FILE", env = "DOCOUTLINE_MODEL")]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title and outline
    #[command(alias = "outline")]
    Structure {
        /// Input layout file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print an indented outline instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,
    },

    /// Generate semantic links between headings
    Links {
        /// Input layout file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum links per heading
        #[arg(long, value_name = "N")]
        top_k: Option<usize>,

        /// Minimum similarity (exclusive)
        #[arg(long, value_name = "SCORE")]
        threshold: Option<f32>,

        /// Link large-text lines instead of outline headings
        #[arg(long)]
        large_text: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print one link per line instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,
    },

    /// Process many layout files in parallel
    Batch {
        /// Input layout files or directories
        #[arg(value_name = "PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Also write semantic links per document
        #[arg(long)]
        links: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Rank outline sections against a query
    Rank {
        /// Input layout file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Query text (e.g. a persona or job description)
        #[arg(short, long)]
        query: String,

        /// Number of sections to return
        #[arg(long, default_value = "5")]
        top: usize,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show layout and font statistics
    Info {
        /// Input layout file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Structure {
            input,
            output,
            compact,
            text,
        } => cmd_structure(&cli, input, output.as_deref(), *compact, *text),
        Commands::Links {
            input,
            output,
            top_k,
            threshold,
            large_text,
            compact,
            text,
        } => cmd_links(
            &cli,
            input,
            output.as_deref(),
            *top_k,
            *threshold,
            *large_text,
            *compact,
            *text,
        ),
        Commands::Batch {
            inputs,
            output,
            links,
            compact,
        } => cmd_batch(&cli, inputs, output, *links, *compact),
        Commands::Rank {
            input,
            query,
            top,
            compact,
        } => cmd_rank(&cli, input, query, *top, *compact),
        Commands::Info { input, json } => cmd_info(&cli, input, *json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Build the extraction builder from global flags.
fn builder(cli: &Cli) -> Result<Docoutline, Box<dyn std::error::Error>> {
    let options = match &cli.config {
        Some(path) => {
            log::debug!("Loading options from {}", path.display());
            OutlineOptions::from_json_file(path)?
        }
        None => OutlineOptions::default(),
    };
    let mut builder = Docoutline::new().with_options(options);
    if let Some(model) = &cli.model {
        log::debug!("Using heading classifier {}", model.display());
        builder = builder.with_model(model)?;
    }
    Ok(builder)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn emit(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}

fn cmd_structure(
    cli: &Cli,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    text: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = builder(cli)?.extract(input)?;
    report_warnings(&extraction.warnings);

    let content = if text {
        outline_to_text(&extraction.structure)
    } else {
        to_json(&extraction.structure, json_format(compact))?
    };
    emit(&content, output)
}

#[allow(clippy::too_many_arguments)]
fn cmd_links(
    cli: &Cli,
    input: &Path,
    output: Option<&Path>,
    top_k: Option<usize>,
    threshold: Option<f32>,
    large_text: bool,
    compact: bool,
    text: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = builder(cli)?;
    if let Some(k) = top_k {
        builder = builder.with_top_k(k);
    }
    if let Some(t) = threshold {
        builder = builder.with_threshold(t);
    }
    if large_text {
        builder = builder.large_text_links();
    }

    let links = builder.links(input)?;
    let content = if text {
        links_to_text(&links)
    } else {
        links_to_json(&docoutline::batch::document_id(input), &links, json_format(compact))?
    };
    emit(&content, output)
}

fn cmd_batch(
    cli: &Cli,
    inputs: &[PathBuf],
    output: &Path,
    links: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = builder(cli)?;
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        println!("{}", "No layout files found".yellow());
        return Ok(());
    }

    let mut processor = builder
        .batch()
        .with_output_dir(output)
        .with_format(json_format(compact));
    if links {
        processor = processor.with_linker(builder.linker());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = processor.run_with_progress(&files, |item| {
        pb.set_message(item.input.display().to_string());
        if let Err(e) = &item.result {
            pb.println(format!("{} {}: {}", "✗".red(), item.input.display(), e));
        }
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    println!();
    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), report.items.len());
    println!("{}: {}", "Succeeded".bold(), report.succeeded().to_string().green());
    println!("{}: {}", "Failed".bold(), report.failed().to_string().red());
    println!("{}: {}", "With warnings".bold(), report.with_warnings());
    println!("{}: {:.2?}", "Elapsed".bold(), report.elapsed);
    println!("{}: {}", "Output".bold(), output.display());

    Ok(())
}

fn cmd_rank(
    cli: &Cli,
    input: &Path,
    query: &str,
    top: usize,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = builder(cli)?.rank(input, query, top)?;
    println!("{}", to_json(&report, json_format(compact))?);
    Ok(())
}

fn cmd_info(cli: &Cli, input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = builder(cli)?.extract(input)?;
    let stats = FontStatistics::from_lines(extraction.lines.iter().flatten());
    let line_count: usize = extraction.lines.iter().map(Vec::len).sum();
    let structure = &extraction.structure;

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "title": structure.title,
            "pages": extraction.lines.len(),
            "lines": line_count,
            "body_font_size": stats.body_size,
            "body_font": stats.body_font,
            "fonts": stats.unique_fonts,
            "heading_sizes": stats.heading_sizes,
            "path": extraction.path,
            "headings": structure.outline.len(),
            "warnings": extraction.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), structure.title);
    println!("{}: {}", "Pages".bold(), extraction.lines.len());
    println!("{}: {}", "Lines".bold(), line_count);

    println!();
    println!("{}", "Font Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {:.1}pt", "Body size".bold(), stats.body_size);
    if let Some(ref font) = stats.body_font {
        println!("{}: {}", "Body font".bold(), font);
    }
    println!("{}: {}", "Fonts".bold(), stats.unique_fonts.len());
    println!("{}: {:?}", "Heading sizes".bold(), stats.heading_sizes);

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Source".bold(), extraction.path);
    for level in [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3] {
        println!("{}: {}", level.as_str().bold(), structure.count_level(level));
    }
    report_warnings(&extraction.warnings);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document outline extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure_command() {
        let cli = Cli::try_parse_from(["docoutline", "structure", "report.json", "--compact"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Structure { compact: true, text: false, .. }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docoutline",
            "links",
            "manual.json",
            "--top-k",
            "5",
            "--model",
            "model.json",
        ])
        .unwrap();
        assert_eq!(cli.model, Some(PathBuf::from("model.json")));
        assert!(matches!(cli.command, Commands::Links { top_k: Some(5), .. }));
    }

    #[test]
    fn test_batch_requires_output() {
        assert!(Cli::try_parse_from(["docoutline", "batch", "docs/"]).is_err());
    }

    #[test]
    fn test_builder_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"top_k": 7, "skip_first_page": true}"#).unwrap();

        let cli = Cli::try_parse_from([
            "docoutline",
            "--config",
            config.to_str().unwrap(),
            "version",
        ])
        .unwrap();
        let linker = builder(&cli).unwrap().linker();
        assert!(format!("{:?}", linker).contains("top_k: 7"));
    }
}
