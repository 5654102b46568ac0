use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use covgate::cli;
use covgate::outcome::{ExitCode, Policy};
use covgate::render::{AnnotationLevel, RenderOptions, SourceTree};

/// Cobertura coverage summaries and baseline/candidate diffs.
#[derive(Parser)]
#[command(name = "covgate", version, about)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format: text, csv, markdown, json, yaml, html, github-annotation.
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Write the report to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter for the csv format.
    #[arg(long, default_value = ";")]
    delimiter: String,

    /// Title for github-annotation output.
    #[arg(long, default_value = "covgate")]
    annotation_title: String,

    /// Level for github-annotation output.
    #[arg(long, value_enum, default_value_t = AnnotationLevel::Notice)]
    annotation_level: AnnotationLevel,

    /// Message for github-annotation output.
    #[arg(long, default_value = "not covered")]
    annotation_message: String,

    /// Color regressions and improvements in text diffs.
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Plain text diffs (default).
    #[arg(long, overrides_with = "color")]
    no_color: bool,

    /// Directory holding the covered sources, for html output.
    /// Defaults to the directory of the (candidate) report.
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Path prefix inserted between the source directory and report paths.
    #[arg(long, value_name = "PREFIX", default_value = "")]
    source_prefix: String,

    /// Leave source text out of html output.
    #[arg(long, conflicts_with = "source")]
    no_source: bool,
}

impl OutputArgs {
    /// `report` locates the default source directory.
    fn render_options(&self, report: &Path) -> RenderOptions {
        let source = (!self.no_source).then(|| {
            let root = self.source.clone().unwrap_or_else(|| {
                report.parent().map(Path::to_path_buf).unwrap_or_default()
            });
            SourceTree::new(root, self.source_prefix.clone())
        });
        RenderOptions {
            delimiter: self.delimiter.clone(),
            annotation_title: self.annotation_title.clone(),
            annotation_level: self.annotation_level,
            annotation_message: self.annotation_message.clone(),
            color: self.color && !self.no_color,
            source,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-file coverage for a single report.
    Show {
        /// Path to the Cobertura XML report.
        report: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare a candidate report against a baseline.
    ///
    /// Exit status: 0 ok, 1 error, 2 coverage worsened,
    /// 3 some changed lines are not covered.
    Diff {
        /// Baseline ("before") Cobertura XML report.
        baseline: PathBuf,

        /// Candidate ("after") Cobertura XML report.
        candidate: PathBuf,

        /// Count newly added, uncovered statements as worsened coverage
        /// even when the overall rate did not drop.
        #[arg(long)]
        new_lines_worsen: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::Exception
        }
    };
    std::process::ExitCode::from(code.code())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // Log to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .init();
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Show { report, output } => {
            let body = cli::cmd_show(&report, &output.format, &output.render_options(&report))?;
            emit(&body, output.output.as_deref())?;
            Ok(ExitCode::Ok)
        }
        Commands::Diff {
            baseline,
            candidate,
            new_lines_worsen,
            output,
        } => {
            let policy = Policy { new_lines_worsen };
            let out = cli::cmd_diff(
                &baseline,
                &candidate,
                &output.format,
                &output.render_options(&candidate),
                &policy,
            )?;
            emit(&out.body, output.output.as_deref())?;
            Ok(ExitCode::from(out.result))
        }
    }
}

fn emit(body: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, body)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            print!("{body}");
            Ok(())
        }
    }
}
