//! CLI binary for masterdocs-client.
//!
//! A thin shim over the library crate that maps subcommands onto the one-shot
//! entry points and prints the saved artifact or the single user-facing error.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use masterdocs_client::pipeline::input::parse_uri_list;
use masterdocs_client::{
    compress, format_file_size, images_to_pdf, merge, page_count, pdf_to_images, split,
    ClientConfig, Dpi, ImageFormat, MasterDocsError, Operation, ProgressCallback, Quality,
    RunOutput, SplitRequest, SubmissionProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while a request is in flight; one bar per request.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl SubmissionProgressCallback for CliProgressCallback {
    fn on_submit_start(&self, operation: Operation, file_count: usize, total_bytes: u64) {
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_prefix(operation.to_string());
        bar.set_message(format!(
            "uploading {file_count} file(s), {}",
            format_file_size(total_bytes)
        ));
        bar.enable_steady_tick(Duration::from_millis(80));
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn on_submit_complete(&self, operation: Operation, artifact_len: usize) {
        self.finish();
        eprintln!(
            "{} {} {}",
            green("✓"),
            operation,
            dim(&format!("received {}", format_file_size(artifact_len as u64)))
        );
    }

    fn on_submit_error(&self, _operation: Operation, _error: &str) {
        self.finish();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Merge in the order given
  masterdocs merge intro.pdf body.pdf appendix.pdf

  # Split into one PDF per range (saved as split_pdfs.zip)
  masterdocs split report.pdf --ranges "1-3, 5, 7-9"

  # Pull out a few pages as one PDF
  masterdocs split report.pdf --extract "1, 3, 5"

  # Compress at quality 0.5 into ./out
  masterdocs -o out compress scan.pdf --quality 0.5

  # Rasterise at 300 DPI as JPG
  masterdocs to-images slides.pdf --format jpg --dpi 300

  # Bind photos into one PDF, files listed in a text/uri-list
  masterdocs from-images --uri-list dropped.txt

  # Page count only
  masterdocs page-count report.pdf

OUTPUT FILES:
  merge        merged.pdf
  split        split_pdfs.zip | split_pages.zip | extracted_pages.pdf
  compress     compressed.pdf
  to-images    pdf_images.zip
  from-images  images_to_pdf.pdf

ENVIRONMENT VARIABLES:
  MASTERDOCS_API_URL      Service base URL (default http://localhost:8080/api)
  MASTERDOCS_OUTPUT_DIR   Where artifacts are saved (default .)
  MASTERDOCS_VERBOSE      Enable DEBUG-level logs
  RUST_LOG                Overrides the log filter entirely
"#;

/// Stage files and submit them to a MasterDocs service.
#[derive(Parser, Debug)]
#[command(
    name = "masterdocs",
    version,
    about = "Merge, split, compress and convert PDFs through a MasterDocs service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Service base URL, including any path prefix such as /api.
    #[arg(long, global = true, env = "MASTERDOCS_API_URL", default_value = masterdocs_client::DEFAULT_BASE_URL)]
    api_url: String,

    /// Directory artifacts are saved into.
    #[arg(short, long, global = true, env = "MASTERDOCS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the save receipt as JSON.
    #[arg(long, global = true, env = "MASTERDOCS_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, global = true, env = "MASTERDOCS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "MASTERDOCS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, global = true, env = "MASTERDOCS_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge two or more PDFs, in the order given, into merged.pdf.
    Merge(BatchArgs),

    /// Split one PDF by ranges, into single pages, or extract pages.
    Split {
        input: PathBuf,
        #[command(flatten)]
        mode: SplitArgs,
    },

    /// Reduce the size of one PDF.
    Compress {
        input: PathBuf,
        /// 0.1 (smallest) to 1.0 (best); snapped to steps of 0.1.
        #[arg(long, default_value_t = 0.7)]
        quality: f32,
    },

    /// Render each page of a PDF to an image, zipped.
    ToImages {
        input: PathBuf,
        /// png or jpg.
        #[arg(long, default_value = "png")]
        format: ImageFormat,
        /// 72, 150 or 300.
        #[arg(long, default_value_t = 150, value_parser = parse_dpi)]
        dpi: u32,
    },

    /// Bind one or more images, in the order given, into one PDF.
    FromImages(BatchArgs),

    /// Print the number of pages in a PDF.
    PageCount { input: PathBuf },
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Files in submission order.
    inputs: Vec<PathBuf>,

    /// Also stage the files listed in this text/uri-list file (one URI per line).
    #[arg(long)]
    uri_list: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SplitArgs {
    /// Page ranges, e.g. "1-3, 5, 7-9"; one output PDF per range.
    #[arg(long)]
    ranges: Option<String>,

    /// One output PDF per page.
    #[arg(long)]
    every_page: bool,

    /// Page numbers, e.g. "1, 3, 5"; one output PDF with those pages.
    #[arg(long)]
    extract: Option<String>,
}

impl SplitArgs {
    fn request(&self) -> SplitRequest {
        match (&self.ranges, &self.extract) {
            (Some(r), _) => SplitRequest::Ranges(r.clone()),
            (None, Some(p)) => SplitRequest::Extract(p.clone()),
            (None, None) => SplitRequest::EveryPage,
        }
    }
}

fn parse_dpi(s: &str) -> std::result::Result<u32, String> {
    let v: u32 = s.parse().map_err(|e| format!("{e}"))?;
    Dpi::try_from(v).map(Dpi::value).map_err(|e| e.to_string())
}

/// Attach the message a user should see when `operation` fails, keeping the
/// library error underneath for `--verbose`.
fn user_facing(operation: Operation) -> impl FnOnce(MasterDocsError) -> anyhow::Error {
    move |e| {
        let msg = e.user_message(operation);
        anyhow::Error::new(e).context(msg)
    }
}

/// What a successful command produced.
enum Report {
    Saved(RunOutput),
    Pages { input: PathBuf, count: u32 },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers the only long wait, so INFO logs stay off while it runs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Library failures already carry their user message on top;
            // anything else (unreadable uri-list) is reported with its chain.
            let text = if e.downcast_ref::<MasterDocsError>().is_some() {
                e.to_string()
            } else {
                format!("{e:#}")
            };
            eprintln!("{} {}", red("✗"), text);
            if cli.verbose {
                eprintln!("{}", dim(&format!("{e:?}")));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ClientConfig::builder()
        .base_url(&cli.api_url)
        .output_dir(&cli.output_dir);
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }
    let config = builder.build()?;

    // ── Run command ──────────────────────────────────────────────────────
    let report = match &cli.command {
        Command::Merge(args) => Report::Saved(
            merge(&batch_inputs(args).await?, &config)
                .await
                .map_err(user_facing(Operation::Merge))?,
        ),
        Command::FromImages(args) => Report::Saved(
            images_to_pdf(&batch_inputs(args).await?, &config)
                .await
                .map_err(user_facing(Operation::ImagesToPdf))?,
        ),
        Command::Split { input, mode } => {
            let count = page_count(input, &config)
                .await
                .map_err(user_facing(Operation::PageCount))?;
            if !cli.quiet && !cli.json {
                eprintln!("{} {} pages", dim(&input.display().to_string()), bold(&count.to_string()));
            }
            let request = mode.request();
            let operation = match request {
                SplitRequest::Ranges(_) => Operation::SplitByRanges,
                SplitRequest::EveryPage => Operation::SplitEveryPage,
                SplitRequest::Extract(_) => Operation::ExtractPages,
            };
            Report::Saved(
                split(input, request, &config)
                    .await
                    .map_err(user_facing(operation))?,
            )
        }
        Command::Compress { input, quality } => {
            let quality = Quality::new(*quality);
            if !cli.quiet && !cli.json {
                eprintln!("{} {}", dim(&format!("quality {quality}")), quality.label());
            }
            Report::Saved(
                compress(input, quality, &config)
                    .await
                    .map_err(user_facing(Operation::Compress))?,
            )
        }
        Command::ToImages { input, format, dpi } => {
            let dpi = Dpi::try_from(*dpi)?;
            Report::Saved(
                pdf_to_images(input, *format, dpi, &config)
                    .await
                    .map_err(user_facing(Operation::PdfToImages))?,
            )
        }
        Command::PageCount { input } => Report::Pages {
            input: input.clone(),
            count: page_count(input, &config)
                .await
                .map_err(user_facing(Operation::PageCount))?,
        },
    };

    print_report(cli, &report)
}

/// Positional inputs followed by anything named in `--uri-list`.
async fn batch_inputs(args: &BatchArgs) -> Result<Vec<PathBuf>> {
    let mut inputs = args.inputs.clone();
    if let Some(ref list) = args.uri_list {
        let payload = tokio::fs::read_to_string(list)
            .await
            .with_context(|| format!("Failed to read uri-list from {:?}", list))?;
        inputs.extend(parse_uri_list(&payload));
    }
    Ok(inputs)
}

fn print_report(cli: &Cli, report: &Report) -> Result<()> {
    match report {
        Report::Saved(out) => {
            if let Some(ref w) = out.warning {
                eprintln!("{} {}", yellow("⚠"), w);
            }
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(out).context("Failed to serialise receipt")?
                );
            } else {
                println!("{}", out.saved.path.display());
                if !cli.quiet {
                    eprintln!(
                        "{}  {}  {}",
                        green("✔"),
                        bold(&display_name(&out.saved.path)),
                        dim(&format_file_size(out.saved.bytes)),
                    );
                }
            }
        }
        Report::Pages { input, count } => {
            if cli.json {
                let v = serde_json::json!({ "file": input, "pages": count });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&v).context("Failed to serialise page count")?
                );
            } else {
                println!("{count}");
            }
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
