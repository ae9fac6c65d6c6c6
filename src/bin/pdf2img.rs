//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionRequest` and prints results. Per-document failures are
//! warnings; only batch-fatal errors change the exit status.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2img::{collect_documents, convert, ConversionRequest, ImageFormat};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a single file with defaults (150 DPI, jpg, quality 80)
  pdf2img report.pdf out/

  # Convert every PDF in a folder to PNG at 200 DPI
  pdf2img ./invoices out/ --dpi 200 --format png

  # Cap parallel conversions at 4, lower JPEG quality
  pdf2img ./archive out/ --concurrency 4 --quality 60

  # Structured JSON result on stdout
  pdf2img report.pdf out/ --json

OUTPUT LAYOUT:
  One subdirectory per input document under <output-dir>, named after the
  document's base name, containing page_1.<ext>, page_2.<ext>, ...

EXIT STATUS:
  0  the batch ran to completion (individual documents may still have failed;
     failures are reported as warnings)
  1  invalid invocation or a batch-fatal error (unwritable output root,
     missing pdfium library)
"#;

/// Batch-convert PDF documents to per-page images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Batch-convert PDF documents to per-page images with bounded concurrency",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// A single .pdf file or a directory scanned (non-recursively) for
    /// top-level .pdf files.
    input: PathBuf,

    /// Directory receiving one subdirectory per document.
    output_dir: PathBuf,

    /// Rendering resolution in dots per inch.
    #[arg(long, env = "PDF2IMG_DPI", default_value_t = 150)]
    dpi: u32,

    /// Output image format: png, jpg, jpeg, bmp, webp, or gif.
    #[arg(long, env = "PDF2IMG_FORMAT", default_value = "jpg")]
    format: String,

    /// Encoding quality for jpg/webp; values outside 1-100 are clamped.
    #[arg(long, env = "PDF2IMG_QUALITY", default_value_t = 80)]
    quality: i64,

    /// Maximum parallel document conversions; 0 = available parallelism.
    #[arg(short, long, env = "PDF2IMG_CONCURRENCY", default_value_t = 0)]
    concurrency: usize,

    /// Print the full BatchResult as JSON instead of a summary.
    #[arg(long, env = "PDF2IMG_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2IMG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build the request ────────────────────────────────────────────────
    let format: ImageFormat = cli
        .format
        .parse()
        .with_context(|| format!("invalid --format '{}'", cli.format))?;

    let documents =
        collect_documents(&cli.input).context("failed to resolve input documents")?;
    if documents.is_empty() {
        eprintln!("No PDF files to convert in '{}'.", cli.input.display());
        return Ok(());
    }

    let request = ConversionRequest::builder(&cli.output_dir)
        .documents(documents)
        .dpi(cli.dpi)
        .format(format)
        .quality(cli.quality)
        .concurrency(cli.concurrency)
        .build()
        .context("invalid conversion request")?;

    if !cli.quiet {
        let concurrency = if cli.concurrency == 0 {
            format!("auto ({})", request.effective_concurrency())
        } else {
            cli.concurrency.to_string()
        };
        eprintln!(
            "Converting {} document(s): dpi={}, format={}, quality={}, concurrency={}",
            request.documents.len(),
            request.dpi,
            request.format.extension(),
            request.quality,
            concurrency,
        );
    }

    // ── Run the batch ────────────────────────────────────────────────────
    let result = convert(&request).await.context("batch conversion failed")?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to serialise result")?
        );
        return Ok(());
    }

    if !cli.quiet {
        for failure in result.failures() {
            if let Some(error) = &failure.error {
                eprintln!("[warning] {error}");
            }
        }
        eprintln!(
            "Done: {} image(s) from {}/{} document(s) in {:.2}s.",
            result.outputs.len(),
            result.stats.succeeded,
            result.stats.total_documents,
            result.stats.duration_ms as f64 / 1000.0,
        );
    }

    Ok(())
}
