//! CLI binary for edgequake-pdfocr.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfocr::{
    extract, ExtractionConfig, ExtractionProgressCallback, ImageErrorPolicy, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over pages, one log line per image.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar starts as a spinner; its length is set once the page count is
    /// known in `on_extraction_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Scanning {total_pages} pages for embedded images…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, image_count: usize) {
        // Pages without images never reach this callback.
        self.bar.set_position(page_num.saturating_sub(1) as u64);
        self.bar
            .set_message(format!("page {page_num} ({image_count} images)"));
    }

    fn on_image_complete(&self, page_num: usize, image_num: usize, text_len: usize) {
        self.bar.println(format!(
            "  {} page {:>3} image {:<3}  {}",
            green("✓"),
            page_num,
            image_num,
            dim(&format!("{text_len:>5} chars")),
        ));
    }

    fn on_image_error(&self, page_num: usize, image_num: usize, error: &str) {
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} page {:>3} image {:<3}  {}",
            red("✗"),
            page_num,
            image_num,
            red(&msg),
        ));
    }

    fn on_extraction_complete(&self, images_processed: usize, images_failed: usize) {
        self.bar.finish_and_clear();
        if images_failed == 0 {
            eprintln!(
                "{} {} images processed",
                green("✔"),
                bold(&images_processed.to_string())
            );
        } else {
            eprintln!(
                "{} {} images processed  ({} failed)",
                cyan("⚠"),
                bold(&images_processed.to_string()),
                red(&images_failed.to_string()),
            );
        }
    }
}

impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        // Aborted runs never reach on_extraction_complete.
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default folders: imagenes_extraidas/, textos_extraidos/, nombres_extraidos/
  pdfocr credenciales.pdf

  # Spanish OCR model, custom output root
  pdfocr -l spa --images-dir out/img --text-dir out/txt --names-dir out/names scan.pdf

  # Keep going when one image fails, print a JSON summary
  pdfocr --keep-going --json scan.pdf

OUTPUT LAYOUT (p, i are 1-based):
  {images-dir}/page_{p}_image_{i}.jpeg               grayscale image fed to OCR
  {text-dir}/page_{p}_image_{i}.txt                  OCR text (overwritten)
  {text-dir}/page_{p}_image_{i}_INE_detected.txt     INE credential marker
  {names-dir}/page_{p}_image_{i}.txt                 "Nombre: …" lines (appended)

ENVIRONMENT VARIABLES:
  TESSERACT_CMD     Tesseract executable (name on PATH or full path)
  PDFIUM_LIB_PATH   pdfium shared library file or directory
  RUST_LOG          Override log filter (e.g. edgequake_pdfocr=debug)
"#;

/// Extract embedded images from a PDF and OCR them with Tesseract.
#[derive(Parser, Debug)]
#[command(
    name = "pdfocr",
    version,
    about = "Extract embedded images from a PDF, OCR them, and harvest names and INE markers",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Folder for the grayscale JPEGs.
    #[arg(long, env = "PDFOCR_IMAGES_DIR", default_value = "imagenes_extraidas")]
    images_dir: PathBuf,

    /// Folder for OCR text and INE markers.
    #[arg(long, env = "PDFOCR_TEXT_DIR", default_value = "textos_extraidos")]
    text_dir: PathBuf,

    /// Folder for extracted names.
    #[arg(long, env = "PDFOCR_NAMES_DIR", default_value = "nombres_extraidos")]
    names_dir: PathBuf,

    /// Tesseract executable: a name on PATH or a full path.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract: String,

    /// Tesseract language code(s), e.g. spa or spa+eng.
    #[arg(short, long, env = "PDFOCR_LANG")]
    lang: Option<String>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFOCR_PASSWORD")]
    password: Option<String>,

    /// pdfium shared library (file or containing directory).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Log and skip images that fail instead of aborting the run.
    #[arg(long, env = "PDFOCR_KEEP_GOING")]
    keep_going: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFOCR_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFOCR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFOCR_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let stats = extract(&cli.input, &config)
        .with_context(|| format!("Extraction failed for {}", cli.input.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "   {} pages  /  {} with images  /  {} names  /  {} INE  —  {}ms",
            stats.total_pages,
            stats.pages_with_images,
            dim(&stats.names_found.to_string()),
            dim(&stats.ine_detections.to_string()),
            stats.duration_ms,
        );
        for failure in &stats.failures {
            eprintln!("   {} {}", red("✗"), failure);
        }
        eprintln!("Extracción completada. Texto, imágenes y nombres guardados.");
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let policy = if cli.keep_going {
        ImageErrorPolicy::Skip
    } else {
        ImageErrorPolicy::Abort
    };

    let mut builder = ExtractionConfig::builder()
        .output_dirs(&cli.images_dir, &cli.text_dir, &cli.names_dir)
        .tesseract_cmd(&cli.tesseract)
        .on_image_error(policy);

    if let Some(ref lang) = cli.lang {
        builder = builder.ocr_language(lang);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_map_to_historic_folders() {
        let cli = Cli::parse_from(["pdfocr", "doc.pdf"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.image_dir, PathBuf::from("imagenes_extraidas"));
        assert_eq!(config.text_dir, PathBuf::from("textos_extraidos"));
        assert_eq!(config.names_dir, PathBuf::from("nombres_extraidos"));
        assert_eq!(config.on_image_error, ImageErrorPolicy::Abort);
    }

    #[test]
    fn keep_going_selects_skip_policy() {
        let cli = Cli::parse_from(["pdfocr", "--keep-going", "-l", "spa", "doc.pdf"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.on_image_error, ImageErrorPolicy::Skip);
        assert_eq!(config.ocr_language.as_deref(), Some("spa"));
    }
}
