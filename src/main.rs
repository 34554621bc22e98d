//! Command line shell for signet.
//!
//! ```bash
//! # Stamp the stored signature onto the first page
//! signet sign contract.pdf signed.pdf --pages 0 --rect 400,680,150,60
//!
//! # Stamp a signature image onto every page
//! signet sign contract.pdf signed.pdf --signature signature.png
//!
//! # Replay recorded pen events into the store
//! signet capture strokes.json
//!
//! # Preview a page at 144 dpi
//! signet preview signed.pdf page0.png --dpi 144
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use signet::{
    DocumentSession, PageSelector, Rect, SignatureSource, rasterize_events, read_events,
    save_to_store,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "signet")]
#[command(about = "Capture a signature and stamp it onto PDF pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stamp a signature onto pages of a PDF and save the result
    Sign {
        /// Document to sign
        input: PathBuf,

        /// Where the signed document is written (may equal the input)
        output: PathBuf,

        /// PNG or JPEG signature image
        #[arg(long, conflicts_with = "strokes")]
        signature: Option<PathBuf>,

        /// JSON pen events to replay instead of an image
        #[arg(long)]
        strokes: Option<PathBuf>,

        /// Signature store used when no image or strokes are given
        #[arg(long, env = "SIGNET_STORE_DIR", default_value = "./signatures")]
        store_dir: PathBuf,

        /// Placement in points from the top-left corner: x,y,width,height
        #[arg(long, default_value_t = Rect::DEFAULT_SIGNATURE)]
        rect: Rect,

        /// Zero-based pages to stamp: "all" or a list like "0,2,4-6"
        #[arg(long, default_value = "all")]
        pages: PageSelector,
    },

    /// Render one page to a PNG file
    Preview {
        input: PathBuf,

        output: PathBuf,

        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,

        #[arg(long, default_value_t = 72.0)]
        dpi: f32,
    },

    /// Replay recorded pen events and save the result as the current signature
    Capture {
        /// JSON array of pen events
        events: PathBuf,

        #[arg(long, env = "SIGNET_STORE_DIR", default_value = "./signatures")]
        store_dir: PathBuf,

        /// Also print the signature as a data URI
        #[arg(long)]
        data_uri: bool,

        #[arg(long, default_value_t = signet::DrawingSurface::DEFAULT_WIDTH)]
        width: u32,

        #[arg(long, default_value_t = signet::DrawingSurface::DEFAULT_HEIGHT)]
        height: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sign {
            input,
            output,
            signature,
            strokes,
            store_dir,
            rect,
            pages,
        } => {
            let source = match (signature, strokes) {
                (Some(path), _) => SignatureSource::Image(path),
                (None, Some(path)) => SignatureSource::Strokes(path),
                (None, None) => SignatureSource::Store(store_dir),
            };
            sign(&input, &output, &source, rect, &pages)
        }
        Commands::Preview {
            input,
            output,
            page,
            dpi,
        } => preview(&input, &output, page, dpi),
        Commands::Capture {
            events,
            store_dir,
            data_uri,
            width,
            height,
        } => capture(&events, &store_dir, data_uri, width, height),
    }
}

fn sign(
    input: &Path,
    output: &Path,
    source: &SignatureSource,
    rect: Rect,
    pages: &PageSelector,
) -> Result<()> {
    let raster = source.load().context("Failed to load the signature")?;

    let mut session = DocumentSession::open_path(input)?;
    let stamped = session.apply_signature(&raster, rect, pages)?;
    if stamped == 0 {
        log::warn!("{} has no pages to sign", input.display());
    }
    session.save(output)?;

    println!(
        "Signed {} page(s) of {} -> {}",
        stamped,
        input.display(),
        output.display()
    );
    Ok(())
}

fn preview(input: &Path, output: &Path, page: usize, dpi: f32) -> Result<()> {
    let session = DocumentSession::open_path(input)?;
    let raster = session.render_page(page, dpi)?;
    std::fs::write(output, raster.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Rendered page {} of {} at {} dpi ({}x{}) -> {}",
        page,
        input.display(),
        dpi,
        raster.width(),
        raster.height(),
        output.display()
    );
    Ok(())
}

fn capture(
    events: &Path,
    store_dir: &Path,
    data_uri: bool,
    width: u32,
    height: u32,
) -> Result<()> {
    let json = read_events(events)?;
    let raster = rasterize_events(&json, width, height)?;
    if data_uri {
        println!("{}", signet::capture::encode_raster(&raster));
    }

    let (_, location) = save_to_store(raster, store_dir)?;
    println!("Saved signature to {}", location);
    Ok(())
}
