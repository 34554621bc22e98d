//! Where the signature applied to a document comes from.

use crate::error::SignetError;
use signet_capture::{DrawingSurface, InputEvent};
use signet_store::{FilesystemRasterStore, RasterStore, SlotKey};
use signet_types::Raster;
use std::path::{Path, PathBuf};

/// A signature to apply, not yet loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource {
    /// A PNG or JPEG file.
    Image(PathBuf),
    /// A JSON array of input events, replayed onto a default-sized pad.
    Strokes(PathBuf),
    /// The signature slot of a filesystem store.
    Store(PathBuf),
}

impl SignatureSource {
    pub fn load(&self) -> Result<Raster, SignetError> {
        match self {
            SignatureSource::Image(path) => {
                let bytes = read(path)?;
                let raster = Raster::from_encoded(bytes)?;
                log::info!(
                    "Loaded {} signature {}x{} from {}",
                    raster.format(),
                    raster.width(),
                    raster.height(),
                    path.display()
                );
                Ok(raster)
            }
            SignatureSource::Strokes(path) => {
                let json = read_events(path)?;
                rasterize_events(&json, DrawingSurface::DEFAULT_WIDTH, DrawingSurface::DEFAULT_HEIGHT)
            }
            SignatureSource::Store(dir) => {
                let store = FilesystemRasterStore::open(dir);
                let key = store.slot().clone();
                let bytes = store
                    .load(&key)?
                    .ok_or_else(|| SignetError::NoStoredSignature(dir.clone()))?;
                log::info!("Loaded stored signature from {}", store.location(&key));
                Ok(Raster::from_encoded(bytes)?)
            }
        }
    }
}

/// Reads a pen event file. Content that is not UTF-8 is a read error.
pub fn read_events(path: &Path) -> Result<String, SignetError> {
    std::fs::read_to_string(path).map_err(|source| SignetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replays JSON-encoded input events onto a fresh white surface and
/// returns the result as a PNG raster.
///
/// The surface goes through the same data URI payload a browser pad would
/// submit, so both paths produce identical bytes.
pub fn rasterize_events(json: &str, width: u32, height: u32) -> Result<Raster, SignetError> {
    let events: Vec<InputEvent> = serde_json::from_str(json)?;
    let mut surface = DrawingSurface::new(width, height)?;
    surface.apply_all(events);
    if surface.is_blank() {
        log::warn!("The captured signature has no strokes");
    } else {
        log::debug!("Replayed {} stroke(s)", surface.stroke_count());
    }
    let payload = signet_capture::encode(&surface)?;
    Ok(signet_capture::decode(&payload)?)
}

/// Saves a raster into the signature slot of a filesystem store.
pub fn save_to_store(raster: Raster, dir: &Path) -> Result<(SlotKey, String), SignetError> {
    let store = FilesystemRasterStore::new(dir)?;
    let png = raster.into_png()?;
    let key = store.save(png.as_bytes())?;
    let location = store.location(&key);
    log::info!("Saved signature to {}", location);
    Ok((key, location))
}

fn read(path: &Path) -> Result<Vec<u8>, SignetError> {
    std::fs::read(path).map_err(|source| SignetError::Read {
        path: path.to_path_buf(),
        source,
    })
}
