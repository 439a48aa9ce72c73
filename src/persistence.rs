// src/persistence.rs
use crate::core::dict::{BuiltDict, Dict, DictError};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Writes a built dictionary as `fingerprint canonical_word frequency` lines.
///
/// The write is atomic: the content goes to a temp file in the target
/// directory first and is renamed over the destination only when complete.
pub fn save_dict(built: &BuiltDict, path: &Path) -> Result<(), DictError> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(&temp_file);
    for (key, word, frequency) in built.sorted_entries() {
        writeln!(writer, "{key} {word} {frequency}")?;
    }
    writer.flush()?;
    drop(writer);

    temp_file.persist(path).map_err(|e| DictError::Io(e.error))?;
    info!("Dictionary {} with {} entries generated", path.display(), built.len());
    Ok(())
}

/// Writes a bincode snapshot of a loaded dictionary, atomically.
pub fn save_cache(dict: &Dict, path: &Path) -> Result<(), DictError> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let writer = BufWriter::new(&temp_file);
    bincode::serialize_into(writer, dict)?;
    temp_file.persist(path).map_err(|e| DictError::Io(e.error))?;
    Ok(())
}

/// Reads a dictionary back from a bincode snapshot.
pub fn load_cache(path: &Path) -> Result<Dict, DictError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// Loads a text-format dictionary, preferring a `.bin` sibling cache when it
/// is at least as new as the text file. On a cache miss the text file is
/// parsed and the cache rewritten; a cache that cannot be written only costs
/// a debug log line, never the load.
pub fn load_with_cache(path: &Path) -> Result<Dict, DictError> {
    let cache_path = cache_path_for(path);

    if cache_is_fresh(path, &cache_path) {
        match load_cache(&cache_path) {
            Ok(dict) => {
                debug!("Dictionary cache hit: {}", cache_path.display());
                return Ok(dict);
            }
            Err(e) => debug!("Ignoring unreadable dictionary cache: {e}"),
        }
    }

    let dict = Dict::from_file(path)?;
    if let Err(e) = save_cache(&dict, &cache_path) {
        debug!("Could not write dictionary cache: {e}");
    }
    Ok(dict)
}

fn cache_path_for(path: &Path) -> PathBuf {
    path.with_extension("bin")
}

fn cache_is_fresh(text: &Path, cache: &Path) -> bool {
    fn modified(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
    match (modified(text), modified(cache)) {
        (Some(text_time), Some(cache_time)) => cache_time >= text_time,
        _ => false,
    }
}
