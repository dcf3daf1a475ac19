// mod.rs - Output file helpers

use crate::error::{ConvertError, Result};
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Ensure parent directory exists before creating file
pub fn ensure_parent_dir(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| ConvertError::Create {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Create (or truncate) an output file behind a buffered writer
pub fn create_output(file_path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path).map_err(|e| ConvertError::Create {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Path of the `index`-th file in split mode: `out/rec.gb` becomes
/// `out/rec.<index>.gb`, and `out/rec` becomes `out/rec.<index>`
pub fn split_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}.{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}.{}", stem, index),
    };
    base.with_file_name(name)
}
