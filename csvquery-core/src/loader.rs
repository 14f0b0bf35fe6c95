use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CsvQueryError, Result};
use crate::parser::parse_rows;
use crate::table::{LoadedTable, Table};

/// Restrictions applied to paths before a file is loaded.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// If set, only files under this directory may be loaded.
    pub data_dir: Option<PathBuf>,
    /// Reject files whose extension is not `.csv`.
    pub require_csv_extension: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            require_csv_extension: true,
        }
    }
}

/// Read and parse a CSV file into a [`LoadedTable`].
pub fn load_file(path: &Path, config: &LoaderConfig) -> Result<LoadedTable> {
    check_path(path, config)?;

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CsvQueryError::FileNotFound(path.to_path_buf()),
        _ => CsvQueryError::Io(e),
    })?;

    // Mapping a zero-length file fails on some platforms.
    if file.metadata()?.len() == 0 {
        debug!(path = %path.display(), "empty file");
        return Ok(LoadedTable::new(path, Table::default()));
    }

    // SAFETY: the mapping is only read while parsing and dropped before returning;
    // the file must not be truncated concurrently (standard mmap caveat).
    let mmap = unsafe { Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap).map_err(|e| CsvQueryError::InvalidUtf8(e.valid_up_to()))?;

    let table = parse_rows(text)?;
    debug!(path = %path.display(), bytes = mmap.len(), rows = table.len(), "file parsed");

    Ok(LoadedTable::new(path, table))
}

fn check_path(path: &Path, config: &LoaderConfig) -> Result<()> {
    let reject = |reason: String| {
        warn!(path = %path.display(), %reason, "rejected load path");
        Err(CsvQueryError::IllegalPath(reason))
    };

    if path.components().any(|c| c == Component::ParentDir) {
        return reject(format!("'{}' must not contain '..'", path.display()));
    }

    if let Some(dir) = &config.data_dir {
        if !without_cur_dir(path).starts_with(without_cur_dir(dir)) {
            return reject(format!(
                "'{}' is outside the data directory '{}'",
                path.display(),
                dir.display()
            ));
        }
    }

    if config.require_csv_extension
        && !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    {
        return reject(format!("'{}' is not a .csv file", path.display()));
    }

    Ok(())
}

/// Drop `.` components so `./data/x.csv` and `data/x.csv` compare equal.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| *c != Component::CurDir)
        .collect()
}
