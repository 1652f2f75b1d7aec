//! Removal of LaTeX byproducts

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Extensions the engine leaves next to the PDF
pub const AUX_EXTENSIONS: &[&str] = &[
    "aux",
    "log",
    "out",
    "toc",
    "lof",
    "lot",
    "fls",
    "fdb_latexmk",
    "synctex.gz",
    "bbl",
    "blg",
    "nav",
    "snm",
    "vrb",
];

/// Remove `<dir>/<stem>.<ext>` for every aux extension. Returns what was removed.
pub fn remove_aux_files(dir: &Path, stem: &str) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for ext in AUX_EXTENSIONS {
        let path = dir.join(format!("{stem}.{ext}"));
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed");
                removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(removed)
}

/// Remove the byproducts of every `.tex` file directly inside `dir`.
pub fn clean_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut stems: Vec<String> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "tex"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .collect();
    stems.sort();

    let mut removed = Vec::new();
    for stem in stems {
        removed.extend(remove_aux_files(dir, &stem)?);
    }
    Ok(removed)
}
