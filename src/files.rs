//! File-side handling for locally chosen skin images.
//!
//! The host delivers a "files dropped" event as a list of paths; only the
//! first `.png` is of interest. Reading applies the size preconditions to the
//! file metadata before any bytes are touched.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use crate::error::SkinError;

/// Largest raw skin file we will read. Also caps in-memory byte loads.
pub const MAX_SKIN_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Whether `path` ends in `.png`, case-insensitively.
pub fn is_png_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Picks the first `.png` out of a dropped path list, the way the drop
/// handler does: later paths are ignored even if they are also images.
pub fn first_png(paths: &[PathBuf]) -> Option<&Path> {
    paths
        .iter()
        .map(PathBuf::as_path)
        .find(|path| is_png_path(path))
}

/// Reads a skin file into memory.
///
/// The metadata is checked first: a missing file is `FileNotFound`, an empty
/// one `FileEmpty`, and anything over [`MAX_SKIN_FILE_BYTES`] is
/// `FileTooLarge` without reading a single byte.
pub fn read_skin_file(path: &Path) -> Result<Vec<u8>, SkinError> {
    let metadata =
        fs::metadata(path).map_err(|_| SkinError::FileNotFound(path.to_path_buf()))?;

    let size = metadata.len();

    if size == 0 {
        return Err(SkinError::FileEmpty);
    }

    if size > MAX_SKIN_FILE_BYTES {
        return Err(SkinError::FileTooLarge {
            size,
            max: MAX_SKIN_FILE_BYTES,
        });
    }

    fs::read(path).map_err(|_| SkinError::FileNotFound(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn png_extension_is_case_insensitive() {
        assert!(is_png_path(Path::new("skin.png")));
        assert!(is_png_path(Path::new("skin.PNG")));
        assert!(is_png_path(Path::new("skin.Png")));
        assert!(!is_png_path(Path::new("skin.jpg")));
        assert!(!is_png_path(Path::new("skin")));
        assert!(!is_png_path(Path::new("png")));
    }

    #[test]
    fn first_png_skips_other_files() {
        let paths = vec![
            PathBuf::from("readme.txt"),
            PathBuf::from("portrait.jpg"),
            PathBuf::from("char.PNG"),
            PathBuf::from("other.png"),
        ];

        assert_eq!(first_png(&paths), Some(Path::new("char.PNG")));
        assert_eq!(first_png(&[]), None);
        assert_eq!(first_png(&[PathBuf::from("a.txt")]), None);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.png");

        assert_eq!(
            read_skin_file(&path),
            Err(SkinError::FileNotFound(path.clone()))
        );
    }

    #[test]
    fn empty_file_is_file_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        fs::write(&path, b"").unwrap();

        assert_eq!(read_skin_file(&path), Err(SkinError::FileEmpty));
    }

    #[test]
    fn small_file_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skin.png");
        fs::write(&path, b"not checked here").unwrap();

        assert_eq!(read_skin_file(&path).unwrap(), b"not checked here");
    }
}
