use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Read a script to string, replacing invalid UTF-8 sequences with the
/// replacement character.
///
/// Minified output must never fail on a stray byte in a vendored file,
/// so the read is lossy rather than strict.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_source_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Atomically write minified output by writing to a temp file then renaming.
///
/// The target either keeps its old contents or gets the new contents in
/// full; a crash mid-write never leaves a truncated script behind.
///
/// # Errors
/// Returns an error if the write or rename fails.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));

    // Temp file lives in the target directory so the rename stays on one
    // filesystem.
    let mut temp_path = parent.to_path_buf();
    temp_path.push(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        std::process::id()
    ));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    match fs::rename(&temp_path, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            // On Windows, rename can fail if the target exists. Fall back
            // to copy + remove.
            if cfg!(windows) {
                fs::copy(&temp_path, path)?;
                let _ = fs::remove_file(&temp_path);
                Ok(())
            } else {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }
}

/// Insert a tag into a file name just before its extension:
/// `app.js` with tag `1f2e3d` becomes `app-1f2e3d.js`.
///
/// A path with no extension gets the tag appended after a dash.
#[must_use]
pub fn tagged_path(path: &Path, tag: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let name = match path.extension().and_then(OsStr::to_str) {
        Some(ext) => format!("{stem}-{tag}.{ext}"),
        None => format!("{stem}-{tag}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_source_lossy_valid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"var x = 1;").unwrap();
        file.flush().unwrap();

        let content = read_source_lossy(file.path()).unwrap();
        assert_eq!(content, "var x = 1;");
    }

    #[test]
    fn test_read_source_lossy_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x76, 0x61, 0x72, 0x80, 0x81]).unwrap();
        file.flush().unwrap();

        let content = read_source_lossy(file.path()).unwrap();
        assert!(content.starts_with("var"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_atomic_write_and_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.js");

        atomic_write(&path, b"x=1;").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x=1;");

        atomic_write(&path, b"y=2;").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "y=2;");
    }

    #[test]
    fn test_atomic_write_no_temp_left_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.js");

        atomic_write(&path, b"x=1;").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].as_ref().unwrap().file_name().to_str().unwrap(),
            "out.js"
        );
    }

    #[test]
    fn test_tagged_path_with_extension() {
        assert_eq!(
            tagged_path(Path::new("dist/app.js"), "1f2e3d"),
            PathBuf::from("dist/app-1f2e3d.js")
        );
    }

    #[test]
    fn test_tagged_path_without_extension() {
        assert_eq!(
            tagged_path(Path::new("dist/app"), "1f2e3d"),
            PathBuf::from("dist/app-1f2e3d")
        );
    }
}
