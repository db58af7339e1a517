use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Replace the contents of `path` with exactly `summary`.
///
/// The text goes to a sibling temporary file first and is renamed into place,
/// so a reader never sees a half-written file and a failed write leaves the
/// previous summary untouched.
pub fn write_summary(path: &Path, summary: &str) -> Result<()> {
    write_private(path, summary.as_bytes()).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Wrote {summary:?} to {}", path.display());
    Ok(())
}

/// Atomically write `contents` to `path` with owner-only permissions.
/// A symlinked `path` is resolved first so the link itself survives.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let path = target.as_path();
    let temp_path = temp_path(path);

    let result = (|| {
        let mut file = private_options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Open options that create files readable and writable by the owner only.
pub(crate) fn private_options() -> OpenOptions {
    #[allow(unused_mut)]
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_file_reads_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".curwttr");

        write_summary(&path, "Clouds: 18°C 16°C").unwrap();

        assert_eq!(fs::read(&path).unwrap(), "Clouds: 18°C 16°C".as_bytes());
    }

    #[test]
    fn overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".curwttr");
        fs::write(&path, "Thunderstorm: 30°C 35°C and some more text").unwrap();

        write_summary(&path, "Clear: 5°C 2°C").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Clear: 5°C 2°C");
    }

    #[test]
    fn leaves_no_temporary_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".curwttr");

        write_summary(&path, "Mist: 3°C 1°C").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from(".curwttr")]);
    }

    #[test]
    fn missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(".curwttr");

        let err = write_summary(&path, "Clear: 5°C 2°C").unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn output_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".curwttr");

        write_summary(&path, "Clear: 5°C 2°C").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_output_keeps_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("status.txt");
        let link = dir.path().join(".curwttr");
        fs::write(&real, "Rain: 9°C 8°C").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_summary(&link, "Clear: 5°C 2°C").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "Clear: 5°C 2°C");
        assert_eq!(fs::read_to_string(&link).unwrap(), "Clear: 5°C 2°C");
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path(Path::new("/home/user/.curwttr")),
            PathBuf::from("/home/user/.curwttr.tmp")
        );
    }
}
