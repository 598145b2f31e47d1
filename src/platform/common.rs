use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Atomically write content to a file
///
/// This function writes to a temporary file in the same directory,
/// syncs to disk, then renames to the target path. A reader never
/// observes a half-written identity or config file.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    write_via_temp(path, content, None)
}

/// Atomically write a file that only the current user may read (0600 on Unix)
///
/// The temporary file is created with the restricted mode, so the content is
/// never readable by others at any point.
pub fn atomic_write_private(path: &Path, content: &[u8]) -> Result<()> {
    write_via_temp(path, content, Some(0o600))?;
    set_file_permissions(path, 0o600)
}

fn write_via_temp(path: &Path, content: &[u8], mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory_exists(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = create_temp_file(&temp_path, mode)?;

        file.write_all(content)
            .context("Failed to write to temporary file")?;

        file.sync_all().context("Failed to sync file to disk")?;
    }

    std::fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

/// Create the temporary file, fresh, with `mode` applied at creation
///
/// A leftover temp file from an interrupted write is removed first; an
/// existing file would keep its old permissions.
fn create_temp_file(temp_path: &Path, mode: Option<u32>) -> Result<File> {
    let Some(mode) = mode else {
        return File::create(temp_path).with_context(|| {
            format!("Failed to create temporary file: {}", temp_path.display())
        });
    };

    remove_if_exists(temp_path)?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    #[cfg(not(unix))]
    {
        let _ = mode;
    }

    options.open(temp_path).with_context(|| {
        format!("Failed to create temporary file: {}", temp_path.display())
    })
}

/// Ensure a directory exists, creating it and all parents if needed
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }

    Ok(())
}

/// Remove a file, treating an already-missing file as success
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

/// Set file permissions to a specific mode (Unix only, no-op on Windows)
pub fn set_file_permissions(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        let mut permissions = metadata.permissions();
        permissions.set_mode(mode);

        std::fs::set_permissions(path, permissions)
            .with_context(|| format!("Failed to set permissions for: {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = tempdir().unwrap();
        let test_file = temp_dir.path().join("identity.json");

        atomic_write(&test_file, b"{}").unwrap();

        assert_eq!(std::fs::read(&test_file).unwrap(), b"{}");
        assert!(!test_file.with_extension("tmp").exists());
    }

    #[test]
    fn test_atomic_write_nested_path() {
        let temp_dir = tempdir().unwrap();
        let test_file = temp_dir.path().join("nested").join("path").join("config.toml");

        atomic_write(&test_file, b"nested content").unwrap();

        assert_eq!(std::fs::read(&test_file).unwrap(), b"nested content");
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_private_restricts_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let test_file = temp_dir.path().join("identity.json");

        atomic_write_private(&test_file, b"secret").unwrap();

        let mode = std::fs::metadata(&test_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_private_temp_file_is_created_restricted() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path().join("identity.tmp");

        // Stale, world-readable leftover from an interrupted write
        std::fs::write(&temp_path, b"old").unwrap();
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let file = create_temp_file(&temp_path, Some(0o600)).unwrap();

        let mode = file.metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "temp file readable by others: {:o}", mode & 0o777);
        assert_eq!(std::fs::read(&temp_path).unwrap(), b"");
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = tempdir().unwrap();
        let test_file = temp_dir.path().join("gone.json");

        assert!(!remove_if_exists(&test_file).unwrap());

        std::fs::write(&test_file, b"x").unwrap();
        assert!(remove_if_exists(&test_file).unwrap());
        assert!(!test_file.exists());
    }
}
