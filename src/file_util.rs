use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// checks if a file exists
pub fn file_exists<T>(file_path: &T) -> bool
where
    T: AsRef<Path> + ?Sized,
{
    file_path.as_ref().exists()
}

/// creates the directory a file will live in
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// writes `contents` next to `path` first, then renames it over `path`,
/// so a reader never sees a half written file
/// # Example
/// ```rust
/// file_util::write_atomic(Path::new("data/findings.json"), "[]").unwrap();
/// ```
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;

    let tmp = temp_sibling(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        e
    })
}

/// plain overwrite, creates the parent directory
pub fn write_to_file(path: &Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, contents)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
