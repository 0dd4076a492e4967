//! Audio file discovery under a library root

use std::io;
use std::path::{Path, PathBuf};

use sfxsort_core::{Error, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions treated as audio, compared case-insensitively
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "aiff", "aif", "aac", "m4a"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Every audio file below `root`, sorted by path.
///
/// Entries that cannot be read are logged and skipped; only a missing or
/// unreadable root is an error.
pub fn discover_audio_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let meta = std::fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("library root is not a directory: {}", root.display()),
        )));
    }

    let mut files = Vec::new();
    let mut skipped = 0usize;

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(Error::Walk(e.to_string())),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                skipped += 1;
                continue;
            }
        };

        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(root = %root.display(), files = files.len(), skipped, "discovered audio files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_filter() {
        assert!(is_audio_file(Path::new("a/b.wav")));
        assert!(is_audio_file(Path::new("a/b.WAV")));
        assert!(is_audio_file(Path::new("b.Aiff")));
        assert!(is_audio_file(Path::new("b.m4a")));
        assert!(!is_audio_file(Path::new("b.txt")));
        assert!(!is_audio_file(Path::new("wav")));
        assert!(!is_audio_file(Path::new(".sonniss_overrides.json")));
    }

    #[test]
    fn test_discover_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Weapons/Guns")).unwrap();
        fs::create_dir_all(root.join("Ambience")).unwrap();
        fs::write(root.join("Weapons/Guns/b.wav"), b"").unwrap();
        fs::write(root.join("Weapons/Guns/a.FLAC"), b"").unwrap();
        fs::write(root.join("Ambience/wind.ogg"), b"").unwrap();
        fs::write(root.join("Ambience/notes.txt"), b"").unwrap();
        fs::write(root.join("loose.mp3"), b"").unwrap();

        let files = discover_audio_files(root).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            rel,
            vec!["Ambience/wind.ogg", "Weapons/Guns/a.FLAC", "Weapons/Guns/b.wav", "loose.mp3"]
        );
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(discover_audio_files(&missing), Err(Error::Io(_))));
    }

    #[test]
    fn test_root_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.wav");
        fs::write(&file, b"").unwrap();
        assert!(matches!(discover_audio_files(&file), Err(Error::Io(_))));
    }
}
