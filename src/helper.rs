use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

/*---- Export utilities ----*/

/// Longest prefix of the payload used for a file name, in characters.
const FILENAME_MAX_CHARS: usize = 50;

/// File name stem used when the payload has nothing usable.
pub const DEFAULT_FILENAME: &str = "qrcode";

/// Derives a file name stem from payload text.
///
/// Takes the first 50 characters and replaces everything outside
/// `[A-Za-z0-9]` with `_`. Empty text gives `"qrcode"`. Applying it twice
/// gives the same result as applying it once.
///
/// Characters are Unicode scalar values, so a character outside the Basic
/// Multilingual Plane (e.g. an emoji) becomes one `_` where a browser,
/// counting UTF-16 units, would produce two.
///
/// # Example
///
/// ```
/// use qiform::helper::derive_filename;
///
/// assert_eq!(derive_filename("Hello World!"), "Hello_World_");
/// assert_eq!(derive_filename(""), "qrcode");
/// ```
pub fn derive_filename(text: &str) -> String {
    let stem: String = text
        .chars()
        .take(FILENAME_MAX_CHARS)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        stem
    }
}

/// A PNG ready to be handed to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedPng {
    /// File name including the `.png` extension.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportedPng {
    pub fn new(payload: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{}.png", derive_filename(payload)),
            bytes,
        }
    }
}

/// Persists exported files where the user can pick them up.
pub trait FileSaver {
    /// Saves `bytes` under `filename` and returns where they ended up.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// [`FileSaver`] writing into a directory, created on first use.
#[derive(Clone, Debug)]
pub struct DirSaver {
    directory: PathBuf,
}

impl DirSaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Default for DirSaver {
    /// Saves into `generated/` relative to the working directory.
    fn default() -> Self {
        Self::new("generated")
    }
}

impl FileSaver for DirSaver {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        // Check if the directory exists, create it if it doesn't
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(filename);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), size = bytes.len(), "saved QR code");
        Ok(path)
    }
}
