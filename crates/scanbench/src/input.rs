//! Memory-mapped input file.
//!
//! The whole file is mapped read-only and handed to the harness as one
//! immutable byte slice.

use memmap2::{Mmap, MmapOptions};
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the input file.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("file \"{0}\" doesn't exist")]
    NotFound(String),

    #[error("file \"{0}\" can't be read")]
    PermissionDenied(String),

    #[error("unable to open file \"{path}\": {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("input file \"{0}\" is empty")]
    Empty(String),

    #[error("unable to map file \"{path}\": {source}")]
    Map {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for input loading.
pub type InputResult<T> = Result<T, InputError>;

/// A read-only memory-mapped input file.
///
/// # Example
///
/// ```rust,ignore
/// let input = InputFile::open("file:///var/log/syslog")?;
/// let report = harness.run(input.as_bytes(), &pattern);
/// ```
pub struct InputFile {
    /// Location as given (path or file:// URL).
    location: OsString,
    /// Resolved file path.
    path: PathBuf,
    mmap: Mmap,
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("location", &self.location)
            .field("path", &self.path)
            .field("len", &self.mmap.len())
            .finish()
    }
}

impl InputFile {
    /// Open and map `location`, a plain path or a `file://` URL.
    pub fn open(location: impl Into<OsString>) -> InputResult<Self> {
        let location = location.into();
        let path = parse_location(&location);
        let display = path.display().to_string();

        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => InputError::NotFound(display.clone()),
            io::ErrorKind::PermissionDenied => InputError::PermissionDenied(display.clone()),
            _ => InputError::Open {
                path: display.clone(),
                source: e,
            },
        })?;

        let size = file
            .metadata()
            .map_err(|e| InputError::Open {
                path: display.clone(),
                source: e,
            })?
            .len();
        if size == 0 {
            return Err(InputError::Empty(display));
        }

        // SAFETY: the map is read-only and lives no longer than `InputFile`.
        // Concurrent truncation by another process is outside our control,
        // as for any mmap-based reader.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|e| InputError::Map {
            path: display,
            source: e,
        })?;

        Ok(InputFile {
            location,
            path,
            mmap,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn location(&self) -> &OsStr {
        &self.location
    }
}

/// Resolve a `file://` URL or plain path to a filesystem path.
fn parse_location(location: &OsStr) -> PathBuf {
    let raw = os_bytes(location);
    let url_path = match raw.strip_prefix(b"file://") {
        // file:///C:/path -> C:/path
        Some(p) if p.len() > 2 && p[0] == b'/' && p[2] == b':' => &p[1..],
        Some(p) => p,
        None => return PathBuf::from(location),
    };
    path_from_bytes(percent_decode(url_path))
}

/// Decode `%XX` escapes in a URL path. Malformed escapes are kept verbatim.
fn percent_decode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

#[cfg(unix)]
fn os_bytes(s: &OsStr) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
fn os_bytes(s: &OsStr) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(s.to_string_lossy().into_owned().into_bytes())
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
