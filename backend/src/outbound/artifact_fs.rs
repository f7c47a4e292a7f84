//! Capability-scoped file access for startup artifacts.
//!
//! The backend forbids direct `std::fs` calls. The model artifact, the
//! contract info file, the session key and the deploy output are read and
//! written through a `cap_std::fs::Dir` opened on the file's parent
//! directory.

use std::ffi::OsString;
use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

/// Read a UTF-8 artifact through `cap_std`.
///
/// # Examples
///
/// ```rust
/// use placement_backend::outbound::artifact_fs::{read_to_string, write};
///
/// let path = std::env::temp_dir().join("artifact-fs-read-example.json");
/// write(&path, b"{}\n")?;
/// assert_eq!(read_to_string(&path)?, "{}\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn read_to_string(path: &Path) -> io::Result<String> {
    let (parent, file_name) = parent_and_file_name(path)?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read_to_string(Path::new(&file_name))
}

/// Read raw bytes, e.g. a session signing key.
pub fn read(path: &Path) -> io::Result<Vec<u8>> {
    let (parent, file_name) = parent_and_file_name(path)?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read(Path::new(&file_name))
}

/// Write bytes to an artifact through `cap_std`, replacing any existing file.
pub fn write(path: &Path, contents: &[u8]) -> io::Result<()> {
    let (parent, file_name) = parent_and_file_name(path)?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.write(Path::new(&file_name), contents)
}

fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "artifact path must include a file name",
        )
    })?;
    Ok((parent, file_name.to_os_string()))
}
