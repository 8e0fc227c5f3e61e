//! Composite persistence.

use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::{BufWriter, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::StripError;

/// Write `image` to `path` in the format implied by its extension.
///
/// The bytes go to a temporary file in the destination directory, which is
/// renamed over `path` only once fully written. An existing file at `path`
/// is replaced and its permissions carried over; a failed write leaves
/// nothing behind.
pub(crate) fn write_image(image: &RgbImage, path: &Path) -> Result<(), StripError> {
    let persistence_failure = |reason: String| StripError::PersistenceFailure {
        path: PathBuf::from(path),
        reason,
    };

    let format =
        ImageFormat::from_path(path).map_err(|error| persistence_failure(error.to_string()))?;

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let existing_permissions = fs::metadata(path)
        .ok()
        .map(|metadata| metadata.permissions());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".framestrip-").suffix(".partial");
    // New files get 0o666 less the umask, the same as a plain create.
    #[cfg(unix)]
    builder.permissions(Permissions::from_mode(0o666));

    let mut temporary = builder
        .tempfile_in(directory)
        .map_err(|error| persistence_failure(error.to_string()))?;

    {
        let mut writer = BufWriter::new(temporary.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|error| persistence_failure(error.to_string()))?;
        writer
            .flush()
            .map_err(|error| persistence_failure(error.to_string()))?;
    }

    if let Some(permissions) = existing_permissions {
        fs::set_permissions(temporary.path(), permissions)
            .map_err(|error| persistence_failure(error.to_string()))?;
    }

    temporary
        .persist(path)
        .map_err(|error| persistence_failure(error.error.to_string()))?;

    log::debug!(
        "Wrote {}x{} {format:?} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
