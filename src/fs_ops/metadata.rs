//! Metadata preservation for copied entries.
//! - Copies timestamps (atime, mtime) and, on Unix, permission bits.
//! - Best-effort: failures are logged and ignored.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

/// Apply `src_meta` timestamps and permissions to `dest`.
pub fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    if let Err(e) = set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
    } else {
        trace!(path = %dest.display(), "set atime/mtime on destination");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o7777;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(mode)) {
            warn!(path = %dest.display(), mode = format!("{:o}", mode), error = %e, "failed to set permissions on destination");
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = fs::set_permissions(dest, src_meta.permissions()) {
            warn!(path = %dest.display(), error = %e, "failed to set readonly attribute on destination");
        }
    }
}
