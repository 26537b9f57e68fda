//! I/O error helpers.
//!
//! Wraps io::Error with the operation, the path and a platform hint so a failed
//! copy/move/remove tells the user what to check. The original ErrorKind is kept.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help_io("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint for a raw OS error code, if we know one.
fn os_hint(code: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        let hint = match code {
            libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
            libc::EXDEV => "cross-filesystem; rename not possible",
            libc::EBUSY => "resource busy; another process may be using it",
            libc::ENOENT => "path not found; it may have been moved already",
            libc::EEXIST => "already exists",
            libc::ENOTEMPTY => "directory not empty",
            libc::ENOSPC => "insufficient space on device",
            libc::EROFS => "read-only filesystem",
            libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
            libc::ENAMETOOLONG => "filename or path too long",
            libc::EMFILE => "process file descriptor limit reached",
            _ => return None,
        };
        Some(hint)
    }
    #[cfg(windows)]
    {
        let hint = match code {
            5 => "access denied; check permissions",
            17 => "not same device; cross-filesystem move",
            32 => "sharing violation; file is in use",
            2 | 3 => "path not found; it may have been moved already",
            80 | 183 => "already exists",
            112 => "insufficient disk space",
            206 => "filename or path too long",
            _ => return None,
        };
        Some(hint)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        None
    }
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved already"),
        io::ErrorKind::AlreadyExists => Some("already exists; overwrite is disabled"),
        _ => None,
    }
}

/// "<op> '<path>': <error> - <hint> [os code: N]"
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(h) = os_hint(code) {
                msg.push_str(" - ");
                msg.push_str(h);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(h) = kind_hint(e.kind()) {
                msg.push_str(" - ");
                msg.push_str(h);
            }
        }
    }
    msg
}

/// Adapter for anyhow::Result code.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Adapter for io::Result code; preserves the ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

/// EXDEV / ERROR_NOT_SAME_DEVICE. std has no stable ErrorKind for it.
pub(crate) fn is_cross_device(e: &io::Error) -> bool {
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}
