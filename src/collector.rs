//! Candidate collection
//!
//! Arguments are either filesystem roots, walked recursively for regular
//! `.pdf` files, or the marker `-`, which reads one candidate path per line
//! from stdin.

use crate::RandpageError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Argument that selects stdin as the candidate source
pub const STDIN_MARKER: &str = "-";

/// Check whether a file name ends in `.pdf`, ignoring case
pub fn looks_like_pdf(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Collect candidates for every argument, in argument order
///
/// Walk and read errors are logged and only drop the affected part of the
/// result; collection itself never fails.
pub fn collect_candidates<S, R>(args: &[S], stdin: &mut R) -> Vec<PathBuf>
where
    S: AsRef<str>,
    R: BufRead,
{
    let mut candidates = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if arg == STDIN_MARKER {
            candidates.extend(read_lines(stdin));
            continue;
        }

        candidates.extend(walk_for_pdfs(arg));
    }

    candidates
}

/// Read newline-delimited paths, keeping the ones that look like PDFs
///
/// Lines are raw bytes; file names need not be valid UTF-8.
pub fn read_lines<R: BufRead>(reader: &mut R) -> Vec<PathBuf> {
    let mut ret = Vec::new();

    for line in reader.split(b'\n') {
        match line {
            Ok(line) => {
                let line = line.strip_suffix(b"\r").unwrap_or(&line);
                if bytes_look_like_pdf(line) {
                    ret.push(path_from_bytes(line));
                }
            }
            Err(e) => {
                log::error!("{}", RandpageError::ReadInput(e));
                break;
            }
        }
    }

    ret
}

fn bytes_look_like_pdf(line: &[u8]) -> bool {
    line.len() >= 4 && line[line.len() - 4..].eq_ignore_ascii_case(b".pdf")
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Recursively find regular `.pdf` files under `root`
///
/// Entries are visited in lexical order, depth first. Symlinks are not
/// followed. A root that is itself a `.pdf` file yields just that file.
pub fn walk_for_pdfs<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let root = root.as_ref();
    let mut ret = Vec::new();

    let file_type = match fs::symlink_metadata(root) {
        Ok(meta) => meta.file_type(),
        Err(source) => {
            log::warn!(
                "{}",
                RandpageError::Walk {
                    path: root.to_path_buf(),
                    source,
                }
            );
            return ret;
        }
    };

    if file_type.is_dir() {
        if let Err(e) = walk_dir(root, &mut ret) {
            log::warn!("{}", e);
        }
    } else if file_type.is_file() && name_looks_like_pdf(root) {
        ret.push(root.to_path_buf());
    }

    ret
}

/// Walk one directory; an unreadable directory is abandoned, a bad entry skipped
fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RandpageError> {
    let walk_err = |source| RandpageError::Walk {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(walk_err)? {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => log::warn!("{}", walk_err(e)),
        }
    }
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(source) => {
                log::warn!("{}", RandpageError::Walk { path, source });
                continue;
            }
        };

        if file_type.is_dir() {
            if let Err(e) = walk_dir(&path, out) {
                log::warn!("{}", e);
            }
        } else if file_type.is_file() && name_looks_like_pdf(&path) {
            out.push(path);
        }
    }

    Ok(())
}

fn name_looks_like_pdf(path: &Path) -> bool {
    path.file_name()
        .map(|n| looks_like_pdf(&n.to_string_lossy()))
        .unwrap_or(false)
}

/// Uniformly permute the candidates in place
pub fn shuffle_candidates<T, R: Rng + ?Sized>(candidates: &mut [T], rng: &mut R) {
    candidates.shuffle(rng);
}
