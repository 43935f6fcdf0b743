//! Open a random page of a random PDF
//!
//! This crate provides:
//! - Candidate collection from directory trees and newline-delimited stdin
//! - Page counting via lopdf
//! - A one-shot loopback HTTP server, since browsers ignore `#page=N` on
//!   `file://` URLs
//! - A driver that keeps trying shuffled candidates until one opens

pub mod collector;
pub mod driver;
pub mod launcher;
pub mod opener;
pub mod page_count;
pub mod server;

pub use collector::{collect_candidates, looks_like_pdf, read_lines, shuffle_candidates, walk_for_pdfs};
pub use driver::{Driver, Outcome};
pub use launcher::{Launcher, SystemLauncher};
pub use opener::{open_at_page, pick_page};
pub use page_count::{count_pages, LopdfPageCounter, PageCounter};
pub use server::OneShotServer;

use std::path::PathBuf;

/// Message printed when every candidate has been tried without success
pub const NO_USABLE_PDF: &str = "Could not find a usable PDF";

#[derive(Debug, thiserror::Error)]
pub enum RandpageError {
    #[error("walking {path}: {source}")]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("reading candidate list: {0}")]
    ReadInput(std::io::Error),
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("counting pages: {0}")]
    PageCount(String),
    #[error("listening on loopback: {0}")]
    Bind(std::io::Error),
    #[error("writing response body: {0}")]
    Write(std::io::Error),
    #[error("executing viewer for {url}: {reason}")]
    Launch { url: String, reason: String },
    #[error("HTTP server error: {0}")]
    Http(String),
}

impl From<lopdf::Error> for RandpageError {
    fn from(e: lopdf::Error) -> Self {
        RandpageError::PageCount(e.to_string())
    }
}
