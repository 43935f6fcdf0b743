//! Opening a document at a page
//!
//! Browsers don't honor `#page=N` on file URLs, so the document is served
//! once over loopback HTTP and the viewer is pointed at that URL instead.

use crate::launcher::Launcher;
use crate::server::OneShotServer;
use crate::RandpageError;
use rand::Rng;
use std::fs;
use std::path::Path;

/// Pick a page uniformly from `1..=page_count`
///
/// `page_count` must be non-zero.
pub fn pick_page<R: Rng>(rng: &mut R, page_count: u32) -> u32 {
    // Index is 0-based; viewers want 1-based pages
    rng.random_range(0..page_count) + 1
}

/// Open `path` at `page` and block until the viewer has fetched it
pub fn open_at_page<L: Launcher + ?Sized>(
    path: &Path,
    page: u32,
    launcher: &L,
) -> Result<(), RandpageError> {
    let body = fs::read(path).map_err(|source| RandpageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| RandpageError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;

    let server = OneShotServer::bind(&file_name, body).inspect_err(|e| {
        log::error!("listening: {}", e);
    })?;
    let url = server.url(page);

    if let Err(e) = launcher.launch(&url) {
        log::error!("executing viewer url={} err={}", url, e);
        return Err(e);
    }

    server.wait()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingLauncher;

    impl Launcher for FailingLauncher {
        fn launch(&self, url: &str) -> Result<(), RandpageError> {
            Err(RandpageError::Launch {
                url: url.to_string(),
                reason: "exit status: 1".to_string(),
            })
        }
    }

    #[test]
    fn test_pick_page_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for page_count in [1u32, 2, 3, 10, 500] {
            for _ in 0..200 {
                let page = pick_page(&mut rng, page_count);
                assert!((1..=page_count).contains(&page), "page {} of {}", page, page_count);
            }
        }
    }

    #[test]
    fn test_pick_page_single_page() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(pick_page(&mut rng, 1), 1);
        }
    }

    #[test]
    fn test_pick_page_reaches_both_ends() {
        let mut rng = StdRng::seed_from_u64(3);
        let pages: Vec<u32> = (0..500).map(|_| pick_page(&mut rng, 4)).collect();
        assert!(pages.contains(&1));
        assert!(pages.contains(&4));
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_at_page(Path::new("/nonexistent/missing.pdf"), 1, &FailingLauncher);
        assert!(matches!(result, Err(RandpageError::Read { .. })));
    }

    #[test]
    fn test_open_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        fs::write(&path, b"%PDF-1.5").unwrap();

        let result = open_at_page(&path, 1, &FailingLauncher);
        assert!(matches!(result, Err(RandpageError::Launch { .. })));
    }
}
