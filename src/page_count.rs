//! Page counting using lopdf

use crate::RandpageError;
use lopdf::Document;
use std::path::Path;

/// Something that can report how many pages a document has
pub trait PageCounter {
    fn page_count(&self, path: &Path) -> Result<u32, RandpageError>;
}

/// Counts pages from document metadata, without loading page content
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPageCounter;

impl PageCounter for LopdfPageCounter {
    fn page_count(&self, path: &Path) -> Result<u32, RandpageError> {
        let metadata = Document::load_metadata(path)?;
        if metadata.page_count == 0 {
            return Err(RandpageError::PageCount(format!(
                "{} has no pages",
                path.display()
            )));
        }
        Ok(metadata.page_count)
    }
}

/// Count pages of a PDF file
pub fn count_pages<P: AsRef<Path>>(path: P) -> Result<u32, RandpageError> {
    LopdfPageCounter.page_count(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_count_pages_missing_file() {
        let result = count_pages("/nonexistent/definitely/missing.pdf");
        assert!(matches!(result, Err(RandpageError::PageCount(_))));
    }

    #[test]
    fn test_count_pages_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();
        assert!(count_pages(file.path()).is_err());
    }
}
