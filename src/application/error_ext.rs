//! Error conversion helpers for listing I/O
//!
//! Attaches the listing source to `io::Error`s, and calls out listings that
//! are not UTF-8 text (archive tools often emit them in a legacy code page).

use std::io;

use crate::application::services::ListingSource;
use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with
/// the listing it came from.
pub trait ListingResultExt<T> {
    /// Add listing context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_listing_context(&ListingSource::File(path.clone()))?;
    /// ```
    fn with_listing_context(self, source: &ListingSource) -> ApplicationResult<T>;
}

impl<T> ListingResultExt<T> for io::Result<T> {
    fn with_listing_context(self, source: &ListingSource) -> ApplicationResult<T> {
        self.map_err(|e| {
            let context = match e.kind() {
                io::ErrorKind::InvalidData => {
                    format!("read listing {}: not valid UTF-8, convert it first", source)
                }
                _ => format!("read listing {}", source),
            };
            ApplicationError::OperationFailed {
                context,
                source: Box::new(e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_of(result: ApplicationResult<()>) -> String {
        match result {
            Err(ApplicationError::OperationFailed { context, .. }) => context,
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn names_file_listing() {
        let err: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        let context = context_of(err.with_listing_context(&ListingSource::File("d2.lst".into())));
        assert_eq!(context, "read listing d2.lst");
    }

    #[test]
    fn flags_non_utf8_stdin() {
        let err: io::Result<()> = Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"));
        let context = context_of(err.with_listing_context(&ListingSource::Stdin));
        assert_eq!(
            context,
            "read listing <stdin>: not valid UTF-8, convert it first"
        );
    }
}
