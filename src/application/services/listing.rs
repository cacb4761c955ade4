//! Listing service
//!
//! Reads archive listings (one composite path per line) and turns them into
//! trees. All file access goes through [`FileSystem`]; the tree builder
//! itself never touches I/O.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, ListingResultExt};
use crate::config::Settings;
use crate::domain::{build_tree_with_separator, ContainerPath, NodeId, Tree};
use crate::infrastructure::traits::FileSystem;

/// Where a listing comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    Stdin,
    File(PathBuf),
}

impl ListingSource {
    /// Pick the source for a command.
    ///
    /// `-` means stdin. Without an argument the configured default listing is
    /// used, falling back to stdin.
    pub fn resolve(arg: Option<&Path>, default: Option<&Path>) -> Self {
        match arg.or(default) {
            Some(path) if path == Path::new("-") => Self::Stdin,
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Stdin,
        }
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Split listing content into entries.
///
/// Each line is one entry; a trailing `\r` is dropped. Blank lines are kept
/// and later ignored by the tree builder.
pub fn parse_listing(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Service for loading listings and building trees from them.
pub struct ListingService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ListingService {
    /// Create a new listing service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Read all entries of a listing.
    #[instrument(level = "debug", skip(self))]
    pub fn read_entries(&self, source: &ListingSource) -> ApplicationResult<Vec<String>> {
        let content = match source {
            ListingSource::Stdin => self.fs.read_stdin().with_listing_context(source)?,
            ListingSource::File(path) => {
                if !self.fs.is_file(path) {
                    return Err(ApplicationError::ListingNotFound(path.clone()));
                }
                self.fs.read_to_string(path).with_listing_context(source)?
            }
        };

        let entries = parse_listing(&content);
        debug!("read {} listing entries", entries.len());
        Ok(entries)
    }

    /// Build the tree for a listing using the configured separator.
    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self, source: &ListingSource) -> ApplicationResult<Tree> {
        let entries = self.read_entries(source)?;
        Ok(build_tree_with_separator(&entries, self.settings.separator))
    }

    /// Container location of file node `id` in the listing's tree.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, source: &ListingSource, id: NodeId) -> ApplicationResult<ContainerPath> {
        let tree = self.load_tree(source)?;
        Ok(tree.resolve(id)?)
    }
}
