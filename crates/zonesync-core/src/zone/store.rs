// # Zone Directory
//
// One `<domain>.zone` file per domain in a flat directory. The file name is
// the domain and doubles as the fallback `$ORIGIN` when parsing.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Error, Result};
use crate::record::ZoneRecord;
use crate::zone::parse_zone;

/// Zone file extension, without the dot
pub const ZONE_EXTENSION: &str = "zone";

/// A zone file discovered on disk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZoneFile {
    /// Domain name taken from the file stem
    pub domain: String,
    /// Full path of the file
    pub path: PathBuf,
}

/// Local zone directory
#[derive(Debug, Clone)]
pub struct ZoneDirectory {
    root: PathBuf,
}

impl ZoneDirectory {
    /// Open an existing zone directory
    ///
    /// Fails with [`Error::ZoneDirMissing`] if `root` is not a directory.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        match fs::metadata(&root).await {
            Ok(meta) if meta.is_dir() => Ok(Self { root }),
            _ => Err(Error::ZoneDirMissing(root)),
        }
    }

    /// Open a zone directory, creating it if needed
    pub async fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the zone file for `domain`
    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.root.join(format!("{}.{}", domain, ZONE_EXTENSION))
    }

    /// List zone files, sorted by file name
    pub async fn list(&self) -> Result<Vec<ZoneFile>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ZONE_EXTENSION) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(domain) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!("Skipping zone file with non UTF-8 name: {}", path.display());
                continue;
            };
            if domain.is_empty() {
                continue;
            }
            files.push(ZoneFile {
                domain: domain.to_string(),
                path,
            });
        }

        files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        tracing::debug!("Found {} zone file(s) in {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Read and parse a zone file
    pub async fn load(&self, file: &ZoneFile) -> Result<Vec<ZoneRecord>> {
        let text = fs::read_to_string(&file.path).await?;
        let records = parse_zone(&text, &file.domain);
        tracing::debug!("Parsed {} record(s) from {}", records.len(), file.path.display());
        Ok(records)
    }

    /// Write zone text for `domain`, replacing any existing file.
    ///
    /// Fails with [`Error::InvalidInput`] for names that are not a single
    /// path component.
    pub async fn write(&self, domain: &str, text: &str) -> Result<PathBuf> {
        check_domain_file_name(domain)?;
        let path = self.path_for(domain);
        fs::write(&path, text).await?;
        Ok(path)
    }
}

/// A domain name must map to a file directly inside the zone directory
fn check_domain_file_name(domain: &str) -> Result<()> {
    if domain.is_empty()
        || domain.starts_with('.')
        || domain.contains(['/', '\\', '\0'])
    {
        return Err(Error::invalid_input(format!(
            "Domain name cannot be used as a zone file name: {:?}",
            domain
        )));
    }
    Ok(())
}
