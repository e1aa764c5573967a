//! Archive codec: named entries packed into a gzip-compressed tar stream.
//!
//! No encryption happens here. An [`Archive`] is built fresh for every
//! packaging call and is immutable once serialized.

use std::collections::HashSet;
use std::io::Read;

use bytes::Bytes;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::error::{CoreError, Result};

/// Name of the single entry produced by [`Archive::single_text`].
pub const PRIMARY_ENTRY: &str = "string.txt";

/// Folder every entry of a file-set archive is placed under.
pub const ASSET_FOLDER: &str = "encryptedAssets";

/// Gzip member magic.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One named entry of an archive.
///
/// After a bundle is opened this is a read-only handle; the bytes are
/// only decoded as text when asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    data: Bytes,
}

impl ArchiveEntry {
    /// The path-like entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw entry bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// A cheap clone of the entry bytes.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Decode the entry as UTF-8 text.
    pub fn as_text(&self) -> Result<&str> {
        std::str::from_utf8(&self.data).map_err(|_| CoreError::NotText(self.name.clone()))
    }
}

/// An ordered collection of uniquely named entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Build an archive holding `text` as its only entry, `string.txt`.
    pub fn single_text(text: &str) -> Self {
        Self {
            entries: vec![ArchiveEntry {
                name: PRIMARY_ENTRY.to_string(),
                data: Bytes::copy_from_slice(text.as_bytes()),
            }],
        }
    }

    /// Build an archive with one entry per file under `encryptedAssets/`.
    ///
    /// Original file names are preserved. Fails if two files share a name.
    pub fn file_set<N, D>(files: impl IntoIterator<Item = (N, D)>) -> Result<Self>
    where
        N: Into<String>,
        D: Into<Bytes>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (name, data) in files {
            let name = name.into();
            validate_name(&name)?;
            if !seen.insert(name.clone()) {
                return Err(CoreError::DuplicateEntryName(name));
            }
            entries.push(ArchiveEntry {
                name: format!("{}/{}", ASSET_FOLDER, name),
                data: data.into(),
            });
        }

        Ok(Self { entries })
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Look up an entry by its full name.
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Text of the primary `string.txt` entry.
    pub fn primary_text(&self) -> Result<&str> {
        self.entry(PRIMARY_ENTRY)
            .ok_or_else(|| CoreError::MissingPrimaryEntry(PRIMARY_ENTRY.to_string()))?
            .as_text()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to a gzip-compressed tar stream.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let write_err = |e: std::io::Error| CoreError::ArchiveWriteError(e.to_string());

        let mut out = Vec::new();
        {
            let enc = GzEncoder::new(&mut out, Compression::default());
            let mut builder = tar::Builder::new(enc);
            for entry in &self.entries {
                let mut header = tar::Header::new_gnu();
                header.set_size(entry.data.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder
                    .append_data(&mut header, &entry.name, entry.data.as_ref())
                    .map_err(write_err)?;
            }
            let enc = builder.into_inner().map_err(write_err)?;
            enc.finish().map_err(write_err)?;
        }
        Ok(out)
    }

    /// Parse a gzip-compressed tar stream.
    ///
    /// Directory records are skipped. Truncation, checksum failures, and
    /// repeated entry names are all reported as `ArchiveParseError`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let parse_err = |e: std::io::Error| CoreError::ArchiveParseError(e.to_string());

        if !bytes.starts_with(&GZIP_MAGIC) {
            return Err(CoreError::ArchiveParseError("missing gzip header".into()));
        }

        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for entry in archive.entries().map_err(parse_err)? {
            let mut entry = entry.map_err(parse_err)?;
            if entry.header().entry_type().is_dir() {
                continue;
            }

            let name = entry
                .path()
                .map_err(parse_err)?
                .to_string_lossy()
                .into_owned();
            if !seen.insert(name.clone()) {
                return Err(CoreError::ArchiveParseError(format!(
                    "duplicate entry {:?}",
                    name
                )));
            }

            // The header size is untrusted; let the reader grow the buffer.
            let mut data = Vec::new();
            entry.read_to_end(&mut data).map_err(parse_err)?;
            entries.push(ArchiveEntry {
                name,
                data: Bytes::from(data),
            });
        }

        Ok(Self { entries })
    }
}

/// Reject names the tar writer would refuse, rewrite, or that escape the folder.
///
/// Tar drops `.` components on write, so `./a` would come back as `a`.
fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(CoreError::InvalidEntryName(name.to_string()));
    }
    Ok(())
}
