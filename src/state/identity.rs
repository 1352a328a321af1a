use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// How a file's identity is derived from its absolute path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityStrategy {
    /// 32-bit hash of the path; compact, but two paths can collide
    #[default]
    PathHash,
    /// The path itself; never collides
    ExactPath,
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathHash => f.write_str("path-hash"),
            Self::ExactPath => f.write_str("exact-path"),
        }
    }
}

/// Identity of a file that has already been handled
///
/// Serialized untagged, so a set built from path hashes is stored as a plain
/// array of integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileIdentity {
    Hash(i32),
    Path(String),
}

impl FileIdentity {
    /// Derives the identity of `path`, which should already be absolute
    pub fn derive(path: &Path, strategy: IdentityStrategy) -> Self {
        let path = path.to_string_lossy();
        match strategy {
            IdentityStrategy::PathHash => Self::Hash(path_hash(&path)),
            IdentityStrategy::ExactPath => Self::Path(path.into_owned()),
        }
    }

    /// The strategy that produces identities of this kind
    pub fn strategy(&self) -> IdentityStrategy {
        match self {
            Self::Hash(_) => IdentityStrategy::PathHash,
            Self::Path(_) => IdentityStrategy::ExactPath,
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => write!(f, "{}", hash),
            Self::Path(path) => f.write_str(path),
        }
    }
}

/// 31-multiplier polynomial hash over the UTF-16 code units of `s`
///
/// Wraps on overflow, so existing crawl storage folders keep matching.
pub fn path_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Append-only record of handled file identities
///
/// Keeps the insertion order for persistence and a hash index for O(1)
/// membership checks.
#[derive(Debug, Clone, Default)]
pub struct IdentitySet {
    order: Vec<FileIdentity>,
    index: HashSet<FileIdentity>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set from its persisted sequence
    pub fn from_sequence(order: Vec<FileIdentity>) -> Self {
        let index = order.iter().cloned().collect();
        Self { order, index }
    }

    pub fn contains(&self, id: &FileIdentity) -> bool {
        self.index.contains(id)
    }

    /// Appends `id`; inserting an identity twice grows the sequence only
    pub fn insert(&mut self, id: FileIdentity) {
        self.index.insert(id.clone());
        self.order.push(id);
    }

    /// Length of the persisted sequence, duplicates included
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of distinct identities
    pub fn distinct(&self) -> usize {
        self.index.len()
    }

    pub fn as_slice(&self) -> &[FileIdentity] {
        &self.order
    }

    /// Strategy of the first stored identity, if any
    pub fn strategy(&self) -> Option<IdentityStrategy> {
        self.order.first().map(FileIdentity::strategy)
    }
}
