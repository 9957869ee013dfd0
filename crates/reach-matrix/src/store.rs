//! Key-addressed matrix cache with atomic whole-bundle replace.
//!
//! # Key space and layout
//!
//! A bundle is addressed by `(namespace, mode, profile, bulk cell)`.  The
//! filesystem store maps that to
//!
//! ```text
//! {root}/{namespace}/{mode}/{profile}/{cell:x}.bin
//! ```
//!
//! partitioning by mode then profile then cell so a neighborhood read is a
//! bounded set of lookups, never a scan.  Cell ids render as lowercase hex,
//! the canonical string form of 64-bit hex-grid ids.
//!
//! # Atomicity
//!
//! `put` stages the bytes into a temporary file in the destination
//! directory and renames it over the final name.  Readers observe either
//! the old or the new complete bundle; concurrent writers to the same key
//! are last-writer-wins.  A missing key is `Ok(None)`, not an error.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use reach_core::{RoutingProfile, TravelMode};

use crate::error::StorageResult;

// ── CacheKey ──────────────────────────────────────────────────────────────────

/// Which derived product a bundle belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    TravelTime,
    Opportunity,
    Connectivity,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::TravelTime => "traveltime",
            Namespace::Opportunity => "opportunity",
            Namespace::Connectivity => "connectivity",
        }
    }
}

/// Full address of one cached bundle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: Namespace,
    pub mode: TravelMode,
    pub profile: RoutingProfile,
    pub cell: u64,
}

impl CacheKey {
    pub fn new(namespace: Namespace, mode: TravelMode, profile: RoutingProfile, cell: u64) -> Self {
        Self { namespace, mode, profile, cell }
    }

    /// Relative storage path for this key.
    pub fn rel_path(&self) -> PathBuf {
        PathBuf::from(self.namespace.as_str())
            .join(self.mode.as_str())
            .join(self.profile.as_str())
            .join(format!("{:x}.bin", self.cell))
    }
}

// ── MatrixStore ───────────────────────────────────────────────────────────────

/// Byte-level cache seam.  Implementations must make `put` atomic per key:
/// no reader may ever observe a torn bundle.
pub trait MatrixStore: Send + Sync {
    /// Replace whatever is under `key` with `bytes`, whole.
    fn put(&self, key: &CacheKey, bytes: &[u8]) -> StorageResult<()>;

    /// The full bundle under `key`, or `None` if never written.
    fn get(&self, key: &CacheKey) -> StorageResult<Option<Vec<u8>>>;
}

/// Serialize and store a bundle under `key`.
pub fn put_bundle<T: Serialize>(
    store: &dyn MatrixStore,
    key: &CacheKey,
    bundle: &T,
) -> StorageResult<()> {
    let bytes = bincode::serialize(bundle)?;
    store.put(key, &bytes)
}

/// Load and deserialize the bundle under `key`, if present.
pub fn get_bundle<T: DeserializeOwned>(
    store: &dyn MatrixStore,
    key: &CacheKey,
) -> StorageResult<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

// ── FsMatrixStore ─────────────────────────────────────────────────────────────

/// Filesystem-backed store rooted at a directory.
pub struct FsMatrixStore {
    root: PathBuf,
}

impl FsMatrixStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn abs_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.rel_path())
    }
}

impl MatrixStore for FsMatrixStore {
    fn put(&self, key: &CacheKey, bytes: &[u8]) -> StorageResult<()> {
        let path = self.abs_path(key);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        // Stage in the destination directory so the rename stays on one
        // filesystem.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn get(&self, key: &CacheKey) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(self.abs_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ── MemoryMatrixStore ─────────────────────────────────────────────────────────

/// In-memory store for tests and single-process pipelines.
#[derive(Default)]
pub struct MemoryMatrixStore {
    bundles: RwLock<FxHashMap<CacheKey, Vec<u8>>>,
}

impl MemoryMatrixStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatrixStore for MemoryMatrixStore {
    fn put(&self, key: &CacheKey, bytes: &[u8]) -> StorageResult<()> {
        let mut map = self.bundles.write().unwrap_or_else(|e| e.into_inner());
        map.insert(*key, bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &CacheKey) -> StorageResult<Option<Vec<u8>>> {
        let map = self.bundles.read().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }
}
