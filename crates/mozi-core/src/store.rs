//! Read-only content store holding the bundled command and rule documents.
//!
//! Paths are `/`-separated and relative to the store root, e.g.
//! `commands/planner.md` or `rules/testing.mdc`. The shipped binary uses
//! [`EmbeddedStore`] over a `rust-embed` bundle; tests use [`MemoryStore`].

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use rust_embed::Embed;

use crate::error::{MoziError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl StoreEntry {
    pub fn is_document(&self) -> bool {
        self.kind == EntryKind::Document
    }
}

pub trait ContentStore {
    /// Every entry below `root` (exclusive), sorted by path.
    fn entries(&self, root: &str) -> Vec<StoreEntry>;

    /// Full contents of the document at `path`.
    fn open(&self, path: &str) -> Result<Cow<'_, [u8]>>;
}

/// Build the sorted entry listing for `root` from a flat set of document paths,
/// synthesizing the intermediate directories.
fn entries_from_paths<'a>(root: &str, paths: impl Iterator<Item = &'a str>) -> Vec<StoreEntry> {
    let prefix = format!("{}/", root.trim_end_matches('/'));
    let mut dirs = BTreeSet::new();
    let mut docs = BTreeSet::new();

    for path in paths.filter(|p| p.starts_with(&prefix)) {
        let mut end = prefix.len();
        while let Some(i) = path[end..].find('/') {
            end += i;
            dirs.insert(path[..end].to_string());
            end += 1;
        }
        docs.insert(path.to_string());
    }

    let mut entries: Vec<StoreEntry> = dirs
        .into_iter()
        .map(|path| StoreEntry {
            path,
            kind: EntryKind::Directory,
        })
        .chain(docs.into_iter().map(|path| StoreEntry {
            path,
            kind: EntryKind::Document,
        }))
        .collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

// ---------------------------------------------------------------------------
// EmbeddedStore
// ---------------------------------------------------------------------------

/// Adapter exposing a `#[derive(Embed)]` folder as a [`ContentStore`].
pub struct EmbeddedStore<E> {
    _bundle: PhantomData<E>,
}

impl<E: Embed> EmbeddedStore<E> {
    pub fn new() -> Self {
        Self {
            _bundle: PhantomData,
        }
    }
}

impl<E: Embed> Default for EmbeddedStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Embed> ContentStore for EmbeddedStore<E> {
    fn entries(&self, root: &str) -> Vec<StoreEntry> {
        let paths: Vec<Cow<'static, str>> = E::iter().collect();
        entries_from_paths(root, paths.iter().map(|p| p.as_ref()))
    }

    fn open(&self, path: &str) -> Result<Cow<'_, [u8]>> {
        E::get(path)
            .map(|file| file.data)
            .ok_or_else(|| MoziError::DocumentNotFound(path.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store, mostly for tests and fixtures.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.documents.insert(path.to_string(), content.into());
    }
}

impl ContentStore for MemoryStore {
    fn entries(&self, root: &str) -> Vec<StoreEntry> {
        entries_from_paths(root, self.documents.keys().map(String::as_str))
    }

    fn open(&self, path: &str) -> Result<Cow<'_, [u8]>> {
        self.documents
            .get(path)
            .map(|data| Cow::Borrowed(data.as_slice()))
            .ok_or_else(|| MoziError::DocumentNotFound(path.to_string()))
    }
}
