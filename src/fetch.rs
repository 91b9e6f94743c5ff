//! Fetching of index JSON and plain-HTML fragments.
//!
//! Decorators never touch the network or the filesystem directly: they go
//! through a [`Fetcher`], so a page can be decorated against a content
//! checkout on disk, an in-memory fixture, or anything else that can answer
//! "give me the body at this location".

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::encoding;
use crate::{Error, Result};

/// Source of fetched resources.
///
/// `location` is whatever the page asked for: a site path such as
/// `/blog-index.json` or an absolute URL taken from authored content.
pub trait Fetcher {
    /// Retrieve the body at `location` as text.
    fn fetch_text(&self, location: &str) -> Result<String>;
}

/// The `{ "data": [...] }` envelope every index file uses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct IndexFile<T> {
    /// Index records.
    #[serde(default)]
    pub data: Vec<T>,
}

/// Fetch and deserialise a JSON resource.
pub fn fetch_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, location: &str) -> Result<T> {
    let body = fetcher.fetch_text(location)?;
    serde_json::from_str(&body).map_err(|source| Error::Json {
        location: location.to_string(),
        source,
    })
}

/// Fetch the records of an index file.
pub fn fetch_index<T: DeserializeOwned>(fetcher: &dyn Fetcher, location: &str) -> Result<Vec<T>> {
    fetch_json::<IndexFile<T>>(fetcher, location).map(|index| index.data)
}

/// Path part of a location; absolute URLs lose scheme, host, query and hash.
#[must_use]
pub fn location_path(location: &str) -> String {
    let location = location.trim();
    match Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => {
            let end = location.find(['?', '#']).unwrap_or(location.len());
            let path = &location[..end];
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        }
    }
}

// === Directory-backed fetcher ===

/// Serves locations from a content root on disk.
///
/// `/express/blocks/a.json` maps to `{root}/express/blocks/a.json`. Paths
/// that would climb out of the root are refused.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Serve from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, location: &str) -> Result<PathBuf> {
        let path = location_path(location);
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(Error::Fetch {
                location: location.to_string(),
                reason: "path escapes the content root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch_text(&self, location: &str) -> Result<String> {
        let path = self.resolve(location)?;
        let bytes = fs::read(&path).inspect_err(|e| {
            tracing::debug!(location, path = %path.display(), error = %e, "content root read failed");
        })?;
        tracing::debug!(location, bytes = bytes.len(), "fetched from content root");
        Ok(encoding::decode_html(&bytes))
    }
}

// === In-memory fetcher ===

/// Serves locations from a map keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, String>,
}

impl MemoryFetcher {
    /// An empty fetcher: every location fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `body` under `location`, builder style.
    #[must_use]
    pub fn with(mut self, location: &str, body: impl Into<String>) -> Self {
        self.insert(location, body);
        self
    }

    /// Register `body` under `location`.
    pub fn insert(&mut self, location: &str, body: impl Into<String>) {
        self.bodies.insert(location_path(location), body.into());
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch_text(&self, location: &str) -> Result<String> {
        self.bodies
            .get(&location_path(location))
            .cloned()
            .ok_or_else(|| Error::Fetch {
                location: location.to_string(),
                reason: "404 not found".to_string(),
            })
    }
}
