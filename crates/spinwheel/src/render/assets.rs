use crate::error::AssetError;
use crate::outcome::AssetUrl;
use gdk_pixbuf::Pixbuf;
use gdk_pixbuf::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Starts an asynchronous fetch. The result comes back through
/// `AssetCache::complete`.
pub trait AssetFetcher {
    fn fetch(&self, url: &AssetUrl);
}

/// Fetcher for hosts without asset support. Every request stays pending.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFetch;

impl AssetFetcher for NoFetch {
    fn fetch(&self, url: &AssetUrl) {
        log::debug!("no asset fetcher configured, '{}' stays unloaded", url);
    }
}

#[derive(Debug)]
pub enum AssetState {
    Loading,
    Ready(Pixbuf),
    Failed,
}

/// Images keyed by URL. Entries are only ever added; failures are not retried.
pub struct AssetCache {
    entries: HashMap<AssetUrl, AssetState>,
    fetcher: Box<dyn AssetFetcher>,
}

impl AssetCache {
    pub fn new(fetcher: Box<dyn AssetFetcher>) -> Self {
        Self {
            entries: HashMap::new(),
            fetcher,
        }
    }

    /// Returns the image when ready, starting a fetch on first sight.
    pub fn get(&mut self, url: &AssetUrl) -> Option<&Pixbuf> {
        if !self.entries.contains_key(url) {
            self.entries.insert(url.clone(), AssetState::Loading);
            self.fetcher.fetch(url);
        }
        match self.entries.get(url) {
            Some(AssetState::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Optional variant of `get` for asset slots that may be unset.
    pub fn get_opt(&mut self, url: Option<&AssetUrl>) -> Option<&Pixbuf> {
        match url {
            Some(u) if !u.trim().is_empty() => self.get(u),
            _ => None,
        }
    }

    pub fn state(&self, url: &AssetUrl) -> Option<&AssetState> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a finished fetch. Returns true when a new image became ready.
    pub fn complete(&mut self, url: &AssetUrl, result: Result<Vec<u8>, AssetError>) -> bool {
        let Some(entry) = self.entries.get_mut(url) else {
            log::debug!("ignoring asset '{}' that was never requested", url);
            return false;
        };
        if !matches!(entry, AssetState::Loading) {
            return false;
        }

        match result.and_then(|bytes| decode(&bytes)) {
            Ok(image) => {
                log::debug!(
                    "asset '{}' ready ({}x{})",
                    url,
                    image.width(),
                    image.height()
                );
                *entry = AssetState::Ready(image);
                true
            }
            Err(e) => {
                log::warn!("asset '{}' failed: {}", url, e);
                *entry = AssetState::Failed;
                false
            }
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<Pixbuf, AssetError> {
    let loader = gdk_pixbuf::PixbufLoader::new();
    loader.write(bytes)?;
    loader.close()?;
    loader.pixbuf().ok_or(AssetError::Empty)
}

/// Maps an asset URL to a local path. Plain paths and `file://` URLs are
/// supported; anything with another scheme is rejected.
pub fn resolve_path(url: &AssetUrl) -> Result<PathBuf, AssetError> {
    let raw = url.trim();
    if let Some(path) = raw.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    match raw.split_once("://") {
        Some(_) => Err(AssetError::UnsupportedScheme(raw.to_string())),
        None => Ok(PathBuf::from(raw)),
    }
}
