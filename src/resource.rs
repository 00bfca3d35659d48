//! ResourceLifecycle - owns every object URL minted during a session.
//!
//! An object URL is a session-scoped key into an in-memory blob store. The
//! preview of the selected image and the converted result each hold one,
//! and nothing outside this module creates or revokes them.

use std::collections::HashMap;
use std::fmt;

use sha2::{Digest, Sha256};

/// Scheme prefix for minted URLs.
const URL_PREFIX: &str = "blob:minecraftimg/";

/// A minted object URL referencing a blob held by [`ResourceLifecycle`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The slot a handle is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    /// Preview of the currently selected source image.
    Preview,
    /// Output of the most recent successful conversion.
    Result,
}

/// Counters over the whole session, used to audit for leaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    pub minted: u64,
    pub released: u64,
}

/// Mints and releases object URLs, and tracks which one is active per role.
#[derive(Debug, Default)]
pub struct ResourceLifecycle {
    blobs: HashMap<ObjectUrl, Vec<u8>>,
    active: HashMap<HandleRole, ObjectUrl>,
    next_seq: u64,
    stats: LifecycleStats,
}

impl ResourceLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a blob in a freshly minted URL.
    ///
    /// The sequence number makes every URL unique for the session, even when
    /// the same bytes are materialized twice.
    pub fn materialize(&mut self, blob: Vec<u8>) -> ObjectUrl {
        self.next_seq += 1;
        let url = ObjectUrl(format!(
            "{}{:06}-{}",
            URL_PREFIX,
            self.next_seq,
            short_digest(&blob)
        ));
        log::debug!("Minted {} ({} bytes)", url, blob.len());
        self.blobs.insert(url.clone(), blob);
        self.stats.minted += 1;
        url
    }

    /// Invalidate a URL. Returns `false` if it was not live.
    ///
    /// Releasing a URL that is still assigned to a role also clears that
    /// role, so the view can never resolve a dead handle.
    pub fn release(&mut self, url: &ObjectUrl) -> bool {
        if self.blobs.remove(url).is_none() {
            log::warn!("Ignoring release of unknown or already released {}", url);
            return false;
        }
        self.active.retain(|_, active| *active != *url);
        self.stats.released += 1;
        log::debug!("Released {}", url);
        true
    }

    /// Mint a handle for `blob`, assign it to `role`, then release the handle
    /// the role held before.
    pub fn replace(&mut self, role: HandleRole, blob: Vec<u8>) -> ObjectUrl {
        let url = self.materialize(blob);
        let previous = self.active.insert(role, url.clone());
        if let Some(previous) = previous {
            self.release(&previous);
        }
        url
    }

    /// The handle currently displayed in `role`, if any.
    pub fn active(&self, role: HandleRole) -> Option<&ObjectUrl> {
        self.active.get(&role)
    }

    /// Bytes behind a live URL.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<&[u8]> {
        self.blobs.get(url).map(Vec::as_slice)
    }

    /// Bytes behind the handle currently displayed in `role`.
    pub fn active_bytes(&self, role: HandleRole) -> Option<&[u8]> {
        self.active(role).and_then(|url| self.resolve(url))
    }

    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }

    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    /// Release every live handle. Called once when the session ends.
    pub fn release_all(&mut self) {
        let live: Vec<ObjectUrl> = self.blobs.keys().cloned().collect();
        for url in &live {
            self.release(url);
        }
        if !live.is_empty() {
            log::info!("Released {} handle(s) at teardown", live.len());
        }
    }
}

/// First 8 bytes of the SHA-256 of `blob`, hex encoded.
fn short_digest(blob: &[u8]) -> String {
    let digest = Sha256::digest(blob);
    hex::encode(&digest[..8])
}
