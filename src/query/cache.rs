//! File-backed DNS response cache
//!
//! One file per (fqdn, rrtype, server) triple holding the wire-packed
//! response. Freshness is judged by file mtime; a single audit process owns
//! its cache directory exclusively.

use crate::error::{DnssecToolkitError, Result};
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FILE_PREFIX: &str = "dns_";

/// On-disk response cache with mtime-based expiry
#[derive(Debug)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    /// Open (creating if necessary) a cache directory and sweep out
    /// expired entries.
    pub fn open(dir: &Path, ttl: Duration) -> Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| DnssecToolkitError::Cache(format!("cannot create {:?}: {}", dir, e)))?;
        let cache = Self {
            dir: dir.to_path_buf(),
            ttl,
        };
        let removed = cache.sweep()?;
        if removed > 0 {
            tracing::debug!("swept {} expired cache entries from {:?}", removed, dir);
        }
        Ok(cache)
    }

    /// Remove every expired cache file, returning how many were deleted.
    pub fn sweep(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(FILE_PREFIX) {
                continue;
            }
            if self.is_expired(&entry.path()) {
                fs::remove_file(entry.path()).ok();
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Look up a cached response. Expired entries are deleted and treated
    /// as a miss; so are entries that no longer parse.
    pub fn fetch(&self, name: &Name, rtype: RecordType, server: IpAddr) -> Option<Message> {
        let path = self.entry_path(name, rtype, server);
        if !path.exists() {
            return None;
        }
        if self.is_expired(&path) {
            fs::remove_file(&path).ok();
            return None;
        }
        let wire = fs::read(&path).ok()?;
        match Message::from_vec(&wire) {
            Ok(message) => Some(message),
            Err(_) => {
                fs::remove_file(&path).ok();
                None
            }
        }
    }

    /// Write-through store of a wire-packed response.
    pub fn store(&self, name: &Name, rtype: RecordType, server: IpAddr, wire: &[u8]) {
        let path = self.entry_path(name, rtype, server);
        if let Err(e) = fs::write(&path, wire) {
            tracing::warn!("cannot write cache entry {:?}: {}", path, e);
        }
    }

    fn entry_path(&self, name: &Name, rtype: RecordType, server: IpAddr) -> PathBuf {
        self.dir
            .join(format!("{}{}_{}_{}", FILE_PREFIX, name.to_ascii(), rtype, server))
    }

    fn is_expired(&self, path: &Path) -> bool {
        let age = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|mtime| mtime.elapsed().ok());
        match age {
            Some(age) => age > self.ttl,
            // Unreadable metadata: treat as stale
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{MessageType, OpCode};

    fn response_for(name: &str) -> Message {
        let mut message = Message::new();
        message
            .set_id(4242)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .add_query(hickory_proto::op::Query::query(
                Name::from_ascii(name).unwrap(),
                RecordType::DNSKEY,
            ));
        message
    }

    #[test]
    fn test_store_and_fetch_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path(), Duration::from_secs(3600)).unwrap();
        let name = Name::from_ascii("example.com.").unwrap();
        let server: IpAddr = "192.0.2.53".parse().unwrap();

        let message = response_for("example.com.");
        let wire = message.to_vec().unwrap();
        cache.store(&name, RecordType::DNSKEY, server, &wire);

        let cached = cache.fetch(&name, RecordType::DNSKEY, server).unwrap();
        assert_eq!(cached.id(), message.id());
        assert_eq!(cached.to_vec().unwrap(), wire);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path(), Duration::from_secs(0)).unwrap();
        let name = Name::from_ascii("example.com.").unwrap();
        let server: IpAddr = "192.0.2.53".parse().unwrap();

        let wire = response_for("example.com.").to_vec().unwrap();
        cache.store(&name, RecordType::DNSKEY, server, &wire);
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.fetch(&name, RecordType::DNSKEY, server).is_none());
    }

    #[test]
    fn test_sweep_removes_only_stale_prefixed_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dns_stale"), b"x").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), b"x").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let cache = ResponseCache::open(dir.path(), Duration::from_secs(0)).unwrap();
        // open() already swept once
        assert!(!dir.path().join("dns_stale").exists());
        assert!(dir.path().join("unrelated.txt").exists());
        assert_eq!(cache.sweep().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_entry_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path(), Duration::from_secs(3600)).unwrap();
        let name = Name::from_ascii("example.com.").unwrap();
        let server: IpAddr = "192.0.2.53".parse().unwrap();

        cache.store(&name, RecordType::DNSKEY, server, b"\x01");
        assert!(cache.fetch(&name, RecordType::DNSKEY, server).is_none());
    }
}
