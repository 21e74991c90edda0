/*
 * If not stated otherwise in this file or this component's LICENSE file the
 * following copyright and licenses apply:
 *
 * Copyright 2025 RDK Management
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
*/

#![deny(warnings)]
// External crates
use bstr::BString;
use parking_lot::Mutex;
use pnet::datalink::MacAddr;
use thiserror::Error;
use tracing::{debug, info, trace};

// Internal modules
use crate::security_resolver::NegotiatedSecurityInfo;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanDbError {
    #[error("scan database is closed")]
    Closed,
    #[error("scan database is full ({0} entries)")]
    CapacityExceeded(usize),
}

/// One BSS as recorded by the scan engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScanEntry {
    pub bssid: MacAddr,
    pub channel_freq: u32,
    pub ssid: BString,
    pub beacon_interval: u16,
    pub capability_info: u16,
    pub ie_blob: Vec<u8>,
    pub security: NegotiatedSecurityInfo,
    pub score: i32,
    /// Milliseconds, scan engine clock
    pub received_time: u64,
    pub hidden_ssid_timestamp: u64,
}

impl RawScanEntry {
    pub const DEFAULT_BEACON_INTERVAL: u16 = 100;

    pub fn new(bssid: MacAddr, channel_freq: u32) -> Self {
        Self {
            bssid,
            channel_freq,
            ssid: BString::from(""),
            beacon_interval: Self::DEFAULT_BEACON_INTERVAL,
            capability_info: 0,
            ie_blob: Vec::new(),
            security: NegotiatedSecurityInfo::default(),
            score: 0,
            received_time: 0,
            hidden_ssid_timestamp: 0,
        }
    }

    pub fn with_ssid(mut self, ssid: impl Into<BString>) -> Self {
        self.ssid = ssid.into();
        self
    }

    pub fn with_ies(mut self, ie_blob: Vec<u8>) -> Self {
        self.ie_blob = ie_blob;
        self
    }

    pub fn with_security(mut self, security: NegotiatedSecurityInfo) -> Self {
        self.security = security;
        self
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }
}

/// Selection criteria for scan entries. An empty list matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub bssids: Vec<MacAddr>,
    pub ssids: Vec<BString>,
    pub channel_freqs: Vec<u32>,
}

impl ScanFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn for_bssid(bssid: MacAddr) -> Self {
        Self {
            bssids: vec![bssid],
            ..Self::default()
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.bssids.is_empty() && self.ssids.is_empty() && self.channel_freqs.is_empty()
    }

    pub fn matches(&self, entry: &RawScanEntry) -> bool {
        let bssid_ok = self.bssids.is_empty() || self.bssids.contains(&entry.bssid);
        let ssid_ok = self.ssids.is_empty()
            || (!entry.ssid.is_empty() && self.ssids.contains(&entry.ssid));
        let freq_ok =
            self.channel_freqs.is_empty() || self.channel_freqs.contains(&entry.channel_freq);
        bssid_ok && ssid_ok && freq_ok
    }
}

/// Entries matching a filter together with the database size taken under
/// the same lock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanMatches {
    pub total: usize,
    pub entries: Vec<RawScanEntry>,
}

/// Backing scan engine queried by the cache
pub trait ScanDatabase: Send + Sync {
    fn add_entry(&self, entry: RawScanEntry) -> Result<(), ScanDbError>;

    /// Matching entries in scan engine order
    fn get_results(&self, filter: &ScanFilter) -> Result<ScanMatches, ScanDbError>;

    /// Removes matching entries and returns how many were removed
    fn flush(&self, filter: &ScanFilter) -> Result<usize, ScanDbError>;

    /// Drops every entry whose channel is not in `valid_freqs`
    fn filter_valid_channels(&self, valid_freqs: &[u32]) -> Result<usize, ScanDbError>;

    /// Total number of entries regardless of any filter
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct ScanDbInner {
    entries: Vec<RawScanEntry>,
    closed: bool,
}

/// In-memory scan engine store
#[derive(Debug)]
pub struct ScanDb {
    inner: Mutex<ScanDbInner>,
    capacity: usize,
}

impl Default for ScanDb {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanDb {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ScanDbInner {
                entries: Vec::new(),
                closed: false,
            }),
            capacity,
        }
    }

    /// Rejects every later request, used on subsystem shutdown
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.closed = true;
        info!("Scan database closed");
    }
}

impl ScanDatabase for ScanDb {
    fn add_entry(&self, entry: RawScanEntry) -> Result<(), ScanDbError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(ScanDbError::Closed);
        }

        if let Some(existing) = inner
            .entries
            .iter_mut()
            .find(|e| e.bssid == entry.bssid && e.channel_freq == entry.channel_freq)
        {
            trace!(bssid = %entry.bssid, freq = entry.channel_freq, "Replacing scan entry");
            *existing = entry;
            return Ok(());
        }

        if inner.entries.len() >= self.capacity {
            return Err(ScanDbError::CapacityExceeded(self.capacity));
        }
        inner.entries.push(entry);
        Ok(())
    }

    fn get_results(&self, filter: &ScanFilter) -> Result<ScanMatches, ScanDbError> {
        let inner = self.inner.lock();
        if inner.closed {
            return Err(ScanDbError::Closed);
        }
        Ok(ScanMatches {
            total: inner.entries.len(),
            entries: inner
                .entries
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect(),
        })
    }

    fn flush(&self, filter: &ScanFilter) -> Result<usize, ScanDbError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(ScanDbError::Closed);
        }
        let before = inner.entries.len();
        if filter.is_wildcard() {
            inner.entries.clear();
        } else {
            inner.entries.retain(|e| !filter.matches(e));
        }
        let removed = before - inner.entries.len();
        debug!(
            removed,
            remaining = inner.entries.len(),
            wildcard = filter.is_wildcard(),
            "Scan database flushed"
        );
        Ok(removed)
    }

    fn filter_valid_channels(&self, valid_freqs: &[u32]) -> Result<usize, ScanDbError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(ScanDbError::Closed);
        }
        let before = inner.entries.len();
        inner.entries.retain(|e| valid_freqs.contains(&e.channel_freq));
        let removed = before - inner.entries.len();
        debug!(removed, valid = valid_freqs.len(), "Dropped entries on invalid channels");
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(last: u8) -> MacAddr {
        MacAddr::new(0x02, 0x00, 0x00, 0x00, 0x00, last)
    }

    // Verify an entry with the same BSSID and frequency replaces the old one
    #[test]
    fn test_add_entry_replaces() {
        let db = ScanDb::new();
        db.add_entry(RawScanEntry::new(mac(1), 2412).with_score(1)).unwrap();
        db.add_entry(RawScanEntry::new(mac(1), 2412).with_score(5)).unwrap();
        db.add_entry(RawScanEntry::new(mac(1), 5180)).unwrap();

        assert_eq!(db.len(), 2);
        let results = db.get_results(&ScanFilter::for_bssid(mac(1))).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.entries[0].score, 5);
        assert_eq!(results.entries[1].channel_freq, 5180);
    }

    // Verify SSID filters skip entries with an empty SSID
    #[test]
    fn test_ssid_filter_requires_ssid() {
        let db = ScanDb::new();
        db.add_entry(RawScanEntry::new(mac(1), 2412)).unwrap();
        db.add_entry(RawScanEntry::new(mac(2), 2412).with_ssid("home")).unwrap();

        let filter = ScanFilter {
            ssids: vec![BString::from("home"), BString::from("")],
            ..ScanFilter::default()
        };
        let results = db.get_results(&filter).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.entries.len(), 1);
        assert_eq!(results.entries[0].bssid, mac(2));
    }

    // Verify flush and channel filtering remove only matching entries
    #[test]
    fn test_flush_and_filter_valid_channels() {
        let db = ScanDb::new();
        for (idx, freq) in [2412, 2437, 5180, 5260].into_iter().enumerate() {
            db.add_entry(RawScanEntry::new(mac(idx as u8), freq)).unwrap();
        }

        assert!(!ScanFilter::for_bssid(mac(0)).is_wildcard());
        assert!(ScanFilter::any().is_wildcard());
        assert_eq!(db.flush(&ScanFilter::for_bssid(mac(0))).unwrap(), 1);
        assert_eq!(db.filter_valid_channels(&[2437, 5180]).unwrap(), 1);
        assert_eq!(db.len(), 2);
        assert_eq!(db.flush(&ScanFilter::any()).unwrap(), 2);
        assert!(db.is_empty());
    }

    // Verify capacity and shutdown errors
    #[test]
    fn test_capacity_and_close() {
        let db = ScanDb::with_capacity(1);
        db.add_entry(RawScanEntry::new(mac(1), 2412)).unwrap();
        assert_eq!(
            db.add_entry(RawScanEntry::new(mac(2), 2412)),
            Err(ScanDbError::CapacityExceeded(1))
        );

        db.close();
        assert_eq!(db.get_results(&ScanFilter::any()), Err(ScanDbError::Closed));
        assert_eq!(db.len(), 0);
    }
}
