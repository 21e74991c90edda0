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
use pnet::datalink::MacAddr;
use thiserror::Error;
use tracing::trace;

// Internal modules
use crate::ie_codec::ParsedIes;
use crate::security_resolver::SecurityCapability;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanResultListError {
    #[error("scan result list has been purged")]
    Purged,
}

/// Validated scan result owned by exactly one [`ScanResultList`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResultEntry {
    pub bssid: MacAddr,
    pub ssid: BString,
    pub channel_freq: u32,
    pub beacon_interval: u16,
    pub capability_info: u16,
    pub security: SecurityCapability,
    pub(crate) ie_blob: Box<[u8]>,
    pub parsed_ies: Option<ParsedIes>,
    pub score: i32,
    pub received_time: u64,
    pub hidden_ssid_timestamp: u64,
}

impl ScanResultEntry {
    pub fn ie_blob(&self) -> &[u8] {
        &self.ie_blob
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Empty,
    Populated,
    Purged,
}

/// Snapshot of scan results in the order they were inserted
#[derive(Debug, Default)]
pub struct ScanResultList {
    entries: Vec<ScanResultEntry>,
    purged: bool,
}

impl ScanResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ListState {
        match (self.purged, self.entries.is_empty()) {
            (true, _) => ListState::Purged,
            (false, true) => ListState::Empty,
            (false, false) => ListState::Populated,
        }
    }

    pub fn insert(&mut self, entry: ScanResultEntry) -> Result<(), ScanResultListError> {
        if self.purged {
            return Err(ScanResultListError::Purged);
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Drops every entry. Calling it again is a no-op.
    pub fn purge(&mut self) {
        if self.purged {
            return;
        }
        trace!(entries = self.entries.len(), "Purging scan result list");
        self.entries = Vec::new();
        self.purged = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScanResultEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> ScanIterator<'_> {
        ScanIterator::new(self)
    }

    pub fn find_bssid(&self, bssid: MacAddr) -> Option<&ScanResultEntry> {
        self.entries.iter().find(|e| e.bssid == bssid)
    }
}

impl FromIterator<ScanResultEntry> for ScanResultList {
    fn from_iter<I: IntoIterator<Item = ScanResultEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            purged: false,
        }
    }
}

impl<'a> IntoIterator for &'a ScanResultList {
    type Item = &'a ScanResultEntry;
    type IntoIter = ScanIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over a [`ScanResultList`]. Any number of cursors may walk the
/// same list.
#[derive(Debug, Clone)]
pub struct ScanIterator<'a> {
    list: &'a ScanResultList,
    pos: usize,
}

impl<'a> ScanIterator<'a> {
    pub fn new(list: &'a ScanResultList) -> Self {
        Self { list, pos: 0 }
    }

    /// Rewinds to the head and returns the first entry
    pub fn get_first(&mut self) -> Option<&'a ScanResultEntry> {
        self.pos = 0;
        self.get_next()
    }

    /// Entry after the previous one, or the head on a fresh cursor
    pub fn get_next(&mut self) -> Option<&'a ScanResultEntry> {
        let entry = self.list.entries.get(self.pos)?;
        self.pos += 1;
        Some(entry)
    }
}

impl<'a> Iterator for ScanIterator<'a> {
    type Item = &'a ScanResultEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.get_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.entries.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScanIterator<'_> {}
