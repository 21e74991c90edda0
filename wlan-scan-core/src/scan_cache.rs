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
// Standard library
use std::sync::Arc;

// External crates
use pnet::datalink::MacAddr;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

// Internal modules
use crate::channel_state::{is_dsrc_freq, ChannelStateQuery};
use crate::config::ScanCoreConfig;
use crate::scan_db::{RawScanEntry, ScanDatabase, ScanDbError, ScanFilter};
use crate::scan_result::{ScanResultEntry, ScanResultList};
use crate::scan_result_builder::build_list;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanCacheError {
    /// Nothing has been scanned at all
    #[error("scan database holds no entries")]
    ScanEmpty,
    /// Entries exist but none survived filtering or channel checks
    #[error("every scan entry was filtered out")]
    AllFiltered,
    #[error("scan database error: {0}")]
    Database(#[from] ScanDbError),
}

/// Scan result cache state shared by scan completion and user queries
pub struct CacheContext {
    db: Arc<dyn ScanDatabase>,
    channel_state: Arc<dyn ChannelStateQuery>,
    config: ScanCoreConfig,
}

impl CacheContext {
    pub fn new(
        db: Arc<dyn ScanDatabase>,
        channel_state: Arc<dyn ChannelStateQuery>,
        config: ScanCoreConfig,
    ) -> Self {
        info!(?config, "Scan cache context created");
        Self {
            db,
            channel_state,
            config,
        }
    }

    pub fn config(&self) -> &ScanCoreConfig {
        &self.config
    }

    /// Filtered snapshot of the scan database
    #[instrument(skip(self), level = "debug")]
    pub fn get_result(&self, filter: &ScanFilter) -> Result<ScanResultList, ScanCacheError> {
        let matches = self.db.get_results(filter)?;
        if matches.total == 0 {
            debug!("No scan results available");
            return Err(ScanCacheError::ScanEmpty);
        }

        let list = build_list(&matches.entries, self.channel_state.as_ref());
        if list.is_empty() {
            debug!(
                total = matches.total,
                matched = matches.entries.len(),
                "All scan results filtered out"
            );
            return Err(ScanCacheError::AllFiltered);
        }
        Ok(list)
    }

    /// Copy of the entry for `bssid`. The intermediate list is purged before
    /// returning.
    pub fn get_result_for_bssid(&self, bssid: MacAddr) -> Result<ScanResultEntry, ScanCacheError> {
        let mut list = self.get_result(&ScanFilter::for_bssid(bssid))?;
        let entry = list.find_bssid(bssid).cloned();
        list.purge();
        entry.ok_or(ScanCacheError::AllFiltered)
    }

    pub fn remove_bssid(&self, bssid: MacAddr) -> Result<usize, ScanCacheError> {
        let removed = self.db.flush(&ScanFilter::for_bssid(bssid))?;
        debug!(%bssid, removed, "Removed BSSID from scan list");
        Ok(removed)
    }

    pub fn flush(&self, filter: &ScanFilter) -> Result<usize, ScanCacheError> {
        Ok(self.db.flush(filter)?)
    }

    /// Drops scan entries on channels outside `valid_freqs`. DSRC channels
    /// are never treated as valid.
    pub fn filter_results(&self, valid_freqs: &[u32]) -> Result<usize, ScanCacheError> {
        let valid: Vec<u32> = valid_freqs
            .iter()
            .copied()
            .filter(|freq| !is_dsrc_freq(*freq))
            .collect();
        let removed = self.db.filter_valid_channels(&valid)?;
        info!(valid = valid.len(), removed, "Scan results filtered against channel list");
        Ok(removed)
    }

    /// Records a scan completion batch and returns the entries of that batch
    /// that passed validation.
    pub fn ingest(&self, raw_entries: Vec<RawScanEntry>) -> Result<ScanResultList, ScanCacheError> {
        let list = build_list(&raw_entries, self.channel_state.as_ref());
        let total = raw_entries.len();
        for raw in raw_entries {
            match self.db.add_entry(raw) {
                Ok(()) => {}
                Err(ScanDbError::CapacityExceeded(capacity)) => {
                    warn!(capacity, "Scan database full, dropping remaining entries");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        debug!(total, built = list.len(), "Scan completion ingested");
        Ok(list)
    }
}
