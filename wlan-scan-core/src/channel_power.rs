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
use nom::{
    number::complete::{le_i16, le_u16, le_u32},
    IResult,
};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

// Internal modules
use crate::channel_state::Band;
use crate::config::BandCapability;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelPowerError {
    #[error("frequency {0} MHz is outside every supported band")]
    UnknownBand(u32),
    #[error("set at {first_freq} MHz with {count} channels ends past {max_freq} MHz")]
    SpanExceedsBand {
        first_freq: u32,
        count: u16,
        max_freq: u32,
    },
    #[error("set at {0} MHz contains no channels")]
    NoChannels(u32),
}

///////////////////////////////////////////////////////////////////////////
/// Contiguous run of channels sharing one transmit power ceiling. The
/// inter-channel offset always follows the band of the first channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelPowerSet {
    first_channel_freq: u32,
    channel_count: u16,
    inter_channel_offset: u16,
    tx_power_dbm: i16,
}

impl ChannelPowerSet {
    pub const SERIALIZED_LEN: usize = 8;

    pub fn new(
        first_channel_freq: u32,
        channel_count: u16,
        tx_power_dbm: i16,
    ) -> Result<Self, ChannelPowerError> {
        let band =
            Band::from_freq(first_channel_freq).ok_or(ChannelPowerError::UnknownBand(first_channel_freq))?;
        if channel_count == 0 {
            return Err(ChannelPowerError::NoChannels(first_channel_freq));
        }

        let inter_channel_offset = band.channel_offset();
        let last = first_channel_freq as u64
            + inter_channel_offset as u64 * (channel_count as u64 - 1);
        if last > band.max_freq() as u64 {
            return Err(ChannelPowerError::SpanExceedsBand {
                first_freq: first_channel_freq,
                count: channel_count,
                max_freq: band.max_freq(),
            });
        }

        Ok(Self {
            first_channel_freq,
            channel_count,
            inter_channel_offset,
            tx_power_dbm,
        })
    }

    pub fn first_channel_freq(&self) -> u32 {
        self.first_channel_freq
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn inter_channel_offset(&self) -> u16 {
        self.inter_channel_offset
    }

    pub fn tx_power_dbm(&self) -> i16 {
        self.tx_power_dbm
    }

    pub fn band(&self) -> Band {
        if self.inter_channel_offset == Band::TwoGhz.channel_offset() {
            Band::TwoGhz
        } else {
            Band::FiveGhz
        }
    }

    pub fn last_channel_freq(&self) -> u32 {
        self.first_channel_freq
            + self.inter_channel_offset as u32 * (self.channel_count as u32 - 1)
    }

    /// Frequencies covered by this set, lowest first
    pub fn frequencies(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.channel_count as u32)
            .map(move |idx| self.first_channel_freq + idx * self.inter_channel_offset as u32)
    }

    /// Splits the set into single channel sets at the band offset
    fn partition(&self) -> impl Iterator<Item = ChannelPowerSet> + '_ {
        self.frequencies().map(move |freq| ChannelPowerSet {
            first_channel_freq: freq,
            channel_count: 1,
            inter_channel_offset: self.inter_channel_offset,
            tx_power_dbm: self.tx_power_dbm,
        })
    }

    /// `first_freq:u32 | count:u16 | tx_power:i16`, little endian
    pub fn serialize(&self) -> [u8; Self::SERIALIZED_LEN] {
        let mut bytes = [0u8; Self::SERIALIZED_LEN];
        bytes[..4].copy_from_slice(&self.first_channel_freq.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.channel_count.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.tx_power_dbm.to_le_bytes());
        bytes
    }

    /// Decodes the serialized form as a raw triplet. The offset is not on
    /// the wire, so the result still has to go through validation.
    pub fn parse(input: &[u8]) -> IResult<&[u8], RegulatoryTriplet> {
        let (input, first_freq) = le_u32(input)?;
        let (input, num_channels) = le_u16(input)?;
        let (input, max_tx_power) = le_i16(input)?;
        Ok((
            input,
            RegulatoryTriplet {
                first_freq,
                num_channels,
                max_tx_power,
            },
        ))
    }
}

pub fn serialize_sets(sets: &[ChannelPowerSet]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(sets.len() * ChannelPowerSet::SERIALIZED_LEN);
    for set in sets {
        buffer.extend_from_slice(&set.serialize());
    }
    buffer
}

/// Raw regulatory record as delivered with a country update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegulatoryTriplet {
    pub first_freq: u32,
    pub num_channels: u16,
    pub max_tx_power: i16,
}

impl RegulatoryTriplet {
    pub fn to_power_set(&self) -> Result<ChannelPowerSet, ChannelPowerError> {
        ChannelPowerSet::new(self.first_freq, self.num_channels, self.max_tx_power)
    }
}

/// One row of the regulatory default power table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultChannelPower {
    pub center_freq: u32,
    pub tx_power_dbm: i16,
}

/// Converts inbound regulatory triplets into power sets. Invalid triplets
/// and triplets for bands the radio does not operate are dropped.
pub fn sets_from_triplets(
    triplets: &[RegulatoryTriplet],
    band_capability: BandCapability,
) -> Vec<ChannelPowerSet> {
    let mut sets = Vec::with_capacity(triplets.len());
    for triplet in triplets {
        match triplet.to_power_set() {
            Ok(set) if band_capability.supports(set.band()) => sets.push(set),
            Ok(set) => {
                debug!(
                    first_freq = set.first_channel_freq(),
                    band = ?set.band(),
                    "Dropping channel set for a band the radio does not operate"
                );
            }
            Err(e) => warn!(first_freq = triplet.first_freq, %e, "Invalid regulatory triplet"),
        }
    }
    sets
}

/// Builds single channel sets for `band` from the default power rows,
/// looking at no more than `max_entries` rows.
pub fn sets_from_defaults(
    defaults: &[DefaultChannelPower],
    band: Band,
    max_entries: usize,
) -> Vec<ChannelPowerSet> {
    defaults
        .iter()
        .take(max_entries)
        .filter(|row| band.contains(row.center_freq))
        .filter_map(|row| match ChannelPowerSet::new(row.center_freq, 1, row.tx_power_dbm) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!(center_freq = row.center_freq, %e, "Skipping default power row");
                None
            }
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////
/// Ordered channel power sets of a single band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPowerTable {
    band: Band,
    sets: Vec<ChannelPowerSet>,
}

impl ChannelPowerTable {
    pub fn new(band: Band) -> Self {
        Self {
            band,
            sets: Vec::new(),
        }
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn sets(&self) -> &[ChannelPowerSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn purge(&mut self) {
        self.sets.clear();
    }

    /// Replaces the table contents with the entries of `band`. The old
    /// contents are only purged once an entry for this band shows up, so an
    /// update without any such entry leaves the table as it was. Returns
    /// the number of entries accepted. Spans are already bounded by
    /// [`ChannelPowerSet::new`].
    pub fn rebuild_band(&mut self, band: Band, entries: &[ChannelPowerSet]) -> usize {
        if band != self.band {
            warn!(table = ?self.band, requested = ?band, "Rebuild requested for another band");
            return 0;
        }

        let mut purged = false;
        let mut accepted = 0;
        for set in entries.iter().filter(|set| set.band() == band) {
            if !purged {
                self.sets.clear();
                purged = true;
            }
            match band {
                Band::TwoGhz => self.sets.push(*set),
                Band::FiveGhz => self.sets.extend(set.partition()),
            }
            accepted += 1;
        }

        debug!(band = ?band, accepted, total = self.sets.len(), "Channel power table rebuilt");
        accepted
    }

    /// Sets in list order, capped at `max_sets`
    pub fn flatten(&self, max_sets: usize) -> Vec<ChannelPowerSet> {
        if self.sets.len() > max_sets {
            error!(
                band = ?self.band,
                sets = self.sets.len(),
                max_sets,
                "Channel power table exceeds serialized limit, truncating"
            );
        }
        self.sets.iter().take(max_sets).copied().collect()
    }

    pub fn contains_freq(&self, freq: u32) -> bool {
        self.sets.iter().any(|set| set.frequencies().any(|f| f == freq))
    }
}

///////////////////////////////////////////////////////////////////////////
/// The two band tables, each behind its own lock
#[derive(Debug)]
pub struct ChannelPowerTables {
    two_ghz: Mutex<ChannelPowerTable>,
    five_ghz: Mutex<ChannelPowerTable>,
}

impl Default for ChannelPowerTables {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelPowerTables {
    pub fn new() -> Self {
        Self {
            two_ghz: Mutex::new(ChannelPowerTable::new(Band::TwoGhz)),
            five_ghz: Mutex::new(ChannelPowerTable::new(Band::FiveGhz)),
        }
    }

    fn table(&self, band: Band) -> &Mutex<ChannelPowerTable> {
        match band {
            Band::TwoGhz => &self.two_ghz,
            Band::FiveGhz => &self.five_ghz,
        }
    }

    pub fn rebuild_band(&self, band: Band, entries: &[ChannelPowerSet]) -> usize {
        self.table(band).lock().rebuild_band(band, entries)
    }

    pub fn flatten(&self, band: Band, max_sets: usize) -> Vec<ChannelPowerSet> {
        self.table(band).lock().flatten(max_sets)
    }

    pub fn snapshot(&self, band: Band) -> ChannelPowerTable {
        self.table(band).lock().clone()
    }

    /// Swaps in a table built elsewhere
    pub fn install(&self, table: ChannelPowerTable) {
        let band = table.band();
        *self.table(band).lock() = table;
    }

    pub fn purge_all(&self) {
        for band in Band::ALL {
            self.table(band).lock().purge();
        }
        info!("Channel power tables purged");
    }

    /// Runs `f` with both band tables locked, 2.4 GHz first. Every
    /// multi-band cycle goes through here so that no rebuild can land
    /// between a snapshot and the matching install.
    pub fn with_locked<R>(
        &self,
        f: impl FnOnce(&mut ChannelPowerTable, &mut ChannelPowerTable) -> R,
    ) -> R {
        let mut two_ghz = self.two_ghz.lock();
        let mut five_ghz = self.five_ghz.lock();
        f(&mut two_ghz, &mut five_ghz)
    }

    /// Converts inbound regulatory triplets and rebuilds both bands in one
    /// cycle. Returns the number of triplets accepted.
    pub fn save_regulatory_triplets(
        &self,
        triplets: &[RegulatoryTriplet],
        band_capability: BandCapability,
    ) -> usize {
        let sets = sets_from_triplets(triplets, band_capability);
        self.with_locked(|two_ghz, five_ghz| {
            two_ghz.rebuild_band(Band::TwoGhz, &sets) + five_ghz.rebuild_band(Band::FiveGhz, &sets)
        })
    }
}
