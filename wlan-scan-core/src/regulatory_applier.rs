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
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

// Internal modules
use crate::channel_power::{
    serialize_sets, sets_from_defaults, sets_from_triplets, ChannelPowerSet, ChannelPowerTables,
    DefaultChannelPower, RegulatoryTriplet,
};
use crate::channel_state::Band;
use crate::config::ScanCoreConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegulatorySurfaceError {
    #[error("radio configuration rejected the update: {0}")]
    Rejected(String),
    #[error("radio configuration surface unavailable")]
    Unavailable,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("channel list is empty after pruning")]
    EmptyChannelList,
    #[error("unable to allocate the valid channel list")]
    AllocationFailed,
    #[error(transparent)]
    Surface(#[from] RegulatorySurfaceError),
}

/// Everything pushed to the radio configuration in one apply cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegulatoryUpdate {
    pub valid_channels: Vec<u32>,
    pub power_sets_24: Vec<ChannelPowerSet>,
    pub power_sets_5: Vec<ChannelPowerSet>,
}

impl RegulatoryUpdate {
    pub fn power_sets(&self, band: Band) -> &[ChannelPowerSet] {
        match band {
            Band::TwoGhz => &self.power_sets_24,
            Band::FiveGhz => &self.power_sets_5,
        }
    }

    /// Serialized power table for one band
    pub fn encode_power(&self, band: Band) -> Vec<u8> {
        serialize_sets(self.power_sets(band))
    }
}

/// Radio configuration consumer of regulatory updates
pub trait RegulatorySurface: Send {
    fn commit(&mut self, update: &RegulatoryUpdate) -> Result<(), RegulatorySurfaceError>;

    /// Dependent recomputation run after every apply cycle
    fn update_edca_profile(&mut self);
}

impl<S: RegulatorySurface> RegulatorySurface for Arc<Mutex<S>> {
    fn commit(&mut self, update: &RegulatoryUpdate) -> Result<(), RegulatorySurfaceError> {
        self.lock().commit(update)
    }

    fn update_edca_profile(&mut self) {
        self.lock().update_edca_profile()
    }
}

/// Surface that keeps the last committed update in memory
#[derive(Debug, Default)]
pub struct RegulatoryConfigStore {
    last_update: Option<RegulatoryUpdate>,
    commits: usize,
    edca_updates: usize,
    reject_next: Option<String>,
}

impl RegulatoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_update(&self) -> Option<&RegulatoryUpdate> {
        self.last_update.as_ref()
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn edca_updates(&self) -> usize {
        self.edca_updates
    }

    /// Fails the next commit with `reason`
    pub fn reject_next_commit(&mut self, reason: impl Into<String>) {
        self.reject_next = Some(reason.into());
    }
}

impl RegulatorySurface for RegulatoryConfigStore {
    fn commit(&mut self, update: &RegulatoryUpdate) -> Result<(), RegulatorySurfaceError> {
        if let Some(reason) = self.reject_next.take() {
            return Err(RegulatorySurfaceError::Rejected(reason));
        }
        self.last_update = Some(update.clone());
        self.commits += 1;
        Ok(())
    }

    fn update_edca_profile(&mut self) {
        self.edca_updates += 1;
    }
}

/// Summary of a successful apply cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChannels {
    pub valid_channels: Vec<u32>,
    pub power_sets_24: usize,
    pub power_sets_5: usize,
}

pub struct RegulatoryChannelApplier<S: RegulatorySurface> {
    surface: S,
    tables: Arc<ChannelPowerTables>,
    config: ScanCoreConfig,
    base_channels: Vec<u32>,
}

impl<S: RegulatorySurface> RegulatoryChannelApplier<S> {
    pub fn new(surface: S, tables: Arc<ChannelPowerTables>, config: ScanCoreConfig) -> Self {
        Self {
            surface,
            tables,
            config,
            base_channels: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tables(&self) -> &Arc<ChannelPowerTables> {
        &self.tables
    }

    /// Valid channel list of the last successful apply
    pub fn base_channels(&self) -> &[u32] {
        &self.base_channels
    }

    pub fn is_supported_channel(&self, freq: u32) -> bool {
        self.base_channels.contains(&freq)
    }

    /// Prunes `base_channels` to the bands the radio operates, rebuilds the
    /// power tables from their defaults and pushes the result. The tables
    /// and channel list only change when the push succeeds. The EDCA profile
    /// is recomputed either way.
    pub fn apply(
        &mut self,
        base_channels: &[DefaultChannelPower],
    ) -> Result<AppliedChannels, ApplyError> {
        let result = self.apply_staged(base_channels);
        self.surface.update_edca_profile();

        match &result {
            Ok(applied) => info!(
                channels = applied.valid_channels.len(),
                sets_24 = applied.power_sets_24,
                sets_5 = applied.power_sets_5,
                "Regulatory channel list applied"
            ),
            Err(e) => error!(%e, "Regulatory apply failed, keeping previous state"),
        }
        result
    }

    fn apply_staged(
        &mut self,
        base_channels: &[DefaultChannelPower],
    ) -> Result<AppliedChannels, ApplyError> {
        let band_capability = self.config.band_capability;
        let mut pruned: Vec<DefaultChannelPower> = base_channels
            .iter()
            .filter(|row| band_capability.supports_freq(row.center_freq))
            .copied()
            .collect();
        debug!(
            base = base_channels.len(),
            pruned = pruned.len(),
            ?band_capability,
            "Pruned channel list for band capability"
        );

        if pruned.is_empty() {
            return Err(ApplyError::EmptyChannelList);
        }
        if pruned.len() > self.config.max_valid_channels {
            warn!(
                channels = pruned.len(),
                max = self.config.max_valid_channels,
                "Channel list exceeds limit, truncating"
            );
            pruned.truncate(self.config.max_valid_channels);
        }

        let mut valid_channels = Vec::new();
        valid_channels
            .try_reserve_exact(pruned.len())
            .map_err(|_| ApplyError::AllocationFailed)?;
        valid_channels.extend(pruned.iter().map(|row| row.center_freq));

        let sets_24 = sets_from_defaults(&pruned, Band::TwoGhz, self.config.max_valid_channels);
        let sets_5 = sets_from_defaults(&pruned, Band::FiveGhz, self.config.max_valid_channels);
        let (config, surface) = (&self.config, &mut self.surface);
        let update = self.tables.with_locked(|two_ghz, five_ghz| {
            let mut staging_24 = two_ghz.clone();
            let mut staging_5 = five_ghz.clone();
            staging_24.rebuild_band(Band::TwoGhz, &sets_24);
            staging_5.rebuild_band(Band::FiveGhz, &sets_5);

            let update = RegulatoryUpdate {
                valid_channels,
                power_sets_24: staging_24.flatten(config.max_power_sets(Band::TwoGhz)),
                power_sets_5: staging_5.flatten(config.max_power_sets(Band::FiveGhz)),
            };
            if let Err(e) = surface.commit(&update) {
                return Err(ApplyError::from(e));
            }

            *two_ghz = staging_24;
            *five_ghz = staging_5;
            Ok(update)
        })?;
        self.base_channels = update.valid_channels.clone();

        Ok(AppliedChannels {
            power_sets_24: update.power_sets_24.len(),
            power_sets_5: update.power_sets_5.len(),
            valid_channels: update.valid_channels,
        })
    }

    /// Rebuilds the power tables from a country update and pushes them with
    /// the last applied channel list. The tables only change when the push
    /// succeeds. Returns the number of triplets accepted.
    pub fn apply_country_info(
        &mut self,
        triplets: &[RegulatoryTriplet],
    ) -> Result<usize, ApplyError> {
        let sets = sets_from_triplets(triplets, self.config.band_capability);
        let (config, surface, base_channels) =
            (&self.config, &mut self.surface, &self.base_channels);
        self.tables.with_locked(|two_ghz, five_ghz| {
            let mut staging_24 = two_ghz.clone();
            let mut staging_5 = five_ghz.clone();
            let accepted = staging_24.rebuild_band(Band::TwoGhz, &sets)
                + staging_5.rebuild_band(Band::FiveGhz, &sets);

            let update = RegulatoryUpdate {
                valid_channels: base_channels.clone(),
                power_sets_24: staging_24.flatten(config.max_power_sets(Band::TwoGhz)),
                power_sets_5: staging_5.flatten(config.max_power_sets(Band::FiveGhz)),
            };
            debug!(
                triplets = triplets.len(),
                accepted,
                sets_24 = update.power_sets_24.len(),
                sets_5 = update.power_sets_5.len(),
                "Updating radio configuration with country power settings"
            );
            if let Err(e) = surface.commit(&update) {
                error!(%e, "Failed to push country power tables, keeping previous tables");
                return Err(ApplyError::from(e));
            }

            *two_ghz = staging_24;
            *five_ghz = staging_5;
            Ok(accepted)
        })
    }

    /// Pushes the current power tables together with the last applied
    /// channel list.
    pub fn apply_power_tables(&mut self) -> Result<(), ApplyError> {
        let (config, surface, base_channels) =
            (&self.config, &mut self.surface, &self.base_channels);
        self.tables.with_locked(|two_ghz, five_ghz| {
            let update = RegulatoryUpdate {
                valid_channels: base_channels.clone(),
                power_sets_24: two_ghz.flatten(config.max_power_sets(Band::TwoGhz)),
                power_sets_5: five_ghz.flatten(config.max_power_sets(Band::FiveGhz)),
            };
            debug!(
                sets_24 = update.power_sets_24.len(),
                sets_5 = update.power_sets_5.len(),
                "Updating radio configuration with power settings"
            );
            surface.commit(&update).map_err(|e| {
                error!(%e, "Failed to push power tables");
                ApplyError::from(e)
            })
        })
    }
}
