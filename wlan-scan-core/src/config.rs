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
use crate::channel_state::Band;

/// Bands the radio is able to operate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandCapability {
    #[default]
    Dual,
    TwoGhzOnly,
    FiveGhzOnly,
}

impl BandCapability {
    pub fn supports(&self, band: Band) -> bool {
        matches!(
            (self, band),
            (BandCapability::Dual, _)
                | (BandCapability::TwoGhzOnly, Band::TwoGhz)
                | (BandCapability::FiveGhzOnly, Band::FiveGhz)
        )
    }

    pub fn supports_freq(&self, freq: u32) -> bool {
        Band::from_freq(freq).is_some_and(|band| self.supports(band))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCoreConfig {
    pub band_capability: BandCapability,
    /// Upper bound on the valid channel list pushed to the radio
    pub max_valid_channels: usize,
    pub max_power_sets_24: usize,
    pub max_power_sets_5: usize,
}

impl ScanCoreConfig {
    pub const DEFAULT_MAX_VALID_CHANNELS: usize = 100;
    pub const DEFAULT_MAX_POWER_SETS_24: usize = 16;
    pub const DEFAULT_MAX_POWER_SETS_5: usize = 32;

    pub fn max_power_sets(&self, band: Band) -> usize {
        match band {
            Band::TwoGhz => self.max_power_sets_24,
            Band::FiveGhz => self.max_power_sets_5,
        }
    }
}

impl Default for ScanCoreConfig {
    fn default() -> Self {
        Self {
            band_capability: BandCapability::Dual,
            max_valid_channels: Self::DEFAULT_MAX_VALID_CHANNELS,
            max_power_sets_24: Self::DEFAULT_MAX_POWER_SETS_24,
            max_power_sets_5: Self::DEFAULT_MAX_POWER_SETS_5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify band capability pruning decisions
    #[test]
    fn test_band_capability_supports() {
        assert!(BandCapability::Dual.supports_freq(2412));
        assert!(BandCapability::Dual.supports_freq(5180));
        assert!(!BandCapability::TwoGhzOnly.supports_freq(5180));
        assert!(!BandCapability::FiveGhzOnly.supports_freq(2437));
        assert!(!BandCapability::Dual.supports_freq(900));
    }
}
