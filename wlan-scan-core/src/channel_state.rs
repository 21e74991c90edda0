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
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

pub const MIN_24GHZ_FREQ: u32 = 2412;
pub const MAX_24GHZ_FREQ: u32 = 2484;
pub const MIN_5GHZ_FREQ: u32 = 4900;
pub const MAX_5GHZ_FREQ: u32 = 5885;
pub const MIN_DSRC_FREQ: u32 = 5850;
pub const MAX_DSRC_FREQ: u32 = 5925;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    TwoGhz,
    FiveGhz,
}

impl Band {
    pub const ALL: [Band; 2] = [Band::TwoGhz, Band::FiveGhz];

    pub fn from_freq(freq: u32) -> Option<Band> {
        match freq {
            MIN_24GHZ_FREQ..=MAX_24GHZ_FREQ => Some(Band::TwoGhz),
            MIN_5GHZ_FREQ..=MAX_5GHZ_FREQ => Some(Band::FiveGhz),
            _ => None,
        }
    }

    pub fn contains(&self, freq: u32) -> bool {
        Band::from_freq(freq) == Some(*self)
    }

    pub fn max_freq(&self) -> u32 {
        match self {
            Band::TwoGhz => MAX_24GHZ_FREQ,
            Band::FiveGhz => MAX_5GHZ_FREQ,
        }
    }

    /// Spacing in MHz between adjacent single channels
    pub fn channel_offset(&self) -> u16 {
        match self {
            Band::TwoGhz => 5,
            Band::FiveGhz => 20,
        }
    }
}

/// DSRC channels share the upper 5 GHz range but are never used for scanning
pub fn is_dsrc_freq(freq: u32) -> bool {
    (MIN_DSRC_FREQ..=MAX_DSRC_FREQ).contains(&freq)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelState {
    Enabled,
    Disabled,
    Dfs,
    #[default]
    Invalid,
}

impl ChannelState {
    pub fn is_usable(&self) -> bool {
        matches!(self, ChannelState::Enabled | ChannelState::Dfs)
    }
}

/// Regulatory channel state provider
pub trait ChannelStateQuery: Send + Sync {
    fn channel_state(&self, freq: u32) -> ChannelState;
}

/// In-memory channel state table keyed by center frequency. Frequencies that
/// were never set report [`ChannelState::Invalid`].
#[derive(Debug, Default)]
pub struct ChannelStateTable {
    states: RwLock<IndexMap<u32, ChannelState>>,
}

impl ChannelStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = (u32, ChannelState)>,
    {
        Self {
            states: RwLock::new(states.into_iter().collect()),
        }
    }

    pub fn set_state(&self, freq: u32, state: ChannelState) {
        let previous = self.states.write().insert(freq, state);
        debug!(freq, ?state, ?previous, "Channel state updated");
    }

    /// Replaces the whole table with a new regulatory domain.
    pub fn replace<I>(&self, states: I)
    where
        I: IntoIterator<Item = (u32, ChannelState)>,
    {
        let mut guard = self.states.write();
        guard.clear();
        guard.extend(states);
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }

    /// Usable frequencies in insertion order
    pub fn usable_frequencies(&self) -> Vec<u32> {
        self.states
            .read()
            .iter()
            .filter(|(_, state)| state.is_usable())
            .map(|(freq, _)| *freq)
            .collect()
    }
}

impl ChannelStateQuery for ChannelStateTable {
    fn channel_state(&self, freq: u32) -> ChannelState {
        self.states
            .read()
            .get(&freq)
            .copied()
            .unwrap_or(ChannelState::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify band classification of edge frequencies
    #[test]
    fn test_band_from_freq() {
        assert_eq!(Band::from_freq(2412), Some(Band::TwoGhz));
        assert_eq!(Band::from_freq(2484), Some(Band::TwoGhz));
        assert_eq!(Band::from_freq(5180), Some(Band::FiveGhz));
        assert_eq!(Band::from_freq(5885), Some(Band::FiveGhz));
        assert_eq!(Band::from_freq(5900), None);
        assert_eq!(Band::from_freq(60480), None);
        assert!(is_dsrc_freq(5860));
        assert!(!is_dsrc_freq(5825));
    }

    // Verify unknown frequencies report Invalid
    #[test]
    fn test_unknown_channel_is_invalid() {
        let table = ChannelStateTable::from_states([(2412, ChannelState::Enabled)]);
        assert_eq!(table.channel_state(2412), ChannelState::Enabled);
        assert_eq!(table.channel_state(2417), ChannelState::Invalid);
    }

    // Verify replace drops the previous domain and keeps order
    #[test]
    fn test_replace_and_usable_frequencies() {
        let table = ChannelStateTable::new();
        table.set_state(2412, ChannelState::Enabled);
        table.replace([
            (5260, ChannelState::Dfs),
            (5180, ChannelState::Enabled),
            (5200, ChannelState::Disabled),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.channel_state(2412), ChannelState::Invalid);
        assert_eq!(table.usable_frequencies(), vec![5260, 5180]);
    }
}
