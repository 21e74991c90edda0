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
use thiserror::Error;
use tracing::{debug, error};

// Internal modules
use crate::channel_state::{ChannelState, ChannelStateQuery};
use crate::ie_codec::{self, MAX_SSID_LEN};
use crate::scan_db::RawScanEntry;
use crate::scan_result::{ScanResultEntry, ScanResultList};
use crate::security_resolver::SecurityCapability;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("channel {freq} MHz is {state:?}")]
    ChannelNotUsable { freq: u32, state: ChannelState },
    #[error("unable to allocate {len} bytes for information elements")]
    AllocationFailed { len: usize },
}

/// Turns one scan engine entry into a cache entry. Entries on channels the
/// regulatory domain disables are refused.
pub fn build<Q>(raw: &RawScanEntry, channel_state: &Q) -> Result<ScanResultEntry, BuildError>
where
    Q: ChannelStateQuery + ?Sized,
{
    let state = channel_state.channel_state(raw.channel_freq);
    if matches!(state, ChannelState::Disabled | ChannelState::Invalid) {
        error!(
            bssid = %raw.bssid,
            freq = raw.channel_freq,
            ?state,
            "Channel not usable, not populating this BSSID"
        );
        return Err(BuildError::ChannelNotUsable {
            freq: raw.channel_freq,
            state,
        });
    }

    let mut ie_blob = Vec::new();
    ie_blob
        .try_reserve_exact(raw.ie_blob.len())
        .map_err(|_| BuildError::AllocationFailed {
            len: raw.ie_blob.len(),
        })?;
    ie_blob.extend_from_slice(&raw.ie_blob);
    let ie_blob = ie_blob.into_boxed_slice();

    let security = SecurityCapability::resolve_negotiated(&raw.security);

    let parsed_ies = match ie_codec::parse(&ie_blob) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(bssid = %raw.bssid, %e, "Keeping entry without parsed IEs");
            None
        }
    };

    let ssid = if raw.ssid.len() > MAX_SSID_LEN {
        debug!(bssid = %raw.bssid, len = raw.ssid.len(), "Truncating oversized SSID");
        BString::from(&raw.ssid[..MAX_SSID_LEN])
    } else {
        raw.ssid.clone()
    };

    Ok(ScanResultEntry {
        bssid: raw.bssid,
        ssid,
        channel_freq: raw.channel_freq,
        beacon_interval: raw.beacon_interval,
        capability_info: raw.capability_info,
        security,
        ie_blob,
        parsed_ies,
        score: raw.score,
        received_time: raw.received_time,
        hidden_ssid_timestamp: raw.hidden_ssid_timestamp,
    })
}

/// Builds a list from a batch, skipping entries that fail to build
pub fn build_list<Q>(raw_entries: &[RawScanEntry], channel_state: &Q) -> ScanResultList
where
    Q: ChannelStateQuery + ?Sized,
{
    let list: ScanResultList = raw_entries
        .iter()
        .filter_map(|raw| match build(raw, channel_state) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(bssid = %raw.bssid, %e, "Skipping scan entry");
                None
            }
        })
        .collect();
    debug!(built = list.len(), total = raw_entries.len(), "Scan result list built");
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_state::ChannelStateTable;
    use crate::ie_codec::tests::{element, rsn_body};
    use crate::security_resolver::{
        AuthModeSet, AuthType, CipherSet, EncryptionType, KeyMgmtSet, NegotiatedSecurityInfo,
    };
    use pnet::datalink::MacAddr;

    fn states() -> ChannelStateTable {
        ChannelStateTable::from_states([
            (2412, ChannelState::Enabled),
            (2467, ChannelState::Disabled),
            (5260, ChannelState::Dfs),
        ])
    }

    fn rsn_psk() -> NegotiatedSecurityInfo {
        NegotiatedSecurityInfo {
            auth_mode_set: AuthModeSet::RSNA,
            key_mgmt_set: KeyMgmtSet::PSK,
            ucast_cipher_set: CipherSet::AES_CCM,
            mcast_cipher_set: CipherSet::AES_CCM,
        }
    }

    fn bssid() -> MacAddr {
        MacAddr::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55)
    }

    // Verify a WPA2-PSK BSS on an enabled channel resolves its security
    #[test]
    fn test_build_rsn_psk_entry() {
        let mut ies = element(0, b"Test");
        ies.extend(element(48, &rsn_body(0x04, 0x02)));
        let raw = RawScanEntry::new(bssid(), 2412)
            .with_ssid("Test")
            .with_ies(ies.clone())
            .with_security(rsn_psk())
            .with_score(42);

        let entry = build(&raw, &states()).unwrap();

        assert_eq!(entry.security.auth_type, AuthType::RsnPsk);
        assert_eq!(entry.security.unicast_cipher, EncryptionType::Aes);
        assert_eq!(entry.ssid, BString::from("Test"));
        assert_eq!(entry.score, 42);
        assert_eq!(entry.ie_blob(), &ies[..]);
        let parsed = entry.parsed_ies.unwrap();
        assert!(parsed.rsn.is_some());
    }

    // Verify disabled and unknown channels never produce an entry
    #[test]
    fn test_channel_gate() {
        let table = states();
        for _ in 0..3 {
            let raw = RawScanEntry::new(bssid(), 2467).with_security(rsn_psk());
            assert_eq!(
                build(&raw, &table),
                Err(BuildError::ChannelNotUsable {
                    freq: 2467,
                    state: ChannelState::Disabled
                })
            );
        }
        let raw = RawScanEntry::new(bssid(), 5745);
        assert!(matches!(
            build(&raw, &table),
            Err(BuildError::ChannelNotUsable {
                state: ChannelState::Invalid,
                ..
            })
        ));
    }

    // Verify DFS channels are accepted
    #[test]
    fn test_dfs_channel_is_usable() {
        let raw = RawScanEntry::new(bssid(), 5260);
        assert!(build(&raw, &states()).is_ok());
    }

    // Verify an unparseable IE blob still yields an entry
    #[test]
    fn test_truncated_ies_keep_entry() {
        let raw = RawScanEntry::new(bssid(), 2412).with_ies(vec![0x00, 0x20, b'a']);
        let entry = build(&raw, &states()).unwrap();
        assert!(entry.parsed_ies.is_none());
        assert_eq!(entry.ie_blob().len(), 3);
    }

    // Verify a batch skips bad entries and keeps scan engine order
    #[test]
    fn test_build_list_skips_failures() {
        let raws = [
            RawScanEntry::new(MacAddr::new(2, 0, 0, 0, 0, 1), 2412).with_score(1),
            RawScanEntry::new(MacAddr::new(2, 0, 0, 0, 0, 2), 2467).with_score(2),
            RawScanEntry::new(MacAddr::new(2, 0, 0, 0, 0, 3), 5260).with_score(3),
        ];
        let list = build_list(&raws, &states());
        let scores: Vec<i32> = list.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![1, 3]);
    }
}
