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

//! Frame and scan entry builders shared by the integration tests.

use wlan_scan::ie::{ElementId, InformationElement};
use wlan_scan::security::{AuthModeSet, CipherSet, KeyMgmtSet, NegotiatedSecurityInfo};

pub fn ssid_element(ssid: &str) -> Vec<u8> {
    InformationElement::new(ElementId::Ssid, ssid.as_bytes().to_vec()).serialize()
}

/// RSN element with CCMP group cipher and the given pairwise and AKM suite types
pub fn rsn_element(pairwise: u8, akm: u8) -> Vec<u8> {
    let mut body = vec![0x01, 0x00, 0x00, 0x0f, 0xac, 0x04];
    body.extend_from_slice(&[0x01, 0x00, 0x00, 0x0f, 0xac, pairwise]);
    body.extend_from_slice(&[0x01, 0x00, 0x00, 0x0f, 0xac, akm]);
    body.extend_from_slice(&[0x00, 0x00]);
    InformationElement::new(ElementId::Rsn, body).serialize()
}

/// WAPI element declaring `akm_count` AKM suites but carrying `present`
pub fn wapi_element(akm_count: u16, present: usize) -> Vec<u8> {
    let mut body = vec![0x01, 0x00];
    body.extend_from_slice(&akm_count.to_le_bytes());
    for _ in 0..present {
        body.extend_from_slice(&[0x00, 0x14, 0x72, 0x01]);
    }
    body.extend_from_slice(&[0x01, 0x00, 0x00, 0x14, 0x72, 0x01]);
    body.extend_from_slice(&[0x00, 0x14, 0x72, 0x01, 0x00, 0x00]);
    InformationElement::new(ElementId::Wapi, body).serialize()
}

pub fn beacon_ies(ssid: &str) -> Vec<u8> {
    let mut ies = ssid_element(ssid);
    ies.extend(rsn_element(0x04, 0x02));
    ies.extend(InformationElement::new(ElementId::HtCapabilities, vec![0u8; 26]).serialize());
    ies
}

pub fn wpa2_psk() -> NegotiatedSecurityInfo {
    NegotiatedSecurityInfo {
        auth_mode_set: AuthModeSet::RSNA,
        key_mgmt_set: KeyMgmtSet::PSK,
        ucast_cipher_set: CipherSet::AES_CCM,
        mcast_cipher_set: CipherSet::AES_CCM,
    }
}
