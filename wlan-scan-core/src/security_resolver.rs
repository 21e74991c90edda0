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
use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Authentication modes advertised by a BSS
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AuthModeSet: u32 {
        const NONE = 1 << 0;
        const OPEN = 1 << 1;
        const SHARED = 1 << 2;
        const IEEE8021X = 1 << 3;
        const AUTO = 1 << 4;
        const WPA = 1 << 5;
        const RSNA = 1 << 6;
        const CCKM = 1 << 7;
        const WAPI = 1 << 8;
        const SAE = 1 << 9;
        const FILS_SK = 1 << 10;
    }
}

bitflags! {
    /// Key management suites advertised by a BSS
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMgmtSet: u32 {
        const IEEE8021X = 1 << 0;
        const PSK = 1 << 1;
        const CCKM = 1 << 2;
        const OSEN = 1 << 3;
        const WPS = 1 << 4;
        const FT_IEEE8021X = 1 << 5;
        const FT_PSK = 1 << 6;
        const IEEE8021X_SHA256 = 1 << 7;
        const PSK_SHA256 = 1 << 8;
        const SAE = 1 << 9;
        const FT_SAE = 1 << 10;
        const WAPI_PSK = 1 << 11;
        const WAPI_CERT = 1 << 12;
        const FILS_SHA256 = 1 << 13;
        const FILS_SHA384 = 1 << 14;
        const FT_FILS_SHA256 = 1 << 15;
        const FT_FILS_SHA384 = 1 << 16;
        const OWE = 1 << 17;
        const DPP = 1 << 18;
        const IEEE8021X_SUITE_B = 1 << 19;
        const IEEE8021X_SUITE_B_192 = 1 << 20;
        const FT_IEEE8021X_SHA384 = 1 << 21;
    }
}

bitflags! {
    /// Cipher suites advertised by a BSS, unicast or multicast
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CipherSet: u32 {
        const WEP = 1 << 0;
        const TKIP = 1 << 1;
        const AES_OCB = 1 << 2;
        const AES_CCM = 1 << 3;
        const WAPI_SMS4 = 1 << 4;
        const CKIP = 1 << 5;
        const AES_CMAC = 1 << 6;
        const AES_CCM_256 = 1 << 7;
        const AES_CMAC_256 = 1 << 8;
        const AES_GCM = 1 << 9;
        const AES_GCM_256 = 1 << 10;
        const AES_GMAC = 1 << 11;
        const AES_GMAC_256 = 1 << 12;
        const WAPI_GCM4 = 1 << 13;
        const WEP_40 = 1 << 14;
        const WEP_104 = 1 << 15;

        const ANY_WEP = Self::WEP.bits() | Self::WEP_40.bits() | Self::WEP_104.bits();
    }
}

/// Security parameters negotiated by the scan engine for one BSS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NegotiatedSecurityInfo {
    pub auth_mode_set: AuthModeSet,
    pub key_mgmt_set: KeyMgmtSet,
    pub ucast_cipher_set: CipherSet,
    pub mcast_cipher_set: CipherSet,
}

impl NegotiatedSecurityInfo {
    pub fn is_empty(&self) -> bool {
        self.auth_mode_set.is_empty()
            && self.key_mgmt_set.is_empty()
            && self.ucast_cipher_set.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthType {
    None,
    #[default]
    OpenSystem,
    SharedKey,
    Autoswitch,
    Wpa,
    WpaPsk,
    WpaNone,
    CckmWpa,
    Rsn,
    RsnPsk,
    CckmRsn,
    FtRsn,
    FtRsnPsk,
    RsnPskSha256,
    Rsn8021xSha256,
    WapiWaiCertificate,
    WapiWaiPsk,
    FilsSha256,
    FilsSha384,
    FtFilsSha256,
    FtFilsSha384,
    DppRsn,
    Owe,
    Osen,
    Sae,
    FtSae,
    SuiteBEapSha256,
    SuiteBEapSha384,
    FtSuiteBEapSha384,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncryptionType {
    #[default]
    None,
    Wep40,
    Wep104,
    Tkip,
    Aes,
    Wpi,
    AesCmac,
    AesGcmp,
    AesGcmp256,
    AesGmac128,
    AesGmac256,
}

/// Concrete security tuple derived for one scan result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SecurityCapability {
    pub auth_type: AuthType,
    pub unicast_cipher: EncryptionType,
    pub multicast_cipher: EncryptionType,
}

///////////////////////////////////////////////////////////////////////////
// Precedence tables, most preferred first
///////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Copy)]
enum AuthRule {
    Fixed(AuthType),
    AutoSwitch,
    RsnAkm,
    WpaAkm,
    WapiAkm,
}

const AUTH_MODE_RULES: &[(AuthModeSet, AuthRule)] = &[
    (
        AuthModeSet::NONE.union(AuthModeSet::OPEN),
        AuthRule::Fixed(AuthType::OpenSystem),
    ),
    (AuthModeSet::AUTO, AuthRule::AutoSwitch),
    // RSN capable modes are checked before SHARED
    (
        AuthModeSet::IEEE8021X
            .union(AuthModeSet::RSNA)
            .union(AuthModeSet::CCKM)
            .union(AuthModeSet::SAE)
            .union(AuthModeSet::FILS_SK),
        AuthRule::RsnAkm,
    ),
    (AuthModeSet::SHARED, AuthRule::Fixed(AuthType::SharedKey)),
    (AuthModeSet::WPA, AuthRule::WpaAkm),
    (AuthModeSet::WAPI, AuthRule::WapiAkm),
];

const RSN_AKM_RULES: &[(KeyMgmtSet, AuthType)] = &[
    (KeyMgmtSet::FT_FILS_SHA384, AuthType::FtFilsSha384),
    (KeyMgmtSet::FT_FILS_SHA256, AuthType::FtFilsSha256),
    (KeyMgmtSet::FILS_SHA384, AuthType::FilsSha384),
    (KeyMgmtSet::FILS_SHA256, AuthType::FilsSha256),
    (KeyMgmtSet::FT_SAE, AuthType::FtSae),
    (KeyMgmtSet::SAE, AuthType::Sae),
    (KeyMgmtSet::DPP, AuthType::DppRsn),
    (KeyMgmtSet::OSEN, AuthType::Osen),
    (KeyMgmtSet::OWE, AuthType::Owe),
    (KeyMgmtSet::FT_IEEE8021X, AuthType::FtRsn),
    (KeyMgmtSet::FT_PSK, AuthType::FtRsnPsk),
    (KeyMgmtSet::IEEE8021X, AuthType::Rsn),
    (KeyMgmtSet::PSK, AuthType::RsnPsk),
    (KeyMgmtSet::CCKM, AuthType::CckmRsn),
    (KeyMgmtSet::PSK_SHA256, AuthType::RsnPskSha256),
    (KeyMgmtSet::IEEE8021X_SHA256, AuthType::Rsn8021xSha256),
    (KeyMgmtSet::IEEE8021X_SUITE_B, AuthType::SuiteBEapSha256),
    (KeyMgmtSet::IEEE8021X_SUITE_B_192, AuthType::SuiteBEapSha384),
    (KeyMgmtSet::FT_IEEE8021X_SHA384, AuthType::FtSuiteBEapSha384),
];

const WPA_AKM_RULES: &[(KeyMgmtSet, AuthType)] = &[
    (KeyMgmtSet::IEEE8021X, AuthType::Wpa),
    (KeyMgmtSet::PSK, AuthType::WpaPsk),
    (KeyMgmtSet::CCKM, AuthType::CckmWpa),
];

const WAPI_AKM_RULES: &[(KeyMgmtSet, AuthType)] = &[
    (KeyMgmtSet::WAPI_CERT, AuthType::WapiWaiCertificate),
    (KeyMgmtSet::WAPI_PSK, AuthType::WapiWaiPsk),
];

const CIPHER_RULES: &[(CipherSet, EncryptionType)] = &[
    (CipherSet::AES_GCM_256, EncryptionType::AesGcmp256),
    (CipherSet::AES_GCM, EncryptionType::AesGcmp),
    (
        CipherSet::AES_CCM
            .union(CipherSet::AES_OCB)
            .union(CipherSet::AES_CCM_256),
        EncryptionType::Aes,
    ),
    (CipherSet::TKIP, EncryptionType::Tkip),
    (
        CipherSet::AES_CMAC.union(CipherSet::AES_CMAC_256),
        EncryptionType::AesCmac,
    ),
    (
        CipherSet::WAPI_GCM4.union(CipherSet::WAPI_SMS4),
        EncryptionType::Wpi,
    ),
    (CipherSet::AES_GMAC, EncryptionType::AesGmac128),
    (CipherSet::AES_GMAC_256, EncryptionType::AesGmac256),
    (CipherSet::WEP.union(CipherSet::WEP_40), EncryptionType::Wep40),
    (CipherSet::WEP_104, EncryptionType::Wep104),
];

fn first_match<F, T>(rules: &[(F, T)], set: F, fallback: T) -> T
where
    F: bitflags::Flags + Copy,
    T: Copy,
{
    rules
        .iter()
        .find(|(mask, _)| set.intersects(*mask))
        .map(|(_, result)| *result)
        .unwrap_or(fallback)
}

pub fn resolve_auth_type(
    auth_mode_set: AuthModeSet,
    key_mgmt_set: KeyMgmtSet,
    ucast_cipher_set: CipherSet,
) -> AuthType {
    if auth_mode_set.is_empty() {
        return AuthType::OpenSystem;
    }

    let rule = AUTH_MODE_RULES
        .iter()
        .find(|(mask, _)| auth_mode_set.intersects(*mask))
        .map(|(_, rule)| *rule);

    match rule {
        Some(AuthRule::Fixed(auth_type)) => auth_type,
        Some(AuthRule::AutoSwitch) if ucast_cipher_set.intersects(CipherSet::ANY_WEP) => {
            AuthType::Autoswitch
        }
        Some(AuthRule::AutoSwitch) => AuthType::OpenSystem,
        Some(AuthRule::RsnAkm) => first_match(RSN_AKM_RULES, key_mgmt_set, AuthType::None),
        Some(AuthRule::WpaAkm) => first_match(WPA_AKM_RULES, key_mgmt_set, AuthType::WpaNone),
        Some(AuthRule::WapiAkm) => first_match(WAPI_AKM_RULES, key_mgmt_set, AuthType::None),
        None => AuthType::OpenSystem,
    }
}

pub fn resolve_cipher(cipher_set: CipherSet) -> EncryptionType {
    first_match(CIPHER_RULES, cipher_set, EncryptionType::None)
}

impl SecurityCapability {
    /// Derives the concrete security tuple from the negotiated sets.
    pub fn resolve(neg: &NegotiatedSecurityInfo) -> Self {
        Self {
            auth_type: resolve_auth_type(
                neg.auth_mode_set,
                neg.key_mgmt_set,
                neg.ucast_cipher_set,
            ),
            unicast_cipher: resolve_cipher(neg.ucast_cipher_set),
            multicast_cipher: resolve_cipher(neg.mcast_cipher_set),
        }
    }

    /// Same as [`SecurityCapability::resolve`] but leaves the default tuple in
    /// place when the scan engine negotiated nothing at all.
    pub fn resolve_negotiated(neg: &NegotiatedSecurityInfo) -> Self {
        if neg.is_empty() {
            return Self::default();
        }
        let capability = Self::resolve(neg);
        debug!(
            auth_mode = neg.auth_mode_set.bits(),
            akm = neg.key_mgmt_set.bits(),
            ucast = neg.ucast_cipher_set.bits(),
            mcast = neg.mcast_cipher_set.bits(),
            auth_type = ?capability.auth_type,
            unicast = ?capability.unicast_cipher,
            multicast = ?capability.multicast_cipher,
            "Resolved negotiated security"
        );
        capability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neg(auth: AuthModeSet, akm: KeyMgmtSet, ucast: CipherSet) -> NegotiatedSecurityInfo {
        NegotiatedSecurityInfo {
            auth_mode_set: auth,
            key_mgmt_set: akm,
            ucast_cipher_set: ucast,
            mcast_cipher_set: ucast,
        }
    }

    // Verify repeated resolution of the same sets is stable
    #[test]
    fn test_resolution_is_deterministic() {
        let inputs = [
            neg(AuthModeSet::RSNA, KeyMgmtSet::PSK | KeyMgmtSet::SAE, CipherSet::AES_CCM),
            neg(AuthModeSet::WPA, KeyMgmtSet::CCKM, CipherSet::TKIP),
            neg(AuthModeSet::AUTO, KeyMgmtSet::empty(), CipherSet::WEP_104),
            neg(AuthModeSet::all(), KeyMgmtSet::all(), CipherSet::all()),
            NegotiatedSecurityInfo::default(),
        ];
        for input in inputs {
            let first = SecurityCapability::resolve(&input);
            for _ in 0..16 {
                assert_eq!(SecurityCapability::resolve(&input), first);
            }
        }
    }

    // Verify the RSN check outranks SHARED in the evaluation order
    #[test]
    fn test_rsna_outranks_shared() {
        let info = neg(
            AuthModeSet::RSNA | AuthModeSet::SHARED,
            KeyMgmtSet::PSK,
            CipherSet::AES_CCM,
        );
        let capability = SecurityCapability::resolve(&info);
        assert_eq!(capability.auth_type, AuthType::RsnPsk);
        assert_eq!(capability.unicast_cipher, EncryptionType::Aes);
        assert_eq!(
            resolve_auth_type(AuthModeSet::SHARED, KeyMgmtSet::PSK, CipherSet::WEP),
            AuthType::SharedKey
        );
    }

    // Verify cipher fallback and AES preference over TKIP
    #[test]
    fn test_cipher_fallback() {
        assert_eq!(resolve_cipher(CipherSet::empty()), EncryptionType::None);
        assert_eq!(
            resolve_cipher(CipherSet::AES_CCM | CipherSet::TKIP),
            EncryptionType::Aes
        );
        assert_eq!(
            resolve_cipher(CipherSet::AES_GCM_256 | CipherSet::AES_GCM),
            EncryptionType::AesGcmp256
        );
        assert_eq!(resolve_cipher(CipherSet::CKIP), EncryptionType::None);
        assert_eq!(resolve_cipher(CipherSet::WEP), EncryptionType::Wep40);
        assert_eq!(resolve_cipher(CipherSet::WEP_104), EncryptionType::Wep104);
    }

    // Verify an empty auth mode set is always open system
    #[test]
    fn test_empty_auth_mode_is_open() {
        assert_eq!(
            resolve_auth_type(AuthModeSet::empty(), KeyMgmtSet::all(), CipherSet::all()),
            AuthType::OpenSystem
        );
    }

    // Verify AUTO switches only when a WEP cipher is offered
    #[test]
    fn test_auto_switch() {
        assert_eq!(
            resolve_auth_type(AuthModeSet::AUTO, KeyMgmtSet::empty(), CipherSet::WEP_40),
            AuthType::Autoswitch
        );
        assert_eq!(
            resolve_auth_type(AuthModeSet::AUTO, KeyMgmtSet::empty(), CipherSet::TKIP),
            AuthType::OpenSystem
        );
    }

    // Verify the RSN AKM table picks the most preferred suite
    #[test]
    fn test_rsn_akm_precedence() {
        let cases = [
            (KeyMgmtSet::PSK | KeyMgmtSet::SAE, AuthType::Sae),
            (KeyMgmtSet::FT_SAE | KeyMgmtSet::SAE, AuthType::FtSae),
            (KeyMgmtSet::FILS_SHA256 | KeyMgmtSet::FT_FILS_SHA384, AuthType::FtFilsSha384),
            (KeyMgmtSet::IEEE8021X | KeyMgmtSet::PSK, AuthType::Rsn),
            (KeyMgmtSet::OWE | KeyMgmtSet::FT_IEEE8021X, AuthType::Owe),
            (KeyMgmtSet::PSK_SHA256, AuthType::RsnPskSha256),
            (KeyMgmtSet::FT_IEEE8021X_SHA384, AuthType::FtSuiteBEapSha384),
            (KeyMgmtSet::WPS, AuthType::None),
        ];
        for (akm, expected) in cases {
            assert_eq!(
                resolve_auth_type(AuthModeSet::RSNA, akm, CipherSet::AES_CCM),
                expected,
                "akm {akm:?}"
            );
        }
    }

    // Verify the WPA and WAPI sub-tables and their fallbacks
    #[test]
    fn test_wpa_and_wapi_akm() {
        assert_eq!(
            resolve_auth_type(AuthModeSet::WPA, KeyMgmtSet::PSK | KeyMgmtSet::CCKM, CipherSet::TKIP),
            AuthType::WpaPsk
        );
        assert_eq!(
            resolve_auth_type(AuthModeSet::WPA, KeyMgmtSet::empty(), CipherSet::TKIP),
            AuthType::WpaNone
        );
        assert_eq!(
            resolve_auth_type(
                AuthModeSet::WAPI,
                KeyMgmtSet::WAPI_PSK | KeyMgmtSet::WAPI_CERT,
                CipherSet::WAPI_SMS4
            ),
            AuthType::WapiWaiCertificate
        );
        assert_eq!(
            resolve_auth_type(AuthModeSet::WAPI, KeyMgmtSet::PSK, CipherSet::WAPI_SMS4),
            AuthType::None
        );
    }

    // Verify nothing negotiated keeps the default tuple
    #[test]
    fn test_resolve_negotiated_skips_empty() {
        let info = NegotiatedSecurityInfo {
            mcast_cipher_set: CipherSet::TKIP,
            ..Default::default()
        };
        let capability = SecurityCapability::resolve_negotiated(&info);
        assert_eq!(capability, SecurityCapability::default());
        assert_eq!(capability.auth_type, AuthType::OpenSystem);
        assert_eq!(capability.multicast_cipher, EncryptionType::None);
    }
}
