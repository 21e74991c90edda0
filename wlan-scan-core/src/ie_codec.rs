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
use nom::Err as NomErr;
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    multi::count,
    number::complete::{be_u8, le_u16, le_u32},
    IResult,
};
use thiserror::Error;
use tracing::{debug, warn};

// Internal modules
use crate::tlv_ie_codec::{ElementId, InformationElement};

///////////////////////////////////////////////////////////////////////////
//OUIS AND LIMITS
///////////////////////////////////////////////////////////////////////////
pub const MICROSOFT_OUI: [u8; 3] = [0x00, 0x50, 0xf2];
pub const WFA_OUI: [u8; 3] = [0x50, 0x6f, 0x9a];
pub const RSN_OUI: [u8; 3] = [0x00, 0x0f, 0xac];

pub const WPA_OUI_TYPE: u8 = 0x01;
pub const WPS_OUI_TYPE: u8 = 0x04;
pub const P2P_OUI_TYPE: u8 = 0x09;
pub const HS20_OUI_TYPE: u8 = 0x10;
pub const OSEN_OUI_TYPE: u8 = 0x12;
pub const MBO_OUI_TYPE: u8 = 0x16;

pub const MAX_SSID_LEN: usize = 32;
/// Upper bound on cipher/AKM suites accepted in one RSN or WPA list
pub const MAX_SUITES: u16 = 6;
/// Upper bound on AKM suites accepted in one WAPI element
pub const MAX_WAPI_AKM_SUITES: u16 = 4;
pub const PMKID_LEN: usize = 16;

///////////////////////////////////////////////////////////////////////////
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("element {element_id:#04x} at offset {offset} declares {declared} bytes, {remaining} remain")]
    Truncated {
        element_id: u8,
        offset: usize,
        declared: usize,
        remaining: usize,
    },
    #[error("malformed element {element_id:#04x}: {reason}")]
    Malformed { element_id: u8, reason: &'static str },
}

fn failure<T>(input: &[u8], kind: ErrorKind) -> IResult<&[u8], T> {
    Err(NomErr::Failure(Error::new(input, kind)))
}

///////////////////////////////////////////////////////////////////////////
/// Cipher or AKM suite selector: OUI followed by the suite type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiteSelector {
    pub oui: [u8; 3],
    pub suite_type: u8,
}

impl SuiteSelector {
    pub const LEN: usize = 4;

    pub const fn new(oui: [u8; 3], suite_type: u8) -> Self {
        Self { oui, suite_type }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, bytes) = take(Self::LEN)(input)?;
        Ok((
            input,
            Self {
                oui: [bytes[0], bytes[1], bytes[2]],
                suite_type: bytes[3],
            },
        ))
    }

    pub fn serialize(&self) -> [u8; 4] {
        [self.oui[0], self.oui[1], self.oui[2], self.suite_type]
    }
}

// Absent trailing field is fine, a partial one is not
fn optional_selector(input: &[u8]) -> IResult<&[u8], Option<SuiteSelector>> {
    match input.len() {
        0 => Ok((input, None)),
        n if n < SuiteSelector::LEN => failure(input, ErrorKind::Eof),
        _ => {
            let (input, selector) = SuiteSelector::parse(input)?;
            Ok((input, Some(selector)))
        }
    }
}

fn optional_u16(input: &[u8]) -> IResult<&[u8], Option<u16>> {
    match input.len() {
        0 => Ok((input, None)),
        1 => failure(input, ErrorKind::Eof),
        _ => {
            let (input, value) = le_u16(input)?;
            Ok((input, Some(value)))
        }
    }
}

fn suite_list(input: &[u8], max: u16) -> IResult<&[u8], Vec<SuiteSelector>> {
    let (input, suite_count) = le_u16(input)?;
    if suite_count == 0
        || suite_count > max
        || suite_count as usize > input.len() / SuiteSelector::LEN
    {
        return failure(input, ErrorKind::LengthValue);
    }
    count(SuiteSelector::parse, suite_count as usize)(input)
}

fn optional_suite_list(input: &[u8], max: u16) -> IResult<&[u8], Option<Vec<SuiteSelector>>> {
    match input.len() {
        0 => Ok((input, None)),
        1 => failure(input, ErrorKind::Eof),
        _ => {
            let (input, list) = suite_list(input, max)?;
            Ok((input, Some(list)))
        }
    }
}

///////////////////////////////////////////////////////////////////////////
/// RSN element body. Optional fields missing from the frame take the
/// values the standard defines for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsnElement {
    pub version: u16,
    pub group_cipher: SuiteSelector,
    pub pairwise_ciphers: Vec<SuiteSelector>,
    pub akm_suites: Vec<SuiteSelector>,
    pub capabilities: Option<u16>,
    pub pmkids: Vec<[u8; PMKID_LEN]>,
    pub group_mgmt_cipher: Option<SuiteSelector>,
}

impl RsnElement {
    pub const VERSION: u16 = 1;
    pub const CCMP: SuiteSelector = SuiteSelector::new(RSN_OUI, 0x04);
    pub const AKM_8021X: SuiteSelector = SuiteSelector::new(RSN_OUI, 0x01);

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, version) = le_u16(input)?;
        if version != Self::VERSION {
            return failure(input, ErrorKind::Verify);
        }

        let (input, group_cipher) = optional_selector(input)?;
        let (input, pairwise_ciphers) = optional_suite_list(input, MAX_SUITES)?;
        let (input, akm_suites) = optional_suite_list(input, MAX_SUITES)?;
        let (input, capabilities) = optional_u16(input)?;
        let (input, pmkids) = Self::parse_pmkids(input)?;
        let (input, group_mgmt_cipher) = optional_selector(input)?;

        Ok((
            input,
            Self {
                version,
                group_cipher: group_cipher.unwrap_or(Self::CCMP),
                pairwise_ciphers: pairwise_ciphers.unwrap_or_else(|| vec![Self::CCMP]),
                akm_suites: akm_suites.unwrap_or_else(|| vec![Self::AKM_8021X]),
                capabilities,
                pmkids,
                group_mgmt_cipher,
            },
        ))
    }

    fn parse_pmkids(input: &[u8]) -> IResult<&[u8], Vec<[u8; PMKID_LEN]>> {
        let (input, pmkid_count) = optional_u16(input)?;
        let Some(pmkid_count) = pmkid_count else {
            return Ok((input, Vec::new()));
        };
        if pmkid_count as usize > input.len() / PMKID_LEN {
            return failure(input, ErrorKind::LengthValue);
        }

        let mut pmkids = Vec::with_capacity(pmkid_count as usize);
        let mut remaining = input;
        for _ in 0..pmkid_count {
            let (next, bytes) = take(PMKID_LEN)(remaining)?;
            let mut pmkid = [0u8; PMKID_LEN];
            pmkid.copy_from_slice(bytes);
            pmkids.push(pmkid);
            remaining = next;
        }
        Ok((remaining, pmkids))
    }
}

///////////////////////////////////////////////////////////////////////////
/// Legacy WPA vendor element body (after the 00:50:F2/1 header)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WpaElement {
    pub version: u16,
    pub multicast_cipher: SuiteSelector,
    pub unicast_ciphers: Vec<SuiteSelector>,
    pub auth_suites: Vec<SuiteSelector>,
    pub capabilities: Option<u16>,
}

impl WpaElement {
    pub const VERSION: u16 = 1;
    pub const TKIP: SuiteSelector = SuiteSelector::new(MICROSOFT_OUI, 0x02);
    pub const AKM_8021X: SuiteSelector = SuiteSelector::new(MICROSOFT_OUI, 0x01);

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, version) = le_u16(input)?;
        if version != Self::VERSION {
            return failure(input, ErrorKind::Verify);
        }

        let (input, multicast_cipher) = optional_selector(input)?;
        let (input, unicast_ciphers) = optional_suite_list(input, MAX_SUITES)?;
        let (input, auth_suites) = optional_suite_list(input, MAX_SUITES)?;
        // A dangling capability byte is ignored for WPA
        let (input, capabilities) = if input.len() >= 2 {
            let (input, cap) = le_u16(input)?;
            (input, Some(cap))
        } else {
            (input, None)
        };

        Ok((
            input,
            Self {
                version,
                multicast_cipher: multicast_cipher.unwrap_or(Self::TKIP),
                unicast_ciphers: unicast_ciphers.unwrap_or_else(|| vec![Self::TKIP]),
                auth_suites: auth_suites.unwrap_or_else(|| vec![Self::AKM_8021X]),
                capabilities,
            },
        ))
    }
}

///////////////////////////////////////////////////////////////////////////
#[cfg(feature = "wapi")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WapiElement {
    pub version: u16,
    pub akm_suites: Vec<SuiteSelector>,
    pub unicast_ciphers: Vec<SuiteSelector>,
    pub multicast_cipher: Option<SuiteSelector>,
}

#[cfg(feature = "wapi")]
impl WapiElement {
    pub const VERSION: u16 = 1;
    /// Version, multicast cipher and both selector counts
    pub const MIN_LEN: usize = 20;
    pub const OUI: [u8; 3] = [0x00, 0x14, 0x72];

    pub fn decode(value: &[u8]) -> Result<Self, ParseError> {
        let malformed = |reason| ParseError::Malformed {
            element_id: ElementId::Wapi.to_u8(),
            reason,
        };

        if value.len() < Self::MIN_LEN {
            return Err(malformed("shorter than fixed WAPI fields"));
        }
        let (input, version) =
            le_u16::<_, Error<&[u8]>>(value).map_err(|_| malformed("missing version"))?;
        if version != Self::VERSION {
            return Err(malformed("unsupported WAPI version"));
        }

        let (input, akm_count) =
            le_u16::<_, Error<&[u8]>>(input).map_err(|_| malformed("missing AKM suite count"))?;
        if akm_count > MAX_WAPI_AKM_SUITES
            || akm_count as usize * SuiteSelector::LEN > input.len()
        {
            return Err(malformed("AKM suite count does not fit element"));
        }
        let (input, akm_suites) = count(SuiteSelector::parse, akm_count as usize)(input)
            .map_err(|_| malformed("AKM suite list truncated"))?;

        let (input, unicast_count) = le_u16::<_, Error<&[u8]>>(input)
            .map_err(|_| malformed("missing unicast cipher count"))?;
        if unicast_count > MAX_SUITES
            || unicast_count as usize * SuiteSelector::LEN > input.len()
        {
            return Err(malformed("unicast cipher count does not fit element"));
        }
        let (input, unicast_ciphers) = count(SuiteSelector::parse, unicast_count as usize)(input)
            .map_err(|_| malformed("unicast cipher list truncated"))?;

        let multicast_cipher = SuiteSelector::parse(input).ok().map(|(_, s)| s);

        Ok(Self {
            version,
            akm_suites,
            unicast_ciphers,
            multicast_cipher,
        })
    }
}

///////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtCapabilities {
    pub ht_cap_info: u16,
    pub ampdu_params: u8,
    pub supported_mcs_set: [u8; 16],
    pub extended_cap: u16,
    pub txbf_cap: u32,
    pub asel_cap: u8,
}

impl HtCapabilities {
    pub const LEN: usize = 26;

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        if input.len() < Self::LEN {
            return failure(input, ErrorKind::Eof);
        }
        let (input, ht_cap_info) = le_u16(input)?;
        let (input, ampdu_params) = be_u8(input)?;
        let (input, mcs) = take(16usize)(input)?;
        let (input, extended_cap) = le_u16(input)?;
        let (input, txbf_cap) = le_u32(input)?;
        let (input, asel_cap) = be_u8(input)?;

        let mut supported_mcs_set = [0u8; 16];
        supported_mcs_set.copy_from_slice(mcs);

        Ok((
            input,
            Self {
                ht_cap_info,
                ampdu_params,
                supported_mcs_set,
                extended_cap,
                txbf_cap,
                asel_cap,
            },
        ))
    }

    /// 40 MHz channel width supported
    pub fn supports_40mhz(&self) -> bool {
        self.ht_cap_info & 0x0002 != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhtCapabilities {
    pub vht_cap_info: u32,
    pub rx_mcs_map: u16,
    pub rx_highest_rate: u16,
    pub tx_mcs_map: u16,
    pub tx_highest_rate: u16,
}

impl VhtCapabilities {
    pub const LEN: usize = 12;

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        if input.len() < Self::LEN {
            return failure(input, ErrorKind::Eof);
        }
        let (input, vht_cap_info) = le_u32(input)?;
        let (input, rx_mcs_map) = le_u16(input)?;
        let (input, rx_highest_rate) = le_u16(input)?;
        let (input, tx_mcs_map) = le_u16(input)?;
        let (input, tx_highest_rate) = le_u16(input)?;

        Ok((
            input,
            Self {
                vht_cap_info,
                rx_mcs_map,
                rx_highest_rate,
                tx_mcs_map,
                tx_highest_rate,
            },
        ))
    }
}

///////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorIeKind {
    Wps,
    P2p,
    Hs20,
    Osen,
    Mbo,
}

impl VendorIeKind {
    pub fn from_oui(oui: [u8; 3], oui_type: u8) -> Option<Self> {
        match (oui, oui_type) {
            (MICROSOFT_OUI, WPS_OUI_TYPE) => Some(VendorIeKind::Wps),
            (WFA_OUI, P2P_OUI_TYPE) => Some(VendorIeKind::P2p),
            (WFA_OUI, HS20_OUI_TYPE) => Some(VendorIeKind::Hs20),
            (WFA_OUI, OSEN_OUI_TYPE) => Some(VendorIeKind::Osen),
            (WFA_OUI, MBO_OUI_TYPE) => Some(VendorIeKind::Mbo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorElement {
    pub kind: VendorIeKind,
    /// Payload following the OUI and OUI type
    pub payload: Vec<u8>,
}

///////////////////////////////////////////////////////////////////////////
/// Structured view over the information elements of one beacon or probe
/// response. Owns copies of everything it exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIes {
    /// Every element in frame order
    pub elements: Vec<InformationElement>,
    pub ssid: Option<BString>,
    pub rsn: Option<RsnElement>,
    pub wpa: Option<WpaElement>,
    #[cfg(feature = "wapi")]
    pub wapi: Option<WapiElement>,
    pub ht_capabilities: Option<HtCapabilities>,
    pub vht_capabilities: Option<VhtCapabilities>,
    pub vendor: Vec<VendorElement>,
    pub unrecognized: Vec<InformationElement>,
}

/// Parses a concatenation of information elements.
pub fn parse(raw_ies: &[u8]) -> Result<ParsedIes, ParseError> {
    ParsedIes::parse(raw_ies)
}

impl ParsedIes {
    pub fn parse(raw_ies: &[u8]) -> Result<Self, ParseError> {
        let mut parsed = ParsedIes::default();
        let mut remaining = raw_ies;

        while !remaining.is_empty() {
            let offset = raw_ies.len() - remaining.len();
            let (next, element) =
                InformationElement::parse(remaining).map_err(|_| truncated(offset, remaining))?;
            parsed.absorb(&element)?;
            parsed.elements.push(element);
            remaining = next;
        }

        Ok(parsed)
    }

    pub fn find(&self, id: ElementId) -> Option<&InformationElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn vendor_element(&self, kind: VendorIeKind) -> Option<&VendorElement> {
        self.vendor.iter().find(|v| v.kind == kind)
    }

    fn absorb(&mut self, element: &InformationElement) -> Result<(), ParseError> {
        match element.id() {
            ElementId::Ssid if self.ssid.is_none() => {
                if element.value.len() > MAX_SSID_LEN {
                    warn!(len = element.value.len(), "SSID element too long, ignoring");
                } else {
                    self.ssid = Some(BString::from(element.value.clone()));
                }
            }
            ElementId::Rsn if self.rsn.is_none() => {
                self.rsn = decode_body(element, RsnElement::parse);
            }
            ElementId::HtCapabilities if self.ht_capabilities.is_none() => {
                self.ht_capabilities = decode_body(element, HtCapabilities::parse);
            }
            ElementId::VhtCapabilities if self.vht_capabilities.is_none() => {
                self.vht_capabilities = decode_body(element, VhtCapabilities::parse);
            }
            #[cfg(feature = "wapi")]
            ElementId::Wapi if self.wapi.is_none() => {
                self.wapi = Some(WapiElement::decode(&element.value)?);
            }
            ElementId::Vendor => self.absorb_vendor(element),
            ElementId::Ssid | ElementId::Rsn | ElementId::HtCapabilities | ElementId::VhtCapabilities => {
                debug!(element_id = element.element_id, "Duplicate element, keeping the first one");
            }
            #[cfg(feature = "wapi")]
            ElementId::Wapi => {
                debug!(element_id = element.element_id, "Duplicate element, keeping the first one");
            }
            _ => self.unrecognized.push(element.clone()),
        }
        Ok(())
    }

    fn absorb_vendor(&mut self, element: &InformationElement) {
        if element.value.len() < SuiteSelector::LEN {
            self.unrecognized.push(element.clone());
            return;
        }
        let oui = [element.value[0], element.value[1], element.value[2]];
        let oui_type = element.value[3];
        let payload = &element.value[SuiteSelector::LEN..];

        if oui == MICROSOFT_OUI && oui_type == WPA_OUI_TYPE {
            if self.wpa.is_none() {
                self.wpa = match WpaElement::parse(payload) {
                    Ok((_, wpa)) => Some(wpa),
                    Err(e) => {
                        warn!(%e, "failed to parse WPA element");
                        None
                    }
                };
            }
            return;
        }

        match VendorIeKind::from_oui(oui, oui_type) {
            Some(kind) => self.vendor.push(VendorElement {
                kind,
                payload: payload.to_vec(),
            }),
            None => self.unrecognized.push(element.clone()),
        }
    }
}

fn decode_body<T>(
    element: &InformationElement,
    parser: impl Fn(&[u8]) -> IResult<&[u8], T>,
) -> Option<T> {
    match parser(&element.value) {
        Ok((_, body)) => Some(body),
        Err(e) => {
            warn!(kind = ?element.id(), %e, "failed to parse element body");
            None
        }
    }
}

fn truncated(offset: usize, remaining: &[u8]) -> ParseError {
    match remaining {
        [element_id, length, rest @ ..] => ParseError::Truncated {
            element_id: *element_id,
            offset,
            declared: *length as usize,
            remaining: rest.len(),
        },
        [element_id] => ParseError::Truncated {
            element_id: *element_id,
            offset,
            declared: InformationElement::HEADER,
            remaining: 1,
        },
        [] => ParseError::Truncated {
            element_id: 0,
            offset,
            declared: InformationElement::HEADER,
            remaining: 0,
        },
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn element(id: u8, value: &[u8]) -> Vec<u8> {
        let mut bytes = vec![id, value.len() as u8];
        bytes.extend_from_slice(value);
        bytes
    }

    // RSN body with CCMP group, one pairwise suite and one AKM suite
    pub fn rsn_body(pairwise: u8, akm: u8) -> Vec<u8> {
        let mut body = vec![0x01, 0x00];
        body.extend_from_slice(&[0x00, 0x0f, 0xac, 0x04]);
        body.extend_from_slice(&[0x01, 0x00, 0x00, 0x0f, 0xac, pairwise]);
        body.extend_from_slice(&[0x01, 0x00, 0x00, 0x0f, 0xac, akm]);
        body.extend_from_slice(&[0x0c, 0x00]);
        body
    }

    // Verify a beacon with SSID, RSN, HT, VHT and vendor elements parses every view
    #[test]
    fn test_parse_full_beacon() {
        let mut raw = element(0, b"Test");
        raw.extend(element(1, &[0x82, 0x84, 0x8b, 0x96]));
        raw.extend(element(48, &rsn_body(0x04, 0x02)));
        raw.extend(element(45, &[0u8; 26]));
        raw.extend(element(191, &[0u8; 12]));
        raw.extend(element(221, &[0x00, 0x50, 0xf2, 0x04, 0x10, 0x4a]));
        raw.extend(element(221, &[0x50, 0x6f, 0x9a, 0x16, 0x01]));

        let parsed = parse(&raw).unwrap();

        assert_eq!(parsed.elements.len(), 7);
        assert_eq!(parsed.ssid, Some(BString::from("Test")));
        let rsn = parsed.rsn.as_ref().unwrap();
        assert_eq!(rsn.pairwise_ciphers, vec![RsnElement::CCMP]);
        assert_eq!(rsn.akm_suites, vec![SuiteSelector::new(RSN_OUI, 0x02)]);
        assert_eq!(rsn.capabilities, Some(0x000c));
        assert!(parsed.ht_capabilities.is_some());
        assert!(parsed.vht_capabilities.is_some());
        assert_eq!(parsed.vendor.len(), 2);
        assert_eq!(
            parsed.vendor_element(VendorIeKind::Wps).unwrap().payload,
            vec![0x10, 0x4a]
        );
        assert!(parsed.vendor_element(VendorIeKind::Mbo).is_some());
        // Supported rates is passed through untouched
        assert_eq!(parsed.unrecognized.len(), 1);
        assert_eq!(parsed.unrecognized[0].id(), ElementId::SupportedRates);
    }

    // Verify an empty buffer yields an empty view
    #[test]
    fn test_parse_empty() {
        let parsed = parse(&[]).unwrap();
        assert!(parsed.elements.is_empty());
        assert!(parsed.ssid.is_none());
    }

    // Verify a declared length past the buffer end reports Truncated
    #[test]
    fn test_parse_truncated() {
        let mut raw = element(0, b"ab");
        raw.extend_from_slice(&[48, 20, 0x01, 0x00]);

        match parse(&raw) {
            Err(ParseError::Truncated {
                element_id,
                offset,
                declared,
                remaining,
            }) => {
                assert_eq!(element_id, 48);
                assert_eq!(offset, 4);
                assert_eq!(declared, 20);
                assert_eq!(remaining, 2);
            }
            other => panic!("Expected Truncated, got {other:?}"),
        }
    }

    // Verify a single trailing byte is reported as a truncated header
    #[test]
    fn test_parse_dangling_byte() {
        let mut raw = element(0, b"ab");
        raw.push(0xdd);

        assert!(matches!(
            parse(&raw),
            Err(ParseError::Truncated {
                element_id: 0xdd,
                declared: 2,
                remaining: 1,
                ..
            })
        ));
    }

    // Verify unknown ids are skipped over and kept as passthrough
    #[test]
    fn test_unknown_elements_are_passthrough() {
        let mut raw = element(200, &[1, 2, 3]);
        raw.extend(element(0, b"x"));
        raw.extend(element(42, &[0x00]));

        let parsed = parse(&raw).unwrap();
        assert_eq!(parsed.ssid, Some(BString::from("x")));
        assert_eq!(parsed.unrecognized.len(), 2);
        assert_eq!(parsed.unrecognized[0].element_id, 200);
        assert_eq!(parsed.unrecognized[1].element_id, 42);
    }

    // Verify an RSN element with only a version takes the standard defaults
    #[test]
    fn test_rsn_defaults() {
        let (_, rsn) = RsnElement::parse(&[0x01, 0x00]).unwrap();
        assert_eq!(rsn.group_cipher, RsnElement::CCMP);
        assert_eq!(rsn.pairwise_ciphers, vec![RsnElement::CCMP]);
        assert_eq!(rsn.akm_suites, vec![RsnElement::AKM_8021X]);
        assert_eq!(rsn.capabilities, None);
        assert!(rsn.pmkids.is_empty());
    }

    // Verify RSN PMKID list and group management cipher are decoded
    #[test]
    fn test_rsn_pmkid_and_mgmt_cipher() {
        let mut body = rsn_body(0x04, 0x08);
        body.extend_from_slice(&[0x01, 0x00]);
        body.extend_from_slice(&[0xab; PMKID_LEN]);
        body.extend_from_slice(&[0x00, 0x0f, 0xac, 0x06]);

        let (rest, rsn) = RsnElement::parse(&body).unwrap();
        assert!(rest.is_empty());
        assert_eq!(rsn.pmkids, vec![[0xab; PMKID_LEN]]);
        assert_eq!(rsn.group_mgmt_cipher, Some(SuiteSelector::new(RSN_OUI, 0x06)));
    }

    // Verify a malformed RSN body does not fail the whole parse
    #[test]
    fn test_malformed_rsn_is_non_fatal() {
        // pairwise count claims 5 suites with only one present
        let body = [
            0x01, 0x00, 0x00, 0x0f, 0xac, 0x04, 0x05, 0x00, 0x00, 0x0f, 0xac, 0x04,
        ];
        let mut raw = element(48, &body);
        raw.extend(element(0, b"net"));

        let parsed = parse(&raw).unwrap();
        assert!(parsed.rsn.is_none());
        assert_eq!(parsed.ssid, Some(BString::from("net")));
        assert!(parsed.find(ElementId::Rsn).is_some());
    }

    // Verify an RSN suite count above the limit is rejected
    #[test]
    fn test_rsn_too_many_suites() {
        let mut body = vec![0x01, 0x00, 0x00, 0x0f, 0xac, 0x04, 0x07, 0x00];
        for _ in 0..7 {
            body.extend_from_slice(&[0x00, 0x0f, 0xac, 0x04]);
        }
        assert!(RsnElement::parse(&body).is_err());
    }

    // Verify the legacy WPA vendor element is surfaced as WPA, not vendor
    #[test]
    fn test_parse_wpa_vendor_element() {
        let value = [
            0x00, 0x50, 0xf2, 0x01, // OUI + type
            0x01, 0x00, // version
            0x00, 0x50, 0xf2, 0x02, // TKIP group
            0x01, 0x00, 0x00, 0x50, 0xf2, 0x02, // unicast TKIP
            0x01, 0x00, 0x00, 0x50, 0xf2, 0x02, // AKM PSK
        ];
        let parsed = parse(&element(221, &value)).unwrap();

        let wpa = parsed.wpa.unwrap();
        assert_eq!(wpa.multicast_cipher, WpaElement::TKIP);
        assert_eq!(wpa.auth_suites, vec![SuiteSelector::new(MICROSOFT_OUI, 0x02)]);
        assert!(parsed.vendor.is_empty());
        assert!(parsed.unrecognized.is_empty());
    }

    // Verify an oversized SSID is dropped but parsing continues
    #[test]
    fn test_ssid_too_long() {
        let parsed = parse(&element(0, &[b'a'; 33])).unwrap();
        assert!(parsed.ssid.is_none());
        assert_eq!(parsed.elements.len(), 1);
    }

    // Verify a short HT capability element leaves the typed view empty
    #[test]
    fn test_ht_capabilities_short() {
        let parsed = parse(&element(45, &[0u8; 10])).unwrap();
        assert!(parsed.ht_capabilities.is_none());
    }

    // Verify HT capability fields are little-endian
    #[test]
    fn test_ht_capabilities_fields() {
        let mut body = vec![0x02, 0x01, 0x17];
        body.extend_from_slice(&[0xff; 16]);
        body.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let (_, ht) = HtCapabilities::parse(&body).unwrap();
        assert_eq!(ht.ht_cap_info, 0x0102);
        assert!(ht.supports_40mhz());
        assert_eq!(ht.ampdu_params, 0x17);
    }

    #[cfg(feature = "wapi")]
    fn wapi_body(akm_count: u16, akms: usize) -> Vec<u8> {
        let mut body = vec![0x01, 0x00];
        body.extend_from_slice(&akm_count.to_le_bytes());
        for _ in 0..akms {
            body.extend_from_slice(&[0x00, 0x14, 0x72, 0x01]);
        }
        body.extend_from_slice(&[0x01, 0x00, 0x00, 0x14, 0x72, 0x01]);
        body.extend_from_slice(&[0x00, 0x14, 0x72, 0x01]);
        body.extend_from_slice(&[0x00, 0x00]);
        body
    }

    // Verify a well formed WAPI element is decoded
    #[cfg(feature = "wapi")]
    #[test]
    fn test_parse_wapi() {
        let parsed = parse(&element(68, &wapi_body(1, 1))).unwrap();
        let wapi = parsed.wapi.unwrap();
        assert_eq!(wapi.akm_suites.len(), 1);
        assert_eq!(wapi.unicast_ciphers.len(), 1);
        assert!(wapi.multicast_cipher.is_some());
    }

    // Verify a WAPI AKM count above four fails the parse as Malformed
    #[cfg(feature = "wapi")]
    #[test]
    fn test_wapi_akm_count_overflow() {
        let result = parse(&element(68, &wapi_body(5, 5)));
        assert!(matches!(
            result,
            Err(ParseError::Malformed { element_id: 68, .. })
        ));
    }

    // Verify a unicast cipher count larger than the remaining bytes is Malformed
    #[cfg(feature = "wapi")]
    #[test]
    fn test_wapi_unicast_count_exceeds_buffer() {
        let mut body = vec![0x01, 0x00, 0x03, 0x00];
        for _ in 0..3 {
            body.extend_from_slice(&[0x00, 0x14, 0x72, 0x01]);
        }
        body.extend_from_slice(&[0x02, 0x00, 0x00, 0x14]);
        assert_eq!(body.len(), WapiElement::MIN_LEN);

        let result = parse(&element(68, &body));
        assert!(matches!(
            result,
            Err(ParseError::Malformed {
                reason: "unicast cipher count does not fit element",
                ..
            })
        ));
    }

    // Verify a WAPI element shorter than its fixed part is Malformed
    #[cfg(feature = "wapi")]
    #[test]
    fn test_wapi_too_short() {
        let result = parse(&element(68, &[0x01, 0x00, 0x01, 0x00]));
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }

    // Without WAPI support the element is plain passthrough
    #[cfg(not(feature = "wapi"))]
    #[test]
    fn test_wapi_disabled_passthrough() {
        let parsed = parse(&element(68, &[0x01, 0x00, 0x05, 0x00])).unwrap();
        assert_eq!(parsed.unrecognized.len(), 1);
        assert_eq!(parsed.unrecognized[0].id(), ElementId::Wapi);
    }
}
