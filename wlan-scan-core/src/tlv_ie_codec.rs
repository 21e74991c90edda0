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
use nom::Err as NomErr;
use nom::{bytes::complete::take, error::ErrorKind, number::complete::be_u8, IResult};

use std::fmt::Debug;

///////////////////////////////////////////////////////////////////////////
//DEFINITION OF 802.11 ELEMENT IDS
///////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Ssid,
    SupportedRates,
    DsParams,
    Tim,
    Country,
    HtCapabilities,
    Rsn,
    ExtendedRates,
    MobilityDomain,
    HtOperation,
    Wapi,
    ExtendedCapabilities,
    VhtCapabilities,
    VhtOperation,
    Vendor,
    Extension,
    Unknown(u8), // To handle unknown or unsupported element ids
}

impl ElementId {
    // Convert a u8 into the appropriate ElementId variant
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => ElementId::Ssid,
            1 => ElementId::SupportedRates,
            3 => ElementId::DsParams,
            5 => ElementId::Tim,
            7 => ElementId::Country,
            45 => ElementId::HtCapabilities,
            48 => ElementId::Rsn,
            50 => ElementId::ExtendedRates,
            54 => ElementId::MobilityDomain,
            61 => ElementId::HtOperation,
            68 => ElementId::Wapi,
            127 => ElementId::ExtendedCapabilities,
            191 => ElementId::VhtCapabilities,
            192 => ElementId::VhtOperation,
            221 => ElementId::Vendor,
            255 => ElementId::Extension,
            _ => ElementId::Unknown(value),
        }
    }

    // Convert an ElementId variant back into the element id octet
    pub fn to_u8(&self) -> u8 {
        match *self {
            ElementId::Ssid => 0,
            ElementId::SupportedRates => 1,
            ElementId::DsParams => 3,
            ElementId::Tim => 5,
            ElementId::Country => 7,
            ElementId::HtCapabilities => 45,
            ElementId::Rsn => 48,
            ElementId::ExtendedRates => 50,
            ElementId::MobilityDomain => 54,
            ElementId::HtOperation => 61,
            ElementId::Wapi => 68,
            ElementId::ExtendedCapabilities => 127,
            ElementId::VhtCapabilities => 191,
            ElementId::VhtOperation => 192,
            ElementId::Vendor => 221,
            ElementId::Extension => 255,
            ElementId::Unknown(value) => value,
        }
    }
}

///////////////////////////////////////////////////////////////////////////
/// A single information element as carried in beacons and probe responses:
/// - `element_id`: 1 byte
/// - `length`: 1 byte, length of `value`
/// - `value`: `length` bytes of payload
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InformationElement {
    pub element_id: u8,
    pub length: u8,
    pub value: Vec<u8>,
}

impl InformationElement {
    pub const HEADER: usize = 2;

    pub fn new(element_id: ElementId, value: Vec<u8>) -> Self {
        Self {
            element_id: element_id.to_u8(),
            length: value.len() as u8,
            value,
        }
    }

    pub fn id(&self) -> ElementId {
        ElementId::from_u8(self.element_id)
    }

    pub fn total_size(&self) -> usize {
        self.value.len() + Self::HEADER
    }

    /// Parses one element off the front of `input`.
    ///
    /// A declared length running past the end of the buffer is reported as
    /// `ErrorKind::LengthValue` failure; a header cut short is `ErrorKind::Eof`.
    pub fn parse(input: &[u8]) -> IResult<&[u8], InformationElement> {
        if input.len() < Self::HEADER {
            return Err(NomErr::Failure(nom::error::Error::new(
                input,
                ErrorKind::Eof,
            )));
        }

        let (input, element_id) = be_u8(input)?;
        let (input, length) = be_u8(input)?;

        if input.len() < length as usize {
            tracing::debug!(
                element_id,
                "Expected {length} bytes but got only {}",
                input.len()
            );
            return Err(NomErr::Failure(nom::error::Error::new(
                input,
                ErrorKind::LengthValue,
            )));
        }

        let (input, value) = take(length as usize)(input)?;

        Ok((
            input,
            InformationElement {
                element_id,
                length,
                value: value.to_vec(),
            },
        ))
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_size());
        bytes.push(self.element_id);
        bytes.push(self.length);
        bytes.extend_from_slice(&self.value);
        bytes
    }
}
