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
// ───── Base modules ─────
pub mod channel_power;
pub mod channel_state;
pub mod config;
pub mod ie_codec;
pub mod regulatory_applier;
pub mod scan_cache;
pub mod scan_db;
pub mod scan_event_worker;
pub mod scan_result;
pub mod scan_result_builder;
pub mod security_resolver;
pub mod tlv_ie_codec;

// ───── Submodules: grouped views ─────
pub mod ie {
    pub use crate::ie_codec::{
        parse, HtCapabilities, ParseError, ParsedIes, RsnElement, SuiteSelector, VendorElement,
        VendorIeKind, VhtCapabilities, WpaElement,
    };
    #[cfg(feature = "wapi")]
    pub use crate::ie_codec::WapiElement;
    pub use crate::tlv_ie_codec::{ElementId, InformationElement};
}

pub mod security {
    pub use crate::security_resolver::{
        AuthModeSet, AuthType, CipherSet, EncryptionType, KeyMgmtSet, NegotiatedSecurityInfo,
        SecurityCapability,
    };
}

use std::sync::atomic::{AtomicU32, Ordering};
// ───── Reexports: commonly used components ─────
pub use channel_power::{
    ChannelPowerSet, ChannelPowerTable, ChannelPowerTables, DefaultChannelPower, RegulatoryTriplet,
};
pub use channel_state::{Band, ChannelState, ChannelStateQuery, ChannelStateTable};
pub use config::{BandCapability, ScanCoreConfig};
pub use regulatory_applier::{
    AppliedChannels, ApplyError, RegulatoryChannelApplier, RegulatoryConfigStore,
    RegulatorySurface, RegulatorySurfaceError, RegulatoryUpdate,
};
pub use scan_cache::{CacheContext, ScanCacheError};
pub use scan_db::{RawScanEntry, ScanDatabase, ScanDb, ScanFilter, ScanMatches};
pub use scan_event_worker::{ScanEvent, ScanEventWorker};
pub use scan_result::{ScanIterator, ScanResultEntry, ScanResultList};
pub use scan_result_builder::BuildError;

pub fn next_task_id() -> u32 {
    static TASK_ID: AtomicU32 = AtomicU32::new(0);
    TASK_ID.fetch_add(1, Ordering::Relaxed)
}
