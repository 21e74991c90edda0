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

mod logger;

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;
use wlan_scan::channel_state::ChannelState;
use wlan_scan::ie::ParsedIes;
use wlan_scan::{
    next_task_id, Band, BandCapability, CacheContext, ChannelStateTable, DefaultChannelPower,
    RegulatoryChannelApplier, RegulatoryConfigStore, RegulatoryTriplet, ScanCoreConfig, ScanDb,
    ScanEventWorker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BandArg {
    /// 2.4 GHz and 5 GHz
    Dual,
    /// 2.4 GHz only
    #[value(name = "2g")]
    TwoGhz,
    /// 5 GHz only
    #[value(name = "5g")]
    FiveGhz,
}

impl From<BandArg> for BandCapability {
    fn from(band: BandArg) -> Self {
        match band {
            BandArg::Dual => BandCapability::Dual,
            BandArg::TwoGhz => BandCapability::TwoGhzOnly,
            BandArg::FiveGhz => BandCapability::FiveGhzOnly,
        }
    }
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Information element blob to parse, hex encoded
    #[arg(long = "ies", value_name = "HEX")]
    ies: Vec<String>,
    /// Country triplets applied to the power tables
    #[arg(long, value_name = "FREQ:COUNT:POWER,...")]
    country: Option<String>,
    /// Base channel list, defaults to every channel covered by --country
    #[arg(long, value_name = "FREQ:POWER,...")]
    channels: Option<String>,
    /// Bands the radio operates
    #[arg(long, value_enum, default_value_t = BandArg::Dual)]
    band: BandArg,
    /// Maximum number of valid channels pushed to the radio
    #[arg(long, default_value_t = ScanCoreConfig::DEFAULT_MAX_VALID_CHANNELS)]
    max_valid_channels: usize,
    /// Maximum 2.4 GHz power sets
    #[arg(long, default_value_t = ScanCoreConfig::DEFAULT_MAX_POWER_SETS_24)]
    max_power_sets_24: usize,
    /// Maximum 5 GHz power sets
    #[arg(long, default_value_t = ScanCoreConfig::DEFAULT_MAX_POWER_SETS_5)]
    max_power_sets_5: usize,
    /// Tracing filter
    #[arg(long,short,default_value_t=String::from("info"))]
    filter: String,
    /// Enable file appender for logs
    #[arg(long, value_name = "FOLDER")]
    file_appender: Option<PathBuf>,
    /// Log files kept before the oldest is removed
    #[arg(long, value_name = "COUNT", default_value_t = NonZeroUsize::MIN.saturating_add(4))]
    file_appender_files_count: NonZeroUsize,
    /// Disable stdout appender for logs
    #[arg(long)]
    no_stdout_appender: bool,
}

impl CliArgs {
    fn core_config(&self) -> ScanCoreConfig {
        ScanCoreConfig {
            band_capability: self.band.into(),
            max_valid_channels: self.max_valid_channels,
            max_power_sets_24: self.max_power_sets_24,
            max_power_sets_5: self.max_power_sets_5,
        }
    }
}

fn parse_triplets(value: &str) -> anyhow::Result<Vec<RegulatoryTriplet>> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| {
            let fields: Vec<&str> = item.trim().split(':').collect();
            let [freq, count, power] = fields.as_slice() else {
                return Err(anyhow!("Expected FREQ:COUNT:POWER, got {item:?}"));
            };
            Ok(RegulatoryTriplet {
                first_freq: freq.parse().with_context(|| format!("bad frequency in {item:?}"))?,
                num_channels: count.parse().with_context(|| format!("bad count in {item:?}"))?,
                max_tx_power: power.parse().with_context(|| format!("bad power in {item:?}"))?,
            })
        })
        .collect()
}

fn parse_channels(value: &str) -> anyhow::Result<Vec<DefaultChannelPower>> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| {
            let (freq, power) = item
                .trim()
                .split_once(':')
                .ok_or_else(|| anyhow!("Expected FREQ:POWER, got {item:?}"))?;
            Ok(DefaultChannelPower {
                center_freq: freq.parse().with_context(|| format!("bad frequency in {item:?}"))?,
                tx_power_dbm: power.parse().with_context(|| format!("bad power in {item:?}"))?,
            })
        })
        .collect()
}

/// Every channel covered by the triplets, at the triplet power
fn channels_from_triplets(triplets: &[RegulatoryTriplet]) -> Vec<DefaultChannelPower> {
    triplets
        .iter()
        .filter_map(|triplet| triplet.to_power_set().ok())
        .flat_map(|set| {
            let power = set.tx_power_dbm();
            set.frequencies()
                .map(|center_freq| DefaultChannelPower {
                    center_freq,
                    tx_power_dbm: power,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn print_ies(index: usize, parsed: &ParsedIes) {
    println!("IE blob #{index}: {} elements", parsed.elements.len());
    if let Some(ssid) = &parsed.ssid {
        println!("  ssid: {ssid}");
    }
    if let Some(rsn) = &parsed.rsn {
        println!(
            "  rsn: group {:?}, pairwise {:?}, akm {:?}",
            rsn.group_cipher, rsn.pairwise_ciphers, rsn.akm_suites
        );
    }
    if let Some(wpa) = &parsed.wpa {
        println!("  wpa: unicast {:?}, auth {:?}", wpa.unicast_ciphers, wpa.auth_suites);
    }
    if let Some(ht) = &parsed.ht_capabilities {
        println!("  ht: cap {:#06x}, 40MHz {}", ht.ht_cap_info, ht.supports_40mhz());
    }
    if let Some(vht) = &parsed.vht_capabilities {
        println!("  vht: cap {:#010x}", vht.vht_cap_info);
    }
    for vendor in &parsed.vendor {
        println!("  vendor {:?}: {}", vendor.kind, hex::encode(&vendor.payload));
    }
    for element in &parsed.unrecognized {
        println!("  element {}: {}", element.element_id, hex::encode(&element.value));
    }
}

fn inspect_ies(blobs: &[String]) -> anyhow::Result<()> {
    for (index, blob) in blobs.iter().enumerate() {
        let bytes = hex::decode(blob.trim()).with_context(|| format!("IE blob #{index} is not hex"))?;
        match wlan_scan::ie::parse(&bytes) {
            Ok(parsed) => print_ies(index, &parsed),
            Err(e) => {
                tracing::error!(index, %e, "Failed to parse IE blob");
                println!("IE blob #{index}: {e}");
            }
        }
    }
    Ok(())
}

#[instrument(skip_all, name = "main", fields(task = next_task_id()))]
async fn run_regulatory(cli: &CliArgs, country: &str) -> anyhow::Result<()> {
    let config = cli.core_config();
    let triplets = parse_triplets(country)?;
    let base_channels = match &cli.channels {
        Some(channels) => parse_channels(channels)?,
        None => channels_from_triplets(&triplets),
    };

    let states = Arc::new(ChannelStateTable::from_states(
        base_channels
            .iter()
            .map(|row| (row.center_freq, ChannelState::Enabled)),
    ));
    let cache = Arc::new(CacheContext::new(
        Arc::new(ScanDb::new()),
        states,
        config.clone(),
    ));
    let store = Arc::new(Mutex::new(RegulatoryConfigStore::new()));
    let applier = RegulatoryChannelApplier::new(store.clone(), Default::default(), config);
    let worker = ScanEventWorker::new(cache, applier);

    let applied = worker.regulatory_changed(base_channels).await?;
    println!("valid channels: {:?}", applied.valid_channels);

    let accepted = worker.country_info(triplets).await?;
    println!("country triplets accepted: {accepted}");

    let store = store.lock();
    let update = store
        .last_update()
        .ok_or_else(|| anyhow!("No regulatory update was committed"))?;
    for band in Band::ALL {
        let sets = update.power_sets(band);
        println!("{band:?}: {} power sets", sets.len());
        for set in sets {
            println!(
                "  {} MHz x{} @ {} dBm",
                set.first_channel_freq(),
                set.channel_count(),
                set.tx_power_dbm()
            );
        }
        println!("  encoded: {}", hex::encode(update.encode_power(band)));
    }
    println!(
        "commits: {}, edca updates: {}",
        store.commits(),
        store.edca_updates()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();

    let _guard = logger::init_logger(&cli)?;
    tracing::info!("Tracing initialized!");

    inspect_ies(&cli.ies)?;

    if let Some(country) = &cli.country {
        tracing::info!("Starting runtime");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(run_regulatory(&cli, country))?;
    }

    tracing::info!("Closing app.");
    Ok(())
}
