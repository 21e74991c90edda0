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
use crate::channel_power::{DefaultChannelPower, RegulatoryTriplet};
use crate::next_task_id;
use crate::regulatory_applier::{AppliedChannels, ApplyError, RegulatoryChannelApplier, RegulatorySurface};
use crate::scan_cache::{CacheContext, ScanCacheError};
use crate::scan_db::{RawScanEntry, ScanFilter};
use crate::scan_result::ScanResultList;
use anyhow::anyhow;
use pnet::datalink::MacAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

pub type Reply<T> = Option<oneshot::Sender<T>>;

#[derive(Debug)]
pub enum ScanEvent {
    ScanCompleted {
        entries: Vec<RawScanEntry>,
        reply: Reply<Result<ScanResultList, ScanCacheError>>,
    },
    RegulatoryChanged {
        base_channels: Vec<DefaultChannelPower>,
        reply: Reply<Result<AppliedChannels, ApplyError>>,
    },
    CountryInfo {
        triplets: Vec<RegulatoryTriplet>,
        reply: Reply<Result<usize, ApplyError>>,
    },
    Flush {
        filter: ScanFilter,
        reply: Reply<Result<usize, ScanCacheError>>,
    },
    RemoveBssid {
        bssid: MacAddr,
        reply: Reply<Result<usize, ScanCacheError>>,
    },
}

fn respond<T>(reply: Reply<T>, value: T) {
    if let Some(reply) = reply {
        if reply.send(value).is_err() {
            debug!("Event requester went away before the reply");
        }
    }
}

/// Serializes scan completion and regulatory events onto one task
pub struct ScanEventWorker {
    _join_set: JoinSet<()>,
    tx_channel: mpsc::Sender<ScanEvent>,
}

impl ScanEventWorker {
    pub const QUEUE_DEPTH: usize = 100;

    pub fn new<S>(cache: Arc<CacheContext>, mut applier: RegulatoryChannelApplier<S>) -> Self
    where
        S: RegulatorySurface + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<ScanEvent>(Self::QUEUE_DEPTH);

        let mut join_set = JoinSet::new();
        join_set.spawn(
            async move {
                info!("Scan event worker started");

                while let Some(event) = rx.recv().await {
                    match event {
                        ScanEvent::ScanCompleted { entries, reply } => {
                            debug!(entries = entries.len(), "Processing scan completion");
                            respond(reply, cache.ingest(entries));
                        }
                        ScanEvent::RegulatoryChanged {
                            base_channels,
                            reply,
                        } => {
                            debug!(channels = base_channels.len(), "Processing regulatory change");
                            let result = applier.apply(&base_channels);
                            if let Ok(applied) = &result {
                                if let Err(e) = cache.filter_results(&applied.valid_channels) {
                                    error!(%e, "Failed to filter scan results");
                                }
                            }
                            respond(reply, result);
                        }
                        ScanEvent::CountryInfo { triplets, reply } => {
                            debug!(triplets = triplets.len(), "Processing country info");
                            respond(reply, applier.apply_country_info(&triplets));
                        }
                        ScanEvent::Flush { filter, reply } => {
                            respond(reply, cache.flush(&filter));
                        }
                        ScanEvent::RemoveBssid { bssid, reply } => {
                            respond(reply, cache.remove_bssid(bssid));
                        }
                    }
                }

                warn!("Scan event worker exiting.");
            }
            .instrument(info_span!(parent: None, "scan_event_worker", task = next_task_id())),
        );

        Self {
            _join_set: join_set,
            tx_channel: tx,
        }
    }

    /// Queues an event without waiting for it to be processed
    pub async fn send(&self, event: ScanEvent) -> anyhow::Result<()> {
        self.tx_channel
            .send(event)
            .await
            .map_err(|e| anyhow!("Failed to queue scan event: {e}"))
    }

    async fn request<T>(
        &self,
        make_event: impl FnOnce(Reply<T>) -> ScanEvent,
    ) -> anyhow::Result<T> {
        let (tx, rx) = oneshot::channel();
        self.send(make_event(Some(tx))).await?;
        rx.await
            .map_err(|_| anyhow!("Scan event worker dropped the request"))
    }

    pub async fn scan_completed(&self, entries: Vec<RawScanEntry>) -> anyhow::Result<ScanResultList> {
        let result = self
            .request(|reply| ScanEvent::ScanCompleted { entries, reply })
            .await?;
        Ok(result?)
    }

    pub async fn regulatory_changed(
        &self,
        base_channels: Vec<DefaultChannelPower>,
    ) -> anyhow::Result<AppliedChannels> {
        let result = self
            .request(|reply| ScanEvent::RegulatoryChanged {
                base_channels,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Returns the number of triplets accepted into the power tables
    pub async fn country_info(&self, triplets: Vec<RegulatoryTriplet>) -> anyhow::Result<usize> {
        let result = self
            .request(|reply| ScanEvent::CountryInfo { triplets, reply })
            .await?;
        Ok(result?)
    }

    pub async fn flush(&self, filter: ScanFilter) -> anyhow::Result<usize> {
        let result = self
            .request(|reply| ScanEvent::Flush { filter, reply })
            .await?;
        Ok(result?)
    }

    pub async fn remove_bssid(&self, bssid: MacAddr) -> anyhow::Result<usize> {
        let result = self
            .request(|reply| ScanEvent::RemoveBssid { bssid, reply })
            .await?;
        Ok(result?)
    }
}
