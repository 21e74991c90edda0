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
use crate::CliArgs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

///////////////////////////////////////////////////////////////////////////
pub fn init_logger(cli: &CliArgs) -> anyhow::Result<Option<WorkerGuard>> {
    // RUST_LOG wins over --filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.filter));

    // logging to stdout
    let fmt_layer = (!cli.no_stdout_appender).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    // logging to fs
    let mut file_layer_guard = None;
    let file_layer = match cli.file_appender.as_ref() {
        Some(folder) => {
            let file_appender = Builder::new()
                .rotation(Rotation::DAILY)
                .filename_prefix("wlan_scan")
                .filename_suffix("log")
                .max_log_files(cli.file_appender_files_count.get())
                .build(folder)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            file_layer_guard = Some(guard);

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
        }
        None => None,
    };

    // combined logger
    let logging_layer = tracing_subscriber::Layer::and_then(fmt_layer, file_layer);

    tracing_subscriber::registry()
        .with(logging_layer)
        .with(filter)
        .init();

    Ok(file_layer_guard)
}
