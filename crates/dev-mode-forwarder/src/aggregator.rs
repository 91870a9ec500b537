// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classifier::{Classifier, LayoutRegistry};
use crate::config::Config;
use crate::envelope::decode_envelope;
use crate::identifiers::Identifiers;
use crate::instrumentation::Instrumentation;
use crate::normalizer::LogNormalizer;
use crate::schema::tags::Tags;
use crate::schema::{Origin, RequestResponse, TracePayload};
use crate::synthesizer::{resource_tags, RequestResponseSynthesizer};
use crate::telemetry::{LogRecord, Record};
use crate::timestamp::{parse_platform_time, unix_nanos};
use crate::AggregatedActivity;

/// Raw `spans` envelopes of the window, in arrival order.
pub fn collect_trace_envelopes(records: &[LogRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|log| match &log.record {
            Record::Spans(envelope) => Some(envelope.as_str()),
            _ => None,
        })
        .collect()
}

/// Builds the [`AggregatedActivity`] of one flush window.
pub struct ActivityAggregator {
    config: Arc<Config>,
    instrumentation: Instrumentation,
    classifier: Classifier,
}

impl ActivityAggregator {
    pub fn new(config: Arc<Config>, instrumentation: Instrumentation) -> Self {
        Self::with_registry(config, instrumentation, LayoutRegistry::default())
    }

    pub fn with_registry(
        config: Arc<Config>,
        instrumentation: Instrumentation,
        registry: LayoutRegistry,
    ) -> Self {
        ActivityAggregator {
            config,
            instrumentation,
            classifier: Classifier::new(instrumentation, registry),
        }
    }

    /// Resolves the window identifiers and aggregates with them.
    pub fn aggregate_window(
        &self,
        records: &[LogRecord],
        account_id: impl Into<String>,
    ) -> AggregatedActivity {
        let ids = Identifiers::resolve(records, account_id, &self.instrumentation);
        self.aggregate(records, &ids)
    }

    pub fn aggregate(&self, records: &[LogRecord], ids: &Identifiers) -> AggregatedActivity {
        let mut activity = AggregatedActivity {
            account_id: ids.account_id.clone(),
            region: self.config.region.clone(),
            request_id: ids.request_id.clone(),
            ..Default::default()
        };

        let collected = RequestResponseSynthesizer::new(&self.config, self.instrumentation)
            .collect(records, ids);
        for (index, envelope) in collected.envelopes.iter().enumerate() {
            let mut record = match decode_envelope::<RequestResponse>(envelope) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Dropping request/response record: {e}");
                    continue;
                }
            };
            if let Some(meta) = collected.metadata.get(index) {
                if !meta.time.is_empty() && record.has_origin(Origin::Response) {
                    match parse_platform_time(&meta.time) {
                        Some(time) => record.timestamp = Some(unix_nanos(time)),
                        None => debug!("Keeping response timestamp, bad meta time {}", meta.time),
                    }
                }
            }
            record
                .tags
                .get_or_insert_with(Tags::default)
                .aws = Some(resource_tags(&self.config, ids));
            activity.request_response.push(record);
        }

        for envelope in collect_trace_envelopes(records) {
            match decode_envelope::<TracePayload>(envelope) {
                Ok(trace) => activity.traces.push(trace),
                Err(e) => warn!("Dropping trace payload: {e}"),
            }
        }

        let logs = LogNormalizer::new(&self.config, &self.classifier).normalize(records, ids);
        if !logs.log_events.is_empty() {
            activity.logs.push(logs);
        }

        debug!(
            "Aggregated {} log batches, {} request/response records and {} trace payloads",
            activity.logs.len(),
            activity.request_response.len(),
            activity.traces.len()
        );
        activity
    }
}
