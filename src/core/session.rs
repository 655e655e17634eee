use crate::config::PairConfig;
use crate::core::controller::{ApplyOutcome, DualFieldController};
use crate::core::formatter::EditOutcome;
use crate::core::throttle::RateLookupThrottle;
use crate::domain::model::{ConversionRequest, ConversionResponse, PairEvent, PairSnapshot};
use crate::domain::ports::{Clock, RateQuoteService};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};

/// What a single UI event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// State may have changed, but no conversion was needed.
    NoConversion,
    /// A lookup with this sequence number is now in flight.
    Issued(u64),
    Throttled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairStats {
    pub edits: u64,
    pub rejected_edits: u64,
    pub requests_issued: u64,
    pub requests_throttled: u64,
    pub responses_applied: u64,
    pub responses_stale: u64,
    pub failures: u64,
}

/// The one place where the field pair is mutated: UI events and finished
/// lookups are both handled here, one at a time.
pub struct PairSession<Q: RateQuoteService + 'static, C: Clock> {
    controller: DualFieldController,
    throttle: RateLookupThrottle<Q>,
    clock: C,
    in_flight: JoinSet<Option<ConversionResponse>>,
    stats: PairStats,
}

impl<Q: RateQuoteService + 'static, C: Clock> PairSession<Q, C> {
    pub fn new(controller: DualFieldController, throttle: RateLookupThrottle<Q>, clock: C) -> Self {
        Self {
            controller,
            throttle,
            clock,
            in_flight: JoinSet::new(),
            stats: PairStats::default(),
        }
    }

    pub fn from_config(config: &PairConfig, service: Arc<Q>, clock: C) -> Result<Self> {
        let controller = config.build_controller()?;
        let throttle = RateLookupThrottle::new(service, config.throttle_interval());
        Ok(Self::new(controller, throttle, clock))
    }

    pub fn snapshot(&self) -> PairSnapshot {
        self.controller.snapshot()
    }

    pub fn stats(&self) -> &PairStats {
        &self.stats
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Must be called from within a tokio runtime: accepted lookups are
    /// spawned onto it.
    pub fn handle(&mut self, event: PairEvent) -> Dispatch {
        match event {
            PairEvent::Focus(side) => {
                self.controller.on_focus(side);
                Dispatch::NoConversion
            }
            PairEvent::Edit(text) => {
                self.stats.edits += 1;
                let (outcome, request) = self.controller.on_driving_edit(&text);
                if outcome == EditOutcome::Rejected {
                    self.stats.rejected_edits += 1;
                }
                self.dispatch(request)
            }
            PairEvent::QuickPick(bucket) => {
                let request = self.controller.on_quick_pick(bucket);
                self.dispatch(request)
            }
        }
    }

    fn dispatch(&mut self, request: Option<ConversionRequest>) -> Dispatch {
        let Some(request) = request else {
            return Dispatch::NoConversion;
        };

        let seq = request.seq;
        match self.throttle.request_conversion(request, self.clock.now()) {
            Some(lookup) => {
                self.in_flight.spawn(lookup);
                self.stats.requests_issued += 1;
                Dispatch::Issued(seq)
            }
            None => {
                self.stats.requests_throttled += 1;
                Dispatch::Throttled
            }
        }
    }

    /// Waits for the next in-flight lookup to finish and applies it.
    /// Returns `None` when nothing is in flight; a failed lookup yields
    /// `Some(None)`.
    pub async fn next_response(&mut self) -> Option<Option<ApplyOutcome>> {
        let joined = self.in_flight.join_next().await?;
        Some(self.settle(joined))
    }

    fn settle(
        &mut self,
        joined: std::result::Result<Option<ConversionResponse>, JoinError>,
    ) -> Option<ApplyOutcome> {
        let response = match joined {
            Ok(Some(response)) => response,
            Ok(None) => {
                self.stats.failures += 1;
                return None;
            }
            Err(e) => {
                tracing::error!("❌ Conversion task did not complete: {}", e);
                self.stats.failures += 1;
                return None;
            }
        };

        let outcome = self.controller.apply_conversion(&response);
        match outcome {
            ApplyOutcome::Applied { side, value } => {
                self.stats.responses_applied += 1;
                tracing::debug!("Response #{} applied: {} field = {}", response.seq, side, value);
            }
            ApplyOutcome::Stale => self.stats.responses_stale += 1,
        }
        Some(outcome)
    }

    /// Processes events until the sender side closes, publishing a snapshot
    /// after every event and every finished lookup. Lookups still in flight
    /// at shutdown are aborted.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<PairEvent>,
        snapshots: watch::Sender<PairSnapshot>,
    ) -> PairStats {
        snapshots.send_replace(self.snapshot());

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    self.handle(event);
                    snapshots.send_replace(self.snapshot());
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    if self.settle(joined).is_some() {
                        snapshots.send_replace(self.snapshot());
                    }
                }
            }
        }

        self.in_flight.shutdown().await;
        let stats = self.stats;
        tracing::info!(
            "📊 Session closed - edits: {}, requests: {} issued / {} throttled, responses: {} applied / {} stale, failures: {}",
            stats.edits,
            stats.requests_issued,
            stats.requests_throttled,
            stats.responses_applied,
            stats.responses_stale,
            stats.failures
        );
        stats
    }
}
