use crate::domain::model::{ConversionRequest, ConversionResponse};
use crate::domain::ports::RateQuoteService;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Lets at most one conversion request through per interval. Requests inside
/// the window are dropped, never queued.
pub struct RateLookupThrottle<Q: RateQuoteService> {
    service: Arc<Q>,
    interval: Duration,
    last_request: Option<Instant>,
}

impl<Q: RateQuoteService + 'static> RateLookupThrottle<Q> {
    pub fn new(service: Arc<Q>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            last_request: None,
        }
    }

    pub fn is_throttled(&self, now: Instant) -> bool {
        self.last_request
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval)
    }

    /// Returns the lookup to run, or `None` if the request was throttled.
    ///
    /// The lookup never fails: service errors are logged and resolve to
    /// `None`, leaving the counterpart field as it was.
    pub fn request_conversion(
        &mut self,
        request: ConversionRequest,
        now: Instant,
    ) -> Option<impl Future<Output = Option<ConversionResponse>> + Send + 'static> {
        if self.is_throttled(now) {
            tracing::debug!(
                "Request #{} dropped: less than {:?} since the last request",
                request.seq,
                self.interval
            );
            return None;
        }
        self.last_request = Some(now);

        tracing::debug!(
            "Requesting conversion #{} of {} ({:?})",
            request.seq,
            request.amount,
            request.direction
        );

        let service = Arc::clone(&self.service);
        Some(async move {
            match service.convert(&request).await {
                Ok(response) => Some(ConversionResponse::for_request(
                    &request,
                    response.converted_amount,
                )),
                Err(e) => {
                    tracing::error!(
                        "❌ Conversion #{} ({:?}) failed: {} (Category: {:?})",
                        request.seq,
                        request.direction,
                        e,
                        e.category()
                    );
                    None
                }
            }
        })
    }
}
