use crate::config::QuoteConfig;
use crate::domain::model::{ConversionRequest, ConversionResponse, Direction};
use crate::domain::ports::RateQuoteService;
use crate::utils::error::{PairError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalcRequest {
    pair_id: u64,
    in_amount: Option<f64>,
    out_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalcResponse {
    in_amount: Option<f64>,
    out_amount: Option<f64>,
}

/// Rate-quote service reached over HTTP. One POST per conversion; the amount
/// goes into `inAmount` when converting to the target currency and into
/// `outAmount` when converting back.
pub struct HttpRateQuoteService {
    client: Client,
    endpoint: String,
    pair_id: u64,
    serial: String,
}

impl HttpRateQuoteService {
    pub fn new(config: &QuoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            pair_id: config.pair_id,
            serial: config.serial.clone(),
        })
    }
}

#[async_trait]
impl RateQuoteService for HttpRateQuoteService {
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResponse> {
        let body = match request.direction {
            Direction::ToTarget => CalcRequest {
                pair_id: self.pair_id,
                in_amount: Some(request.amount),
                out_amount: None,
            },
            Direction::ToSource => CalcRequest {
                pair_id: self.pair_id,
                in_amount: None,
                out_amount: Some(request.amount),
            },
        };

        tracing::debug!("POST {} {:?}", self.endpoint, body);
        let response = self
            .client
            .post(&self.endpoint)
            .header("serial", &self.serial)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Quote response status: {}", status);
        if !status.is_success() {
            return Err(PairError::QuoteError {
                message: format!("quote service answered with status {}", status),
            });
        }

        let text = response.text().await?;
        let calc: CalcResponse = serde_json::from_str(&text)?;

        let converted = match request.direction {
            Direction::ToTarget => calc.out_amount,
            Direction::ToSource => calc.in_amount,
        };

        converted
            .map(|amount| ConversionResponse::for_request(request, amount))
            .ok_or_else(|| PairError::QuoteError {
                message: format!("quote response has no amount for {:?}", request.direction),
            })
    }
}
