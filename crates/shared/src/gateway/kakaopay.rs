use crate::{
    abstract_trait::gateway::PaymentGatewayTrait,
    config::KakaoPayConfig,
    domain::requests::{ApproveRequest, CancelRequest, PrepareRequest},
    errors::GatewayError,
    gateway::wire::{
        ApproveBody, ApproveResponse, CancelBody, CancelResponse, ProviderError, ReadyBody,
        ReadyResponse,
    },
    model::gateway::{ApproveResult, CancelResult, PrepareResult},
    utils::{Method, Metrics, Telemetry},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::{collections::HashSet, time::Duration};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const READY_PATH: &str = "/online/v1/payment/ready";
const APPROVE_PATH: &str = "/online/v1/payment/approve";
const CANCEL_PATH: &str = "/online/v1/payment/cancel";

/// Kakao Pay online payment API client.
pub struct KakaoPayClient {
    client: Client,
    config: KakaoPayConfig,
    approved: Mutex<HashSet<String>>,
    telemetry: Telemetry,
}

impl std::fmt::Debug for KakaoPayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakaoPayClient")
            .field("base_url", &self.config.base_url)
            .field("cid", &self.config.cid)
            .finish()
    }
}

impl KakaoPayClient {
    pub fn new(config: KakaoPayConfig, metrics: Metrics) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            approved: Mutex::new(HashSet::new()),
            telemetry: Telemetry::new("kakaopay-client", metrics),
        })
    }

    pub fn cid(&self) -> &str {
        &self.config.cid
    }

    fn callback_url(base: &str, partner_order_id: &str) -> String {
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}reservation_id={partner_order_id}")
    }

    async fn post<B, R>(&self, path: &str, body: &B, tid: Option<&str>) -> Result<R, GatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("SECRET_KEY {}", self.config.secret_key),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Kakao Pay request to {path} failed: {e}");
                GatewayError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            error!("❌ Failed to read Kakao Pay response from {path}: {e}");
            GatewayError::Unavailable(e.to_string())
        })?;

        if !status.is_success() {
            return Err(Self::classify_failure(status, &bytes, tid));
        }

        serde_json::from_slice::<R>(&bytes).map_err(|e| {
            error!("❌ Unexpected Kakao Pay response body from {path}: {e}");
            GatewayError::InvalidResponse(e.to_string())
        })
    }

    fn classify_failure(status: StatusCode, body: &[u8], tid: Option<&str>) -> GatewayError {
        match serde_json::from_slice::<ProviderError>(body) {
            Ok(provider) => {
                warn!(
                    "💳 Kakao Pay rejected request ({status}): {} {}",
                    provider.error_code, provider.error_message
                );
                provider.into_gateway_error(tid)
            }
            Err(_) if status.is_server_error() => {
                error!("📡 Kakao Pay returned {status} without an error body");
                GatewayError::Unavailable(format!("provider returned {status}"))
            }
            Err(_) => GatewayError::Rejected {
                code: i32::from(status.as_u16()),
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }
}

#[async_trait]
impl PaymentGatewayTrait for KakaoPayClient {
    async fn prepare(&self, request: &PrepareRequest) -> Result<PrepareResult, GatewayError> {
        let tracing_ctx = self.telemetry.start_tracing(
            "KakaoPayPrepare",
            vec![
                KeyValue::new("component", "gateway"),
                KeyValue::new("partner_order_id", request.partner_order_id.clone()),
            ],
        );

        let body = ReadyBody {
            cid: &self.config.cid,
            partner_order_id: &request.partner_order_id,
            partner_user_id: &request.partner_user_id,
            item_name: &request.item_name,
            quantity: request.quantity,
            total_amount: request.total_amount,
            tax_free_amount: request.tax_free_amount,
            approval_url: Self::callback_url(&self.config.approval_url, &request.partner_order_id),
            cancel_url: Self::callback_url(&self.config.cancel_url, &request.partner_order_id),
            fail_url: Self::callback_url(&self.config.fail_url, &request.partner_order_id),
        };

        let result = match self.post::<_, ReadyResponse>(READY_PATH, &body, None).await {
            Ok(ready) => PrepareResult::try_from(ready),
            Err(e) => Err(e),
        };

        match result {
            Ok(prepared) => {
                info!(
                    "✅ Prepared Kakao Pay checkout tid={} order={}",
                    prepared.tid, request.partner_order_id
                );
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    "Checkout prepared",
                );
                Ok(prepared)
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Prepare failed: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn approve(&self, request: &ApproveRequest) -> Result<ApproveResult, GatewayError> {
        if self.approved.lock().await.contains(&request.tid) {
            warn!("⚠️ tid={} was already approved", request.tid);
            return Err(GatewayError::AlreadyApproved(request.tid.clone()));
        }

        let tracing_ctx = self.telemetry.start_tracing(
            "KakaoPayApprove",
            vec![
                KeyValue::new("component", "gateway"),
                KeyValue::new("tid", request.tid.clone()),
            ],
        );

        let body = ApproveBody {
            cid: &self.config.cid,
            tid: &request.tid,
            partner_order_id: &request.partner_order_id,
            partner_user_id: &request.partner_user_id,
            pg_token: &request.pg_token,
        };

        let result = match self
            .post::<_, ApproveResponse>(APPROVE_PATH, &body, Some(&request.tid))
            .await
        {
            Ok(approved) => ApproveResult::try_from(approved),
            Err(e) => Err(e),
        };

        match result {
            Ok(approved) => {
                self.approved.lock().await.insert(request.tid.clone());
                info!(
                    "✅ Approved tid={} total={}",
                    approved.tid, approved.amount.total
                );
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    "Payment approved",
                );
                Ok(approved)
            }
            Err(e) => {
                if matches!(e, GatewayError::AlreadyApproved(_)) {
                    self.approved.lock().await.insert(request.tid.clone());
                }
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Approve failed: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn cancel(&self, request: &CancelRequest) -> Result<CancelResult, GatewayError> {
        if request.cancel_amount <= 0 || request.cancel_amount > request.cancel_available_amount {
            warn!(
                "⚠️ Refusing cancel of {} on tid={} with {} cancelable",
                request.cancel_amount, request.tid, request.cancel_available_amount
            );
            return Err(GatewayError::ExcessiveCancelAmount {
                requested: request.cancel_amount,
                available: request.cancel_available_amount,
            });
        }

        let tracing_ctx = self.telemetry.start_tracing(
            "KakaoPayCancel",
            vec![
                KeyValue::new("component", "gateway"),
                KeyValue::new("tid", request.tid.clone()),
                KeyValue::new("cancel_amount", request.cancel_amount),
            ],
        );

        let body = CancelBody {
            cid: &self.config.cid,
            tid: &request.tid,
            cancel_amount: request.cancel_amount,
            cancel_tax_free_amount: request.cancel_tax_free_amount,
            cancel_available_amount: request.cancel_available_amount,
        };

        let result = match self
            .post::<_, CancelResponse>(CANCEL_PATH, &body, Some(&request.tid))
            .await
        {
            Ok(canceled) => CancelResult::try_from(canceled),
            Err(e) => Err(e),
        };

        match result {
            Ok(canceled) => {
                info!(
                    "✅ Canceled {} on tid={}, {} left",
                    canceled.approved_cancel_amount.total,
                    canceled.tid,
                    canceled.cancel_available_amount.total
                );
                self.telemetry.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    "Payment canceled",
                );
                Ok(canceled)
            }
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Cancel failed: {e}"),
                );
                Err(e)
            }
        }
    }
}
