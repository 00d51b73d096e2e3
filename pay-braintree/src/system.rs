//! Braintree Pay System
//!
//! Orchestrates the transaction lifecycle against the gateway: opens sessions,
//! resolves payer data, builds and sends wire requests, turns responses into
//! transaction records and failures into [`PaymentError`]s.
//! Contains NO transport logic - calls go through the injected `GatewayTransport`.

use std::sync::Arc;

use chrono::Utc;
use pay_types::{
    AccountResolver, ActualAccountData, CaptureRequest, ChargeRequest, GatewayRequest,
    GatewayTransport, HttpMethod, PayMetrics, PaySession, PaySystem, PaymentError, RefundRequest,
    Transaction, TransactionIdGenerator, TransactionKind, TransferRequest, UuidTransactionIds,
    VerifyRequest,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::auth;
use crate::metrics::{AtomicPayMetrics, MetricsSnapshot};
use crate::session::{BraintreeSession, ConnectionParameters};
use crate::wire::{
    self, ClientTokenEnvelope, CorrelationToken, CustomerLink, SaleEnvelope, SettlementEnvelope,
    WireError,
};

/// Default name recorded on transactions.
pub const SYSTEM_NAME: &str = "braintree";

/// Pay system for the Braintree gateway.
///
/// Generic over `T: GatewayTransport` - the HTTP adapter is injected at compile time.
/// Collaborators that callers commonly share (account resolver, id generator,
/// metrics) are held behind `Arc<dyn ..>`.
pub struct BraintreeSystem<T: GatewayTransport> {
    name: String,
    default_params: Option<ConnectionParameters>,
    transport: T,
    resolver: Arc<dyn AccountResolver>,
    ids: Arc<dyn TransactionIdGenerator>,
    metrics: Arc<dyn PayMetrics>,
    /// The built-in collector, until `with_metrics` replaces it.
    counters: Option<Arc<AtomicPayMetrics>>,
}

impl<T: GatewayTransport> BraintreeSystem<T> {
    /// Creates a pay system with random transaction ids and in-process metrics.
    pub fn new(transport: T, resolver: Arc<dyn AccountResolver>) -> Self {
        let counters = Arc::new(AtomicPayMetrics::new());
        Self {
            name: SYSTEM_NAME.to_string(),
            default_params: None,
            transport,
            resolver,
            ids: Arc::new(UuidTransactionIds),
            metrics: counters.clone(),
            counters: Some(counters),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parameters used by `start_session(None)`.
    pub fn with_default_params(mut self, params: ConnectionParameters) -> Self {
        self.default_params = Some(params);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn TransactionIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn PayMetrics>) -> Self {
        self.metrics = metrics;
        self.counters = None;
        self
    }

    /// Counters of the built-in collector. `None` once `with_metrics` installed another one.
    pub fn metrics_snapshot(&self) -> Option<MetricsSnapshot> {
        self.counters.as_ref().map(|c| c.snapshot())
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issues a client token for a hosted payment form.
    #[instrument(skip(self, session), fields(system = %self.name, session_id = %session.id()))]
    pub async fn generate_client_token(
        &self,
        session: &BraintreeSession,
    ) -> Result<String, PaymentError> {
        session.ensure_valid("generate_client_token")?;

        let url = wire::client_token_url(session.api_uri(), session.merchant_id());
        let envelope = ClientTokenEnvelope::v2();
        let request = self.request(session, HttpMethod::Post, url, Some(&envelope))?;
        let body = self.transport.execute(request).await.map_err(|e| {
            wire::translate_failure(e, || {
                format!(
                    "{}: cannot generate client token (session='{}')",
                    self.name, session
                )
            })
        })?;

        wire::parse_client_token(&body).map_err(|e| self.malformed("generate_client_token", e))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Gateway Plumbing
    // ─────────────────────────────────────────────────────────────────────────────

    fn request<B: Serialize>(
        &self,
        session: &BraintreeSession,
        method: HttpMethod,
        url: String,
        body: Option<&B>,
    ) -> Result<GatewayRequest, PaymentError> {
        let headers =
            auth::gateway_headers(&self.name, &session.user().credentials, body.is_some())?;
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| PaymentError::Encoding(e.to_string()))?;
        Ok(GatewayRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn malformed(&self, operation: &'static str, err: WireError) -> PaymentError {
        PaymentError::MalformedResponse {
            system: self.name.clone(),
            operation,
            reason: err.to_string(),
        }
    }

    fn unsupported(&self, operation: &'static str) -> PaymentError {
        debug!(system = %self.name, operation, "operation not supported");
        PaymentError::UnsupportedOperation {
            system: self.name.clone(),
            operation,
        }
    }

    /// Read-only lookup of a customer. Any failure counts as "not found".
    async fn customer_exists(&self, session: &BraintreeSession, customer_id: &str) -> bool {
        let url = wire::customer_url(session.api_uri(), session.merchant_id(), customer_id);
        let request = match self.request::<()>(session, HttpMethod::Get, url, None) {
            Ok(request) => request,
            Err(_) => return false,
        };
        match self.transport.execute(request).await {
            Ok(_) => true,
            Err(e) => {
                debug!(customer_id, error = %e, "customer probe failed, sending customer inline");
                false
            }
        }
    }

    async fn execute_charge(
        &self,
        session: &BraintreeSession,
        req: &ChargeRequest,
        payer: &ActualAccountData,
    ) -> Result<Transaction, PaymentError> {
        let order = match req.context.order() {
            None => None,
            Some(order) if order.is_new_customer => Some((order, CustomerLink::Inline)),
            Some(order) => {
                let link = if self.customer_exists(session, &order.customer_id).await {
                    CustomerLink::Existing
                } else {
                    CustomerLink::Inline
                };
                Some((order, link))
            }
        };

        let sale = SaleEnvelope::build(&req.amount, payer, order, req.capture);
        let url = wire::transactions_url(session.api_uri(), session.merchant_id());
        let request = self.request(session, HttpMethod::Post, url, Some(&sale))?;

        let body = self.transport.execute(request).await.map_err(|e| {
            wire::translate_failure(e, || {
                format!(
                    "{}: cannot charge payment (session='{}', account='{}', amount='{}')",
                    self.name, session, req.from, req.amount
                )
            })
        })?;

        let receipt =
            wire::parse_charge_response(&body).map_err(|e| self.malformed("charge", e))?;
        let id = self.ids.generate(session, &req.context, TransactionKind::Charge);

        Ok(Transaction::charge(
            id,
            self.name.clone(),
            receipt.correlation.to_string(),
            req.from.clone(),
            req.to.clone(),
            req.amount.clone(),
            receipt.created_at,
            req.description.clone(),
            req.capture,
        ))
    }

    async fn execute_capture(
        &self,
        session: &BraintreeSession,
        req: &CaptureRequest,
        token: &CorrelationToken,
    ) -> Result<Transaction, PaymentError> {
        let charge = &req.charge;
        let settlement = SettlementEnvelope::build(req.amount.as_ref());
        let url = wire::submit_for_settlement_url(
            session.api_uri(),
            session.merchant_id(),
            &token.transaction_id,
        );
        let request = self.request(session, HttpMethod::Put, url, Some(&settlement))?;

        let body = self.transport.execute(request).await.map_err(|e| {
            wire::translate_failure(e, || {
                format!(
                    "{}: cannot capture payment (session='{}', charge='{}', amount='{}')",
                    self.name,
                    session,
                    charge.id,
                    req.amount.as_ref().unwrap_or(&charge.amount)
                )
            })
        })?;

        let receipt =
            wire::parse_settlement_response(&body).map_err(|e| self.malformed("capture", e))?;
        if receipt.transaction_id != token.transaction_id {
            return Err(self.malformed(
                "capture",
                WireError::InvalidCorrelationToken(receipt.transaction_id),
            ));
        }

        let amount = match receipt.amount {
            Some(value) => charge
                .amount
                .with_value(value)
                .map_err(|e| self.malformed("capture", WireError::InvalidAmount(e.to_string())))?,
            None => req.amount.clone().unwrap_or_else(|| charge.amount.clone()),
        };
        let settled_at = receipt.settled_at.unwrap_or_else(Utc::now);

        Ok(charge.captured(amount, settled_at, req.description.clone()))
    }

    /// Checks a capture request before anything is sent.
    fn check_capture(&self, req: &CaptureRequest) -> Result<CorrelationToken, PaymentError> {
        let charge = &req.charge;
        if !charge.is_capturable() {
            return Err(PaymentError::InvalidTransaction(format!(
                "transaction {} ({}, {:?}) cannot be captured",
                charge.id, charge.kind, charge.status
            )));
        }
        if let Some(amount) = &req.amount {
            charge
                .amount
                .ensure_same_currency(amount)
                .map_err(|e| PaymentError::InvalidAmount(e.to_string()))?;
            if !amount.is_positive() {
                return Err(PaymentError::InvalidAmount(format!(
                    "capture amount must be positive, got {}",
                    amount
                )));
            }
            if amount.value() > charge.amount.value() {
                return Err(PaymentError::InvalidAmount(format!(
                    "capture amount {} exceeds authorized {}",
                    amount, charge.amount
                )));
            }
        }
        charge
            .processor_token
            .parse::<CorrelationToken>()
            .map_err(|e| PaymentError::InvalidTransaction(e.to_string()))
    }
}

#[async_trait::async_trait]
impl<T: GatewayTransport> PaySystem for BraintreeSystem<T> {
    type Session = BraintreeSession;
    type ConnectionParameters = ConnectionParameters;

    fn name(&self) -> &str {
        &self.name
    }

    fn start_session(
        &self,
        params: Option<ConnectionParameters>,
    ) -> Result<BraintreeSession, PaymentError> {
        let params = params
            .or_else(|| self.default_params.clone())
            .ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "{}: no connection parameters configured",
                    self.name
                ))
            })?;
        let session = BraintreeSession::new(self.name.clone(), params);
        debug!(session = %session, "session started");
        Ok(session)
    }

    #[instrument(skip(self, session, req), fields(system = %self.name, session_id = %session.id()))]
    async fn charge(
        &self,
        session: &BraintreeSession,
        req: ChargeRequest,
    ) -> Result<Transaction, PaymentError> {
        session.ensure_valid("charge")?;
        if !req.amount.is_positive() {
            return Err(PaymentError::InvalidAmount(format!(
                "charge amount must be positive, got {}",
                req.amount
            )));
        }

        let payer = self.resolver.resolve(&req.context, &req.from).await?;

        match self.execute_charge(session, &req, &payer).await {
            Ok(transaction) => {
                self.metrics.charge_succeeded(&transaction.amount);
                info!(
                    transaction_id = %transaction.id,
                    amount = %transaction.amount,
                    captured = req.capture,
                    "charge succeeded"
                );
                Ok(transaction)
            }
            Err(err) => {
                if err.is_gateway_failure() {
                    self.metrics.charge_failed();
                }
                warn!(error = %err, amount = %req.amount, "charge failed");
                Err(err)
            }
        }
    }

    #[instrument(skip(self, session, req), fields(system = %self.name, session_id = %session.id(), charge_id = %req.charge.id))]
    async fn capture(
        &self,
        session: &BraintreeSession,
        req: CaptureRequest,
    ) -> Result<Transaction, PaymentError> {
        session.ensure_valid("capture")?;
        let token = self.check_capture(&req)?;

        match self.execute_capture(session, &req, &token).await {
            Ok(transaction) => {
                self.metrics
                    .capture_succeeded(&req.charge, req.amount.as_ref());
                info!(amount = %transaction.amount, "capture succeeded");
                Ok(transaction)
            }
            Err(err) => {
                if err.is_gateway_failure() {
                    self.metrics.charge_failed();
                }
                warn!(error = %err, "capture failed");
                Err(err)
            }
        }
    }

    async fn refund(
        &self,
        _session: &BraintreeSession,
        _req: RefundRequest,
    ) -> Result<Transaction, PaymentError> {
        Err(self.unsupported("refund"))
    }

    async fn transfer(
        &self,
        _session: &BraintreeSession,
        _req: TransferRequest,
    ) -> Result<Transaction, PaymentError> {
        Err(self.unsupported("transfer"))
    }

    async fn verify_potential_transaction(
        &self,
        _session: &BraintreeSession,
        _req: VerifyRequest,
    ) -> Result<(), PaymentError> {
        Err(self.unsupported("verify_potential_transaction"))
    }
}
