//! Gateway wire format.
//!
//! Pure mapping between domain values and the gateway's JSON documents:
//! endpoint paths, request bodies, typed response schemas, and translation of
//! failed calls into [`PaymentError`]s. Nothing here performs I/O.

use chrono::{DateTime, Utc};
use pay_types::{ActualAccountData, Amount, OrderContext, PaymentError, TransportError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors decoding a gateway document.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid correlation token: {0:?}")]
    InvalidCorrelationToken(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Ids are placed in the path as single, percent-encoded segments.
fn merchant_url(api_uri: &str, merchant_id: &str) -> String {
    format!("{}/merchants/{}", api_uri, urlencoding::encode(merchant_id))
}

pub fn client_token_url(api_uri: &str, merchant_id: &str) -> String {
    format!("{}/client_token", merchant_url(api_uri, merchant_id))
}

pub fn transactions_url(api_uri: &str, merchant_id: &str) -> String {
    format!("{}/transactions", merchant_url(api_uri, merchant_id))
}

pub fn submit_for_settlement_url(api_uri: &str, merchant_id: &str, transaction_id: &str) -> String {
    format!(
        "{}/transactions/{}/submit_for_settlement",
        merchant_url(api_uri, merchant_id),
        urlencoding::encode(transaction_id)
    )
}

pub fn customer_url(api_uri: &str, merchant_id: &str, customer_id: &str) -> String {
    format!(
        "{}/customers/{}",
        merchant_url(api_uri, merchant_id),
        urlencoding::encode(customer_id)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Correlation Token
// ─────────────────────────────────────────────────────────────────────────────

/// Composite identity `customerId:paymentMethodToken:gatewayTransactionId`
/// stored on a transaction record to address the gateway's own transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationToken {
    pub customer_id: String,
    pub payment_method_token: String,
    pub transaction_id: String,
}

impl std::fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.customer_id, self.payment_method_token, self.transaction_id
        )
    }
}

impl std::str::FromStr for CorrelationToken {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let customer_id = parts.next().unwrap_or_default();
        let payment_method_token = parts.next();
        let transaction_id = parts.next();
        match (payment_method_token, transaction_id) {
            (Some(token), Some(id)) if !id.is_empty() => Ok(Self {
                customer_id: customer_id.to_string(),
                payment_method_token: token.to_string(),
                transaction_id: id.to_string(),
            }),
            _ => Err(WireError::InvalidCorrelationToken(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Decimal written as a JSON number with exactly its own digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireDecimal(#[serde(with = "rust_decimal::serde::arbitrary_precision")] pub Decimal);

#[derive(Debug, Serialize)]
pub struct ClientTokenEnvelope {
    pub client_token: ClientTokenRequest,
}

#[derive(Debug, Serialize)]
pub struct ClientTokenRequest {
    pub version: &'static str,
}

impl ClientTokenEnvelope {
    pub fn v2() -> Self {
        Self {
            client_token: ClientTokenRequest { version: "2" },
        }
    }
}

/// How a sale refers to the order's customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerLink {
    /// The customer exists at the gateway: reference it by `customer_id`.
    Existing,
    /// Create the customer with the sale: embed `customer.id`.
    Inline,
}

#[derive(Debug, Serialize)]
pub struct SaleEnvelope {
    pub transaction: SaleRequest,
}

#[derive(Debug, Serialize)]
pub struct SaleRequest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub amount: WireDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<InlineCustomer>,
    pub billing: Billing,
    pub options: SaleOptions,
}

#[derive(Debug, Serialize)]
pub struct InlineCustomer {
    pub id: String,
}

/// Billing sub-document. Blank fields are left out entirely.
#[derive(Debug, Default, Serialize)]
pub struct Billing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code_alpha3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaleOptions {
    pub submit_for_settlement: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_in_vault_on_success: Option<bool>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

impl Billing {
    pub fn from_account_data(data: &ActualAccountData) -> Self {
        let address = &data.billing_address;
        Self {
            first_name: non_blank(&data.first_name),
            last_name: non_blank(&data.last_name),
            street_address: non_blank(&address.street),
            extended_address: non_blank(&address.extended),
            locality: non_blank(&address.city),
            country_code_alpha3: non_blank(&address.country),
            region: non_blank(&address.region),
            postal_code: non_blank(&address.postal_code),
            company: non_blank(&address.company),
        }
    }
}

impl SaleEnvelope {
    /// Builds the "create transaction" body for a sale.
    ///
    /// `order` carries the order context together with the customer link the
    /// caller settled on.
    pub fn build(
        amount: &Amount,
        payer: &ActualAccountData,
        order: Option<(&OrderContext, CustomerLink)>,
        capture: bool,
    ) -> Self {
        let is_web = payer.account.is_web_nonce();
        let payment_method = payer.account.account_id.clone();

        let mut transaction = SaleRequest {
            kind: "sale",
            amount: WireDecimal(amount.value()),
            payment_method_nonce: None,
            payment_method_token: None,
            order_id: None,
            customer_id: None,
            customer: None,
            billing: Billing::from_account_data(payer),
            options: SaleOptions {
                submit_for_settlement: capture,
                store_in_vault_on_success: None,
            },
        };

        if is_web {
            transaction.payment_method_nonce = Some(payment_method);
        } else {
            transaction.payment_method_token = Some(payment_method);
        }

        if let Some((order, link)) = order {
            transaction.order_id = Some(order.order_id.clone());
            match link {
                CustomerLink::Existing => {
                    transaction.customer_id = Some(order.customer_id.clone());
                }
                CustomerLink::Inline => {
                    transaction.customer = Some(InlineCustomer {
                        id: order.customer_id.clone(),
                    });
                }
            }
            transaction.options.store_in_vault_on_success = Some(is_web);
        }

        Self { transaction }
    }
}

#[derive(Debug, Serialize)]
pub struct SettlementEnvelope {
    pub transaction: SettlementRequest,
}

#[derive(Debug, Serialize)]
pub struct SettlementRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<WireDecimal>,
}

impl SettlementEnvelope {
    /// Without an amount the gateway settles what was authorized.
    pub fn build(amount: Option<&Amount>) -> Self {
        Self {
            transaction: SettlementRequest {
                amount: amount.map(|a| WireDecimal(a.value())),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientTokenResponse {
    client_token: Option<ClientTokenValue>,
}

#[derive(Debug, Deserialize)]
struct ClientTokenValue {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionEnvelope {
    transaction: Option<GatewayTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewayTransaction {
    id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    amount: Option<serde_json::Value>,
    customer: Option<CustomerRecord>,
    credit_card: Option<CreditCardRecord>,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreditCardRecord {
    token: Option<String>,
}

/// What a successful sale tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    pub correlation: CorrelationToken,
    pub created_at: DateTime<Utc>,
}

/// What a successful settlement tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    pub transaction_id: String,
    pub amount: Option<Decimal>,
    pub settled_at: Option<DateTime<Utc>>,
}

fn transaction_of(body: &str) -> Result<GatewayTransaction, WireError> {
    let envelope: TransactionEnvelope = serde_json::from_str(body)?;
    envelope
        .transaction
        .ok_or(WireError::MissingField("transaction"))
}

/// Gateway amounts arrive either as strings (`"10.00"`) or as numbers.
fn decimal_of(value: serde_json::Value) -> Result<Option<Decimal>, WireError> {
    let text = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        other => return Err(WireError::InvalidAmount(other.to_string())),
    };
    text.parse::<Decimal>()
        .map(Some)
        .map_err(|_| WireError::InvalidAmount(text))
}

pub fn parse_client_token(body: &str) -> Result<String, WireError> {
    let response: ClientTokenResponse = serde_json::from_str(body)?;
    response
        .client_token
        .and_then(|t| t.value)
        .ok_or(WireError::MissingField("clientToken.value"))
}

/// Extracts the correlation token and creation time of a sale.
///
/// A customer or card the gateway did not report leaves an empty segment;
/// the gateway transaction id and timestamp are mandatory.
pub fn parse_charge_response(body: &str) -> Result<ChargeReceipt, WireError> {
    let transaction = transaction_of(body)?;
    let transaction_id = transaction
        .id
        .filter(|id| !id.is_empty())
        .ok_or(WireError::MissingField("transaction.id"))?;
    let created_at = transaction
        .created_at
        .ok_or(WireError::MissingField("transaction.createdAt"))?;
    let customer_id = transaction
        .customer
        .and_then(|c| c.id)
        .unwrap_or_default();
    let payment_method_token = transaction
        .credit_card
        .and_then(|c| c.token)
        .unwrap_or_default();

    Ok(ChargeReceipt {
        correlation: CorrelationToken {
            customer_id,
            payment_method_token,
            transaction_id,
        },
        created_at,
    })
}

pub fn parse_settlement_response(body: &str) -> Result<SettlementReceipt, WireError> {
    let transaction = transaction_of(body)?;
    let transaction_id = transaction
        .id
        .filter(|id| !id.is_empty())
        .ok_or(WireError::MissingField("transaction.id"))?;
    let amount = match transaction.amount {
        Some(value) => decimal_of(value)?,
        None => None,
    };

    Ok(SettlementReceipt {
        transaction_id,
        amount,
        settled_at: transaction.updated_at.or(transaction.created_at),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorEnvelope {
    api_error_response: Option<ApiErrorResponse>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

/// The gateway's own error message, if the failure carries one.
pub fn gateway_message(err: &TransportError) -> Option<String> {
    let TransportError::Status { body, .. } = err else {
        return None;
    };
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.api_error_response)
        .and_then(|r| r.message)
        .filter(|m| !m.trim().is_empty())
}

/// Maps a failed call onto the payment error taxonomy.
///
/// A structured gateway message wins; anything else gets `fallback`.
pub fn translate_failure(err: TransportError, fallback: impl FnOnce() -> String) -> PaymentError {
    match gateway_message(&err) {
        Some(message) => PaymentError::GatewayRejected {
            message,
            source: err,
        },
        None => PaymentError::TransportFailure {
            message: fallback(),
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_types::{Account, BillingAddress};
    use serde_json::Value;

    fn payer(kind_web: bool) -> ActualAccountData {
        let account = if kind_web {
            Account::web_nonce("alice", "nonce-abc").unwrap()
        } else {
            Account::vaulted("alice", "token-xyz").unwrap()
        };
        ActualAccountData {
            account,
            first_name: Some("Alice".into()),
            last_name: Some("   ".into()),
            billing_address: BillingAddress {
                street: Some("1 Main St".into()),
                extended: Some("".into()),
                city: Some("Springfield".into()),
                region: None,
                postal_code: Some("12345".into()),
                country: Some("USA".into()),
                company: Some("\t".into()),
            },
        }
    }

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_urls() {
        let base = "https://gw.test";
        assert_eq!(
            transactions_url(base, "m1"),
            "https://gw.test/merchants/m1/transactions"
        );
        assert_eq!(
            submit_for_settlement_url(base, "m1", "tx9"),
            "https://gw.test/merchants/m1/transactions/tx9/submit_for_settlement"
        );
        assert_eq!(
            customer_url(base, "m1", "c7"),
            "https://gw.test/merchants/m1/customers/c7"
        );
        assert_eq!(
            client_token_url(base, "m1"),
            "https://gw.test/merchants/m1/client_token"
        );
    }

    #[test]
    fn test_urls_escape_reserved_characters() {
        let base = "https://gw.test";
        assert_eq!(
            customer_url(base, "m1", "acme?x=1"),
            "https://gw.test/merchants/m1/customers/acme%3Fx%3D1"
        );
        assert_eq!(
            customer_url(base, "m1", "a/b#c%d e"),
            "https://gw.test/merchants/m1/customers/a%2Fb%23c%25d%20e"
        );
        assert_eq!(
            submit_for_settlement_url(base, "m/1", "tx?9"),
            "https://gw.test/merchants/m%2F1/transactions/tx%3F9/submit_for_settlement"
        );
    }

    #[test]
    fn test_sale_amount_is_exact_json_number() {
        let amount = Amount::parse("USD", "1234.50").unwrap();
        let body = serde_json::to_string(&SaleEnvelope::build(&amount, &payer(true), None, true))
            .unwrap();
        assert!(body.contains(r#""amount":1234.50"#), "{body}");
    }

    #[test]
    fn test_sale_payment_method_field_follows_account_kind() {
        let amount = Amount::parse("USD", "5").unwrap();

        let web = to_json(&SaleEnvelope::build(&amount, &payer(true), None, true));
        assert_eq!(web["transaction"]["payment_method_nonce"], "nonce-abc");
        assert!(web["transaction"].get("payment_method_token").is_none());

        let vaulted = to_json(&SaleEnvelope::build(&amount, &payer(false), None, true));
        assert_eq!(vaulted["transaction"]["payment_method_token"], "token-xyz");
        assert!(vaulted["transaction"].get("payment_method_nonce").is_none());
    }

    #[test]
    fn test_sale_without_order_omits_order_fields() {
        let amount = Amount::parse("USD", "5").unwrap();
        let json = to_json(&SaleEnvelope::build(&amount, &payer(true), None, false));
        let tx = &json["transaction"];

        assert_eq!(tx["type"], "sale");
        assert_eq!(tx["options"]["submit_for_settlement"], false);
        assert!(tx["options"].get("store_in_vault_on_success").is_none());
        assert!(tx.get("order_id").is_none());
        assert!(tx.get("customer").is_none());
        assert!(tx.get("customer_id").is_none());
    }

    #[test]
    fn test_sale_customer_links() {
        let amount = Amount::parse("USD", "5").unwrap();
        let order = OrderContext::new("order-1", "cust-1", false).unwrap();

        let existing = to_json(&SaleEnvelope::build(
            &amount,
            &payer(true),
            Some((&order, CustomerLink::Existing)),
            true,
        ));
        assert_eq!(existing["transaction"]["order_id"], "order-1");
        assert_eq!(existing["transaction"]["customer_id"], "cust-1");
        assert!(existing["transaction"].get("customer").is_none());
        assert_eq!(
            existing["transaction"]["options"]["store_in_vault_on_success"],
            true
        );

        let inline = to_json(&SaleEnvelope::build(
            &amount,
            &payer(false),
            Some((&order, CustomerLink::Inline)),
            true,
        ));
        assert_eq!(inline["transaction"]["customer"]["id"], "cust-1");
        assert!(inline["transaction"].get("customer_id").is_none());
        assert_eq!(
            inline["transaction"]["options"]["store_in_vault_on_success"],
            false
        );
    }

    #[test]
    fn test_billing_omits_blank_fields() {
        let billing = to_json(&Billing::from_account_data(&payer(true)));
        let fields = billing.as_object().unwrap();

        assert_eq!(billing["first_name"], "Alice");
        assert_eq!(billing["street_address"], "1 Main St");
        assert_eq!(billing["locality"], "Springfield");
        assert_eq!(billing["postal_code"], "12345");
        assert_eq!(billing["country_code_alpha3"], "USA");
        for absent in ["last_name", "extended_address", "region", "company"] {
            assert!(!fields.contains_key(absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn test_settlement_body() {
        let without = serde_json::to_string(&SettlementEnvelope::build(None)).unwrap();
        assert_eq!(without, r#"{"transaction":{}}"#);

        let amount = Amount::parse("USD", "7.05").unwrap();
        let with = serde_json::to_string(&SettlementEnvelope::build(Some(&amount))).unwrap();
        assert_eq!(with, r#"{"transaction":{"amount":7.05}}"#);
    }

    #[test]
    fn test_client_token_body() {
        let body = serde_json::to_string(&ClientTokenEnvelope::v2()).unwrap();
        assert_eq!(body, r#"{"client_token":{"version":"2"}}"#);
    }

    #[test]
    fn test_correlation_token_round_trip() {
        let token: CorrelationToken = "cust:card:tx-42".parse().unwrap();
        assert_eq!(token.transaction_id, "tx-42");
        assert_eq!(token.to_string(), "cust:card:tx-42");

        let anonymous: CorrelationToken = "::tx-1".parse().unwrap();
        assert_eq!(anonymous.transaction_id, "tx-1");
        assert!(anonymous.customer_id.is_empty());
    }

    #[test]
    fn test_correlation_token_rejects_short_values() {
        for bad in ["", "tx-1", "cust:card", "cust:card:"] {
            assert!(
                bad.parse::<CorrelationToken>().is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_charge_response() {
        let body = r#"{"transaction":{"id":"tx-1","createdAt":"2016-05-12T18:23:48Z",
            "customer":{"id":"cust-1"},"creditCard":{"token":"card-1"},"status":"authorized"}}"#;
        let receipt = parse_charge_response(body).unwrap();
        assert_eq!(receipt.correlation.to_string(), "cust-1:card-1:tx-1");
        assert_eq!(receipt.created_at.to_rfc3339(), "2016-05-12T18:23:48+00:00");
    }

    #[test]
    fn test_parse_charge_response_without_customer() {
        let body = r#"{"transaction":{"id":"tx-1","createdAt":"2016-05-12T18:23:48Z",
            "customer":{"id":null},"creditCard":{"token":"card-1"}}}"#;
        let receipt = parse_charge_response(body).unwrap();
        assert_eq!(receipt.correlation.to_string(), ":card-1:tx-1");
    }

    #[test]
    fn test_parse_charge_response_requires_id() {
        let body = r#"{"transaction":{"createdAt":"2016-05-12T18:23:48Z"}}"#;
        assert!(matches!(
            parse_charge_response(body),
            Err(WireError::MissingField("transaction.id"))
        ));

        assert!(matches!(
            parse_charge_response("{}"),
            Err(WireError::MissingField("transaction"))
        ));
        assert!(matches!(
            parse_charge_response("not json"),
            Err(WireError::Json(_))
        ));
    }

    #[test]
    fn test_parse_settlement_response() {
        let body = r#"{"transaction":{"id":"tx-1","amount":"7.50",
            "createdAt":"2016-05-12T18:23:48Z","updatedAt":"2016-05-13T10:00:00Z"}}"#;
        let receipt = parse_settlement_response(body).unwrap();
        assert_eq!(receipt.transaction_id, "tx-1");
        assert_eq!(receipt.amount.unwrap().to_string(), "7.50");
        assert_eq!(
            receipt.settled_at.unwrap().to_rfc3339(),
            "2016-05-13T10:00:00+00:00"
        );

        let numeric = r#"{"transaction":{"id":"tx-1","amount":12.25}}"#;
        let receipt = parse_settlement_response(numeric).unwrap();
        assert_eq!(receipt.amount.unwrap().to_string(), "12.25");
        assert!(receipt.settled_at.is_none());
    }

    #[test]
    fn test_translate_gateway_message() {
        let err = TransportError::Status {
            status: 422,
            body: r#"{"apiErrorResponse":{"message":"Insufficient Funds"}}"#.into(),
        };
        let translated = translate_failure(err, || "generic".into());
        assert!(matches!(translated, PaymentError::GatewayRejected { .. }));
        assert_eq!(translated.to_string(), "Insufficient Funds");
    }

    #[test]
    fn test_translate_without_structured_message() {
        let cases = [
            TransportError::Network("connection refused".into()),
            TransportError::Status {
                status: 500,
                body: "<html>oops</html>".into(),
            },
            TransportError::Status {
                status: 400,
                body: r#"{"apiErrorResponse":{"message":""}}"#.into(),
            },
        ];
        for err in cases {
            let translated = translate_failure(err, || "Cannot charge".into());
            assert!(matches!(translated, PaymentError::TransportFailure { .. }));
            assert_eq!(translated.to_string(), "Cannot charge");
        }
    }
}
