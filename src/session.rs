use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    base_url: Url,
    token: Option<String>,
}

impl Session {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, AppError> {
        let trimmed = base_url.trim();
        // A trailing slash keeps any path prefix when joining endpoints.
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(&normalized)?;
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(Self { base_url, token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Account state shown in the header. `minutes` is the remaining
/// transcription balance.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub minutes: i64,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.email.as_str(),
        }
    }

    #[allow(dead_code)]
    pub fn apply_receipt(&mut self, receipt: &PaymentReceipt) {
        self.minutes = receipt.new_minutes;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentOrderRequest {
    /// Smallest currency unit (paise, cents).
    pub amount: u64,
    pub currency: String,
}

impl PaymentOrderRequest {
    #[allow(dead_code)]
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentVerification {
    #[serde(rename = "razorpay_order_id")]
    pub order_id: String,
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub signature: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentReceipt {
    #[serde(default)]
    pub message: String,
    pub new_minutes: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let session = Session::new("https://example.com/backend", Some("abc".into())).unwrap();
        assert_eq!(
            session.endpoint("/api/transcriptions").unwrap().as_str(),
            "https://example.com/backend/api/transcriptions"
        );
        assert_eq!(session.token(), Some("abc"));
    }

    #[test]
    fn blank_token_is_unauthenticated() {
        let session = Session::new("http://localhost:8000/", Some("   ".into())).unwrap();
        assert!(!session.is_authenticated());
        assert!(Session::new("not a url", None).is_err());
    }

    #[test]
    fn verification_uses_gateway_field_names() {
        let payload = PaymentVerification {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: "sig".into(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": "sig"
            })
        );
    }

    #[test]
    fn receipt_refreshes_minutes_balance() {
        let mut profile: Profile = serde_json::from_value(json!({
            "id": 4,
            "email": "rep@example.com",
            "name": "",
            "minutes": 120
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "rep@example.com");
        let receipt: PaymentReceipt = serde_json::from_value(json!({
            "message": "Payment verified and Minutes updated",
            "new_minutes": 1120
        }))
        .unwrap();
        profile.apply_receipt(&receipt);
        assert_eq!(profile.minutes, 1120);
    }

    #[test]
    fn order_deserializes_backend_shape() {
        let order: PaymentOrder = serde_json::from_value(json!({
            "order_id": "order_9",
            "amount": 90000,
            "currency": "INR",
            "user_email": "rep@example.com"
        }))
        .unwrap();
        assert_eq!(order.amount, 90000);
        assert_eq!(
            serde_json::to_value(PaymentOrderRequest::new(90000, "INR")).unwrap(),
            json!({ "amount": 90000, "currency": "INR" })
        );
    }
}
