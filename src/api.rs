use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::pagination::PageNumber;
use crate::session::{
    PaymentOrder, PaymentOrderRequest, PaymentReceipt, PaymentVerification, Profile, Session,
};
use crate::transcript::TranscriptionPage;

const USER_AGENT: &str = concat!("callscope/", env!("CARGO_PKG_VERSION"));

const TRANSCRIPTIONS_ENDPOINT: &str = "api/transcriptions";
const PROFILE_ENDPOINT: &str = "me";
const CREATE_ORDER_ENDPOINT: &str = "create-payment-order";
const VERIFY_PAYMENT_ENDPOINT: &str = "verify-payment";

#[derive(Clone, Debug)]
pub struct ApiClient {
    http_client: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session, timeout: Duration) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http_client,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn fetch_transcriptions(&self, page: PageNumber) -> Result<TranscriptionPage, AppError> {
        let url = self.session.endpoint(TRANSCRIPTIONS_ENDPOINT)?;
        debug!(page = page.get(), %url, "Fetching transcriptions");
        let request = self
            .http_client
            .get(url)
            .query(&[("page", page.get())]);
        let body: TranscriptionPage = self.send(request).await?;
        info!(
            page = page.get(),
            rows = body.table_data.len(),
            columns = body.headers.len(),
            "Transcriptions fetched"
        );
        Ok(body)
    }

    pub async fn fetch_profile(&self) -> Result<Profile, AppError> {
        let url = self.session.endpoint(PROFILE_ENDPOINT)?;
        self.send(self.http_client.get(url)).await
    }

    #[allow(dead_code)]
    pub async fn create_payment_order(
        &self,
        order: &PaymentOrderRequest,
    ) -> Result<PaymentOrder, AppError> {
        self.post_json(CREATE_ORDER_ENDPOINT, order).await
    }

    #[allow(dead_code)]
    pub async fn verify_payment(
        &self,
        payload: &PaymentVerification,
    ) -> Result<PaymentReceipt, AppError> {
        self.post_json(VERIFY_PAYMENT_ENDPOINT, payload).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.session.endpoint(path)?;
        self.send(self.http_client.post(url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, AppError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_status(status.as_u16(), &body));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
