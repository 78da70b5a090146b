use std::sync::Arc;
use std::time::Duration;

use auction_core::BidOutcome;
use client_logging::client_warn;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{map_reqwest_error, ApiError, LoginUrlError, UploadError};
use crate::query::{query_string, SearchQuery};
use crate::sse::{run_bid_stream, BidSink, BidStream};
use crate::types::{
    AuctionDraft, ItemDetail, SearchResult, SsoProvider, UnlinkOutcome, UserInfo, UsernameOutcome,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Typed client for the auction backend.
///
/// Explicitly constructed and passed around; there is no module-level
/// singleton. Redirects are never followed — the `Location` headers of the
/// auth and creation endpoints are the payload.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    stream_http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_settings(base_url, ClientSettings::default())
    }

    pub fn with_settings(base_url: &str, settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        // The live stream outlives any sane request timeout, so it gets its
        // own client with only the connect phase bounded.
        let stream_http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            base,
            http,
            stream_http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    // region: --- Items & bids

    /// Searches auction items. A 404 means "no results", not a failure.
    pub async fn search_items(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
        let mut url = self.endpoint("/auction/items");
        let query_string = query_string(query);
        if !query_string.is_empty() {
            url.push('?');
            url.push_str(&query_string);
        }
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        match response.status().as_u16() {
            200 => response
                .json::<SearchResult>()
                .await
                .map_err(|err| ApiError::Decode(err.to_string())),
            404 => Ok(SearchResult::default()),
            status => Err(ApiError::Status(status)),
        }
    }

    pub async fn item_detail(&self, item_id: &str) -> Result<ItemDetail, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("/auction/item/{item_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match response.status().as_u16() {
            200 => response
                .json::<ItemDetail>()
                .await
                .map_err(|err| ApiError::Decode(err.to_string())),
            status => Err(ApiError::Status(status)),
        }
    }

    /// Submits a bid. Every documented status maps to a [`BidOutcome`];
    /// only transport failures are errors.
    pub async fn place_bid(&self, item_id: &str, amount: u32) -> Result<BidOutcome, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&format!("/auction/item/{item_id}/bids")))
            .json(&serde_json::json!({ "bid": amount }))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Ok(match response.status().as_u16() {
            201 => BidOutcome::Accepted,
            200 => BidOutcome::AlreadyHighest,
            400 => BidOutcome::TooLow,
            401 => BidOutcome::Unauthenticated,
            403 => BidOutcome::NotStarted,
            404 => BidOutcome::NotFound,
            410 => BidOutcome::Ended,
            status => {
                client_warn!("unexpected bid status {status}");
                BidOutcome::Other
            }
        })
    }

    /// Creates an auction; the new item id arrives in `Location`.
    pub async fn create_auction(&self, draft: &AuctionDraft) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auction/item"))
            .json(draft)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if response.status().as_u16() != 201 {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        location_header(&response).ok_or(ApiError::MissingLocation)
    }

    /// Opens the live bid stream for an item. The returned handle owns the
    /// reader task; dropping or closing it cancels the stream.
    pub fn open_bid_stream(&self, item_id: &str, sink: Arc<dyn BidSink>) -> BidStream {
        let url = self.endpoint(&format!("/auction/item/{item_id}/events"));
        let cancel = CancellationToken::new();
        tokio::spawn(run_bid_stream(
            self.stream_http.clone(),
            url,
            sink,
            cancel.clone(),
        ));
        BidStream::new(cancel)
    }

    // endregion: --- Items & bids

    // region: --- Images

    /// Uploads raw file bytes; the stored image URL arrives in `Location`.
    pub async fn upload_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let response = self
            .http
            .post(self.endpoint("/image"))
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|err| UploadError::Api(map_reqwest_error(err)))?;
        match response.status().as_u16() {
            201 => location_header(&response).ok_or(UploadError::Api(ApiError::MissingLocation)),
            400 => Err(UploadError::InvalidFile),
            401 => Err(UploadError::Unauthenticated),
            429 => Err(UploadError::RateLimited),
            status => Err(UploadError::Api(ApiError::Status(status))),
        }
    }

    // endregion: --- Images

    // region: --- Auth & user

    /// Authorization URL for the full-page login flow.
    pub async fn login_url(&self, redirect_url: &str) -> Result<String, LoginUrlError> {
        let response = self
            .http
            .get(self.endpoint("/auth/login"))
            .query(&[("redirect_url", redirect_url)])
            .send()
            .await
            .map_err(|err| LoginUrlError::Api(map_reqwest_error(err)))?;
        redirect_location(&response)
    }

    /// Authorization URL for the popup login flow of one provider; the
    /// callback is a same-origin route keyed by the provider name.
    pub async fn sso_login_url(
        &self,
        provider: SsoProvider,
        redirect_url: &str,
    ) -> Result<String, LoginUrlError> {
        let response = self
            .http
            .get(self.endpoint(&format!("/auth/sso/{provider}/login")))
            .query(&[("redirectUrl", redirect_url)])
            .send()
            .await
            .map_err(|err| LoginUrlError::Api(map_reqwest_error(err)))?;
        if response.status().as_u16() == 404 {
            return Err(LoginUrlError::UnsupportedProvider);
        }
        redirect_location(&response)
    }

    /// Completes the full-page login flow; returns the pre-login URL the
    /// backend hands back in `Location`, when it does.
    pub async fn complete_callback(
        &self,
        code: &str,
        state: &str,
        redirect_url: &str,
    ) -> Result<Option<String>, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/auth/callback"))
            .query(&[
                ("code", code),
                ("state", state),
                ("redirect_url", redirect_url),
            ])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(location_header(&response))
    }

    /// Popup-side code/state exchange for a login. The HTTP status is the
    /// verdict; only transport failures are errors.
    pub async fn sso_callback(
        &self,
        provider: SsoProvider,
        code: &str,
        state: &str,
    ) -> Result<u16, ApiError> {
        self.sso_exchange(provider, "callback", code, state).await
    }

    /// Popup-side code/state exchange for linking another provider to the
    /// current account.
    pub async fn sso_link(
        &self,
        provider: SsoProvider,
        code: &str,
        state: &str,
    ) -> Result<u16, ApiError> {
        self.sso_exchange(provider, "link", code, state).await
    }

    async fn sso_exchange(
        &self,
        provider: SsoProvider,
        route: &str,
        code: &str,
        state: &str,
    ) -> Result<u16, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&format!("/auth/sso/{provider}/{route}")))
            .json(&serde_json::json!({ "code": code, "state": state }))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Ok(response.status().as_u16())
    }

    pub async fn unlink_sso(&self, provider: SsoProvider) -> Result<UnlinkOutcome, ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/auth/sso/{provider}/link")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match response.status().as_u16() {
            200 | 204 => Ok(UnlinkOutcome::Unlinked),
            409 => Ok(UnlinkOutcome::LastProvider),
            404 => Ok(UnlinkOutcome::Unsupported),
            status => Err(ApiError::Status(status)),
        }
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .get(self.endpoint("/auth/logout"))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(ApiError::Status(status.as_u16()))
        }
    }

    pub async fn user_info(&self) -> Result<UserInfo, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/user/info"))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match response.status().as_u16() {
            200 => response
                .json::<UserInfo>()
                .await
                .map_err(|err| ApiError::Decode(err.to_string())),
            status => Err(ApiError::Status(status)),
        }
    }

    pub async fn update_username(&self, username: &str) -> Result<UsernameOutcome, ApiError> {
        let response = self
            .http
            .patch(self.endpoint("/user/info"))
            .json(&serde_json::json!({ "username": username }))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match response.status().as_u16() {
            200 | 204 => Ok(UsernameOutcome::Updated),
            400 => Ok(UsernameOutcome::Invalid),
            status => Err(ApiError::Status(status)),
        }
    }

    // endregion: --- Auth & user
}

fn location_header(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn redirect_location(response: &reqwest::Response) -> Result<String, LoginUrlError> {
    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return Err(LoginUrlError::Api(ApiError::Status(status.as_u16())));
    }
    location_header(response).ok_or(LoginUrlError::Api(ApiError::MissingLocation))
}
