// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, per-request bearer
// attachment, and error-body extraction. All endpoint groups (sensors,
// subscriptions, etc.) are implemented as inherent methods in sibling
// files to keep this module focused on transport mechanics.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AuthMode, TokenSource};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Error bodies carry a human-readable `message` field.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Raw HTTP client for the air-quality backend.
///
/// Two configurations share the same base address and JSON content type:
/// an authenticated client (bearer token pulled from a [`TokenSource`]
/// before every request) and an anonymous one used for registration and
/// login. Both return the transport outcome untouched -- a 401 surfaces
/// as [`Error::Unauthenticated`] and nothing else happens here.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    mode: AuthMode,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client that attaches the current bearer token to every request.
    pub fn authenticated(
        base_url: Url,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, Some(tokens)))
    }

    /// Create a client that never sends credentials.
    pub fn anonymous(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, None))
    }

    /// Wrap a pre-built `reqwest::Client`.
    ///
    /// `Some(tokens)` yields a bearer client, `None` an anonymous one.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        tokens: Option<Arc<dyn TokenSource>>,
    ) -> Self {
        let mode = if tokens.is_some() {
            AuthMode::Bearer
        } else {
            AuthMode::Anonymous
        };
        Self {
            http,
            base_url: normalize_base_url(base_url),
            mode,
            tokens,
        }
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Which credential flow this client uses.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments (e.g. `["sensors", id]`) to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so an id holding `/`,
    /// `?` or `#` stays a single segment. Empty and dot segments are
    /// rejected since they would address a different resource.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidPathSegment((*bad).to_owned()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidPathSegment(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Credential attachment ────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let Some(token) = self.tokens.as_ref().and_then(|t| t.bearer_token()) else {
            return Ok(builder);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        trace!("attaching bearer token");
        Ok(builder.header(AUTHORIZATION, value))
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = self.authorize(builder)?.send().await?;
        check_status(resp).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        parse_json(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        parse_json(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        parse_json(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url).json(body)).await?;
        parse_json(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("PATCH {url}");

        let resp = self.send(self.http.patch(url).json(body)).await?;
        parse_json(resp).await
    }

    pub(crate) async fn patch_no_response<B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("PATCH {url}");

        self.send(self.http.patch(url).json(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("DELETE {url}");

        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

/// Ensure the base URL ends with `/` so relative joins append rather
/// than replace the last path segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Map non-success statuses to errors, extracting `{"message": "..."}`.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    debug!(status = status.as_u16(), ?message, "request failed");

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthenticated { message });
    }

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body, keeping a preview of the raw text on failure.
async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap(), None)
    }

    #[test]
    fn url_appends_to_prefix() {
        let c = client("https://air.example.com/api");
        assert_eq!(c.base_url().as_str(), "https://air.example.com/api/");
        assert_eq!(
            c.url(&["sensors", "7"]).unwrap().as_str(),
            "https://air.example.com/api/sensors/7"
        );
    }

    #[test]
    fn url_on_bare_host() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.url(&["auth", "login"]).unwrap().as_str(),
            "http://localhost:8080/auth/login"
        );
    }

    #[test]
    fn ids_stay_in_one_segment() {
        let c = client("https://h/api");
        assert_eq!(
            c.url(&["sensors", "../users/42"]).unwrap().as_str(),
            "https://h/api/sensors/..%2Fusers%2F42"
        );
        let url = c.url(&["sensors", "a?x=1"]).unwrap();
        assert_eq!(url.path(), "/api/sensors/a%3Fx=1");
        assert_eq!(url.query(), None);
        let url = c.url(&["sensors", "a#b", "readings"]).unwrap();
        assert_eq!(url.path(), "/api/sensors/a%23b/readings");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn dot_and_empty_ids_are_rejected() {
        let c = client("https://h/api");
        for id in ["..", ".", ""] {
            assert!(matches!(
                c.url(&["sensors", id]),
                Err(Error::InvalidPathSegment(_))
            ));
        }
    }

    #[test]
    fn mode_follows_token_source() {
        assert_eq!(client("http://localhost").mode(), AuthMode::Anonymous);

        let tokens: Arc<dyn TokenSource> =
            Arc::new(crate::auth::StaticToken("t".to_string().into()));
        let c = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost").unwrap(),
            Some(tokens),
        );
        assert_eq!(c.mode(), AuthMode::Bearer);
    }
}
