// Session gateway
//
// The single HTTP entry point for the application. Holds the live
// `reqwest::Client` for the current endpoint behind an `ArcSwap` so a
// settings change can replace it without blocking readers. Endpoint
// modules (rooms, devices, ...) are implemented as inherent methods in
// `crate::api` to keep this module focused on transport mechanics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use reqwest::header::{COOKIE, HeaderMap};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::endpoint;
use crate::envelope::ApiEnvelope;
use crate::error::Error;
use crate::session::{self, CredentialStore, SessionUpdate, StoreKey};
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

/// One generation of the HTTP client, bound to a single endpoint.
#[derive(Debug)]
struct LiveClient {
    http: reqwest::Client,
    base_url: Url,
    generation: u64,
}

/// Session-authenticated HTTP gateway.
///
/// Every request reads the session token from the [`CredentialStore`] at
/// send time and attaches it as `Cookie: session=<token>`; every response
/// is scanned for a new `session` cookie, which is written back to the
/// store. Construct one per application and share it behind an `Arc`.
pub struct SessionGateway {
    live: ArcSwap<LiveClient>,
    store: Arc<dyn CredentialStore>,
    transport: TransportConfig,
    generations: AtomicU64,
    /// Serializes `reconfigure` so persisted and live endpoints never disagree.
    reconfigure_lock: Mutex<()>,
}

impl SessionGateway {
    /// Build a gateway for the endpoint currently saved in `store`.
    ///
    /// An absent or blank endpoint resolves to [`endpoint::DEFAULT_ENDPOINT`].
    /// A stored endpoint that cannot be parsed is logged and replaced by
    /// the default for dialing; the stored value itself is left as is.
    pub fn new(store: Arc<dyn CredentialStore>, transport: TransportConfig) -> Result<Self, Error> {
        let stored = store.get(StoreKey::ServerUrl);
        let base_url = match endpoint::resolve(stored.as_deref()) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "stored endpoint unusable, dialing default");
                endpoint::resolve(None)?
            }
        };

        let http = transport.build_client()?;
        debug!(%base_url, "session gateway ready");

        Ok(Self {
            live: ArcSwap::from_pointee(LiveClient {
                http,
                base_url,
                generation: 0,
            }),
            store,
            transport,
            generations: AtomicU64::new(0),
            reconfigure_lock: Mutex::new(()),
        })
    }

    /// The credential store this gateway reads and writes.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// The normalized base URL new requests are sent to.
    pub fn base_url(&self) -> Url {
        self.live.load().base_url.clone()
    }

    /// The endpoint as the user entered it (falls back to the store default).
    pub fn stored_endpoint(&self) -> String {
        self.store
            .get(StoreKey::ServerUrl)
            .unwrap_or_else(|| endpoint::DEFAULT_ENDPOINT.to_owned())
    }

    /// How many times the live client has been replaced.
    pub fn generation(&self) -> u64 {
        self.live.load().generation
    }

    /// Whether a session token is currently stored.
    pub fn has_session(&self) -> bool {
        self.store.session_token().is_some()
    }

    /// Point the gateway at a new endpoint.
    ///
    /// Validates the input, persists it exactly as entered, then swaps in a
    /// client bound to the normalized form. Requests already in flight
    /// finish against the old endpoint; requests started after this returns
    /// use the new one.
    pub fn reconfigure(&self, new_endpoint: &str) -> Result<Url, Error> {
        let base_url = endpoint::parse_base(new_endpoint)?;
        let http = self.transport.build_client()?;

        let _guard = self
            .reconfigure_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        self.store.set(StoreKey::ServerUrl, new_endpoint.trim());

        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        self.live.store(Arc::new(LiveClient {
            http,
            base_url: base_url.clone(),
            generation,
        }));

        debug!(%base_url, generation, "gateway reconfigured");
        Ok(base_url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start a request against the live client.
    ///
    /// The client snapshot is taken here; the builder keeps it alive, so a
    /// concurrent `reconfigure` cannot redirect this request.
    fn request(&self, method: Method, segments: &[&str]) -> Result<reqwest::RequestBuilder, Error> {
        let live = self.live.load();
        let mut url = live.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidEndpoint {
                endpoint: live.base_url.to_string(),
                reason: "endpoint cannot be a base URL".into(),
            })?
            .pop_if_empty()
            .extend(segments);

        debug!(%method, %url, generation = live.generation, "request");

        let mut builder = live.http.request(method, url);
        if let Some(value) = self
            .store
            .session_token()
            .as_ref()
            .and_then(session::cookie_header)
        {
            builder = builder.header(COOKIE, value);
        }
        Ok(builder)
    }

    /// Send, capture the session cookie, and map non-2xx to `Error::Http`.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<String, Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        trace!(%status, url = %resp.url(), "response");

        self.capture_session(resp.headers());

        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(http_error(status, &body))
        }
    }

    fn capture_session(&self, headers: &HeaderMap) {
        match session::session_from_headers(headers) {
            Some(SessionUpdate::Set(token)) => {
                debug!("session cookie captured");
                self.store.set(StoreKey::SessionToken, &token);
            }
            Some(SessionUpdate::Cleared) => {
                debug!("session cookie cleared by server");
                self.store.clear_session();
            }
            None => {}
        }
    }

    /// GET and decode the body as `T`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let body = self.execute(self.request(Method::GET, segments)?).await?;
        decode(&body)
    }

    /// POST a JSON body and decode the response as `T`.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let builder = self.request(Method::POST, segments)?.json(body);
        decode(&self.execute(builder).await?)
    }

    /// POST without a body and decode the response as `T`.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let body = self.execute(self.request(Method::POST, segments)?).await?;
        decode(&body)
    }

    /// PUT a JSON body and decode the response as `T`.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let builder = self.request(Method::PUT, segments)?.json(body);
        decode(&self.execute(builder).await?)
    }

    /// DELETE and decode the response as `T`.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let body = self.execute(self.request(Method::DELETE, segments)?).await?;
        decode(&body)
    }

    /// GET, only checking the HTTP status. For endpoints that answer with HTML.
    pub(crate) async fn get_status_only(&self, segments: &[&str]) -> Result<(), Error> {
        self.execute(self.request(Method::GET, segments)?)
            .await
            .map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Non-2xx responses usually still carry an envelope with a message.
fn http_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|env| env.message)
        .unwrap_or_else(|| {
            let p = preview(body);
            if p.trim().is_empty() {
                status.to_string()
            } else {
                p
            }
        });
    Error::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    fn gateway(endpoint: Option<&str>) -> SessionGateway {
        let store = match endpoint {
            Some(e) => MemoryStore::with_endpoint(e),
            None => MemoryStore::new(),
        };
        SessionGateway::new(Arc::new(store), TransportConfig::default()).unwrap()
    }

    #[test]
    fn blank_endpoint_dials_default() {
        let gw = gateway(Some(""));
        assert_eq!(gw.base_url().as_str(), endpoint::DEFAULT_ENDPOINT);
    }

    #[test]
    fn stored_form_is_preserved_dialed_form_normalized() {
        let gw = gateway(Some("10.0.0.7:5000"));
        assert_eq!(gw.base_url().as_str(), "http://10.0.0.7:5000/");
        assert_eq!(gw.stored_endpoint(), "10.0.0.7:5000");
    }

    #[test]
    fn reconfigure_rejects_malformed_without_touching_state() {
        let gw = gateway(Some("10.0.0.7:5000"));
        assert!(gw.reconfigure("   ").is_err());
        assert_eq!(gw.generation(), 0);
        assert_eq!(gw.stored_endpoint(), "10.0.0.7:5000");
    }

    #[test]
    fn reconfigure_swaps_and_persists() {
        let gw = gateway(None);
        let url = gw.reconfigure("https://home.example:8443").unwrap();
        assert_eq!(url.as_str(), "https://home.example:8443/");
        assert_eq!(gw.base_url(), url);
        assert_eq!(gw.generation(), 1);
        assert_eq!(gw.stored_endpoint(), "https://home.example:8443");
    }

    #[test]
    fn request_path_segments_are_escaped() {
        let gw = gateway(Some("http://h:5000/base/"));
        let req = gw
            .request(Method::DELETE, &["api", "rooms", "Salon/duży"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.url().path(), "/base/api/rooms/Salon%2Fdu%C5%BCy");
    }

    #[test]
    fn http_error_prefers_envelope_message() {
        let err = http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"status":"error","message":"Invalid username or password"}"#,
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "HTTP 401: Invalid username or password");

        let err = http_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(err.is_server_error());
    }
}
