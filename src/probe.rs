//! Liveness probes for single sites

use crate::cache::ResultCache;
use crate::config::CheckConfig;
use crate::errors::{CheckerError, Result};
use crate::model::SiteReport;
use crate::output::{CheckEvent, EventSender};
use crate::retry::RetryPolicy;
use crate::status::{TIMEOUT_TEXT, classify, normalize_transport_error};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::error::Error as _;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

const WILDCARD_MARKER: &str = "*.";

/// One liveness request against one URL.
///
/// Implementations never fail: the returned string is either an HTTP status
/// line (`"200 OK"`) or a description of the transport error.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> String;
}

/// HEAD-request prober backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &CheckConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(CheckerError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> String {
        match self.client.head(url).send().await {
            Ok(response) => status_line(response.status()),
            Err(err) => describe_transport_error(err),
        }
    }
}

/// Format a status code the way servers send it on the status line.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Flatten a reqwest error and its causes into one normalized message.
///
/// The URL is dropped before matching so that words in a host or path never
/// decide the reported text.
pub fn describe_transport_error(err: reqwest::Error) -> String {
    if err.is_timeout() {
        return TIMEOUT_TEXT.to_string();
    }

    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        if is_timed_out(cause) {
            return TIMEOUT_TEXT.to_string();
        }
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    normalize_transport_error(&message)
}

fn is_timed_out(cause: &(dyn std::error::Error + 'static)) -> bool {
    cause
        .downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::TimedOut)
}

pub fn has_wildcard(site: &str) -> bool {
    site.contains(WILDCARD_MARKER)
}

/// Drop wildcard markers, leaving the bare domain.
pub fn strip_wildcard(site: &str) -> String {
    site.replace(WILDCARD_MARKER, "")
}

/// URL that is actually probed for `site`: wildcard removed, `http://` added
/// when no scheme is present.
pub fn normalize_url(site: &str) -> String {
    let bare = strip_wildcard(site.trim());

    if bare.contains("://") {
        bare
    } else {
        format!("http://{}", bare)
    }
}

/// Resolves the availability of one site through the shared cache.
#[derive(Clone)]
pub struct ProbeWorker {
    cache: Arc<ResultCache>,
    prober: Arc<dyn Prober>,
    retry: RetryPolicy,
    limiter: Arc<Semaphore>,
    events: EventSender,
    quiet: bool,
}

impl ProbeWorker {
    pub fn new(
        cache: Arc<ResultCache>,
        prober: Arc<dyn Prober>,
        retry: RetryPolicy,
        limiter: Arc<Semaphore>,
        events: EventSender,
        quiet: bool,
    ) -> Self {
        Self {
            cache,
            prober,
            retry,
            limiter,
            events,
            quiet,
        }
    }

    /// Probe `site` (or reuse a cached outcome), emit its progress line and
    /// return the report.
    #[instrument(skip(self))]
    pub async fn check_site(&self, site: &str) -> SiteReport {
        let url = normalize_url(site);
        let target = url.as_str();
        let prober = &self.prober;
        let limiter = &self.limiter;

        let outcome = self
            .cache
            .get_or_probe(target, || {
                self.retry.run(target, || async move {
                    // The limiter is owned by the engine and never closed.
                    let _permit = limiter.acquire().await.ok();
                    prober.probe(target).await
                })
            })
            .await;

        let report = SiteReport {
            site: site.to_string(),
            probed_url: url,
            classification: classify(&outcome.raw_status),
            attempts_made: outcome.attempts_made,
        };

        if !self.quiet || !report.is_available() {
            self.events.emit(CheckEvent::SiteChecked(report.clone())).await;
        } else {
            debug!("Suppressing available site {} in quiet mode", site);
        }

        report
    }
}
