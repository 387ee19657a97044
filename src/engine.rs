//! Check engine orchestrating service checks for a run

use crate::cache::ResultCache;
use crate::checker::ServiceChecker;
use crate::config::CheckConfig;
use crate::errors::Result;
use crate::model::{CheckReport, Service};
use crate::output::EventSender;
use crate::probe::{HttpProber, ProbeWorker, Prober};
use crate::retry::RetryPolicy;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, instrument};
use uuid::Uuid;

/// Runs availability checks for a list of services.
///
/// Services are checked one after another so that a service's lines are
/// never mixed with another's; the sites of one service are probed
/// concurrently, bounded by `max_concurrent_probes` across the run.
pub struct CheckEngine {
    config: CheckConfig,
    prober: Arc<dyn Prober>,
    cache: Arc<ResultCache>,
    limiter: Arc<Semaphore>,
}

impl CheckEngine {
    /// Create an engine probing over HTTP
    pub fn new(config: CheckConfig) -> Result<Self> {
        let prober = HttpProber::new(&config)?;
        Self::with_prober(config, Arc::new(prober))
    }

    /// Create an engine with a custom prober
    pub fn with_prober(config: CheckConfig, prober: Arc<dyn Prober>) -> Result<Self> {
        config.validate()?;

        let limiter = Arc::new(Semaphore::new(config.max_concurrent_probes));

        Ok(Self {
            config,
            prober,
            cache: Arc::new(ResultCache::new()),
            limiter,
        })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Outcomes collected so far in this engine's lifetime
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Check every service in order, annotating each with its verdict.
    #[instrument(skip_all, fields(run_id))]
    pub async fn run(&self, services: &mut [Service], events: EventSender) -> CheckReport {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        info!(
            "Starting availability run {} for {} services (timeout: {:?}, retries: {})",
            run_id,
            services.len(),
            self.config.timeout,
            self.config.max_retries
        );

        let worker = ProbeWorker::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.prober),
            RetryPolicy::new(self.config.max_retries),
            Arc::clone(&self.limiter),
            events.clone(),
            self.config.quiet,
        );
        let checker = ServiceChecker::new(worker, events);

        for service in services.iter_mut() {
            checker.check(service).await;
        }

        let report = CheckReport::from_services(run_id, services);

        info!(
            "Availability run {} finished: {} available, {} unavailable, {} distinct URLs probed",
            report.run_id,
            report.available().count(),
            report.unavailable().count(),
            self.cache.len().await
        );

        report
    }
}
