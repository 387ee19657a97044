//! Per-service fan-out over its sites

use crate::model::Service;
use crate::output::{CheckEvent, EventSender};
use crate::probe::ProbeWorker;
use futures::future::join_all;
use tracing::{error, info};

/// Checks every site of a service concurrently and joins the verdicts.
pub struct ServiceChecker {
    worker: ProbeWorker,
    events: EventSender,
}

impl ServiceChecker {
    pub fn new(worker: ProbeWorker, events: EventSender) -> Self {
        Self { worker, events }
    }

    /// Check `service`, store its verdict on it and return the verdict.
    ///
    /// A service is available only if all of its sites are; one with no
    /// sites is available.
    pub async fn check(&self, service: &mut Service) -> bool {
        self.events
            .emit(CheckEvent::ServiceStarted { name: service.name.clone() })
            .await;

        let handles = service.sites.iter().cloned().map(|site| {
            let worker = self.worker.clone();
            tokio::spawn(async move { worker.check_site(&site).await })
        });

        let mut is_available = true;
        for (site, joined) in service.sites.iter().zip(join_all(handles).await) {
            match joined {
                Ok(report) => is_available &= report.is_available(),
                Err(e) => {
                    error!("Probe worker for {} in service {} failed: {}", site, service.name, e);
                    is_available = false;
                }
            }
        }

        info!(
            service = %service.name,
            sites = service.sites.len(),
            available = is_available,
            "Service check complete"
        );

        self.events
            .emit(CheckEvent::ServiceFinished {
                name: service.name.clone(),
                available: is_available,
            })
            .await;

        service.is_available = is_available;
        is_available
    }
}
