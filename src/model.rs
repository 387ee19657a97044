//! Services, sites and probe results

use crate::status::Classification;
use serde::{Deserialize, Serialize};

/// A named group of sites reported as a single verdict.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(skip)]
    pub is_available: bool,
}

impl Service {
    pub fn new(name: impl Into<String>, sites: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sites,
            is_available: false,
        }
    }
}

/// Result of probing one URL, shared by every lookup of that URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// HTTP status line or normalized transport error
    pub raw_status: String,
    pub is_available: bool,
    pub attempts_made: u32,
}

/// What a probe worker reports for one site of a service.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteReport {
    /// Site exactly as configured, wildcard marker included
    pub site: String,
    /// URL actually probed
    pub probed_url: String,
    pub classification: Classification,
    pub attempts_made: u32,
}

impl SiteReport {
    pub fn is_available(&self) -> bool {
        self.classification.is_available
    }

    pub fn has_wildcard(&self) -> bool {
        crate::probe::has_wildcard(&self.site)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceVerdict {
    pub name: String,
    pub available: bool,
}

/// Final per-service verdicts in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub run_id: String,
    pub verdicts: Vec<ServiceVerdict>,
}

impl CheckReport {
    pub fn from_services(run_id: String, services: &[Service]) -> Self {
        Self {
            run_id,
            verdicts: services
                .iter()
                .map(|service| ServiceVerdict {
                    name: service.name.clone(),
                    available: service.is_available,
                })
                .collect(),
        }
    }

    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|verdict| verdict.available)
            .map(|verdict| verdict.name.as_str())
    }

    pub fn unavailable(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|verdict| !verdict.available)
            .map(|verdict| verdict.name.as_str())
    }

    pub fn all_available(&self) -> bool {
        self.verdicts.iter().all(|verdict| verdict.available)
    }
}
