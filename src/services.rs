pub mod rate_service;

pub use rate_service::{GroupSummary, RateService, ServiceError, SiteOutcome};
