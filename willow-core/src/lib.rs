pub mod batch;
pub mod catalog;
pub mod citations;
pub mod domain;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod rules;
pub mod scenario;
pub mod schema;
pub mod validation;
