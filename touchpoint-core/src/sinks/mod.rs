//! Propagation sinks: where captured attribution flows
//!
//! Three sinks mirror the record outward: hidden form fields, decorated
//! embed URLs, and analytics events. Forms and embeds mutate the page
//! models in place; analytics goes through a transport trait.

pub mod analytics;
pub mod embeds;
pub mod forms;

pub use analytics::{AnalyticsEvent, AnalyticsSink, EventContext, HttpSink, MockSink};
