pub mod client;
pub mod reporter;

pub use client::{ApiClient, CardSource, StatSink};
pub use reporter::StatReporter;
