pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;

pub use controller::{CardView, Notice, SessionController};
pub use models::{Card, CardId, SessionRequest, SessionState, StatDelta, StudyMode, StudySession};
