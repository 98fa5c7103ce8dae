pub mod card;
pub mod session_request;
pub mod stat_delta;
pub mod study_session;

pub use card::{Card, CardId};
pub use session_request::{DEFAULT_CARD_COUNT, SessionRequest, StudyMode};
pub use stat_delta::StatDelta;
pub use study_session::{Advance, SessionState, SessionSummary, StudySession};
