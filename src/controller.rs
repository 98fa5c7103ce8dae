//! Session controller: the only owner of the card walk.
//!
//! Every user action on the study screen goes through here. Stat deltas are
//! handed to the `StatSink` as a side effect of showing and answering cards.

use crate::api::StatSink;
use crate::error::SessionError;
use crate::models::{
    Advance, Card, SessionRequest, SessionState, SessionSummary, StatDelta, StudySession,
};

/// Message the UI has to show the user after an action.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    FirstCard,
    SessionEnded(SessionSummary),
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::FirstCard => "Información",
            Notice::SessionEnded(_) => "Fin de la sesión",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::FirstCard => "Esta es la primera tarjeta".to_string(),
            Notice::SessionEnded(summary) => summary.message(),
        }
    }
}

/// Everything the study screen renders for the current card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub primary: String,
    pub reading: Option<String>,
    pub translation: Option<String>,
    pub flip_label: &'static str,
    pub counter: String,
}

pub struct SessionController<S: StatSink> {
    state: SessionState,
    stats: S,
}

impl<S: StatSink> SessionController<S> {
    pub fn new(stats: S) -> Self {
        Self {
            state: SessionState::Selection,
            stats,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_studying(&self) -> bool {
        matches!(self.state, SessionState::Studying(_))
    }

    /// Begins a session over a freshly fetched batch, replacing any session
    /// in progress, and shows the first card. An empty batch leaves the
    /// state untouched.
    pub fn start(&mut self, request: SessionRequest, cards: Vec<Card>) -> Result<(), SessionError> {
        let requested = request.count;
        let session = StudySession::new(request, cards)?;
        log::info!(
            "starting session: category={} mode={} requested={} received={}",
            session.request.category,
            session.request.mode,
            requested,
            session.total_count()
        );

        self.state = SessionState::Studying(session);
        self.display_current();
        Ok(())
    }

    pub fn view(&self) -> Option<CardView> {
        let session = self.state.session()?;
        let card = session.current_card();

        Some(CardView {
            primary: card.primary_text().to_string(),
            reading: card.reading().map(str::to_string),
            translation: session.is_flipped().then(|| card.translation_text()),
            flip_label: session.flip_label(),
            counter: session.counter_text(),
        })
    }

    pub fn go_back(&mut self) -> Result<Option<Notice>, SessionError> {
        let session = self.state.session_mut().ok_or(SessionError::NotStudying)?;
        if !session.previous() {
            return Ok(Some(Notice::FirstCard));
        }

        self.display_current();
        Ok(None)
    }

    pub fn toggle_flip(&mut self) -> Result<(), SessionError> {
        let session = self.state.session_mut().ok_or(SessionError::NotStudying)?;
        session.toggle_translation();
        Ok(())
    }

    /// Records the user's answer, reports a correct answer for tracked
    /// cards, and moves on. Answering the last card ends the session.
    pub fn answer(&mut self, knew: bool) -> Result<Option<Notice>, SessionError> {
        let session = self.state.session_mut().ok_or(SessionError::NotStudying)?;

        if knew {
            if let Some(id) = session.current_card().tracked_id() {
                self.stats.report(StatDelta::correct(id.clone()));
            }
        }

        match session.record_answer(knew) {
            Advance::Next => {
                self.display_current();
                Ok(None)
            }
            Advance::Finished(summary) => {
                log::info!(
                    "session finished: {} of {} correct",
                    summary.correct,
                    summary.total
                );
                self.exit();
                Ok(Some(Notice::SessionEnded(summary)))
            }
        }
    }

    /// Drops the session and returns to selection. Stats already reported
    /// stay reported.
    pub fn exit(&mut self) {
        self.state = SessionState::Selection;
    }

    /// Called whenever the card on screen changes.
    fn display_current(&mut self) {
        if let Some(session) = self.state.session() {
            if let Some(id) = session.current_card().tracked_id() {
                self.stats.report(StatDelta::shown(id.clone()));
            }
        }
    }
}
