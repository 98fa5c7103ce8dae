//! Walk through one fetched batch of cards.
//!
//! `SessionState` is either the selection screen or an active
//! `StudySession`; flip state and position only exist inside the latter.

use super::{Card, SessionRequest};
use crate::error::SessionError;

pub const SHOW_MEANING: &str = "Mostrar significado";
pub const HIDE_MEANING: &str = "Ocultar significado";

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Selection,
    Studying(StudySession),
}

impl SessionState {
    pub fn session(&self) -> Option<&StudySession> {
        match self {
            SessionState::Studying(session) => Some(session),
            SessionState::Selection => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut StudySession> {
        match self {
            SessionState::Studying(session) => Some(session),
            SessionState::Selection => None,
        }
    }
}

/// Result of answering the current card.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    Finished(SessionSummary),
}

/// Holds the cards in server order. Never empty; the index always points at
/// a card.
#[derive(Debug)]
pub struct StudySession {
    pub request: SessionRequest,
    cards: Vec<Card>,
    current_index: usize,
    show_translation: bool,
    // Latest answer per card, so re-answering after going back replaces it.
    answers: Vec<Option<bool>>,
}

impl StudySession {
    pub fn new(request: SessionRequest, cards: Vec<Card>) -> Result<Self, SessionError> {
        if cards.is_empty() {
            return Err(SessionError::EmptyBatch);
        }

        let answers = vec![None; cards.len()];
        Ok(Self {
            request,
            cards,
            current_index: 0,
            show_translation: false,
            answers,
        })
    }

    pub fn current_card(&self) -> &Card {
        &self.cards[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_flipped(&self) -> bool {
        self.show_translation
    }

    pub fn toggle_translation(&mut self) {
        self.show_translation = !self.show_translation;
    }

    pub fn flip_label(&self) -> &'static str {
        if self.show_translation {
            HIDE_MEANING
        } else {
            SHOW_MEANING
        }
    }

    pub fn counter_text(&self) -> String {
        format!("Tarjeta {} de {}", self.current_index + 1, self.cards.len())
    }

    /// Steps back one card. Returns false when already on the first card.
    pub fn previous(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.show_translation = false;
        true
    }

    /// Records the answer for the current card and moves on.
    pub fn record_answer(&mut self, knew: bool) -> Advance {
        self.answers[self.current_index] = Some(knew);

        if self.current_index + 1 >= self.cards.len() {
            return Advance::Finished(self.summary());
        }

        self.current_index += 1;
        self.show_translation = false;
        Advance::Next
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total: self.cards.len(),
            correct: self.answers.iter().filter(|a| **a == Some(true)).count(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: usize,
    pub correct: usize,
}

impl SessionSummary {
    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Has repasado {} tarjetas, con {} aciertos ({:.1}% de media).",
            self.total,
            self.correct,
            self.accuracy_percent()
        )
    }
}
