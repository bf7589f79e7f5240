//! Per-chat conversation state and the store that owns it.

use std::sync::Arc;

use dashmap::DashMap;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{catalog::Question, domain::ChatId, scheduler::ReminderHandle};

/// Conversation phase (state machine state).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Init,
    Testing,
    Reviewing,
    AwaitingNotifyText,
    AwaitingNotifyDelay,
}

impl Phase {
    /// Entering one of these phases resets cursors and the reminder slot.
    fn resets_on_entry(self) -> bool {
        matches!(self, Phase::Init | Phase::Testing | Phase::Reviewing)
    }
}

/// The single reminder slot of a session.
#[derive(Debug, Default)]
pub enum Reminder {
    #[default]
    None,
    /// Text entered, waiting for a delay.
    Draft { text: String },
    /// Handed over to the scheduler. Kept for bookkeeping only; dropping it
    /// does not cancel the timer.
    Armed {
        text: String,
        delay_seconds: u64,
        handle: ReminderHandle,
    },
}

/// Field-less view of `Reminder` for snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderKind {
    None,
    Draft,
    Armed,
}

impl Reminder {
    pub fn kind(&self) -> ReminderKind {
        match self {
            Reminder::None => ReminderKind::None,
            Reminder::Draft { .. } => ReminderKind::Draft,
            Reminder::Armed { .. } => ReminderKind::Armed,
        }
    }

    fn armed(&self) -> Option<ArmedReminder> {
        match self {
            Reminder::Armed {
                text,
                delay_seconds,
                handle,
            } => Some(ArmedReminder {
                text: text.clone(),
                delay_seconds: *delay_seconds,
                armed_at: handle.armed_at(),
            }),
            _ => None,
        }
    }
}

/// What a session remembers about its last armed reminder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArmedReminder {
    pub text: String,
    pub delay_seconds: u64,
    pub armed_at: DateTime<Utc>,
}

/// Mutable conversation state of one chat.
#[derive(Debug)]
pub struct Session {
    chat_id: ChatId,
    phase: Phase,
    quiz_cursor: usize,
    review_queue: Vec<Question>,
    review_cursor: usize,
    reminder: Reminder,
}

impl Session {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            phase: Phase::Init,
            quiz_cursor: 0,
            review_queue: Vec::new(),
            review_cursor: 0,
            reminder: Reminder::None,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Switch phase. Entering `Init`, `Testing` or `Reviewing` zeroes both
    /// cursors and empties the reminder slot. The review queue survives so that
    /// `/repeat` can replay a finished test.
    pub fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(chat_id = %self.chat_id, from = ?self.phase, to = ?phase, "phase change");
        }
        self.phase = phase;
        if phase.resets_on_entry() {
            self.quiz_cursor = 0;
            self.review_cursor = 0;
            self.reminder = Reminder::None;
        }
    }

    pub fn quiz_cursor(&self) -> usize {
        self.quiz_cursor
    }

    /// Advance the quiz cursor and return the new index.
    pub fn advance_quiz(&mut self) -> usize {
        self.quiz_cursor += 1;
        self.quiz_cursor
    }

    pub fn review_queue(&self) -> &[Question] {
        &self.review_queue
    }

    pub fn review_cursor(&self) -> usize {
        self.review_cursor
    }

    /// Question under the review cursor, if the cursor has not run off the end.
    pub fn current_review(&self) -> Option<&Question> {
        self.review_queue.get(self.review_cursor)
    }

    /// Move the review cursor forward and return the question now under it.
    pub fn advance_review(&mut self) -> Option<&Question> {
        self.review_cursor += 1;
        self.current_review()
    }

    /// Record a wrong answer. A question already queued is not added again.
    pub fn add_missed(&mut self, question: &Question) {
        if !self.review_queue.contains(question) {
            self.review_queue.push(question.clone());
        }
    }

    /// Record a correct answer: drop the question from the review queue.
    ///
    /// Later entries shift left by one, so a cursor that pointed past the
    /// removed slot moves back by one to stay on the same logical entry.
    pub fn remove_missed(&mut self, question: &Question) -> bool {
        let Some(idx) = self.review_queue.iter().position(|q| q == question) else {
            return false;
        };
        self.review_queue.remove(idx);
        if idx < self.review_cursor {
            self.review_cursor -= 1;
        }
        true
    }

    pub fn reminder(&self) -> &Reminder {
        &self.reminder
    }

    pub fn draft_reminder(&mut self, text: String) {
        self.reminder = Reminder::Draft { text };
    }

    /// Text of the drafted reminder, if one is waiting for its delay.
    pub fn draft_text(&self) -> Option<&str> {
        match &self.reminder {
            Reminder::Draft { text } => Some(text),
            _ => None,
        }
    }

    pub fn record_armed(&mut self, text: String, delay_seconds: u64, handle: ReminderHandle) {
        self.reminder = Reminder::Armed {
            text,
            delay_seconds,
            handle,
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            quiz_cursor: self.quiz_cursor,
            review_queue: self.review_queue.iter().map(|q| q.text.clone()).collect(),
            review_cursor: self.review_cursor,
            reminder: self.reminder.kind(),
            armed: self.reminder.armed(),
        }
    }
}

/// Read-only copy of a session's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub quiz_cursor: usize,
    pub review_queue: Vec<String>,
    pub review_cursor: usize,
    pub reminder: ReminderKind,
    pub armed: Option<ArmedReminder>,
}

/// Chat id -> session map. Sessions are created on first contact and live for
/// the rest of the process.
///
/// The map is sharded, so inserting a new chat does not block lookups of other
/// chats. Each session sits behind its own async mutex, which serializes the
/// messages of one chat in arrival order while other chats proceed in parallel.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<ChatId, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, chat_id: ChatId) -> Arc<Mutex<Session>> {
        let entry = self.sessions.entry(chat_id).or_insert_with(|| {
            debug!(chat_id = %chat_id, "new session");
            Arc::new(Mutex::new(Session::new(chat_id)))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, chat_id: ChatId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(&chat_id).map(|s| Arc::clone(s.value()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, answer: &str) -> Question {
        Question::new(text, answer)
    }

    #[test]
    fn new_session_starts_idle() {
        let s = Session::new(ChatId(1));
        assert_eq!(
            s.snapshot(),
            SessionSnapshot {
                phase: Phase::Init,
                quiz_cursor: 0,
                review_queue: vec![],
                review_cursor: 0,
                reminder: ReminderKind::None,
                armed: None,
            }
        );
    }

    #[test]
    fn missed_questions_are_not_duplicated() {
        let mut s = Session::new(ChatId(1));
        s.add_missed(&q("10^2", "100"));
        s.add_missed(&q("10^2", "100"));
        s.add_missed(&q("10^2", "a different answer"));
        assert_eq!(s.review_queue().len(), 1);

        s.add_missed(&q("2+2*2", "6"));
        assert_eq!(s.snapshot().review_queue, vec!["10^2", "2+2*2"]);
    }

    #[test]
    fn removal_behind_cursor_keeps_cursor_on_next_entry() {
        let mut s = Session::new(ChatId(1));
        s.add_missed(&q("a", "1"));
        s.add_missed(&q("b", "2"));
        s.add_missed(&q("c", "3"));
        s.set_phase(Phase::Reviewing);

        assert_eq!(s.current_review().unwrap().text, "a");
        assert_eq!(s.advance_review().unwrap().text, "b");

        assert!(s.remove_missed(&q("a", "1")));
        assert_eq!(s.review_cursor(), 0);
        assert_eq!(s.current_review().unwrap().text, "b");
    }

    #[test]
    fn removal_at_or_after_cursor_leaves_cursor_alone() {
        let mut s = Session::new(ChatId(1));
        s.add_missed(&q("a", "1"));
        s.add_missed(&q("b", "2"));

        assert!(s.remove_missed(&q("a", "1")));
        assert_eq!(s.review_cursor(), 0);
        assert!(!s.remove_missed(&q("zzz", "1")));
        assert_eq!(s.current_review().unwrap().text, "b");
    }

    #[test]
    fn review_cursor_signals_exhaustion() {
        let mut s = Session::new(ChatId(1));
        s.add_missed(&q("a", "1"));
        assert!(s.current_review().is_some());
        assert!(s.advance_review().is_none());
        assert!(s.current_review().is_none());
    }

    #[test]
    fn entry_reset_keeps_review_queue() {
        let mut s = Session::new(ChatId(1));
        s.set_phase(Phase::Testing);
        s.advance_quiz();
        s.add_missed(&q("a", "1"));
        s.set_phase(Phase::AwaitingNotifyText);
        s.draft_reminder("drink water".to_string());

        // Notify phases do not reset anything.
        assert_eq!(s.quiz_cursor(), 1);
        s.set_phase(Phase::AwaitingNotifyDelay);
        assert_eq!(s.draft_text(), Some("drink water"));

        s.set_phase(Phase::Init);
        assert_eq!(s.quiz_cursor(), 0);
        assert_eq!(s.reminder().kind(), ReminderKind::None);
        assert_eq!(s.review_queue().len(), 1);
    }

    #[test]
    fn store_creates_each_session_once() {
        let store = SessionStore::new();
        assert!(store.is_empty());
        assert!(store.get(ChatId(5)).is_none());

        let a = store.get_or_create(ChatId(5));
        let b = store.get_or_create(ChatId(5));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());

        store.get_or_create(ChatId(6));
        assert_eq!(store.len(), 2);
    }
}
