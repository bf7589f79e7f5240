//! Conversation dispatcher: routes `(chat, text)` pairs to command handling or
//! phase-specific free-text handling.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    catalog::{Question, QuizCatalog},
    domain::ChatId,
    errors::Error,
    messaging::port::MessagingPort,
    scheduler::{ReminderRequest, ReminderScheduler},
    session::{Phase, Session, SessionSnapshot, SessionStore},
    texts, Result,
};

/// Bot command vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Test,
    Stop,
    Repeat,
    Notify,
}

impl Command {
    /// Recognize a whole message as a command.
    ///
    /// The match is exact and case-sensitive. Telegram may send `/cmd@botname`;
    /// the suffix is ignored. Anything else is free text.
    pub fn parse(text: &str) -> Option<Self> {
        let name = text.strip_prefix('/')?;
        let name = match name.split_once('@') {
            Some((name, bot)) if !bot.is_empty() && !bot.contains(char::is_whitespace) => name,
            Some(_) => return None,
            None => name,
        };

        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "test" => Some(Command::Test),
            "stop" => Some(Command::Stop),
            "repeat" => Some(Command::Repeat),
            "notify" => Some(Command::Notify),
            _ => None,
        }
    }
}

/// Result of reading a reminder delay typed by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayInput {
    Seconds(u64),
    /// Not an integer; the user is asked again.
    Malformed,
}

/// Parse a delay in seconds. A negative number is an `InvalidDelay` error,
/// which the dispatcher does not recover from.
pub fn parse_delay(text: &str) -> Result<DelayInput> {
    let Ok(seconds) = text.parse::<i64>() else {
        return Ok(DelayInput::Malformed);
    };
    u64::try_from(seconds)
        .map(DelayInput::Seconds)
        .map_err(|_| Error::InvalidDelay { seconds })
}

/// The quiz bot: session store + catalog + outbound port + reminder scheduler.
pub struct QuizBot {
    catalog: QuizCatalog,
    help_text: String,
    sessions: SessionStore,
    messenger: Arc<dyn MessagingPort>,
    scheduler: ReminderScheduler,
}

impl QuizBot {
    pub fn new(
        catalog: QuizCatalog,
        help_text: impl Into<String>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            catalog,
            help_text: help_text.into(),
            sessions: SessionStore::new(),
            scheduler: ReminderScheduler::new(messenger.clone()),
            messenger,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process one inbound message.
    ///
    /// Messages of the same chat are handled one at a time, in the order they
    /// acquire the session lock. The only error returned is
    /// `Error::InvalidDelay`; everything else is answered in the chat.
    pub async fn handle(&self, chat_id: ChatId, text: &str) -> Result<()> {
        let session = self.sessions.get_or_create(chat_id);
        let mut session = session.lock().await;

        match Command::parse(text) {
            Some(cmd) => self.on_command(&mut session, cmd).await,
            None => self.on_free_text(&mut session, text).await,
        }
    }

    pub async fn snapshot(&self, chat_id: ChatId) -> Option<SessionSnapshot> {
        let session = self.sessions.get(chat_id)?;
        let snapshot = session.lock().await.snapshot();
        Some(snapshot)
    }

    async fn say(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text).await {
            warn!(chat_id = %chat_id, "failed to send reply: {e}");
        }
    }

    async fn on_command(&self, s: &mut Session, cmd: Command) -> Result<()> {
        let chat = s.chat_id();
        match cmd {
            Command::Start => {
                self.say(chat, texts::GREETING).await;
                s.set_phase(Phase::Init);
            }
            Command::Help => self.say(chat, &self.help_text).await,
            Command::Test => {
                s.set_phase(Phase::Testing);
                match self.catalog.get(s.quiz_cursor()) {
                    Some(q) => self.say(chat, &q.text).await,
                    None => self.stop(s).await,
                }
            }
            Command::Stop => self.stop(s).await,
            Command::Repeat => {
                if s.current_review().is_none() {
                    self.say(chat, texts::NOTHING_TO_REVIEW).await;
                    return Ok(());
                }
                // Entering Reviewing rewinds the cursor, so review restarts
                // from the first remaining question.
                s.set_phase(Phase::Reviewing);
                if let Some(q) = s.current_review().cloned() {
                    self.say(chat, &q.text).await;
                }
            }
            Command::Notify => {
                s.set_phase(Phase::AwaitingNotifyText);
                self.say(chat, texts::ENTER_REMINDER_TEXT).await;
            }
        }
        Ok(())
    }

    async fn on_free_text(&self, s: &mut Session, text: &str) -> Result<()> {
        let chat = s.chat_id();
        match s.phase() {
            Phase::Testing => self.answer_quiz(s, text).await,
            Phase::Reviewing => self.answer_review(s, text).await,
            Phase::AwaitingNotifyText => {
                s.draft_reminder(text.to_string());
                self.say(chat, texts::ENTER_REMINDER_DELAY).await;
                s.set_phase(Phase::AwaitingNotifyDelay);
            }
            Phase::AwaitingNotifyDelay => return self.arm_reminder(s, text).await,
            Phase::Init => self.say(chat, texts::UNKNOWN_COMMAND).await,
        }
        Ok(())
    }

    async fn stop(&self, s: &mut Session) {
        if matches!(s.phase(), Phase::Testing | Phase::Reviewing) {
            self.say(s.chat_id(), texts::TEST_FINISHED).await;
            s.set_phase(Phase::Init);
        } else {
            self.say(s.chat_id(), texts::NOT_TESTING).await;
        }
    }

    async fn answer_quiz(&self, s: &mut Session, answer: &str) {
        let Some(question) = self.catalog.get(s.quiz_cursor()).cloned() else {
            self.stop(s).await;
            return;
        };
        let next = self.catalog.get(s.advance_quiz()).cloned();
        self.check_answer(s, answer, &question, next).await;
    }

    async fn answer_review(&self, s: &mut Session, answer: &str) {
        let Some(question) = s.current_review().cloned() else {
            debug!(chat_id = %s.chat_id(), "review cursor past the end");
            self.stop(s).await;
            return;
        };
        // Pick the follow-up before the queue can shrink.
        let next = s.advance_review().cloned();
        self.check_answer(s, answer, &question, next).await;
    }

    async fn check_answer(
        &self,
        s: &mut Session,
        answer: &str,
        question: &Question,
        next: Option<Question>,
    ) {
        let chat = s.chat_id();
        if question.is_correct(answer) {
            self.say(chat, texts::CORRECT).await;
            s.remove_missed(question);
        } else {
            self.say(chat, &texts::wrong_answer(&question.correct_answer))
                .await;
            s.add_missed(question);
        }

        match next {
            Some(q) => self.say(chat, &q.text).await,
            None => self.stop(s).await,
        }
    }

    async fn arm_reminder(&self, s: &mut Session, input: &str) -> Result<()> {
        let chat = s.chat_id();
        let Some(text) = s.draft_text().map(str::to_string) else {
            self.say(chat, texts::UNKNOWN_COMMAND).await;
            return Ok(());
        };

        let delay_seconds = match parse_delay(input)? {
            DelayInput::Seconds(v) => v,
            DelayInput::Malformed => {
                self.say(chat, texts::ENTER_INTEGER).await;
                return Ok(());
            }
        };

        let handle = self.scheduler.arm(ReminderRequest {
            chat_id: chat,
            text: text.clone(),
            delay_seconds,
        });
        self.say(chat, texts::REMINDER_SET).await;
        s.set_phase(Phase::Init);
        s.record_armed(text, delay_seconds, handle);
        Ok(())
    }
}
