//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript and
//! runs the request/response cycle against a [`Transport`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::chat::config::ChatConfig;
use crate::chat::events::{Rejection, SessionEvent, SessionSnapshot};
use crate::error::FailureKind;
use crate::observability::{
    CHAT_CYCLE_DURATION, CHAT_FALLBACKS, CHAT_REJECTED_BUSY, CHAT_REJECTED_EMPTY, CHAT_REPLIES,
    CHAT_SUBMISSIONS,
};
use crate::session_logger::SessionLogger;
use crate::strings::{Text, t};
use crate::transport::Transport;
use crate::types::{Language, Message, MessageId, QueryRequest, QueryResponse};

/// How long the session waits after a failed request before showing the
/// fallback message.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1500);

/// Result of a call to [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Ignored: the text was empty after trimming.
    Empty,

    /// Ignored: a reply was still pending.
    Busy,

    /// The assistant replied.
    Replied {
        /// The reply as appended to the transcript.
        message: Message,
        /// Playbook strategies the assistant reported using.
        strategies_used: Vec<String>,
    },

    /// The assistant could not be reached and the fallback was shown.
    Fallback {
        /// The fallback message as appended to the transcript.
        message: Message,
        /// How the cycle failed.
        failure: FailureKind,
    },
}

impl SubmitOutcome {
    /// Returns true if the submission was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Replied { .. } | SubmitOutcome::Fallback { .. }
        )
    }

    /// The bot message that resolved the submission, if it was accepted.
    pub fn message(&self) -> Option<&Message> {
        match self {
            SubmitOutcome::Replied { message, .. } | SubmitOutcome::Fallback { message, .. } => {
                Some(message)
            }
            SubmitOutcome::Empty | SubmitOutcome::Busy => None,
        }
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The language currently in effect.
    pub language: Language,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// Whether a reply is outstanding.
    pub pending: bool,
    /// Accepted submissions.
    pub submissions: u64,
    /// Submissions answered by the assistant.
    pub replies: u64,
    /// Submissions answered with the fallback message.
    pub fallbacks: u64,
    /// Submissions ignored because they were empty or the session was busy.
    pub rejected: u64,
}

struct SessionState {
    snapshot: SessionSnapshot,
    input: String,
    last_id: u64,
    events: Vec<SessionEvent>,
    submissions: u64,
    replies: u64,
    fallbacks: u64,
    rejected: u64,
}

impl SessionState {
    fn next_id(&mut self) -> MessageId {
        self.last_id += 1;
        MessageId::new(self.last_id)
    }

    fn record(&mut self, event: SessionEvent) -> SessionEvent {
        self.snapshot.apply(&event);
        self.events.push(event.clone());
        event
    }

    fn greet(&mut self, language: Language) -> (Message, SessionEvent) {
        let id = self.next_id();
        let message = Message::bot(id, t(language, Text::Greeting));
        let event = self.record(SessionEvent::Greeted {
            language,
            message: message.clone(),
        });
        (message, event)
    }
}

/// A chat session: an append-only transcript plus the request/response cycle.
///
/// At most one submission is in flight at a time.  The gate lives inside the
/// session, so concurrent callers sharing one session (for instance through an
/// `Arc`) are serialized the same way as a single caller.  Failed requests are
/// never surfaced: after [`fallback_delay`](Self::fallback_delay) the localized
/// fallback message is appended instead, and the session stays usable.
pub struct ChatSession<T: Transport> {
    transport: T,
    fallback_delay: Duration,
    logger: Option<Arc<dyn SessionLogger>>,
    state: Mutex<SessionState>,
}

impl<T: Transport> ChatSession<T> {
    /// Creates a new session that greets in `language`.
    pub fn new(transport: T, language: Language) -> Self {
        let mut state = SessionState {
            snapshot: SessionSnapshot::default(),
            input: String::new(),
            last_id: 0,
            events: Vec::new(),
            submissions: 0,
            replies: 0,
            fallbacks: 0,
            rejected: 0,
        };
        state.greet(language);
        Self {
            transport,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            logger: None,
            state: Mutex::new(state),
        }
    }

    /// Creates a new session using the language and fallback delay in `config`.
    pub fn from_config(transport: T, config: &ChatConfig) -> Self {
        Self::new(transport, config.language).with_fallback_delay(config.fallback_delay)
    }

    /// Sets the delay before the fallback message is shown.
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    /// Attaches a logger.  It first receives every event logged so far.
    pub fn with_logger(mut self, logger: Arc<dyn SessionLogger>) -> Self {
        for event in self.lock().events.iter() {
            logger.log_event(event);
        }
        self.logger = Some(logger);
        self
    }

    /// The transport used for queries.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The delay before the fallback message is shown.
    pub fn fallback_delay(&self) -> Duration {
        self.fallback_delay
    }

    /// Submits `text` and waits for the cycle to resolve.
    ///
    /// Empty or whitespace-only text, and any submission while another is
    /// pending, is ignored without touching the transcript.  Otherwise the
    /// user message is appended immediately, the input buffer is cleared, and
    /// exactly one bot message (reply or fallback) is appended when the cycle
    /// resolves.  There is no retry.
    ///
    /// Dropping the returned future before it completes resolves the cycle
    /// at once with the fallback message, so the session never stays pending.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.run(Some(text)).await
    }

    /// Submits the contents of the input buffer.
    ///
    /// The buffer is cleared only if the submission is accepted.
    pub async fn submit_input(&self) -> SubmitOutcome {
        self.run(None).await
    }

    async fn run(&self, text: Option<&str>) -> SubmitOutcome {
        let request = match self.begin(text) {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        let start = Instant::now();
        let mut in_flight = InFlight {
            session: self,
            resolved: false,
        };
        let outcome = match self.transport.query(&request).await {
            Ok(reply) => {
                in_flight.resolved = true;
                self.finish_reply(reply)
            }
            Err(err) => {
                let failure = err.failure_kind();
                tracing::warn!(%failure, error = %err, "assistant unreachable; showing fallback");
                tokio::time::sleep(self.fallback_delay).await;
                in_flight.resolved = true;
                self.finish_fallback(failure)
            }
        };
        CHAT_CYCLE_DURATION.add(start.elapsed().as_secs_f64());
        outcome
    }

    fn begin(&self, text: Option<&str>) -> Result<QueryRequest, SubmitOutcome> {
        let mut state = self.lock();
        let text = match text {
            Some(text) => text.to_string(),
            None => state.input.clone(),
        };
        let rejection = if text.trim().is_empty() {
            Some(Rejection::Empty)
        } else if state.snapshot.pending {
            Some(Rejection::Busy)
        } else {
            None
        };

        if let Some(reason) = rejection {
            state.rejected += 1;
            let event = state.record(SessionEvent::Rejected { reason });
            self.emit(&event);
            drop(state);
            tracing::debug!(?reason, "submission ignored");
            return Err(match reason {
                Rejection::Empty => {
                    CHAT_REJECTED_EMPTY.click();
                    SubmitOutcome::Empty
                }
                Rejection::Busy => {
                    CHAT_REJECTED_BUSY.click();
                    SubmitOutcome::Busy
                }
            });
        }

        let id = state.next_id();
        state.input.clear();
        state.submissions += 1;
        let event = state.record(SessionEvent::Submitted {
            message: Message::user(id, text.clone()),
        });
        self.emit(&event);
        drop(state);
        CHAT_SUBMISSIONS.click();
        Ok(QueryRequest::new(text))
    }

    fn finish_reply(&self, reply: QueryResponse) -> SubmitOutcome {
        let mut state = self.lock();
        let id = state.next_id();
        let message = Message::bot(id, reply.response);
        state.replies += 1;
        let event = state.record(SessionEvent::Replied {
            message: message.clone(),
            strategies_used: reply.strategies_used.clone(),
        });
        self.emit(&event);
        drop(state);
        CHAT_REPLIES.click();
        SubmitOutcome::Replied {
            message,
            strategies_used: reply.strategies_used,
        }
    }

    fn finish_fallback(&self, failure: FailureKind) -> SubmitOutcome {
        let mut state = self.lock();
        let id = state.next_id();
        let language = state.snapshot.language;
        let message = Message::bot(id, t(language, Text::Fallback));
        state.fallbacks += 1;
        let event = state.record(SessionEvent::FellBack {
            message: message.clone(),
            failure,
        });
        self.emit(&event);
        drop(state);
        CHAT_FALLBACKS.click();
        SubmitOutcome::Fallback { message, failure }
    }

    /// Switches language and appends the new language's greeting.
    pub fn set_language(&self, language: Language) -> Message {
        let mut state = self.lock();
        let (message, event) = state.greet(language);
        self.emit(&event);
        message
    }

    /// The language currently in effect.
    pub fn language(&self) -> Language {
        self.lock().snapshot.language
    }

    /// Replaces the input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// The input buffer.
    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    /// Returns true while a reply is outstanding.
    pub fn is_pending(&self) -> bool {
        self.lock().snapshot.pending
    }

    /// A copy of the transcript.
    pub fn transcript(&self) -> Vec<Message> {
        self.lock().snapshot.transcript.clone()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.lock().snapshot.transcript.len()
    }

    /// The most recent message.
    pub fn last_message(&self) -> Option<Message> {
        self.lock().snapshot.transcript.last().cloned()
    }

    /// A copy of the event log.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.lock().events.clone()
    }

    /// Transcript, pending flag and language as one consistent value.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot.clone()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let state = self.lock();
        SessionStats {
            language: state.snapshot.language,
            message_count: state.snapshot.transcript.len(),
            pending: state.snapshot.pending,
            submissions: state.submissions,
            replies: state.replies,
            fallbacks: state.fallbacks,
            rejected: state.rejected,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // State is only mutated through `record`, which cannot panic halfway.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: &SessionEvent) {
        if let Some(logger) = &self.logger {
            logger.log_event(event);
        }
    }
}

/// Resolves a submission whose future was dropped before the transport
/// answered, so the session does not stay pending.
struct InFlight<'a, T: Transport> {
    session: &'a ChatSession<T>,
    resolved: bool,
}

impl<T: Transport> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.resolved {
            tracing::warn!("submission dropped before it resolved; showing fallback");
            self.session.finish_fallback(FailureKind::Cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::types::Sender;

    struct Canned(Result<QueryResponse>);

    #[async_trait::async_trait]
    impl Transport for Canned {
        async fn query(&self, _: &QueryRequest) -> Result<QueryResponse> {
            self.0.clone()
        }
    }

    fn answering(text: &str) -> ChatSession<Canned> {
        ChatSession::new(Canned(Ok(QueryResponse::new(text))), Language::En)
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<SessionEvent>>);

    impl SessionLogger for Recorder {
        fn log_event(&self, event: &SessionEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn new_session_is_greeted() {
        let session = answering("hi");
        assert_eq!(session.message_count(), 1);
        let greeting = session.last_message().unwrap();
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(greeting.text, t(Language::En, Text::Greeting));
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let session = answering("ok");
        session.submit("one").await;
        session.submit("two").await;
        session.set_language(Language::Xh);
        let ids: Vec<u64> = session.transcript().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn user_text_is_sent_as_typed() {
        let session = answering("ok");
        session.submit("  padded  ").await;
        assert_eq!(session.transcript()[1].text, "  padded  ");
    }

    #[tokio::test]
    async fn input_buffer_cleared_on_accept() {
        let session = answering("ok");
        session.set_input("What is my revenue?");
        let outcome = session.submit_input().await;
        assert!(outcome.is_accepted());
        assert_eq!(session.input(), "");
        assert_eq!(session.transcript()[1].text, "What is my revenue?");
    }

    #[tokio::test]
    async fn input_buffer_kept_on_reject() {
        let session = answering("ok");
        session.set_input("   ");
        assert_eq!(session.submit_input().await, SubmitOutcome::Empty);
        assert_eq!(session.input(), "   ");
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn language_switch_appends_greeting() {
        let session = answering("ok");
        let greeting = session.set_language(Language::Af);
        assert_eq!(greeting.text, t(Language::Af, Text::Greeting));
        assert_eq!(session.language(), Language::Af);
        assert_eq!(session.message_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_uses_current_language() {
        let session = ChatSession::new(
            Canned(Err(Error::connection("refused", None))),
            Language::En,
        );
        session.set_language(Language::Zu);
        let outcome = session.submit("ping").await;
        assert_eq!(
            outcome.message().unwrap().text,
            t(Language::Zu, Text::Fallback)
        );
    }

    #[tokio::test]
    async fn replay_matches_state() {
        let session = answering("ok");
        session.submit("one").await;
        session.submit("").await;
        session.set_language(Language::St);
        let replayed = SessionSnapshot::replay(&session.events());
        assert_eq!(replayed, session.snapshot());
    }

    #[tokio::test]
    async fn logger_sees_history_and_new_events() {
        let recorder = Arc::new(Recorder::default());
        let session = answering("ok").with_logger(recorder.clone());
        session.submit("hello").await;
        let logged = recorder.0.lock().unwrap().clone();
        assert_eq!(logged, session.events());
        assert_eq!(logged.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stats_count_outcomes() {
        let session = answering("ok");
        session.submit("a").await;
        session.submit(" ").await;
        let stats = session.stats();
        assert_eq!(stats.submissions, 1);
        assert_eq!(stats.replies, 1);
        assert_eq!(stats.fallbacks, 0);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.message_count, 3);
        assert!(!stats.pending);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn logger_order_matches_log_across_tasks() {
        let recorder = Arc::new(Recorder::default());
        let session = Arc::new(answering("ok").with_logger(recorder.clone()));
        let mut tasks = Vec::new();
        for n in 0..4 {
            let session = session.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    if n % 2 == 0 {
                        session.set_language(Language::Zu);
                        session.set_language(Language::En);
                    } else {
                        session.submit("hello").await;
                    }
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let logged = recorder.0.lock().unwrap().clone();
        assert_eq!(logged, session.events());
        assert_eq!(SessionSnapshot::replay(&logged), session.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submission_resolves_with_fallback() {
        struct Silent;

        #[async_trait::async_trait]
        impl Transport for Silent {
            async fn query(&self, _: &QueryRequest) -> Result<QueryResponse> {
                std::future::pending().await
            }
        }

        let session = ChatSession::new(Silent, Language::En);
        let timed_out =
            tokio::time::timeout(Duration::from_secs(5), session.submit("ping")).await;
        assert!(timed_out.is_err());
        assert!(!session.is_pending());
        assert_eq!(session.message_count(), 3);
        assert!(matches!(
            session.events().last(),
            Some(SessionEvent::FellBack {
                failure: FailureKind::Cancelled,
                ..
            })
        ));

        let again = tokio::time::timeout(Duration::from_secs(5), session.submit("again")).await;
        assert!(again.is_err());
        assert_eq!(session.message_count(), 5);
    }
}
