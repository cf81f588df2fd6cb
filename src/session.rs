//! Conversation history for the chat front-ends.
//!
//! Nothing here is shared with the server: each front-end owns a
//! [`SessionStore`] and replays its history into every question it sends.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Ordered history of one conversation, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    turns: Vec<ChatTurn>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Build the question text sent to the backend: every previous exchange as
    /// `Q:`/`A:` lines followed by the new question.
    pub fn context_for(&self, question: &str) -> String {
        let history: Vec<String> = self
            .turns
            .iter()
            .map(|t| format!("Q: {}\nA: {}", t.question, t.answer))
            .collect();

        if history.is_empty() {
            format!("Q: {}", question)
        } else {
            format!("{}\nQ: {}", history.join("\n"), question)
        }
    }

    /// Render the history for display.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("👤 {}\n🤖 {}", t.question, t.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Which conversation a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    File,
    Url,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::File => write!(f, "file"),
            SessionKind::Url => write!(f, "url"),
        }
    }
}

/// In-memory histories keyed by conversation kind.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionKind, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one session's history.
    pub fn get(&self, kind: SessionKind) -> Session {
        self.with(|sessions| sessions.get(&kind).cloned().unwrap_or_default())
    }

    /// Replayed context for `question` in the given session.
    pub fn context_for(&self, kind: SessionKind, question: &str) -> String {
        self.with(|sessions| {
            sessions
                .get(&kind)
                .map(|s| s.context_for(question))
                .unwrap_or_else(|| Session::new().context_for(question))
        })
    }

    /// Record a successful exchange and return the rendered history.
    pub fn append(&self, kind: SessionKind, turn: ChatTurn) -> String {
        self.with(|sessions| {
            let session = sessions.entry(kind).or_default();
            session.push(turn);
            session.render()
        })
    }

    /// Forget one session's history. Other kinds are untouched.
    pub fn clear(&self, kind: SessionKind) {
        self.with(|sessions| {
            sessions.remove(&kind);
        })
    }

    fn with<T>(&self, f: impl FnOnce(&mut HashMap<SessionKind, Session>) -> T) -> T {
        // A panic while holding the lock cannot leave a half-written turn behind.
        let mut guard = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_question_has_no_history() {
        let session = Session::new();
        assert_eq!(session.context_for("What is this?"), "Q: What is this?");
    }

    #[test]
    fn test_context_replays_history_in_order() {
        let mut session = Session::new();
        session.push(ChatTurn::new("Q1", "A1"));
        session.push(ChatTurn::new("Q2", "A2"));

        assert_eq!(
            session.context_for("Q3"),
            "Q: Q1\nA: A1\nQ: Q2\nA: A2\nQ: Q3"
        );
    }

    #[test]
    fn test_render() {
        let mut session = Session::new();
        assert_eq!(session.render(), "");

        session.push(ChatTurn::new("What is the revenue?", "$500"));
        session.push(ChatTurn::new("And costs?", "$200"));
        assert_eq!(
            session.render(),
            "👤 What is the revenue?\n🤖 $500\n\n👤 And costs?\n🤖 $200"
        );
    }

    #[test]
    fn test_store_append_returns_rendered_history() {
        let store = SessionStore::new();
        let rendered = store.append(SessionKind::Url, ChatTurn::new("Who?", "Us."));
        assert_eq!(rendered, "👤 Who?\n🤖 Us.");
        assert_eq!(store.get(SessionKind::Url).len(), 1);
        assert_eq!(store.context_for(SessionKind::Url, "When?"), "Q: Who?\nA: Us.\nQ: When?");
    }

    #[test]
    fn test_clearing_one_kind_keeps_the_other() {
        let store = SessionStore::new();
        store.append(SessionKind::File, ChatTurn::new("f", "1"));
        store.append(SessionKind::Url, ChatTurn::new("u", "2"));

        store.clear(SessionKind::File);

        assert!(store.get(SessionKind::File).is_empty());
        assert_eq!(store.get(SessionKind::Url).turns(), &[ChatTurn::new("u", "2")]);
        assert_eq!(store.context_for(SessionKind::File, "next"), "Q: next");
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        let store = std::sync::Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.append(SessionKind::File, ChatTurn::new(format!("q{}", i), "a"));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get(SessionKind::File).len(), 4);
    }
}
