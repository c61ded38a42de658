use crate::errors::{VitaliError, VitaliResult};
use serde::Serialize;
use tracing::debug;

const GREETING: &str = "Vitali analysis engine initialized. I have reviewed your latest \
biometric logs. How may I assist your health journey today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachMessage {
    pub role: Speaker,
    pub content: String,
}

/// Identifies one outstanding question; answers for an older conversation are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// The coach conversation. At most one question is outstanding at a time.
#[derive(Debug)]
pub struct CoachPanel {
    transcript: Vec<CoachMessage>,
    pending: bool,
    conversation: u64,
}

impl Default for CoachPanel {
    fn default() -> Self {
        Self {
            transcript: vec![CoachMessage {
                role: Speaker::Ai,
                content: GREETING.to_string(),
            }],
            pending: false,
            conversation: 0,
        }
    }
}

impl CoachPanel {
    pub fn transcript(&self) -> &[CoachMessage] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records the question and marks the panel busy.
    pub fn begin(&mut self, question: &str) -> VitaliResult<(Ticket, String)> {
        if self.pending {
            return Err(VitaliError::AdvicePending);
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(VitaliError::missing("question"));
        }
        self.transcript.push(CoachMessage {
            role: Speaker::User,
            content: question.to_string(),
        });
        self.pending = true;
        Ok((Ticket(self.conversation), question.to_string()))
    }

    pub fn finish(&mut self, ticket: Ticket, answer: String) {
        if ticket.0 != self.conversation {
            debug!("dropping answer for a closed conversation");
            return;
        }
        self.transcript.push(CoachMessage {
            role: Speaker::Ai,
            content: answer,
        });
        self.pending = false;
    }

    /// Starts a fresh conversation, e.g. when the account signs out.
    pub fn reset(&mut self) {
        let conversation = self.conversation + 1;
        *self = Self {
            conversation,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_question_is_rejected_while_pending() {
        let mut panel = CoachPanel::default();
        let (ticket, question) = panel.begin("  how is my sleep?  ").unwrap();
        assert_eq!(question, "how is my sleep?");
        assert!(matches!(panel.begin("again"), Err(VitaliError::AdvicePending)));

        panel.finish(ticket, "Fine.".to_string());
        assert!(!panel.is_pending());
        assert!(panel.begin("next").is_ok());

        let roles: Vec<_> = panel.transcript().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Speaker::Ai, Speaker::User, Speaker::Ai, Speaker::User]
        );
    }

    #[test]
    fn answers_after_reset_are_dropped() {
        let mut panel = CoachPanel::default();
        let (ticket, _) = panel.begin("question").unwrap();
        panel.reset();
        panel.finish(ticket, "late".to_string());

        assert_eq!(panel.transcript().len(), 1);
        assert!(!panel.is_pending());
    }

    #[test]
    fn blank_question_is_rejected() {
        let mut panel = CoachPanel::default();
        assert!(matches!(panel.begin(" "), Err(VitaliError::Validation(_))));
        assert!(!panel.is_pending());
    }
}
