//! Assessment session lifecycle.
//!
//! `Created -> InProgress -> Submitted` (terminal). The timer starts at
//! creation with a fixed 30-minute budget. The wall-clock guard lives here so
//! a late submission is rejected server-side even when the client's own
//! auto-submit never fired.
//!
//! Submission exclusivity is enforced at the database layer with a
//! conditional update on `submitted = false`; this module only answers "is
//! this transition allowed right now".

use chrono::{DateTime, Duration, Utc};

/// Fixed time budget from creation to submission.
pub const TIME_BUDGET_SECS: i64 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    /// Terminal. Includes expiry: once the budget elapses the session can
    /// only be finalized, never answered or explicitly submitted.
    Expired,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    AlreadySubmitted,
    BudgetExpired,
}

impl TransitionError {
    pub fn message(&self) -> &'static str {
        match self {
            TransitionError::AlreadySubmitted => "Assessment has already been submitted",
            TransitionError::BudgetExpired => "Assessment time limit exceeded",
        }
    }
}

/// Pure view over an assessment's lifecycle fields.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    pub submitted: bool,
}

impl Session {
    pub fn new(created_at: DateTime<Utc>, submitted: bool) -> Self {
        Self {
            created_at,
            submitted,
        }
    }

    pub fn state(&self, now: DateTime<Utc>) -> SessionState {
        if self.submitted {
            SessionState::Submitted
        } else if self.is_expired(now) {
            SessionState::Expired
        } else {
            SessionState::InProgress
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::seconds(TIME_BUDGET_SECS)
    }

    /// Guard for explicit submission.
    pub fn check_submit(&self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.submitted {
            return Err(TransitionError::AlreadySubmitted);
        }
        if self.is_expired(now) {
            return Err(TransitionError::BudgetExpired);
        }
        Ok(())
    }

    /// Guard for recording or revising a draft answer. Same conditions as
    /// submission: any order, any question, but only while in progress.
    pub fn check_record_answer(&self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.check_submit(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_created_secs_ago(secs: i64, submitted: bool) -> (Session, DateTime<Utc>) {
        let now = Utc::now();
        (Session::new(now - Duration::seconds(secs), submitted), now)
    }

    #[test]
    fn test_fresh_session_accepts_submission() {
        let (session, now) = session_created_secs_ago(60, false);
        assert_eq!(session.state(now), SessionState::InProgress);
        assert!(session.check_submit(now).is_ok());
    }

    #[test]
    fn test_submission_at_exactly_thirty_minutes_accepted() {
        let (session, now) = session_created_secs_ago(TIME_BUDGET_SECS, false);
        assert!(session.check_submit(now).is_ok());
    }

    #[test]
    fn test_submission_at_minute_thirty_one_rejected() {
        let (session, now) = session_created_secs_ago(31 * 60, false);
        assert_eq!(
            session.check_submit(now),
            Err(TransitionError::BudgetExpired)
        );
        assert_eq!(session.state(now), SessionState::Expired);
    }

    #[test]
    fn test_resubmission_rejected() {
        let (session, now) = session_created_secs_ago(60, true);
        assert_eq!(
            session.check_submit(now),
            Err(TransitionError::AlreadySubmitted)
        );
        assert_eq!(session.state(now), SessionState::Submitted);
    }

    #[test]
    fn test_submitted_wins_over_expired() {
        // A session finalized just in time stays terminal after the budget.
        let (session, now) = session_created_secs_ago(45 * 60, true);
        assert_eq!(session.state(now), SessionState::Submitted);
        assert_eq!(
            session.check_submit(now),
            Err(TransitionError::AlreadySubmitted)
        );
    }

    #[test]
    fn test_answer_edits_follow_submission_guards() {
        let (open, now) = session_created_secs_ago(60, false);
        assert!(open.check_record_answer(now).is_ok());

        let (expired, now) = session_created_secs_ago(31 * 60, false);
        assert_eq!(
            expired.check_record_answer(now),
            Err(TransitionError::BudgetExpired)
        );

        let (done, now) = session_created_secs_ago(60, true);
        assert_eq!(
            done.check_record_answer(now),
            Err(TransitionError::AlreadySubmitted)
        );
    }
}
