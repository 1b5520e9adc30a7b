use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle status of a tasting session.
///
/// A session only ever moves forward through the sequence
/// `Waiting -> Collecting -> Reviewing -> Revealed -> Finished`; there is no
/// regression path. The table lives here so every write path shares the
/// same notion of what a legal advance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Host is registering whiskies; participants may join but not guess.
    Waiting,
    /// Tasting in progress; participants submit and revise guesses.
    Collecting,
    /// Host reviews submission tallies; participants wait.
    Reviewing,
    /// True attributes and all guesses are visible to everyone.
    Revealed,
    /// Terminal; the session is closed out-of-band by the host.
    Finished,
}

impl SessionStatus {
    /// Status a freshly created session starts in.
    pub const fn initial() -> Self {
        SessionStatus::Waiting
    }

    /// The single status this one may advance to, if any.
    pub const fn successor(self) -> Option<SessionStatus> {
        match self {
            SessionStatus::Waiting => Some(SessionStatus::Collecting),
            SessionStatus::Collecting => Some(SessionStatus::Reviewing),
            SessionStatus::Reviewing => Some(SessionStatus::Revealed),
            SessionStatus::Revealed => Some(SessionStatus::Finished),
            SessionStatus::Finished => None,
        }
    }

    /// Validate an advance request, returning the transition it stands for.
    pub fn advance_to(self, target: SessionStatus) -> Result<Transition, TransitionError> {
        match self.successor() {
            Some(next) if next == target => Ok(Transition {
                from: self,
                to: target,
            }),
            _ => Err(TransitionError {
                from: self,
                to: target,
            }),
        }
    }

    /// Whether guesses may be submitted while the session is in this status.
    pub const fn accepts_submissions(self) -> bool {
        matches!(self, SessionStatus::Collecting)
    }

    /// Whether the host may create, edit, or reorder whiskies.
    pub const fn allows_whisky_edits(self) -> bool {
        matches!(self, SessionStatus::Waiting)
    }

    /// Whether true whisky attributes and all submissions are visible.
    pub const fn is_revealed(self) -> bool {
        matches!(self, SessionStatus::Revealed | SessionStatus::Finished)
    }

    /// Lowercase wire name, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::Collecting => "collecting",
            SessionStatus::Reviewing => "reviewing",
            SessionStatus::Revealed => "revealed",
            SessionStatus::Finished => "finished",
        }
    }
}

/// A validated forward step through the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status the session must currently be in.
    pub from: SessionStatus,
    /// Status the session moves to.
    pub to: SessionStatus,
}

impl Transition {
    /// True when this step additionally requires at least one whisky to exist.
    ///
    /// Starting the tasting with an empty lineup makes no sense, so the
    /// `Waiting -> Collecting` step carries the extra precondition. Whiskies
    /// cannot be removed once registered, so checking before the
    /// compare-and-swap is race-free.
    pub const fn requires_whisky(self) -> bool {
        matches!(
            self,
            Transition {
                from: SessionStatus::Waiting,
                to: SessionStatus::Collecting,
            }
        )
    }
}

/// Error returned when a requested status change is not a legal forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal session transition: {} -> {}", from.as_str(), to.as_str())]
pub struct TransitionError {
    /// Status the session was in when the advance was requested.
    pub from: SessionStatus,
    /// Status that was requested.
    pub to: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_status_is_waiting() {
        assert_eq!(SessionStatus::initial(), SessionStatus::Waiting);
    }

    #[test]
    fn full_forward_sequence_is_legal() {
        let mut status = SessionStatus::initial();
        let expected = [
            SessionStatus::Collecting,
            SessionStatus::Reviewing,
            SessionStatus::Revealed,
            SessionStatus::Finished,
        ];

        for target in expected {
            let transition = status.advance_to(target).unwrap();
            assert_eq!(transition.from, status);
            assert_eq!(transition.to, target);
            status = target;
        }

        assert_eq!(status.successor(), None);
    }

    #[test]
    fn skipping_a_status_is_rejected() {
        let err = SessionStatus::Waiting
            .advance_to(SessionStatus::Reviewing)
            .unwrap_err();
        assert_eq!(err.from, SessionStatus::Waiting);
        assert_eq!(err.to, SessionStatus::Reviewing);
    }

    #[test]
    fn regression_is_rejected() {
        assert!(
            SessionStatus::Revealed
                .advance_to(SessionStatus::Collecting)
                .is_err()
        );
        assert!(
            SessionStatus::Collecting
                .advance_to(SessionStatus::Waiting)
                .is_err()
        );
    }

    #[test]
    fn finished_is_terminal() {
        for target in [
            SessionStatus::Waiting,
            SessionStatus::Collecting,
            SessionStatus::Reviewing,
            SessionStatus::Revealed,
            SessionStatus::Finished,
        ] {
            assert!(SessionStatus::Finished.advance_to(target).is_err());
        }
    }

    #[test]
    fn only_first_step_requires_a_whisky() {
        let first = SessionStatus::Waiting
            .advance_to(SessionStatus::Collecting)
            .unwrap();
        assert!(first.requires_whisky());

        let later = SessionStatus::Collecting
            .advance_to(SessionStatus::Reviewing)
            .unwrap();
        assert!(!later.requires_whisky());
    }

    #[test]
    fn permission_helpers_follow_status() {
        assert!(SessionStatus::Waiting.allows_whisky_edits());
        assert!(!SessionStatus::Collecting.allows_whisky_edits());

        assert!(SessionStatus::Collecting.accepts_submissions());
        assert!(!SessionStatus::Reviewing.accepts_submissions());

        assert!(SessionStatus::Revealed.is_revealed());
        assert!(SessionStatus::Finished.is_revealed());
        assert!(!SessionStatus::Reviewing.is_revealed());
    }
}
