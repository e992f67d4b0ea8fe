// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request states and the approval transition table.
//!
//! A request is decided in two stages: first by the team referente, then by
//! RH. The only path to `Approved` is `PendingReferente -> PendingRh -> Approved`.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Workflow state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    /// Waiting for the team referente.
    PendingReferente,
    /// Approved by the referente, waiting for RH.
    PendingRh,
    /// Approved by RH; the ledger has been debited.
    Approved,
    /// Rejected by the referente.
    RejectedByReferente,
    /// Rejected by RH.
    RejectedByRh,
}

/// The approval stage an actor is acting in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStage {
    /// First-line approval by the team referente.
    Referente,
    /// Final approval by human resources.
    Rh,
}

/// The outcome an approver chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Move the request forward.
    Approve,
    /// Close the request without leave.
    Reject,
}

impl Verdict {
    /// Maps a boolean approval flag to a verdict.
    #[must_use]
    pub const fn from_approval(approve: bool) -> Self {
        if approve { Self::Approve } else { Self::Reject }
    }
}

impl RequestState {
    /// All states, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::PendingReferente,
        Self::PendingRh,
        Self::Approved,
        Self::RejectedByReferente,
        Self::RejectedByRh,
    ];

    /// Returns the string representation of the state.
    ///
    /// This is used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingReferente => "pending_referente",
            Self::PendingRh => "pending_rh",
            Self::Approved => "approved",
            Self::RejectedByReferente => "rejected_by_referente",
            Self::RejectedByRh => "rejected_by_rh",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending_referente" => Ok(Self::PendingReferente),
            "pending_rh" => Ok(Self::PendingRh),
            "approved" => Ok(Self::Approved),
            "rejected_by_referente" => Ok(Self::RejectedByReferente),
            "rejected_by_rh" => Ok(Self::RejectedByRh),
            _ => Err(DomainError::InvalidRequestState(s.to_string())),
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::RejectedByReferente | Self::RejectedByRh
        )
    }

    /// Returns true while the request still awaits a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::PendingReferente | Self::PendingRh)
    }

    /// Returns the stage expected to act next, if any.
    #[must_use]
    pub const fn awaiting(&self) -> Option<ApprovalStage> {
        match self {
            Self::PendingReferente => Some(ApprovalStage::Referente),
            Self::PendingRh => Some(ApprovalStage::Rh),
            Self::Approved | Self::RejectedByReferente | Self::RejectedByRh => None,
        }
    }

    /// Resolves the state reached when `stage` gives `verdict`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` for any pair not in the table.
    pub fn next(self, stage: ApprovalStage, verdict: Verdict) -> Result<Self, DomainError> {
        let next: Option<Self> = match (self, stage, verdict) {
            (Self::PendingReferente, ApprovalStage::Referente, Verdict::Approve) => {
                Some(Self::PendingRh)
            }
            (Self::PendingReferente, ApprovalStage::Referente, Verdict::Reject) => {
                Some(Self::RejectedByReferente)
            }
            (Self::PendingRh, ApprovalStage::Rh, Verdict::Approve) => Some(Self::Approved),
            (Self::PendingRh, ApprovalStage::Rh, Verdict::Reject) => Some(Self::RejectedByRh),
            _ => None,
        };

        next.ok_or_else(|| {
            let reason: String = if self.is_terminal() {
                String::from("request is already closed")
            } else {
                String::from("request is not awaiting this approval stage")
            };
            DomainError::InvalidTransition {
                from: self,
                stage,
                verdict,
                reason,
            }
        })
    }
}

impl FromStr for RequestState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for ApprovalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Referente => write!(f, "referente"),
            Self::Rh => write!(f, "rh"),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_string_round_trip() {
        for state in RequestState::ALL {
            let s = state.as_str();
            match RequestState::parse_str(s) {
                Ok(parsed) => assert_eq!(state, parsed),
                Err(e) => panic!("Failed to parse state string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_state_string() {
        assert!(matches!(
            "approved_by_referente".parse::<RequestState>(),
            Err(DomainError::InvalidRequestState(_))
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RequestState::PendingReferente.is_terminal());
        assert!(!RequestState::PendingRh.is_terminal());
        assert!(RequestState::Approved.is_terminal());
        assert!(RequestState::RejectedByReferente.is_terminal());
        assert!(RequestState::RejectedByRh.is_terminal());
    }

    #[test]
    fn test_only_the_four_table_edges_succeed() {
        let stages = [ApprovalStage::Referente, ApprovalStage::Rh];
        let verdicts = [Verdict::Approve, Verdict::Reject];

        let mut allowed: Vec<(RequestState, ApprovalStage, Verdict, RequestState)> = Vec::new();
        for state in RequestState::ALL {
            for stage in stages {
                for verdict in verdicts {
                    if let Ok(next) = state.next(stage, verdict) {
                        allowed.push((state, stage, verdict, next));
                    }
                }
            }
        }

        assert_eq!(
            allowed,
            vec![
                (
                    RequestState::PendingReferente,
                    ApprovalStage::Referente,
                    Verdict::Approve,
                    RequestState::PendingRh
                ),
                (
                    RequestState::PendingReferente,
                    ApprovalStage::Referente,
                    Verdict::Reject,
                    RequestState::RejectedByReferente
                ),
                (
                    RequestState::PendingRh,
                    ApprovalStage::Rh,
                    Verdict::Approve,
                    RequestState::Approved
                ),
                (
                    RequestState::PendingRh,
                    ApprovalStage::Rh,
                    Verdict::Reject,
                    RequestState::RejectedByRh
                ),
            ]
        );
    }

    #[test]
    fn test_approved_is_reachable_only_through_pending_rh() {
        for state in RequestState::ALL {
            for stage in [ApprovalStage::Referente, ApprovalStage::Rh] {
                if state.next(stage, Verdict::Approve) == Ok(RequestState::Approved) {
                    assert_eq!(state, RequestState::PendingRh);
                    assert_eq!(stage, ApprovalStage::Rh);
                }
            }
        }
    }

    #[test]
    fn test_repeated_terminal_transition_is_rejected() {
        let result = RequestState::Approved.next(ApprovalStage::Rh, Verdict::Approve);
        match result {
            Err(DomainError::InvalidTransition { from, reason, .. }) => {
                assert_eq!(from, RequestState::Approved);
                assert_eq!(reason, "request is already closed");
            }
            other => panic!("expected invalid transition, got {other:?}"),
        }
    }

    #[test]
    fn test_rh_cannot_skip_referente() {
        assert!(matches!(
            RequestState::PendingReferente.next(ApprovalStage::Rh, Verdict::Approve),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_awaiting_stage() {
        assert_eq!(
            RequestState::PendingReferente.awaiting(),
            Some(ApprovalStage::Referente)
        );
        assert_eq!(RequestState::PendingRh.awaiting(), Some(ApprovalStage::Rh));
        assert_eq!(RequestState::RejectedByRh.awaiting(), None);
    }
}
