//! The voting rules: toggle semantics, aggregate math, and the reputation
//! deltas each transition carries.
//!
//! These are pure functions so both the service layer and the storage
//! adapters apply the exact same transition table, and so the laws can be
//! tested without any I/O.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// Reputation granted to an answer's author when it is accepted; taken back
/// when acceptance is removed.
pub const ACCEPT_REPUTATION: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }

    /// Signed contribution to the target's `vote_count`.
    pub fn score(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }

    /// Signed contribution to the content author's reputation.
    pub fn reputation_weight(self) -> i64 {
        match self {
            VoteDirection::Up => 10,
            VoteDirection::Down => -2,
        }
    }
}

impl FromStr for VoteDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            other => Err(DomainError::validation(format!(
                "vote type must be \"up\" or \"down\", got `{other}`"
            ))),
        }
    }
}

/// What a vote can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteTargetKind {
    Question,
    Answer,
}

impl VoteTargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteTargetKind::Question => "question",
            VoteTargetKind::Answer => "answer",
        }
    }
}

/// The three ways a vote request can mutate the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteMutation {
    /// No row for this voter existed; one is added.
    Insert,
    /// The voter's row had the same direction; it is removed (toggle-off).
    Remove,
    /// The voter's row had the opposite direction; it is flipped in place.
    Replace,
}

/// Decides how a vote request mutates the voter's row, given the row's
/// current state. Returns the mutation and the voter's resulting direction.
pub fn resolve_vote(
    previous: Option<VoteDirection>,
    requested: VoteDirection,
) -> (VoteMutation, Option<VoteDirection>) {
    match previous {
        None => (VoteMutation::Insert, Some(requested)),
        Some(existing) if existing == requested => (VoteMutation::Remove, None),
        Some(_) => (VoteMutation::Replace, Some(requested)),
    }
}

/// Reputation delta for the content author when the voter's row moves from
/// `previous` to `current`. Always the difference of the two weights, so a
/// removed vote takes back exactly what it granted and a replaced vote
/// applies both signed deltas at once.
pub fn reputation_delta(previous: Option<VoteDirection>, current: Option<VoteDirection>) -> i64 {
    current.map_or(0, VoteDirection::reputation_weight)
        - previous.map_or(0, VoteDirection::reputation_weight)
}

/// Delta to the author's `upvotes_received` counter for the same transition.
pub fn upvotes_received_delta(
    previous: Option<VoteDirection>,
    current: Option<VoteDirection>,
) -> i64 {
    let up = |d: Option<VoteDirection>| i64::from(d == Some(VoteDirection::Up));
    up(current) - up(previous)
}

/// Delta to the target's `vote_count` for the transition. Adapters may
/// instead recount from the vote rows; the two must agree.
pub fn vote_count_delta(previous: Option<VoteDirection>, current: Option<VoteDirection>) -> i64 {
    current.map_or(0, VoteDirection::score) - previous.map_or(0, VoteDirection::score)
}

/// Outcome of one applied vote, as reported by the storage port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteApplied {
    pub previous: Option<VoteDirection>,
    pub current: Option<VoteDirection>,
    /// The target's aggregate count after the mutation.
    pub vote_count: i64,
}

impl VoteApplied {
    /// A brand-new upvote, as opposed to a toggle-off or a direction change.
    /// This is the only transition that notifies the content author.
    pub fn is_fresh_upvote(&self) -> bool {
        self.previous.is_none() && self.current == Some(VoteDirection::Up)
    }
}
