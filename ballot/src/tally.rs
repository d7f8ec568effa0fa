//! In-memory vote registry.
//!
//! Tallies live only for the session; nothing is read back from chain
//! and nothing is persisted.

use chainvote_types::{NativeAmount, TxHash};
use serde::{Deserialize, Serialize};

use crate::error::BallotError;
use crate::leaders::Leader;

/// One successfully submitted vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVote {
    pub leader_id: u32,
    pub tx: TxHash,
    pub amount: NativeAmount,
}

/// Leader roster plus the votes cast through this process.
#[derive(Clone, Debug)]
pub struct Ballot {
    leaders: Vec<Leader>,
    history: Vec<CastVote>,
}

impl Ballot {
    /// A ballot over the built-in roster.
    pub fn seeded() -> Self {
        Self::with_leaders(Leader::seed())
    }

    pub fn with_leaders(leaders: Vec<Leader>) -> Self {
        Self {
            leaders,
            history: Vec::new(),
        }
    }

    pub fn leader(&self, id: u32) -> Option<&Leader> {
        self.leaders.iter().find(|l| l.id == id)
    }

    /// Roster in id order, regardless of insertion order.
    pub fn leaders(&self) -> Vec<Leader> {
        let mut out = self.leaders.clone();
        out.sort_by_key(|l| l.id);
        out
    }

    /// Leaderboard view: votes descending, id ascending on ties.
    pub fn standings(&self) -> Vec<Leader> {
        let mut out = self.leaders.clone();
        out.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.id.cmp(&b.id)));
        out
    }

    pub fn history(&self) -> &[CastVote] {
        &self.history
    }

    /// Counts one vote for `leader_id` and appends it to the history.
    /// Returns the leader's new total.
    pub fn record_vote(
        &mut self,
        leader_id: u32,
        tx: TxHash,
        amount: NativeAmount,
    ) -> Result<u64, BallotError> {
        let leader = self
            .leaders
            .iter_mut()
            .find(|l| l.id == leader_id)
            .ok_or(BallotError::UnknownLeader(leader_id))?;
        leader.votes += 1;
        self.history.push(CastVote {
            leader_id,
            tx,
            amount,
        });
        Ok(leader.votes)
    }
}
