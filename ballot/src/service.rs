//! The voting service: one leader id in, one exact-cost transfer out.

use std::sync::Arc;

use chainvote_types::{Address, NativeAmount, TxHash};
use chainvote_wallet::{TransactionSubmitter, WalletSession};
use tokio::sync::RwLock;

use crate::error::BallotError;
use crate::leaders::Leader;
use crate::tally::{Ballot, CastVote};

/// Cost of one vote in smallest units: 0.0001 of the 18-decimal native
/// currency. Held as an integer so no float ever touches the value.
pub const VOTE_COST_RAW: u128 = 100_000_000_000_000;

/// Address vote transfers are sent to. A stand-in for a contract.
pub const VOTE_SINK: &str = "0x000000000000000000000000000000000000dEaD";

pub fn vote_cost() -> NativeAmount {
    NativeAmount::new(VOTE_COST_RAW)
}

fn default_vote_sink() -> Address {
    Address::parse(VOTE_SINK).expect("vote sink literal is a valid address")
}

/// Outcome of a successful vote.
#[derive(Clone, Debug)]
pub struct VoteReceipt {
    pub leader_id: u32,
    pub leader_name: String,
    pub tx: TxHash,
    pub amount: NativeAmount,
    /// The leader's tally after this vote.
    pub new_total: u64,
}

/// Drives votes through a [`TransactionSubmitter`] and tallies the ones
/// that the wallet actually accepted.
pub struct BallotService {
    submitter: TransactionSubmitter,
    ballot: RwLock<Ballot>,
    sink: Address,
}

impl BallotService {
    /// A service over the built-in roster, paying to the default sink.
    pub fn new(submitter: TransactionSubmitter) -> Self {
        Self::with_parts(submitter, Ballot::seeded(), default_vote_sink())
    }

    pub fn with_parts(submitter: TransactionSubmitter, ballot: Ballot, sink: Address) -> Self {
        Self {
            submitter,
            ballot: RwLock::new(ballot),
            sink,
        }
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        self.submitter.session()
    }

    pub fn sink(&self) -> &Address {
        &self.sink
    }

    /// Casts one vote for `leader_id`.
    ///
    /// The session must be connected and end up on the target network;
    /// those checks ride along with the submission. The tally moves only
    /// after the wallet has accepted the transfer, so a rejected or
    /// failed transaction leaves the board untouched.
    pub async fn vote(&self, leader_id: u32) -> Result<VoteReceipt, BallotError> {
        let leader_name = {
            let ballot = self.ballot.read().await;
            ballot
                .leader(leader_id)
                .ok_or(BallotError::UnknownLeader(leader_id))?
                .name
                .clone()
        };

        let amount = vote_cost();
        let tx = self.submitter.submit(&self.sink, amount).await?;

        let new_total = {
            let mut ballot = self.ballot.write().await;
            ballot.record_vote(leader_id, tx.clone(), amount)?
        };
        tracing::info!(leader = %leader_name, tx = %tx, new_total, "vote recorded");

        Ok(VoteReceipt {
            leader_id,
            leader_name,
            tx,
            amount,
            new_total,
        })
    }

    /// Roster in id order.
    pub async fn leaders(&self) -> Vec<Leader> {
        self.ballot.read().await.leaders()
    }

    /// Leaderboard: votes descending, id ascending on ties.
    pub async fn standings(&self) -> Vec<Leader> {
        self.ballot.read().await.standings()
    }

    pub async fn history(&self) -> Vec<CastVote> {
        self.ballot.read().await.history().to_vec()
    }
}
