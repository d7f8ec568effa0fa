//! Leader voting over wallet-submitted transfers.
//!
//! A [`BallotService`] owns the in-memory [`Ballot`] and pays each vote's
//! fixed cost to a sink address through a
//! [`chainvote_wallet::TransactionSubmitter`]. Only transfers the wallet
//! accepted move the tally; tallies are session-lifetime only.

pub mod error;
pub mod leaders;
pub mod service;
pub mod tally;

pub use error::BallotError;
pub use leaders::Leader;
pub use service::{vote_cost, BallotService, VoteReceipt, VOTE_COST_RAW, VOTE_SINK};
pub use tally::{Ballot, CastVote};
