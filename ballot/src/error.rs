use chainvote_wallet::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BallotError {
    #[error("unknown leader id {0}")]
    UnknownLeader(u32),

    #[error(transparent)]
    Session(#[from] SessionError),
}
