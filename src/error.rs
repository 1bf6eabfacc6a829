use thiserror::Error;

use crate::payout::{MAX_PICKS, MIN_FLEX_PICKS};

/// Everything that can go wrong outside of the payout tables.
/// The payout functions themselves never fail, out-of-range input just pays 0.
#[derive(Debug, Error)]
pub enum Error {
    #[error("You can only select a maximum of {} picks.", MAX_PICKS)]
    SlipFull,

    #[error("You already have a pick for {player} - {stat} (Line: {line}).")]
    DuplicatePick {
        player: String,
        stat: String,
        line: String,
    },

    #[error("You already picked the opposite for {player} - {stat} (Line: {line}). Remove it first if you want to change.")]
    OppositePick {
        player: String,
        stat: String,
        line: String,
    },

    #[error("No pick at position {index}, the slip has {len} picks.")]
    PickIndexOutOfRange { index: usize, len: usize },

    #[error("No picks to save.")]
    EmptySlip,

    #[error("You need at least {} picks to enable Flex mode, you have {picks}.", MIN_FLEX_PICKS)]
    FlexUnavailable { picks: usize },

    #[error("Invalid bet amount: {0}")]
    InvalidBet(f64),

    #[error("Bet of ${bet:.2} exceeds balance of ${balance:.2}")]
    InsufficientBalance { bet: f64, balance: f64 },

    #[error("Unknown wager mode: {0}")]
    UnknownMode(String),

    #[error("Pick must be 'over' or 'under', got {0:?}")]
    UnknownSide(String),

    #[error("No player matched {0:?}")]
    PlayerNotFound(String),

    #[error("Multiple players matched {query:?}: {}", .candidates.join(", "))]
    AmbiguousPlayer {
        query: String,
        candidates: Vec<String>,
    },

    #[error("No {stat:?} prop found for {player}")]
    PropNotFound { player: String, stat: String },

    #[error("Malformed pick {0:?}, expected \"player|stat|over\" or \"player|stat|line|over\"")]
    MalformedPick(String),

    #[error("Username already exists: {0}")]
    UserExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    PasswordHash(#[from] bcrypt::BcryptError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
