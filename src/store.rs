use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::mode::WagerMode;
use crate::settle::Settlement;
use crate::slip::{Pick, PickSlip};

/// Every new account starts with this much play money.
pub const DEFAULT_BALANCE: f64 = 1000.0;

fn default_balance() -> f64 {
    DEFAULT_BALANCE
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A settled slip as it's kept in an account's history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlipRecord {
    pub created_at: DateTime<Utc>,
    pub picks: Vec<Pick>,
    pub bet: f64,
    pub mode: WagerMode,
    pub won: bool,
    pub multiplier: f64,
    pub payout: f64,
}

impl SlipRecord {
    pub fn new(slip: &PickSlip, settlement: &Settlement) -> Self {
        Self {
            created_at: settlement.settled_at,
            picks: slip.picks().to_vec(),
            bet: settlement.bet,
            mode: settlement.mode,
            won: settlement.is_win(),
            multiplier: settlement.multiplier,
            payout: settlement.payout,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub username: String,

    #[serde(default)]
    pub email: String,

    /// bcrypt hash, empty for accounts created before passwords existed
    #[serde(default)]
    pub password_hash: String,

    #[serde(default = "default_balance")]
    pub balance: f64,

    #[serde(default = "now")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub picks_history: Vec<SlipRecord>,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        balance: f64,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            balance,
            created_at: Utc::now(),
            picks_history: Vec::new(),
        }
    }

    /// Whether `password` matches the stored hash. Accounts without a hash never match.
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        if self.password_hash.is_empty() {
            return Ok(false);
        }

        Ok(bcrypt::verify(password, &self.password_hash)?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct StoreData {
    #[serde(default)]
    users: BTreeMap<String, Account>,
}

/// Accounts kept in a single JSON file.
/// Usernames are matched without regard to case, and every change is written straight back.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    starting_balance: f64,
    hash_cost: u32,
    data: StoreData,
}

impl UserStore {
    /// Opens the store at `path`.
    /// A missing file is an empty store, a corrupted one is logged and replaced by an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "user database is corrupted, starting a new one");
                StoreData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(e) => return Err(Error::io(&path, e)),
        };

        Ok(Self {
            path,
            starting_balance: DEFAULT_BALANCE,
            hash_cost: bcrypt::DEFAULT_COST,
            data,
        })
    }

    /// Sets the balance newly registered accounts start with.
    pub fn with_starting_balance(mut self, balance: f64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the bcrypt cost used for new passwords.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the store back to disk, pretty-printed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))
    }

    // the stored key keeps the case it was registered with
    fn key_for(&self, username: &str) -> Option<String> {
        self.data
            .users
            .keys()
            .find(|key| key.to_lowercase() == username.to_lowercase())
            .cloned()
    }

    // changes the account in memory only once the whole store made it to disk
    fn update_account(&mut self, username: &str, change: impl FnOnce(&mut Account)) -> Result<()> {
        let key = self
            .key_for(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        let account = self
            .data
            .users
            .get_mut(&key)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        let previous = account.clone();
        change(account);

        if let Err(e) = self.save() {
            self.data.users.insert(key, previous);
            return Err(e);
        }

        Ok(())
    }

    pub fn register(&mut self, username: &str, password: &str, email: &str) -> Result<&Account> {
        if self.key_for(username).is_some() {
            return Err(Error::UserExists(username.to_string()));
        }

        let password_hash = bcrypt::hash(password, self.hash_cost)?;
        let account = Account::new(username, email, password_hash, self.starting_balance);
        self.data.users.insert(username.to_string(), account);

        if let Err(e) = self.save() {
            self.data.users.remove(username);
            return Err(e);
        }

        info!(username, "registered user");

        self.get(username)
    }

    /// Returns the account if `password` is right.
    /// An unknown user is reported the same way as a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&Account> {
        let account = self.get(username).map_err(|_| Error::InvalidCredentials)?;

        if !account.verify_password(password)? {
            warn!(username, "failed login");
            return Err(Error::InvalidCredentials);
        }

        Ok(account)
    }

    pub fn get(&self, username: &str) -> Result<&Account> {
        self.key_for(username)
            .and_then(|key| self.data.users.get(&key))
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    pub fn users(&self) -> impl Iterator<Item = &Account> {
        self.data.users.values()
    }

    pub fn update_balance(&mut self, username: &str, balance: f64) -> Result<()> {
        self.update_account(username, |account| account.balance = balance)?;

        info!(username, balance, "updated balance");
        Ok(())
    }

    pub fn add_to_history(&mut self, username: &str, record: SlipRecord) -> Result<()> {
        self.update_account(username, |account| account.picks_history.push(record))
    }

    /// Applies a settlement to an account: new balance and a history entry, in one write.
    pub fn record_settlement(
        &mut self,
        username: &str,
        slip: &PickSlip,
        settlement: &Settlement,
    ) -> Result<()> {
        let record = SlipRecord::new(slip, settlement);
        self.update_account(username, |account| {
            account.balance = settlement.balance_after;
            account.picks_history.push(record);
        })?;

        info!(username, balance = settlement.balance_after, "recorded settlement");
        Ok(())
    }

    pub fn history(&self, username: &str) -> Result<&[SlipRecord]> {
        Ok(&self.get(username)?.picks_history)
    }
}
