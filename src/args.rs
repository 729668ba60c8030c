//! These structs provide the CLI interface for the wallet CLI.

use crate::model::{Amount, Polarity, TxDate, Weekday};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// wallet: a stale-while-revalidate transaction ledger.
///
/// The purpose of this program is to keep a durable local mirror of your
/// transaction ledger in sync with a remote wallet API. Reads are served from
/// the local cache immediately while the remote source is re-checked in the
/// background; writes go to the remote source first and the cache records
/// what it confirmed.
///
/// Point the wallet at a server with `wallet init --api-base-url <url>`, or
/// run the bundled mock server with `wallet serve` to try it out locally.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the wallet home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Decide what directory you
    /// want to store data in and pass it as --wallet-home (by default it will
    /// be $HOME/wallet), and pass the base address of your transaction API as
    /// --api-base-url.
    Init(InitArgs),
    /// List transactions, optionally filtered to one month.
    List(ListArgs),
    /// Add a transaction to the ledger.
    Add(AddArgs),
    /// Update an existing transaction by id.
    Update(UpdateArgs),
    /// Delete a transaction by id.
    Delete(DeleteArgs),
    /// Stay running and report ledger changes found by background refresh.
    Watch(WatchArgs),
    /// Run the bundled mock transaction API server.
    Serve(ServeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where wallet data and configuration is held. Defaults to
    /// ~/wallet
    #[arg(long, env = "WALLET_HOME", default_value_t = default_wallet_home())]
    wallet_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, wallet_home: PathBuf) -> Self {
        Self {
            log_level,
            wallet_home: wallet_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn wallet_home(&self) -> &DisplayPath {
        &self.wallet_home
    }
}

/// Args for the `wallet init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base address of the remote transaction API, e.g.
    /// http://localhost:8000
    #[arg(long, default_value = "http://localhost:8000")]
    api_base_url: String,
}

impl InitArgs {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

/// Args for the `wallet list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Only show transactions from this month (1-12). Combine with --year.
    #[arg(long)]
    month: Option<u32>,

    /// Only show transactions from this year.
    #[arg(long)]
    year: Option<i32>,
}

impl ListArgs {
    pub fn new(month: Option<u32>, year: Option<i32>) -> Self {
        Self { month, year }
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// Args for the `wallet add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Calendar date of the transaction, MM.DD.YYYY or YYYY-MM-DD.
    #[arg(long)]
    date: TxDate,

    /// Weekday override. Derived from --date when omitted.
    #[arg(long)]
    day: Option<Weekday>,

    /// Category label, e.g. Groceries. Free-form.
    #[arg(long)]
    category: String,

    /// Free-form note.
    #[arg(long)]
    note: Option<String>,

    /// Magnitude of the amount, e.g. 42.00. The sign comes from --income.
    #[arg(long)]
    amount: Amount,

    /// Record this as income rather than an expense.
    #[arg(long)]
    income: bool,
}

impl AddArgs {
    pub fn new(
        date: TxDate,
        category: impl Into<String>,
        amount: Amount,
        note: Option<String>,
        income: bool,
    ) -> Self {
        Self {
            date,
            day: None,
            category: category.into(),
            note,
            amount,
            income,
        }
    }

    pub fn date(&self) -> TxDate {
        self.date
    }

    pub fn day(&self) -> Option<Weekday> {
        self.day
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn polarity(&self) -> Polarity {
        if self.income {
            Polarity::Income
        } else {
            Polarity::Expense
        }
    }
}

/// Args for the `wallet update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// The id of the transaction to replace.
    #[arg(long)]
    id: String,

    /// Calendar date of the transaction, MM.DD.YYYY or YYYY-MM-DD.
    #[arg(long)]
    date: TxDate,

    /// Weekday override. Derived from --date when omitted.
    #[arg(long)]
    day: Option<Weekday>,

    /// Category label, e.g. Groceries. Free-form.
    #[arg(long)]
    category: String,

    /// Free-form note.
    #[arg(long)]
    note: Option<String>,

    /// Magnitude of the amount, e.g. 42.00. The sign comes from --income.
    #[arg(long)]
    amount: Amount,

    /// Record this as income rather than an expense.
    #[arg(long)]
    income: bool,
}

impl UpdateArgs {
    pub fn new(
        id: impl Into<String>,
        date: TxDate,
        category: impl Into<String>,
        amount: Amount,
        note: Option<String>,
        income: bool,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            day: None,
            category: category.into(),
            note,
            amount,
            income,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> TxDate {
        self.date
    }

    pub fn day(&self) -> Option<Weekday> {
        self.day
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn polarity(&self) -> Polarity {
        if self.income {
            Polarity::Income
        } else {
            Polarity::Expense
        }
    }
}

/// Args for the `wallet delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    #[arg(long)]
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `wallet watch` command.
#[derive(Debug, Parser, Clone)]
pub struct WatchArgs {
    /// Seconds between background refreshes. Defaults to the configured
    /// refresh period.
    #[arg(long)]
    period_secs: Option<u64>,
}

impl WatchArgs {
    pub fn new(period_secs: Option<u64>) -> Self {
        Self { period_secs }
    }

    pub fn period(&self) -> Option<Duration> {
        self.period_secs.map(Duration::from_secs)
    }
}

/// Args for the `wallet serve` command.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// The local port to serve the mock transaction API on.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

impl ServeArgs {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

fn default_wallet_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("wallet"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --wallet-home or WALLET_HOME instead of relying on the default \
                wallet home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("wallet")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_command() {
        let args = Args::parse_from([
            "wallet", "add", "--date", "2024-11-02", "--category", "Groceries", "--amount",
            "42.00", "--note", "Market run",
        ]);
        match args.command() {
            Command::Add(add) => {
                assert_eq!(add.date().to_string(), "11.02.2024");
                assert_eq!(add.category(), "Groceries");
                assert_eq!(add.polarity(), Polarity::Expense);
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_income_flag() {
        let args = Args::parse_from([
            "wallet", "add", "--date", "11.01.2024", "--category", "Salary", "--amount", "3000",
            "--income",
        ]);
        match args.command() {
            Command::Add(add) => assert_eq!(add.polarity(), Polarity::Income),
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_filter() {
        let args = Args::parse_from(["wallet", "list", "--month", "9", "--year", "2024"]);
        match args.command() {
            Command::List(list) => {
                assert_eq!(list.month(), Some(9));
                assert_eq!(list.year(), Some(2024));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_wallet_home_from_flag() {
        let args = Args::parse_from(["wallet", "--wallet-home", "/tmp/w", "list"]);
        assert_eq!(args.common().wallet_home().path(), Path::new("/tmp/w"));
    }
}
