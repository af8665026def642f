//! These structs provide the CLI interface for the siteledger CLI.

use crate::model::{Amount, SortOrder};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// siteledger: A command-line tool for keeping a construction expense ledger.
///
/// The ledger lives in a Google Sheet. This program records expenses (date,
/// description, vendor, bill number, amount) into the sheet, shows them sorted by
/// date with a running count and total, and can re-sort the sheet or replace it with
/// an edited table.
///
/// You will need a Google Sheets OAuth client credentials file for this. Run
/// 'siteledger init' once, then 'siteledger auth' to authorize access to your sheet.
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
    /// Create the data directory and initialize the configuration files.
    ///
    /// This is the first command you should run. You need two things ready
    /// beforehand: the URL of the Google Sheet that will hold the ledger, and your
    /// downloaded OAuth client credentials file.
    Init(InitArgs),
    /// Authorize access to the Google Sheet via OAuth.
    Auth(AuthArgs),
    /// Record a new expense in the ledger.
    Add(AddArgs),
    /// Show the ledger sorted newest-first, with entry count and total amount.
    List,
    /// Re-sort the ledger by date and rewrite the serial numbers.
    Sort(SortArgs),
    /// Replace the whole ledger with an edited table read from a CSV file.
    Save(SaveArgs),
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

    /// The directory where siteledger data and configuration is held.
    /// Defaults to ~/siteledger
    #[arg(long, env = "SITELEDGER_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// The ledger username, required for the data commands.
    #[arg(long, env = "SITELEDGER_USER")]
    username: Option<String>,

    /// The ledger password, required for the data commands.
    #[arg(long, env = "SITELEDGER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Common {
    pub fn new(
        log_level: LevelFilter,
        home: PathBuf,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            log_level,
            home: home.into(),
            username,
            password,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Args for the `siteledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of your Google Sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your downloaded OAuth client credentials. This file will be moved
    /// to the default secrets location in the data directory.
    #[arg(long)]
    client_secret: PathBuf,

    /// The tab within the spreadsheet that holds the ledger. Defaults to Sheet1.
    #[arg(long)]
    sheet_name: Option<String>,

    /// The ledger username to configure. When given together with --password, the
    /// login credentials file is written.
    #[arg(long)]
    username: Option<String>,

    /// The ledger password to configure.
    #[arg(long)]
    password: Option<String>,
}

impl InitArgs {
    pub fn new(
        sheet_url: impl Into<String>,
        client_secret: impl Into<PathBuf>,
        sheet_name: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            client_secret: client_secret.into(),
            sheet_name,
            username,
            password,
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn client_secret(&self) -> &Path {
        &self.client_secret
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Args for the `siteledger auth` command.
#[derive(Debug, Parser, Clone)]
pub struct AuthArgs {
    /// Verify the stored token by reading the sheet instead of running the consent
    /// flow.
    #[arg(long)]
    verify: bool,
}

impl AuthArgs {
    pub fn new(verify: bool) -> Self {
        Self { verify }
    }

    pub fn verify(&self) -> bool {
        self.verify
    }
}

/// Args for the `siteledger add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The expense date in DD/MM/YYYY format. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// What was purchased.
    #[arg(long)]
    description: String,

    /// Who it was purchased from.
    #[arg(long)]
    vendor: String,

    /// The bill number, recorded as "N/A" when omitted.
    #[arg(long)]
    bill_number: Option<String>,

    /// The amount paid. Must be greater than zero.
    #[arg(long)]
    amount: Amount,

    /// The order to leave the sheet in after inserting.
    #[arg(long, value_enum, default_value_t = SortOrder::NewestFirst)]
    order: SortOrder,
}

impl AddArgs {
    pub fn new(
        date: Option<String>,
        description: impl Into<String>,
        vendor: impl Into<String>,
        bill_number: Option<String>,
        amount: Amount,
        order: SortOrder,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            vendor: vendor.into(),
            bill_number,
            amount,
            order,
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn bill_number(&self) -> Option<&str> {
        self.bill_number.as_deref()
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

/// Args for the `siteledger sort` command.
#[derive(Debug, Parser, Clone)]
pub struct SortArgs {
    /// The direction to sort the ledger in.
    #[arg(long, value_enum, default_value_t = SortOrder::NewestFirst)]
    order: SortOrder,
}

impl SortArgs {
    pub fn new(order: SortOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

/// Args for the `siteledger save` command.
#[derive(Debug, Parser, Clone)]
pub struct SaveArgs {
    /// A CSV file containing the full replacement table: the header row followed by
    /// the data rows.
    #[arg(long)]
    file: PathBuf,
}

impl SaveArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("siteledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SITELEDGER_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("siteledger")
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
