//! List screen presets.
//!
//! Every list screen runs the same [`ViewEngine`](backoffice_view::ViewEngine);
//! what differs is which fields are searched, which are offered as facets,
//! which columns are shown (and how they sort) and what goes into an export.
//! A [`ScreenPreset`] carries exactly that.

use std::fmt;
use std::str::FromStr;

use backoffice_view::{Direction, ExportSpec, FieldPath, SortConfig, SortKey, ValueKind};
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// The console's list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Users,
    Accounts,
    AccountTypes,
    Deposits,
    Withdrawals,
    Orders,
    Trades,
}

impl Screen {
    /// Every screen, in menu order.
    pub const ALL: [Screen; 7] = [
        Screen::Users,
        Screen::Accounts,
        Screen::AccountTypes,
        Screen::Deposits,
        Screen::Withdrawals,
        Screen::Orders,
        Screen::Trades,
    ];

    /// Command-line and config name.
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Users => "users",
            Screen::Accounts => "accounts",
            Screen::AccountTypes => "account-types",
            Screen::Deposits => "deposits",
            Screen::Withdrawals => "withdrawals",
            Screen::Orders => "orders",
            Screen::Trades => "trades",
        }
    }

    /// Human title.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Users => "Users",
            Screen::Accounts => "Trading accounts",
            Screen::AccountTypes => "Account types",
            Screen::Deposits => "Deposits",
            Screen::Withdrawals => "Withdrawals",
            Screen::Orders => "Orders",
            Screen::Trades => "Trades",
        }
    }

    /// Builds the preset for this screen.
    pub fn preset(self) -> Result<ScreenPreset> {
        let def = definition(self);
        let columns = def
            .columns
            .iter()
            .map(|&(header, path, kind)| Column::new(header, path, kind))
            .collect::<Result<Vec<_>>>()?;
        let search_paths = parse_all(def.search)?;
        let facets = parse_all(def.facets)?;

        let (sort_path, direction) = def.default_sort;
        let sort_field = FieldPath::parse(sort_path)?;
        let sort_kind = columns
            .iter()
            .find(|c| c.path == sort_field)
            .map(|c| c.kind)
            .unwrap_or_default();
        let default_sort = SortConfig::by(SortKey::new(sort_field, sort_kind, direction));

        let export = columns
            .iter()
            .fold(ExportSpec::new(), |spec, c| spec.column(c.header.clone(), c.path.clone()));

        Ok(ScreenPreset {
            screen: self,
            search_paths,
            facets,
            columns,
            default_sort,
            export,
        })
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| ConsoleError::UnknownScreen(s.to_string()))
    }
}

/// A displayed column: header, field and declared sort kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub path: FieldPath,
    pub kind: ValueKind,
}

impl Column {
    fn new(header: &str, path: &str, kind: ValueKind) -> Result<Self> {
        Ok(Column {
            header: header.to_string(),
            path: FieldPath::parse(path)?,
            kind,
        })
    }
}

/// Everything that makes one list screen different from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenPreset {
    pub screen: Screen,
    /// Fields the search box looks in.
    pub search_paths: Vec<FieldPath>,
    /// Fields offered as facet dropdowns.
    pub facets: Vec<FieldPath>,
    /// Table columns, left to right.
    pub columns: Vec<Column>,
    /// Sort applied when the screen opens.
    pub default_sort: SortConfig,
    /// Export file columns.
    pub export: ExportSpec,
}

impl ScreenPreset {
    /// Finds the column displaying `path`.
    pub fn column(&self, path: &FieldPath) -> Option<&Column> {
        self.columns.iter().find(|c| &c.path == path)
    }

    /// Declared sort kind for `path`; string for fields with no column.
    pub fn kind_of(&self, path: &FieldPath) -> ValueKind {
        self.column(path).map(|c| c.kind).unwrap_or_default()
    }

    /// Export file stem.
    pub fn entity(&self) -> &'static str {
        self.screen.as_str()
    }
}

fn parse_all(paths: &[&str]) -> Result<Vec<FieldPath>> {
    paths
        .iter()
        .map(|p| FieldPath::parse(p).map_err(ConsoleError::from))
        .collect()
}

struct Definition {
    search: &'static [&'static str],
    facets: &'static [&'static str],
    columns: &'static [(&'static str, &'static str, ValueKind)],
    default_sort: (&'static str, Direction),
}

fn definition(screen: Screen) -> Definition {
    use ValueKind::{Date, Number, String as Text};

    match screen {
        Screen::Users => Definition {
            search: &["firstName", "lastName", "email", "phone"],
            facets: &["status", "country"],
            columns: &[
                ("Id", "id", Number),
                ("First name", "firstName", Text),
                ("Last name", "lastName", Text),
                ("Email", "email", Text),
                ("Phone", "phone", Text),
                ("Country", "country", Text),
                ("Status", "status", Text),
                ("Registered", "createdAt", Date),
            ],
            default_sort: ("createdAt", Direction::Desc),
        },
        Screen::Accounts => Definition {
            search: &["accountNumber", "user.email", "user.firstName", "user.lastName"],
            facets: &["accountType.name", "currency", "status"],
            columns: &[
                ("Account", "accountNumber", Text),
                ("Owner", "user.email", Text),
                ("Type", "accountType.name", Text),
                ("Currency", "currency", Text),
                ("Balance", "balance", Number),
                ("Equity", "equity", Number),
                ("Leverage", "leverage", Number),
                ("Status", "status", Text),
                ("Opened", "createdAt", Date),
            ],
            default_sort: ("createdAt", Direction::Desc),
        },
        Screen::AccountTypes => Definition {
            search: &["name", "description"],
            facets: &["isActive"],
            columns: &[
                ("Name", "name", Text),
                ("Min deposit", "minDeposit", Number),
                ("Max leverage", "maxLeverage", Number),
                ("Spread", "spread", Number),
                ("Commission", "commission", Number),
                ("Active", "isActive", Text),
                ("Created", "createdAt", Date),
            ],
            default_sort: ("name", Direction::Asc),
        },
        Screen::Deposits => Definition {
            search: &["user.email", "account.accountNumber", "transactionId"],
            facets: &["status", "method", "currency"],
            columns: &[
                ("Id", "id", Number),
                ("Email", "user.email", Text),
                ("Account", "account.accountNumber", Text),
                ("Amount", "amount", Number),
                ("Currency", "currency", Text),
                ("Method", "method", Text),
                ("Transaction", "transactionId", Text),
                ("Status", "status", Text),
                ("Date", "createdAt", Date),
            ],
            default_sort: ("createdAt", Direction::Desc),
        },
        Screen::Withdrawals => Definition {
            search: &["user.email", "account.accountNumber", "walletAddress"],
            facets: &["status", "method", "currency"],
            columns: &[
                ("Id", "id", Number),
                ("Email", "user.email", Text),
                ("Account", "account.accountNumber", Text),
                ("Amount", "amount", Number),
                ("Currency", "currency", Text),
                ("Method", "method", Text),
                ("Wallet", "walletAddress", Text),
                ("Status", "status", Text),
                ("Date", "createdAt", Date),
            ],
            default_sort: ("createdAt", Direction::Desc),
        },
        Screen::Orders => Definition {
            search: &["symbol", "account.accountNumber", "user.email"],
            facets: &["side", "type", "status"],
            columns: &[
                ("Id", "id", Number),
                ("Account", "account.accountNumber", Text),
                ("Symbol", "symbol", Text),
                ("Side", "side", Text),
                ("Type", "type", Text),
                ("Volume", "volume", Number),
                ("Price", "price", Number),
                ("Status", "status", Text),
                ("Created", "createdAt", Date),
            ],
            default_sort: ("createdAt", Direction::Desc),
        },
        Screen::Trades => Definition {
            search: &["symbol", "account.accountNumber", "user.email"],
            facets: &["side", "symbol"],
            columns: &[
                ("Id", "id", Number),
                ("Account", "account.accountNumber", Text),
                ("Symbol", "symbol", Text),
                ("Side", "side", Text),
                ("Volume", "volume", Number),
                ("Open price", "openPrice", Number),
                ("Close price", "closePrice", Number),
                ("Profit", "profit", Number),
                ("Opened", "openedAt", Date),
                ("Closed", "closedAt", Date),
            ],
            default_sort: ("closedAt", Direction::Desc),
        },
    }
}
