//! CLI argument definitions.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resources` | Show the resource routing table |
//! | `list` | List a resource, optionally pulling every page |
//! | `add` | Create entities (POST) |
//! | `update` | Update entities (PUT) |
//! | `delete` | Delete entities (DELETE) |
//! | `report` | Run a report |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--base-url` | `https://rest.tsheets.com/api` | API root |
//! | `--api-version` | `v1` | API version segment |
//! | `--timeout-ms` | `30000` | Per-request timeout |
//! | `--requests-per-minute` | unset | Pace requests across the whole run |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! The bearer token is read from `TSHEETS_BEARER_TOKEN`.
//!
//! # Examples
//!
//! ```bash
//! tsheets list users -p active=both --all
//! tsheets add users --data '{"data":[{"username":"jdoe","first_name":"J","last_name":"Doe"}]}'
//! tsheets delete timesheets -p ids=135,136
//! tsheets report current_totals --data '{"data":{"on_the_clock":"yes"}}'
//! ```

use clap::{Args, Parser, Subcommand};

/// Command-line client for the TSheets REST API.
#[derive(Debug, Parser)]
#[command(
    name = "tsheets",
    author,
    version,
    about = "Command-line client for the TSheets REST API",
    long_about = "List, create, update and delete TSheets resources and run reports.\n\
\n\
Authentication uses the TSHEETS_BEARER_TOKEN environment variable.\n\
Set RUST_LOG=tsheets_core=debug to see every HTTP round trip."
)]
pub struct Cli {
    /// API root, without the version segment.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API version segment appended to the base URL.
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Shared request budget for this run.
    #[arg(long, global = true)]
    pub requests_per_minute: Option<u32>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every resource with its path, response key and verbs, plus reports.
    Resources,

    /// List a resource.
    ///
    /// Without --all only the requested page is fetched; the output's
    /// `more` field says whether further pages exist.
    ///
    /// # Examples
    ///
    ///   tsheets list users
    ///   tsheets list timesheets -p start_date=2024-01-01 --all
    ///   tsheets list jobcodes --page 3
    List(ListArgs),

    /// Create entities. The --data object is sent as the JSON body.
    Add(WriteArgs),

    /// Update entities. The --data object is sent as the JSON body.
    Update(WriteArgs),

    /// Delete entities. Parameters travel on the query string.
    Delete(DeleteArgs),

    /// Run a report (payroll, payroll_by_jobcode, project, current_totals).
    Report(ReportArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Resource name, e.g. users or timesheets.
    pub resource: String,

    /// Query parameter as key=value; repeatable.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Page to start from.
    #[arg(long)]
    pub page: Option<u64>,

    /// Keep pulling pages until the server reports no more.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Upper bound on pages fetched with --all.
    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// Arguments for `add` and `update`.
#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Resource name.
    pub resource: String,

    /// JSON object sent as the request body.
    #[arg(long)]
    pub data: String,
}

/// Arguments for the `delete` command.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Resource name.
    pub resource: String,

    /// Query parameter as key=value; repeatable.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", required = true)]
    pub params: Vec<String>,
}

/// Arguments for the `report` command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report kind.
    pub kind: String,

    /// JSON object sent as the request body.
    #[arg(long)]
    pub data: Option<String>,
}
