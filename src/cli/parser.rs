use clap::{Parser, Subcommand};

/// Command-line interface definition for rOvertime
/// Record, filter, sort and paginate overtime entries stored in SQLite
#[derive(Parser)]
#[command(
    name = "rovertime",
    version = env!("CARGO_PKG_VERSION"),
    about = "Overtime entry tracker: record, filter, sort and paginate overtime entries using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Record a new overtime entry
    Add {
        #[arg(long, help = "Who worked the overtime")]
        person: String,

        #[arg(long, help = "Start (YYYY-MM-DD HH:MM)")]
        start: String,

        #[arg(long, help = "Finish (YYYY-MM-DD HH:MM), after the start")]
        finish: String,

        #[arg(long, short = 'd', help = "What the overtime was for")]
        description: String,

        #[arg(long, help = "Pending (default), Compensated or \"Not Compensated\"")]
        status: Option<String>,
    },

    /// Replace every field of an existing entry
    Edit {
        id: i64,

        #[arg(long)]
        person: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        finish: String,

        #[arg(long, short = 'd')]
        description: String,

        #[arg(long)]
        status: String,
    },

    /// Change only the status of an entry
    Status {
        id: i64,

        /// Pending, Compensated or "Not Compensated"
        status: String,
    },

    /// Delete an entry by ID
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Show a single entry
    Show { id: i64 },

    /// List entries: filter, sort and paginate
    List {
        #[arg(long, short = 's', help = "Case-insensitive text in person or description")]
        search: Option<String>,

        #[arg(long, help = "all, Pending, Compensated or \"Not Compensated\"")]
        status: Option<String>,

        #[arg(long = "sort-field", help = "created_at, start_time, finish_time or duration")]
        sort_field: Option<String>,

        #[arg(long = "sort-order", help = "asc or desc")]
        sort_order: Option<String>,

        #[arg(long = "per-page", help = "Entries per page (1-100)")]
        per_page: Option<String>,

        #[arg(long, short = 'p', help = "Page number (1-based)")]
        page: Option<String>,

        #[arg(long, help = "Print the page envelope as JSON")]
        json: bool,
    },

    /// Interactive listing with live search and page navigation
    Browse,

    /// Run the HTTP server
    Serve {
        #[arg(long, help = "Bind address (default from config: 127.0.0.1:8080)")]
        addr: Option<String>,
    },
}
