use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "docuport")]
#[command(about = "Client for enterprise document repositories", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository server URL (overrides the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Organization name (overrides the config file)
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// User name (overrides the config file); password comes from
    /// DOCUPORT_PASSWORD
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Authenticate with a multi-use token instead of credentials
    /// (or set DOCUPORT_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List accessible containers
    #[command(alias = "ls")]
    Containers {
        /// Show only cabinets
        #[arg(long, conflicts_with = "trays")]
        cabinets: bool,

        /// Show only trays
        #[arg(long)]
        trays: bool,
    },

    /// Count the documents in a cabinet
    Count {
        /// Cabinet name (case-insensitive)
        cabinet: String,
    },

    /// Search a cabinet and list matching documents
    Search {
        /// Cabinet name (case-insensitive)
        cabinet: String,

        /// Conditions as FIELD=VALUE (repeatable)
        #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE")]
        conditions: Vec<String>,

        /// First item to return (0-based)
        #[arg(long, default_value_t = 0)]
        start: u64,

        /// Page size; omit to retrieve the complete result set
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Move a document from a container into a tray
    Move {
        /// Document id
        document: String,

        /// Source container name
        #[arg(long)]
        from: String,

        /// Destination tray name
        #[arg(long)]
        to: String,

        /// Drop all index values except the title
        #[arg(long)]
        drop_fields: bool,
    },

    /// Store a document from a tray into a cabinet
    Store {
        /// Document id
        document: String,

        /// Source tray name
        #[arg(long)]
        from: String,

        /// Destination cabinet name
        #[arg(long)]
        to: String,

        /// Index values as FIELD=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        values: Vec<String>,

        /// Let the server's content recognition fill in the index values
        #[arg(long, conflicts_with = "values")]
        auto: bool,

        /// Keep a copy addressable in the source tray
        #[arg(long, conflicts_with = "auto")]
        keep: bool,
    },

    /// Staple documents' content into one
    Staple {
        /// Container name
        container: String,

        /// Document ids (at least two)
        #[arg(required = true, num_args = 2..)]
        documents: Vec<String>,
    },

    /// Clip documents' content into one
    Clip {
        /// Container name
        container: String,

        /// Document ids (at least two)
        #[arg(required = true, num_args = 2..)]
        documents: Vec<String>,
    },

    /// Split a document's content in two
    Split {
        /// Container name
        container: String,

        /// Document id
        document: String,

        /// Page boundary for the second part
        #[arg(long)]
        at: u32,

        /// Name for the second part
        #[arg(long)]
        name: Option<String>,
    },

    /// Batch-update index fields across matching documents
    Update {
        /// Cabinet name (case-insensitive)
        cabinet: String,

        /// Conditions as FIELD=VALUE (repeatable)
        #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE")]
        conditions: Vec<String>,

        /// Values to apply as FIELD=VALUE (repeatable, at least one)
        #[arg(short, long = "set", value_name = "FIELD=VALUE", required = true)]
        values: Vec<String>,
    },

    /// Request a multi-use token for later logins
    Token {
        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        hours: u64,
    },

    /// Get or set connection configuration
    Config {
        /// Configuration key (server-url, organization, user-name)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
