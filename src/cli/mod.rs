// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::core::field::{ConstraintPatch, FieldConstraints};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// Sphere - Dynamic Schema Synchronization CLI
///
/// Define objects and fields at runtime and keep their physical tables in sync.
#[derive(Parser, Debug)]
#[command(name = "sphere")]
#[command(author = "Sphere Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dynamic schema synchronization CLI tool")]
#[command(long_about = "Sphere - Dynamic Schema Synchronization CLI

Define logical objects at runtime, attach typed fields to them, and let
Sphere keep a physical table per object in sync with the field metadata.

Supported databases: PostgreSQL, SQLite")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Initialize a configuration:   sphere init --dialect sqlite
  2. Install metadata tables:      sphere setup
  3. Create an object:             sphere object create \"Customer Feedback\"
  4. Add a field:                  sphere field add --object 1 --name email --label Email --type email
  5. Insert a record:              sphere record insert --object 1 --data '{\"email\":\"a@example.com\"}'

For detailed help on each command, use: sphere <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target environment
    #[arg(short, long, global = true, default_value = "development")]
    pub env: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a new configuration file
    ///
    /// EXAMPLES:
    ///   # Initialize with SQLite
    ///   sphere init --dialect sqlite
    ///
    ///   # Overwrite an existing configuration
    ///   sphere init --dialect postgresql --force
    Init {
        /// Database dialect (postgresql, sqlite)
        #[arg(short, long, value_name = "DIALECT")]
        dialect: String,

        /// Database name (file path for SQLite)
        #[arg(long, value_name = "NAME")]
        database: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Install the metadata tables (idempotent)
    Setup,

    /// Manage objects
    #[command(subcommand)]
    Object(ObjectCommands),

    /// Manage fields of an object
    #[command(subcommand)]
    Field(FieldCommands),

    /// Manage records of an object
    #[command(subcommand)]
    Record(RecordCommands),
}

/// object サブコマンド
#[derive(Subcommand, Debug, Clone)]
pub enum ObjectCommands {
    /// Create an object
    Create {
        /// Object name
        name: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Explicit physical table name
        #[arg(long, value_name = "TABLE")]
        table: Option<String>,
    },

    /// List objects
    List,

    /// Show an object (uuid, numeric id or name)
    Get {
        /// Object uuid, id or name
        object: String,
    },

    /// Rename an object or change its description
    Update {
        /// Object uuid or id
        object: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Soft-delete an object (the physical table is kept)
    Delete {
        /// Object uuid or id
        object: String,
    },
}

/// field サブコマンド
#[derive(Subcommand, Debug, Clone)]
pub enum FieldCommands {
    /// Add a field and materialize its column
    Add {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,

        /// Field name
        #[arg(long)]
        name: String,

        /// Display label
        #[arg(long)]
        label: String,

        /// Field type (short_text, long_text, number, checkbox, dropdown, radio, email, star_rating)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        field_type: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Display order (appended when omitted)
        #[arg(long)]
        order: Option<i64>,

        #[command(flatten)]
        constraints: ConstraintArgs,
    },

    /// List fields in display order
    List {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,
    },

    /// Rename, retype or reorder a field
    Update {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,

        /// Field uuid
        field: String,

        /// New field name
        #[arg(long)]
        name: Option<String>,

        /// New display label
        #[arg(long)]
        label: Option<String>,

        /// New field type
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        field_type: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New display order
        #[arg(long)]
        order: Option<i64>,

        #[command(flatten)]
        constraints: ConstraintArgs,
    },

    /// Delete a field and drop its column
    Delete {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,

        /// Field uuid
        field: String,
    },
}

/// record サブコマンド
#[derive(Subcommand, Debug, Clone)]
pub enum RecordCommands {
    /// List records
    List {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,
    },

    /// Insert a record from a JSON object
    Insert {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,

        /// Record payload, e.g. '{"email":"a@example.com"}'
        #[arg(long)]
        data: String,
    },

    /// Delete a record
    Delete {
        /// Object uuid or id
        #[arg(short, long)]
        object: String,

        /// Record uuid
        record: String,
    },
}

/// 型固有の制約オプション
#[derive(Args, Debug, Clone, Default)]
pub struct ConstraintArgs {
    /// Maximum text length
    #[arg(long)]
    pub max_length: Option<i64>,

    /// Minimum numeric value
    #[arg(long, allow_hyphen_values = true)]
    pub min_value: Option<f64>,

    /// Maximum numeric value
    #[arg(long, allow_hyphen_values = true)]
    pub max_value: Option<f64>,

    /// Allow decimals (true or false)
    #[arg(long, value_name = "BOOL")]
    pub allow_decimal: Option<bool>,

    /// Number of decimal places (0-10)
    #[arg(long)]
    pub decimal_places: Option<i64>,

    /// Default value
    #[arg(long)]
    pub default_value: Option<String>,

    /// Render as markdown (true or false)
    #[arg(long, value_name = "BOOL")]
    pub markdown: Option<bool>,
}

impl ConstraintArgs {
    /// 追加時の制約（未指定は既定値）
    pub fn to_constraints(&self) -> FieldConstraints {
        FieldConstraints {
            max_length: self.max_length,
            min_value: self.min_value,
            max_value: self.max_value,
            allow_decimal: self.allow_decimal.unwrap_or(false),
            decimal_places: self.decimal_places,
            default_value: self.default_value.clone(),
            markdown: self.markdown.unwrap_or(false),
        }
    }

    /// 更新時の制約パッチ（未指定は変更しない）
    pub fn to_patch(&self) -> ConstraintPatch {
        ConstraintPatch {
            max_length: self.max_length,
            min_value: self.min_value,
            max_value: self.max_value,
            allow_decimal: self.allow_decimal,
            decimal_places: self.decimal_places,
            default_value: self.default_value.clone(),
            markdown: self.markdown,
        }
    }
}
