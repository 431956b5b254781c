//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use crate::config::{Overrides, BASE_URL_ENV, TIMEOUT_ENV};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Barracks CLI - manage your IoT fleet from the terminal
#[derive(Parser, Debug)]
#[command(name = "barracks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage Barracks devices, updates and packages from the terminal")]
#[command(long_about = concat!(
    "Barracks CLI (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Manage devices, updates, packages and deployment plans of a Barracks account.\n\n",
    "Start with 'barracks login', then list resources with e.g. 'barracks update list'.\n",
    "Add --json to any command for machine-readable output."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Barracks server URL
    #[arg(long, global = true, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    pub timeout: Option<u64>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with Barracks
    ///
    /// Prompts for the account password and saves the session token to
    /// ~/.cache/barracks/session.json
    ///
    /// Example:
    ///   barracks login --email ops@example.com
    #[command(display_order = 1)]
    Login {
        /// Account email; prompted for when omitted
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the saved session
    #[command(display_order = 2)]
    Logout,

    /// Show the account the current token belongs to
    #[command(display_order = 3)]
    Whoami,

    /// Create, publish and inspect updates
    #[command(subcommand, display_order = 4)]
    Update(UpdateCommand),

    /// Manage packages
    #[command(subcommand, display_order = 5)]
    Package(PackageCommand),

    /// Manage package versions
    #[command(subcommand, display_order = 6)]
    Version(VersionCommand),

    /// Manage device segments
    #[command(subcommand, display_order = 7)]
    Segment(SegmentCommand),

    /// Manage saved device filters
    #[command(subcommand, display_order = 8)]
    Filter(FilterCommand),

    /// Inspect devices and their events
    #[command(subcommand, display_order = 9)]
    Device(DeviceCommand),

    /// Manage webhooks
    #[command(subcommand, display_order = 10)]
    Hook(HookCommand),

    /// Inspect and publish package deployment plans
    #[command(subcommand, display_order = 11)]
    DeploymentPlan(DeploymentPlanCommand),

    /// Manage personal API tokens
    #[command(subcommand, display_order = 12)]
    Token(TokenCommand),
}

/// `barracks update ...`
#[derive(Subcommand, Debug)]
pub enum UpdateCommand {
    /// List updates
    ///
    /// Examples:
    ///   barracks update list
    ///   barracks update list --until 5f1c...   # stop paging once this update is seen
    List {
        /// Stop fetching pages after the one containing this update
        #[arg(long)]
        until: Option<String>,
    },
    /// Show one update
    Get {
        /// Update UUID
        uuid: String,
    },
    /// Create a draft update
    ///
    /// Examples:
    ///   barracks update create --name "Spring rollout" --package-id app
    ///   barracks update create --file update.json
    Create(UpdateDraftArgs),
    /// Replace the content of a draft update
    Edit {
        /// Update UUID
        uuid: String,
        #[command(flatten)]
        draft: UpdateDraftArgs,
    },
    /// Publish an update
    Publish {
        /// Update UUID
        uuid: String,
    },
    /// Archive an update
    Archive {
        /// Update UUID
        uuid: String,
    },
    /// Schedule publication of an update
    ///
    /// Example:
    ///   barracks update schedule 5f1c... --at 2026-11-01T10:00:00Z
    Schedule {
        /// Update UUID
        uuid: String,
        /// Publication time (RFC 3339)
        #[arg(long)]
        at: String,
    },
}

/// Update content given as flags or as a JSON file
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateDraftArgs {
    /// JSON file with the whole update body
    #[arg(long, conflicts_with_all = ["name", "package_id", "description", "segment_id", "properties"])]
    pub file: Option<PathBuf>,
    /// Update name
    #[arg(long)]
    pub name: Option<String>,
    /// Package the update ships
    #[arg(long)]
    pub package_id: Option<String>,
    /// Update description
    #[arg(long)]
    pub description: Option<String>,
    /// Segment to target
    #[arg(long)]
    pub segment_id: Option<String>,
    /// Additional properties as inline JSON
    #[arg(long)]
    pub properties: Option<String>,
}

/// `barracks package ...`
#[derive(Subcommand, Debug)]
pub enum PackageCommand {
    /// List packages
    List,
    /// Show one package
    Get {
        /// Package reference
        reference: String,
    },
    /// Register a package
    Create {
        /// Package reference, e.g. io.barracks.app
        reference: String,
        /// Display name (defaults to the reference)
        #[arg(long)]
        name: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
}

/// `barracks version ...`
#[derive(Subcommand, Debug)]
pub enum VersionCommand {
    /// List versions of a package
    List {
        /// Package reference
        reference: String,
    },
    /// Show one version
    Get {
        /// Package reference
        reference: String,
        /// Version identifier
        version: String,
    },
    /// Upload a new version
    ///
    /// Example:
    ///   barracks version create app --id 1.0.2 --file build/firmware.bin
    Create {
        /// Package reference
        reference: String,
        /// Version identifier
        #[arg(long)]
        id: String,
        /// Display name (defaults to the identifier)
        #[arg(long)]
        name: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// JSON file with custom metadata
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Binary to upload
        #[arg(long)]
        file: PathBuf,
    },
}

/// `barracks segment ...`
#[derive(Subcommand, Debug)]
pub enum SegmentCommand {
    /// List segments
    List,
    /// Create a segment
    Create {
        /// Segment name
        name: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Set the evaluation order of segments
    ///
    /// Example:
    ///   barracks segment order s-2 s-1 s-3
    Order {
        /// Segment ids, highest priority first
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// List devices of a segment
    Devices {
        /// Segment id
        segment_id: String,
    },
}

/// `barracks filter ...`
#[derive(Subcommand, Debug)]
pub enum FilterCommand {
    /// List filters
    List,
    /// Show one filter
    Get {
        /// Filter name
        name: String,
    },
    /// Save a filter
    Create {
        /// Filter name
        name: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Delete a filter
    Delete {
        /// Filter name
        name: String,
    },
}

/// A device query given inline or as a file
#[derive(Args, Debug, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct QueryArgs {
    /// Device query as inline JSON
    #[arg(long)]
    pub query: Option<String>,
    /// JSON file containing the device query
    #[arg(long)]
    pub query_file: Option<PathBuf>,
}

/// `barracks device ...`
#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// List devices
    List {
        /// Only devices matching this JSON query
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one device
    Get {
        /// Device unit id
        unit_id: String,
    },
    /// List events reported by a device
    Events {
        /// Device unit id
        unit_id: String,
        /// Stop fetching once at least this many events are listed
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// `barracks hook ...`
#[derive(Subcommand, Debug)]
pub enum HookCommand {
    /// List webhooks
    List,
    /// Show one webhook
    Get {
        /// Hook name
        name: String,
    },
    /// Register a webhook
    Create(HookArgs),
    /// Replace a webhook
    Edit(HookArgs),
    /// Delete a webhook
    Delete {
        /// Hook name
        name: String,
    },
}

/// Webhook definition
#[derive(Args, Debug, Clone)]
pub struct HookArgs {
    /// Hook name
    pub name: String,
    /// Triggering event, e.g. ping or enrollment
    #[arg(long, default_value = "ping")]
    pub event_type: String,
    /// Receiver URL
    #[arg(long)]
    pub url: String,
}

/// `barracks deployment-plan ...`
#[derive(Subcommand, Debug)]
pub enum DeploymentPlanCommand {
    /// Show the deployment plan of a package
    Get {
        /// Package reference
        reference: String,
    },
    /// Publish a deployment plan from a JSON file
    Publish {
        /// Package reference
        reference: String,
        /// JSON file with the plan
        #[arg(long)]
        file: PathBuf,
    },
}

/// `barracks token ...`
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// List personal API tokens
    List,
    /// Issue a personal API token
    Create {
        /// Label shown in the token list
        label: String,
    },
    /// Revoke a personal API token
    Revoke {
        /// Token id
        token: String,
    },
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Parsed CLI arguments
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Configuration overrides given on the command line or in the environment
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            json_output: self.json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_work_after_subcommands() {
        let cli = Cli::try_parse_from([
            "barracks",
            "update",
            "list",
            "--json",
            "--base-url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
        assert!(matches!(
            cli.command,
            Commands::Update(UpdateCommand::List { until: None })
        ));
    }

    #[test]
    fn query_args_require_exactly_one_source() {
        assert!(Cli::try_parse_from(["barracks", "filter", "create", "eu"]).is_err());
        assert!(Cli::try_parse_from([
            "barracks",
            "filter",
            "create",
            "eu",
            "--query",
            "{}",
            "--query-file",
            "q.json"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["barracks", "filter", "create", "eu", "--query", "{}"]).is_ok());
    }

    #[test]
    fn update_file_conflicts_with_inline_fields() {
        assert!(Cli::try_parse_from([
            "barracks",
            "update",
            "create",
            "--file",
            "u.json",
            "--name",
            "x"
        ])
        .is_err());
    }

    #[test]
    fn deployment_plan_uses_kebab_case() {
        let cli = Cli::try_parse_from(["barracks", "deployment-plan", "get", "app"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::DeploymentPlan(DeploymentPlanCommand::Get { .. })
        ));
    }

    #[test]
    fn overrides_reflect_flags() {
        let cli = Cli::try_parse_from(["barracks", "--timeout", "5", "whoami"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.timeout_secs, Some(5));
        assert!(!overrides.json_output);
    }
}
