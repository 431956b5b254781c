//! Command implementations
//!
//! Each handler resolves its inputs (flags, files, prompts), calls the
//! [`BarracksApi`] and renders the result to stdout. Status messages go to
//! stderr so `--json` output stays parseable.

use crate::api::BarracksApi;
use crate::auth;
use crate::cli::{Cli, Commands};
use crate::client::{create_http_client, EndpointClient};
use crate::config::{Config, Overrides};
use crate::endpoints::EndpointRegistry;
use crate::output::{self, OutputFormat};
use crate::stream::ResultStream;
use anyhow::Context as _;
use console::style;
use serde_json::Value;
use std::io;
use std::path::Path;

mod account;
mod fleet;
mod hooks;
mod packages;
mod tokens;
mod updates;

/// Everything a command needs to talk to the server
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration
    pub config: Config,
    /// Output format
    pub format: OutputFormat,
    client: EndpointClient,
}

impl Context {
    /// Build the context from the config file and command-line overrides
    pub fn from_overrides(overrides: &Overrides) -> anyhow::Result<Self> {
        let mut config = Config::load().context("Failed to load configuration")?;
        config.apply(overrides);
        Self::new(config)
    }

    /// Build the context from an explicit configuration
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        let registry = EndpointRegistry::from_base_url(&config.base_url)?;
        let client = EndpointClient::new(create_http_client(config.timeout_secs)?, registry);
        Ok(Self {
            format: OutputFormat::from_json_flag(config.json_output),
            config,
            client,
        })
    }

    /// Facade without credentials
    #[must_use]
    pub fn anonymous_api(&self) -> BarracksApi {
        BarracksApi::anonymous(self.client.clone())
    }

    /// Facade authenticated with the saved session or `BARRACKS_API_KEY`
    pub fn api(&self) -> anyhow::Result<BarracksApi> {
        let token = auth::require_token(&self.config.base_url)?;
        Ok(BarracksApi::authenticated(self.client.clone(), token))
    }

    /// Print a single-shot result
    pub fn render(&self, value: &Value) -> anyhow::Result<()> {
        output::render_value(value, self.format, &mut io::stdout().lock())?;
        Ok(())
    }

    /// Print every item of a paged result as the pages arrive
    pub async fn render_stream(&self, stream: ResultStream) -> anyhow::Result<()> {
        let mut renderer = output::renderer(self.format, io::stdout());
        stream.dispatch(renderer.as_mut()).await;
        renderer.finish()?;
        Ok(())
    }

    /// Print a status line to stderr
    pub fn status(&self, message: &str) {
        eprintln!("{} {message}", style("✓").green());
    }
}

/// Run the parsed command line
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_overrides(&cli.overrides())?;
    tracing::debug!(base_url = %ctx.config.base_url, timeout_secs = ctx.config.timeout_secs, "configuration resolved");

    match cli.command {
        Commands::Login { email } => account::login(&ctx, email).await,
        Commands::Logout => account::logout(&ctx),
        Commands::Whoami => account::whoami(&ctx).await,
        Commands::Update(command) => updates::run(&ctx, command).await,
        Commands::Package(command) => packages::run_package(&ctx, command).await,
        Commands::Version(command) => packages::run_version(&ctx, command).await,
        Commands::DeploymentPlan(command) => packages::run_deployment_plan(&ctx, command).await,
        Commands::Segment(command) => fleet::run_segment(&ctx, command).await,
        Commands::Filter(command) => fleet::run_filter(&ctx, command).await,
        Commands::Device(command) => fleet::run_device(&ctx, command).await,
        Commands::Hook(command) => hooks::run(&ctx, command).await,
        Commands::Token(command) => tokens::run(&ctx, command).await,
    }
}

/// Read and parse a JSON document from disk
pub(crate) fn read_json_file(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Parse JSON given inline on the command line
pub(crate) fn parse_json_arg(flag: &str, text: &str) -> anyhow::Result<Value> {
    serde_json::from_str(text).map_err(|e| {
        crate::CliError::InvalidArgument(format!("--{flag} is not valid JSON: {e}")).into()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::CliError;
    use serde_json::json;

    #[test]
    fn parse_json_arg_reports_flag() {
        assert_eq!(parse_json_arg("query", r#"{"a":1}"#).unwrap(), json!({"a": 1}));

        let err = parse_json_arg("query", "{oops").unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::InvalidArgument(msg) if msg.starts_with("--query")));
        assert_eq!(cli_err.exit_code(), 2);
    }

    #[test]
    fn read_json_file_adds_path_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"rules": []}"#).unwrap();
        assert_eq!(read_json_file(&path).unwrap(), json!({"rules": []}));

        let missing = dir.path().join("missing.json");
        let err = read_json_file(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn context_rejects_invalid_configuration() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(Context::new(config).is_err());

        let ctx = Context::new(Config {
            json_output: true,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(ctx.format, OutputFormat::Json);
    }
}
