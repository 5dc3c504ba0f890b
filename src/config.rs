//! Process-wide configuration.
//!
//! Command-line flags fall back to environment variables (and a `.env` file
//! loaded by `main`). The parsed [`Args`] are resolved once into an explicit
//! [`Settings`] value that is shared read-only with every handler.

use clap::Parser;
use thiserror::Error;

const CI_API_KEY: &str = "dummy-key-for-ci";
const CI_DEPLOYMENT: &str = "gpt-4o";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "azure-chat-proxy",
    about = "Relays frontend chat requests to an Azure OpenAI deployment"
)]
pub struct Args {
    /// Shared Azure OpenAI API key.
    #[arg(long, env = "AZURE_OPENAI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Deployment used when a request does not name a model.
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT")]
    pub deployment: Option<String>,

    /// Azure OpenAI resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 9020)]
    pub port: u16,

    /// Check the API key against the deployment and exit.
    #[arg(long, default_value_t = false)]
    pub validate_key: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {name} (set {env})")]
    MissingRequired {
        name: &'static str,
        env: &'static str,
    },
}

/// Resolved settings. The API key is kept out of `Debug` output.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub deployment: String,
    pub endpoint: Option<String>,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("endpoint", &self.endpoint)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Settings {
    /// Outside CI, a missing key or deployment is fatal. Inside CI they
    /// fall back to placeholders so the server can boot without secrets.
    pub fn resolve(args: Args, ci: bool) -> Result<Self, ConfigError> {
        let api_key = non_empty(args.api_key);
        let deployment = non_empty(args.deployment);

        let (api_key, deployment) = if ci {
            (
                api_key.unwrap_or_else(|| CI_API_KEY.to_string()),
                deployment.unwrap_or_else(|| CI_DEPLOYMENT.to_string()),
            )
        } else {
            (
                api_key.ok_or(ConfigError::MissingRequired {
                    name: "api key",
                    env: "AZURE_OPENAI_KEY",
                })?,
                deployment.ok_or(ConfigError::MissingRequired {
                    name: "deployment",
                    env: "AZURE_OPENAI_DEPLOYMENT",
                })?,
            )
        };

        Ok(Self {
            api_key,
            deployment,
            endpoint: non_empty(args.endpoint),
            host: args.host,
            port: args.port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// True when running under a CI runner (`CI` or `GITHUB_ACTIONS` set).
pub fn detect_ci() -> bool {
    ["CI", "GITHUB_ACTIONS"]
        .iter()
        .any(|var| std::env::var(var).is_ok_and(|v| !v.is_empty()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
