use crate::cli_args::Cli;
use anyhow::{Result, bail};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://models.inference.ai.azure.com";
pub const DEFAULT_MODEL: &str = "meta-llama-3-70b-instruct";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Final resolved configuration for the completion client.
#[derive(Clone)]
pub struct Config {
    pub endpoint: String,
    /// Bearer credential. `None` is reported by the client when it is first used.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
}

impl Config {
    /// Build the final config from CLI flags, which clap already merged with
    /// environment variables and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--endpoint`, `--api-key`)
    ///   2. Env vars `COMMITDRAFT_MODEL`, `COMMITDRAFT_ENDPOINT`, `GITHUB_TOKEN`
    ///   3. Hardcoded defaults
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::new(&cli.endpoint, cli.api_key.clone(), &cli.model, cli.temperature)
    }

    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        model: &str,
        temperature: f64,
    ) -> Result<Self> {
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            bail!("the completion endpoint must not be empty");
        }

        let model = model.trim().to_string();
        if model.is_empty() {
            bail!("the model name must not be empty");
        }

        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            bail!("temperature must be between 0 and 2, got {temperature}");
        }

        let api_key = api_key.filter(|k| !k.trim().is_empty());

        Ok(Config {
            endpoint,
            api_key,
            model,
            temperature,
            timeout: REQUEST_TIMEOUT,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}
