use clap::Parser;

#[derive(Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[clap(long, env = "CONFIG_FILE", default_value = "config.yaml")]
    pub config_file: String,

    /// Shared secret for mutating requests. Overrides `api_key` from the configuration file.
    #[clap(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}
