use clap::Parser;
use labelgate_classifiers::ProviderMode;

#[derive(Parser, Debug, Default)]
#[command(name = "labelgate")]
#[command(
    author,
    version,
    about = "Text classification API with a chat-style web page"
)]
pub struct Cli {
    /// Configuration file path (ignored when missing)
    #[arg(short, long, default_value = "labelgate.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "PORT")]
    pub port: Option<u16>,

    /// Provider mode: local or remote
    #[arg(short, long, env = "LABELGATE_MODE", value_parser = parse_mode)]
    pub mode: Option<ProviderMode>,

    /// Model repository on the Hugging Face Hub
    #[arg(long, env = "LABELGATE_MODEL")]
    pub model: Option<String>,

    /// Base URL of the hosted inference API
    #[arg(long, env = "LABELGATE_API_BASE")]
    pub api_base: Option<String>,

    /// Bearer token for the hosted inference API
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_mode(s: &str) -> Result<ProviderMode, String> {
    s.parse()
}
