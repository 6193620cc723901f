use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use feed_gateway::config::loader::ENV_SECRET;
use feed_gateway::security::X_AUTH_KEY;

#[derive(Parser)]
#[command(name = "feed-gateway-cli")]
#[command(about = "Command-line client for a running feed gateway", long_about = None)]
struct Cli {
    /// Base URL of the gateway.
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Shared secret; falls back to APP_SECRET.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and parse a feed, optionally projecting it with JSONPath
    Parse {
        /// Feed URL (must be on the gateway's allow-list)
        feed_url: String,

        /// JSONPath expression, e.g. `$.items[*].title`
        #[arg(long)]
        jq: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = cli.key.or_else(|| std::env::var(ENV_SECRET).ok()) {
        headers.insert(X_AUTH_KEY, HeaderValue::from_str(&key)?);
    }

    match cli.command {
        Commands::Parse { feed_url, jq } => {
            let mut query = vec![("url", feed_url)];
            if let Some(jq) = jq {
                query.push(("jq", jq));
            }

            let res = client
                .get(format!("{}/api/parse", cli.url.trim_end_matches('/')))
                .headers(headers)
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> anyhow::Result<()> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
