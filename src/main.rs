use anyhow::{Context, Result};
use clap::Parser;
use restclient::{ClientConfig, ErrorMode, Response, RestClient, RestVerbs};
use serde_json::Value;

/// restc - a small REST client
///
/// Sends one request, follows redirects and prints the response body.
/// Non-success statuses are reported on stderr with a non-zero exit code
/// unless --error-mode=response is given.
///
/// Examples:
///   restc get https://api.example.com/items
///   restc -H "Accept: application/vnd.api+json" post https://api.example.com/items --data '{"name":"x"}'
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum number of redirects to follow (also via RESTC_MAX_REDIRECTS)
    #[arg(long, env = "RESTC_MAX_REDIRECTS", value_name = "N", global = true)]
    pub max_redirects: Option<u32>,

    /// Per-hop timeout in milliseconds (also via RESTC_TIMEOUT_MS)
    #[arg(long, env = "RESTC_TIMEOUT_MS", value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// What to do with non-success statuses (also via RESTC_ERROR_MODE)
    #[arg(long, env = "RESTC_ERROR_MODE", value_enum, global = true)]
    pub error_mode: Option<ErrorModeArg>,

    /// Extra request header, "Name: value"; may be repeated
    #[arg(
        short = 'H',
        long = "header",
        value_name = "HEADER",
        value_parser = parse_header,
        global = true
    )]
    pub headers: Vec<(String, String)>,

    /// User-Agent to send
    #[arg(long, value_name = "AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Print the status line and headers before the body
    #[arg(short = 'i', long, global = true)]
    pub include: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a GET request
    Get(UriArgs),

    /// Send a HEAD request
    Head(UriArgs),

    /// Send a DELETE request
    Delete(UriArgs),

    /// Send a POST request
    Post(PayloadArgs),

    /// Send a PUT request
    Put(PayloadArgs),

    /// Send a PATCH request
    Patch(PayloadArgs),
}

#[derive(clap::Args, Debug)]
pub struct UriArgs {
    #[arg(value_name = "URI")]
    pub uri: String,
}

#[derive(clap::Args, Debug)]
pub struct PayloadArgs {
    #[arg(value_name = "URI")]
    pub uri: String,

    /// Request body; JSON when it parses as JSON, text otherwise
    #[arg(long, short = 'd', value_name = "BODY")]
    pub data: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorModeArg {
    Throw,
    Response,
}

impl From<ErrorModeArg> for ErrorMode {
    fn from(arg: ErrorModeArg) -> Self {
        match arg {
            ErrorModeArg::Throw => ErrorMode::Throw,
            ErrorModeArg::Response => ErrorMode::Response,
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{}': expected \"Name: value\"", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid header '{}': empty name", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_payload(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
    }
}

impl Cli {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(max_redirects) = self.max_redirects {
            config = config.with_max_redirects(max_redirects);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        if let Some(mode) = self.error_mode {
            config = config.with_error_mode(mode.into());
        }
        if let Some(agent) = &self.user_agent {
            config = config.with_user_agent(agent.clone());
        }
        for (name, value) in &self.headers {
            config = config.with_default_header(name, value.clone());
        }
        config
    }
}

async fn execute(client: &dyn RestVerbs, command: &Commands) -> restclient::Result<Response> {
    match command {
        Commands::Get(args) => client.get(&args.uri, None, None).await,
        Commands::Head(args) => client.head(&args.uri, None, None).await,
        Commands::Delete(args) => client.delete(&args.uri, None, None).await,
        Commands::Post(args) => {
            let payload = parse_payload(args.data.as_deref());
            client.post(&args.uri, payload, None, None).await
        }
        Commands::Put(args) => {
            let payload = parse_payload(args.data.as_deref());
            client.put(&args.uri, payload, None, None).await
        }
        Commands::Patch(args) => {
            let payload = parse_payload(args.data.as_deref());
            client.patch(&args.uri, payload, None, None).await
        }
    }
}

fn render(response: &Response, include: bool) -> String {
    let mut out = String::new();
    if include {
        out.push_str(&format!("HTTP {}\n", response.status_code));
        for (name, value) in &response.headers {
            out.push_str(&format!("{}: {}\n", name, value));
        }
        out.push('\n');
    }

    match &response.data {
        Value::Null => {}
        Value::String(text) => out.push_str(text),
        document => out.push_str(
            &serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string()),
        ),
    }
    out
}

fn report(error: &restclient::Error) {
    if let Some(exception) = error.as_status() {
        for api_error in exception.errors() {
            eprintln!(
                "  {} {}: {}",
                api_error.status, api_error.code, api_error.title
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let client = RestClient::with_config(cli.config()).context("Failed to create client")?;

    match execute(&client, &cli.command).await {
        Ok(response) => {
            let out = render(&response, cli.include);
            if !out.is_empty() {
                println!("{}", out);
            }
            Ok(())
        }
        Err(error) => {
            report(&error);
            Err(error.into())
        }
    }
}
