use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, LOCATION, REFERER};
use session::cookies::{TOKEN_COOKIE, token_cookie_header};
use session::routes::DASHBOARD;
use session::{AuthApiError, AuthClient, CookieStorage, FileStorage, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no state directory; pass --state-dir or set BACKOFFICE_STATE_DIR")]
    NoStateDir,
    #[error("{0}")]
    Login(#[from] AuthApiError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("storage error: {0}")]
    Storage(#[from] session::StorageError),
}

#[derive(Parser, Debug)]
#[command(name = "backoffice", about = "Backoffice session client")]
struct Cli {
    /// Base URL of the auth API.
    #[arg(long, env = "BACKOFFICE_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Base URL of the guarded front-end server.
    #[arg(long, env = "BACKOFFICE_APP_URL", default_value = "http://127.0.0.1:3000")]
    app_url: String,

    /// Directory holding persisted session storage and cookies.
    #[arg(long, env = "BACKOFFICE_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Login request timeout in seconds. Unset means the transport default.
    #[arg(long, env = "BACKOFFICE_LOGIN_TIMEOUT_SECS")]
    login_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in against the auth API and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the persisted session.
    Logout,
    /// Show the restored session, if any.
    Whoami,
    /// Request a page from the front-end server with the session cookie and
    /// report what the route guard decided.
    Open {
        path: String,
        #[arg(long)]
        referer: Option<String>,
    },
}

struct CliContext {
    api_url: String,
    app_url: String,
    login_timeout_secs: Option<u64>,
    storage: Arc<FileStorage>,
    store: SessionStore,
}

impl CliContext {
    async fn open(cli: &Cli) -> Result<Self, CliError> {
        let dir = resolve_state_dir(cli.state_dir.clone())?;
        let storage = Arc::new(FileStorage::new(dir));
        let store = SessionStore::new(storage.clone(), storage.clone());
        store.restore().await;
        Ok(Self {
            api_url: cli.api_url.clone(),
            app_url: cli.app_url.clone(),
            login_timeout_secs: cli.login_timeout_secs,
            storage,
            store,
        })
    }
}

fn resolve_state_dir(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    directories::ProjectDirs::from("dev", "backoffice", "backoffice")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(CliError::NoStateDir)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CliContext::open(&cli).await?;

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, &email, &password).await,
        Command::Logout => run_logout(&ctx).await,
        Command::Whoami => {
            run_whoami(&ctx);
            Ok(())
        }
        Command::Open { path, referer } => run_open(&ctx, &path, referer.as_deref()).await,
    }
}

async fn run_login(ctx: &CliContext, email: &str, password: &str) -> Result<(), CliError> {
    let client = match ctx.login_timeout_secs {
        Some(secs) => AuthClient::with_timeout(&ctx.api_url, std::time::Duration::from_secs(secs))?,
        None => AuthClient::new(&ctx.api_url),
    };
    let session = ctx.store.login_with(&client, email, password).await?;
    println!("logged in as {} <{}>", session.name(), session.email());
    println!("continue at {}", join_url(&ctx.app_url, DASHBOARD));
    Ok(())
}

async fn run_logout(ctx: &CliContext) -> Result<(), CliError> {
    let next = ctx.store.logout().await;
    println!("logged out");
    println!("continue at {}", join_url(&ctx.app_url, next));
    Ok(())
}

fn run_whoami(ctx: &CliContext) {
    match ctx.store.session() {
        Some(session) => println!("{} <{}>", session.name(), session.email()),
        None => println!("not logged in"),
    }
}

async fn run_open(ctx: &CliContext, path: &str, referer: Option<&str>) -> Result<(), CliError> {
    let token = ctx.storage.get_cookie(TOKEN_COOKIE).await?;
    let outcome = fetch_guarded(&ctx.app_url, path, token.as_ref().map(|c| c.value()), referer).await?;
    println!("{}", outcome.status);
    if let Some(location) = outcome.location {
        println!("-> {location}");
    }
    Ok(())
}

/// Status and redirect target of a guarded page request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenOutcome {
    status: u16,
    location: Option<String>,
}

async fn fetch_guarded(
    app_url: &str,
    path: &str,
    token: Option<&str>,
    referer: Option<&str>,
) -> Result<OpenOutcome, CliError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(COOKIE, HeaderValue::from_str(&token_cookie_header(token))?);
    }
    if let Some(referer) = referer {
        headers.insert(REFERER, HeaderValue::from_str(referer)?);
    }

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(headers)
        .build()?;
    let response = client.get(join_url(app_url, path)).send().await?;

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    Ok(OpenOutcome { status: response.status().as_u16(), location })
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
