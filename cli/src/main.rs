//! `portal`: command line driver for the portal session.
//!
//! Runs the same `SessionManager` the application uses against a live
//! identity API, persisting the token in a local file instead of browser
//! storage. `smoke` exercises the login and profile endpoints end to end.


use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use session::api::{Credentials, HttpIdentityApi, IdentityApi};
use session::config::{SessionConfig, normalize_base};
use session::error::{ApiError, ConfigError, StorageError};
use session::manager::SessionManager;
use session::navigate::LogNavigator;
use session::storage::{FileStore, MemoryStore, TokenStore};
use session::{Session, token};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("identity api error: {0}")]
    Api(#[from] ApiError),
    #[error("token storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("no stored token; run `portal login` first")]
    NotSignedIn,
    #[error("token payload could not be decoded")]
    Undecodable,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("smoke test failed: {0} step(s) failed")]
    SmokeFailed(usize),
}

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Healthcare portal session CLI")]
struct Cli {
    /// Identity API base URL, e.g. `http://127.0.0.1:5000/api`.
    #[arg(long, env = "PORTAL_API_BASE")]
    api_base: Option<String>,

    /// File holding the stored token.
    #[arg(long, env = "PORTAL_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct CredentialArgs {
    /// Email or phone number.
    #[arg(long, env = "PORTAL_IDENTIFIER")]
    identifier: String,

    #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: String,
}

impl CredentialArgs {
    fn credentials(&self) -> Credentials {
        Credentials { identifier: self.identifier.clone(), password: self.password.clone() }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in, store the issued token and print the resolved session.
    Login(CredentialArgs),
    /// Resume the stored session and print it.
    Whoami,
    /// Resume the stored session and re-fetch the profile.
    Refetch,
    /// Forget the stored token.
    Logout,
    /// Print the payload of TOKEN, or of the stored token.
    Decode { token: Option<String> },
    /// Check the login and profile endpoints without touching the token file.
    Smoke(CredentialArgs),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = apply_overrides(SessionConfig::from_env()?, cli.api_base.as_deref(), cli.token_file);

    match cli.command {
        Command::Login(args) => run_login(&config, &args).await,
        Command::Whoami => run_whoami(&config).await,
        Command::Refetch => run_refetch(&config).await,
        Command::Logout => run_logout(&config),
        Command::Decode { token } => run_decode(&config, token),
        Command::Smoke(args) => run_smoke(&config, &args).await,
    }
}

/// Flags win over environment.
fn apply_overrides(mut config: SessionConfig, api_base: Option<&str>, token_file: Option<PathBuf>) -> SessionConfig {
    if let Some(api_base) = api_base {
        config.api_base = normalize_base(api_base);
    }
    if let Some(token_file) = token_file {
        config.token_file = token_file;
    }
    config
}

// =============================================================================
// SESSION COMMANDS
// =============================================================================

fn build_manager(config: &SessionConfig, store: Arc<dyn TokenStore>) -> Result<SessionManager, CliError> {
    let api = HttpIdentityApi::from_config(config)?;
    Ok(SessionManager::new(Arc::new(api), store, Arc::new(LogNavigator)))
}

fn file_store(config: &SessionConfig) -> Arc<FileStore> {
    Arc::new(FileStore::new(config.token_file.clone()))
}

async fn run_login(config: &SessionConfig, args: &CredentialArgs) -> Result<(), CliError> {
    let manager = build_manager(config, file_store(config))?;
    manager.login_with(&args.credentials()).await?;
    let session = manager.settled().await;
    print_json(&session_summary(&session))
}

async fn run_whoami(config: &SessionConfig) -> Result<(), CliError> {
    let store = file_store(config);
    if store.load()?.is_none() {
        return Err(CliError::NotSignedIn);
    }
    let manager = build_manager(config, store)?;
    let session = manager.ready().await;
    print_json(&session_summary(&session))
}

async fn run_refetch(config: &SessionConfig) -> Result<(), CliError> {
    let store = file_store(config);
    if store.load()?.is_none() {
        return Err(CliError::NotSignedIn);
    }
    let manager = build_manager(config, store)?;
    manager.ready().await;
    if let Some(resolution) = manager.refetch_user() {
        if let Err(e) = resolution.await {
            tracing::warn!(error = %e, "profile refetch task failed");
        }
    }
    print_json(&session_summary(&manager.snapshot()))
}

fn run_logout(config: &SessionConfig) -> Result<(), CliError> {
    let store = file_store(config);
    if store.load()?.is_none() {
        println!("not signed in");
        return Ok(());
    }
    store.clear()?;
    tracing::info!(path = %config.token_file.display(), "stored token removed");
    println!("signed out");
    Ok(())
}

fn run_decode(config: &SessionConfig, token: Option<String>) -> Result<(), CliError> {
    let token = match token {
        Some(token) => token,
        None => file_store(config).load()?.ok_or(CliError::NotSignedIn)?,
    };
    let claims = token::decode(Some(&token)).ok_or(CliError::Undecodable)?;
    print_json(&serde_json::to_value(&claims)?)
}

/// Printable view of a session. The raw token is never printed.
fn session_summary(session: &Session) -> Value {
    json!({
        "signed_in": session.token.is_some(),
        "authenticated": session.is_authenticated(),
        "role": session.role,
        "user": session.user,
        "loading": session.loading,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

// =============================================================================
// SMOKE
// =============================================================================

/// Outcome of one smoke step.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    name: &'static str,
    passed: bool,
    detail: String,
}

impl Step {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self { name, passed: true, detail: detail.into() }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self { name, passed: false, detail: detail.into() }
    }

    fn render(&self) -> String {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        format!("{verdict} {}: {}", self.name, self.detail)
    }
}

async fn run_smoke(config: &SessionConfig, args: &CredentialArgs) -> Result<(), CliError> {
    let api = HttpIdentityApi::from_config(config)?;
    println!("smoke against {}", api.base_url());
    let steps = smoke_steps(Arc::new(api), &args.credentials()).await;
    for step in &steps {
        println!("{}", step.render());
    }
    let failed = steps.iter().filter(|step| !step.passed).count();
    if failed > 0 {
        return Err(CliError::SmokeFailed(failed));
    }
    Ok(())
}

/// Login endpoint, token payload, profile endpoint, then a full session
/// resolution in memory. Stops at the first step later ones depend on.
async fn smoke_steps(api: Arc<dyn IdentityApi>, credentials: &Credentials) -> Vec<Step> {
    let mut steps = Vec::new();

    let issued = match api.login(credentials).await {
        Ok(response) => {
            steps.push(Step::pass("login", "token issued"));
            response.token
        }
        Err(e) => {
            steps.push(Step::fail("login", e.to_string()));
            return steps;
        }
    };

    let Some(role) = token::role_of(&issued) else {
        steps.push(Step::fail("decode", "token payload has no readable role"));
        return steps;
    };
    steps.push(Step::pass("decode", format!("role {role}")));

    match api.fetch_profile(&role, &issued).await {
        Ok(profile) => steps.push(Step::pass("profile", format!("{} -> {}", role.profile_path(), profile.display_name()))),
        Err(e) => steps.push(Step::fail("profile", format!("{}: {e}", role.profile_path()))),
    }

    let manager = SessionManager::new(api, Arc::new(MemoryStore::default()), Arc::new(LogNavigator));
    if let Some(resolution) = manager.login(issued) {
        if let Err(e) = resolution.await {
            tracing::warn!(error = %e, "profile resolution task failed");
        }
    }
    let session = manager.snapshot();
    match &session.user {
        Some(user) if session.is_authenticated() => steps.push(Step::pass("session", format!("signed in as {}", user.display_name()))),
        _ => steps.push(Step::fail("session", "profile did not resolve")),
    }

    steps
}
