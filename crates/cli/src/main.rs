use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

use stockmaster_auth::PageContext;
use stockmaster_client::error::GENERIC_FAILURE;
use stockmaster_client::services::recovery::RecoverableResource;
use stockmaster_client::services::{dashboard, movements, products, recovery, reports, users, warehouses};
use stockmaster_client::transfer::{self, TransferDraft};
use stockmaster_client::{
    ActivitySignal, ApiClient, ClientConfig, ClientError, FileStore, InactivityTimer, Navigation,
    SessionGuard, navigate,
};
use stockmaster_core::{ProductId, WarehouseId};

mod output;

#[derive(Parser)]
#[command(name = "stockmaster", version, about = "Terminal client for the StockMaster inventory API")]
struct Cli {
    /// Backend base URL, including the `/api` prefix
    #[arg(long, env = "STOCKMASTER_API_URL")]
    api_url: Option<String>,

    /// Where the session is persisted between runs
    #[arg(long, env = "STOCKMASTER_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Output raw JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session
    Login {
        email: String,
        #[arg(long, env = "STOCKMASTER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Drop the persisted session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show what navigating to a view would render
    Open { path: String },
    /// List products
    Products,
    /// List warehouses
    Warehouses,
    /// List user accounts (administrators only)
    Users,
    /// Movement history
    Movements,
    /// Reports (administrators only)
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
    /// List soft-deleted records
    Inactive { resource: RecoverableResource },
    /// Restore soft-deleted records
    Restore {
        resource: RecoverableResource,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Transfer stock between warehouses
    Transfer {
        #[arg(long)]
        product: i64,
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
        #[arg(long)]
        quantity: i64,
        #[arg(long)]
        motive: String,
    },
    /// Interactive session with the inactivity timer armed
    Shell,
}

#[derive(Subcommand)]
enum ReportKind {
    LowStock,
    Movements {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: NaiveDate,
    },
    Sales,
    /// Dashboard counters
    Summary,
}

/// One line typed at the shell prompt.
#[derive(Parser)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

struct Ctx {
    guard: SessionGuard,
    config: ClientConfig,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    stockmaster_observability::init();

    let cli = Cli::parse();
    let ctx = build_context(&cli)?;

    match cli.command {
        Command::Shell => run_shell(&ctx).await,
        command => execute(&ctx, command).await,
    }
}

fn build_context(cli: &Cli) -> Result<Ctx> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(path) = &cli.session_file {
        config.session_file = Some(path.clone());
    }

    let path = match config.session_file.clone() {
        Some(path) => path,
        None => FileStore::default_path().context("no data directory found; pass --session-file")?,
    };
    tracing::debug!(session_file = %path.display(), api = %config.base_url, "client configured");

    let api = ApiClient::new(&config, Arc::new(FileStore::open(path)))?;
    Ok(Ctx {
        guard: SessionGuard::new(api),
        config,
        json: cli.json,
    })
}

fn friendly(err: ClientError) -> anyhow::Error {
    anyhow!(err.user_message(GENERIC_FAILURE))
}

/// Go through the route gate before touching the backend.
fn enter(ctx: &Ctx, path: &str) -> Result<PageContext> {
    match navigate(&ctx.guard, path) {
        Navigation::Render { context, .. } => Ok(context),
        Navigation::Denied { denied, .. } => bail!("{}", denied.notice()),
        Navigation::Redirect { .. } => bail!("session expired or missing, please log in"),
        Navigation::Public { .. } | Navigation::NotFound => bail!("{path} is not a protected view"),
    }
}

async fn execute(ctx: &Ctx, command: Command) -> Result<()> {
    let api = ctx.guard.api();

    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            let session = ctx.guard.login(&email, &password).await.map_err(friendly)?;
            println!("Logged in as {} ({})", session.user.display_name(), session.user.role);
        }
        Command::Logout => {
            ctx.guard.logout();
            println!("Logged out");
        }
        Command::Whoami => match ctx.guard.current_user() {
            Some(user) => output::emit(ctx.json, &user, |u| {
                println!("{} <{}>", u.display_name(), u.email.as_deref().unwrap_or("-"));
                println!("id {}  role {}", u.id, u.role);
            })?,
            None => bail!("not logged in"),
        },
        Command::Open { path } => {
            let nav = navigate(&ctx.guard, &path);
            output::emit(ctx.json, &nav, output::navigation)?;
        }
        Command::Products => {
            enter(ctx, "/products")?;
            let rows = products::list(api).await.map_err(friendly)?;
            output::emit(ctx.json, &rows, |r| output::products(r))?;
        }
        Command::Warehouses => {
            enter(ctx, "/warehouses")?;
            let rows = warehouses::list(api).await.map_err(friendly)?;
            output::emit(ctx.json, &rows, |r| output::warehouses(r))?;
        }
        Command::Users => {
            enter(ctx, "/users")?;
            let rows = users::list(api).await.map_err(friendly)?;
            output::emit(ctx.json, &rows, |r| output::users(r))?;
        }
        Command::Movements => {
            enter(ctx, "/movements")?;
            let rows = movements::history(api).await.map_err(friendly)?;
            output::emit(ctx.json, &rows, |r| output::movements(r))?;
        }
        Command::Report { kind } => {
            enter(ctx, "/reports")?;
            match kind {
                ReportKind::LowStock => {
                    let rows = reports::low_stock(api).await.map_err(friendly)?;
                    output::emit(ctx.json, &rows, |r| output::low_stock(r))?;
                }
                ReportKind::Movements { from, to } => {
                    if from > to {
                        bail!("--from must not be after --to");
                    }
                    let rows = reports::movements(api, from, to).await.map_err(friendly)?;
                    output::emit(ctx.json, &rows, |r| output::movement_report(r))?;
                }
                ReportKind::Sales => {
                    let rows = reports::sales(api).await.map_err(friendly)?;
                    output::emit(ctx.json, &rows, |r| output::sales(r))?;
                }
                ReportKind::Summary => {
                    let summary = dashboard::summary(api).await.map_err(friendly)?;
                    output::emit(ctx.json, &summary, output::dashboard)?;
                }
            }
        }
        Command::Inactive { resource } => {
            enter(ctx, "/recovery")?;
            let rows = recovery::inactive(api, resource).await.map_err(friendly)?;
            output::emit(ctx.json, &rows, |r| output::inactive(r))?;
        }
        Command::Restore { resource, ids } => {
            enter(ctx, "/recovery")?;
            recovery::restore(api, resource, &ids).await.map_err(friendly)?;
            println!("Restored {} {resource}", ids.len());
        }
        Command::Transfer { product, from, to, quantity, motive } => {
            enter(ctx, "/movements/transfer")?;
            let product = ProductId::new(product);
            let stock = products::stock_by_warehouse(api, product).await.map_err(friendly)?;
            let all = warehouses::active_list(api).await.map_err(friendly)?;
            let origins = transfer::available_origins(&stock, &all);

            let mut draft = TransferDraft::new();
            draft.select_product(product);
            draft.select_origin(WarehouseId::new(from));
            draft.select_destination(WarehouseId::new(to));
            draft.set_quantity(quantity);
            draft.set_motive(motive);

            let receipt = transfer::submit(&ctx.guard, &draft, &origins).await?;
            output::emit(ctx.json, &receipt, |r| match &r.transfer_reference {
                Some(reference) => println!("Transfer registered ({reference})"),
                None => println!("Transfer registered"),
            })?;
        }
        Command::Shell => bail!("already in a shell"),
    }
    Ok(())
}

fn prompt_password() -> Result<String> {
    rpassword::prompt_password("Password: ").context("failed to read password")
}

/// Split a shell line into arguments, honouring quotes.
///
/// `Ok(None)` for a blank line.
fn parse_shell_line(line: &str) -> Result<Option<ShellLine>> {
    let words = shlex::split(line).context("unbalanced quotes")?;
    if words.is_empty() {
        return Ok(None);
    }
    Ok(Some(ShellLine::try_parse_from(words)?))
}

async fn run_shell(ctx: &Ctx) -> Result<()> {
    let (expired_tx, mut expired) = oneshot::channel();
    let Some(timer) = InactivityTimer::start(ctx.guard.clone(), ctx.config.inactivity_timeout, move |event| {
        let _ = expired_tx.send(event);
    }) else {
        bail!("session expired or missing, please log in");
    };

    println!(
        "StockMaster shell. Idle sessions close after {}s. Type `exit` to leave.",
        ctx.config.inactivity_timeout.as_secs()
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = &mut expired => {
                let to = event.map(|e| e.redirect_to).unwrap_or(stockmaster_auth::LOGIN_PATH);
                println!("Session closed after inactivity. Redirecting to {to}");
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(()) };
                timer.record(ActivitySignal::KeyPress);

                if matches!(line.trim(), "exit" | "quit") {
                    return Ok(());
                }
                match parse_shell_line(&line) {
                    Ok(None) => continue,
                    Ok(Some(parsed)) => {
                        if let Err(err) = execute(ctx, parsed.command).await {
                            eprintln!("error: {err}");
                        }
                    }
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }
}
