use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::domain::{AdminApi, AdminKey, CredentialStore, SessionPhase};
use crate::frameworks::config::ConsoleConfig;
use crate::interface_adapters::clients::AdminApiClient;
use crate::interface_adapters::commands::{Command, HELP, is_quit, parse_command};
use crate::interface_adapters::credentials::FileCredentialStore;
use crate::interface_adapters::render::{
    CHECKING_KEY, GRANTING, LOADING, prompt, render_view, revoking,
};
use crate::use_cases::{AdminSession, Console};

fn init_tracing() {
    // Keep the console readable by default; RUST_LOG opens it up.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return;
        }
    };
    tracing::debug!(
        api_base_url = %config.api_base_url,
        state_dir = %config.state_dir.display(),
        "console configured."
    );

    let api = match AdminApiClient::new(&config.api_base_url) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "failed to build admin API client");
            return;
        }
    };
    let store = FileCredentialStore::in_dir(&config.state_dir);
    let mut console = Console::new(AdminSession::new(api, store), config.default_days);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    // Report terminal errors rather than panicking.
    if let Err(e) = drive(&mut console, stdin, &mut stdout).await {
        tracing::error!(error = %e, "terminal error");
    }
}

// Event loop: one line in, one action, one redraw. Ends on `quit` or end of input.
pub async fn drive<A, S, R, W>(
    console: &mut Console<A, S>,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    A: AdminApi,
    S: CredentialStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.start().await;
    draw(console, output).await?;

    let mut lines = input.lines();
    loop {
        output
            .write_all(prompt(console.view().phase).as_bytes())
            .await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if console.view().phase != SessionPhase::Authenticated {
            if is_quit(&line) {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            status(output, CHECKING_KEY).await?;
            console.sign_in(AdminKey::new(line)).await;
            draw(console, output).await?;
            continue;
        }

        let command = match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                status(output, HELP).await?;
                continue;
            }
            Ok(command) => command,
            Err(e) => {
                status(output, &e.to_string()).await?;
                continue;
            }
        };

        apply(console, command, output).await?;
        draw(console, output).await?;
    }

    Ok(())
}

async fn apply<A, S, W>(
    console: &mut Console<A, S>,
    command: Command,
    output: &mut W,
) -> std::io::Result<()>
where
    A: AdminApi,
    S: CredentialStore,
    W: AsyncWrite + Unpin,
{
    match command {
        Command::Grant { email, days } => {
            if let Some(email) = email {
                console.set_email(email);
            }
            if let Some(days) = days {
                console.set_days(days);
            }
            if !console.view().email_input.trim().is_empty() {
                status(output, GRANTING).await?;
            }
            console.submit_grant().await;
        }
        Command::Email(email) => console.set_email(email),
        Command::Days(days) => console.set_days(days),
        Command::Revoke(email) => {
            status(output, &revoking(&email)).await?;
            console.revoke(&email).await;
        }
        Command::Refresh => {
            status(output, LOADING).await?;
            console.refresh().await;
        }
        Command::SignOut => console.sign_out(),
        Command::Redraw | Command::Help | Command::Quit => {}
    }
    Ok(())
}

async fn draw<A, S, W>(console: &Console<A, S>, output: &mut W) -> std::io::Result<()>
where
    A: AdminApi,
    S: CredentialStore,
    W: AsyncWrite + Unpin,
{
    let rendered = render_view(console.view(), Utc::now());
    output.write_all(b"\n").await?;
    output.write_all(rendered.as_bytes()).await?;
    output.flush().await
}

async fn status<W>(output: &mut W, message: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(message.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
