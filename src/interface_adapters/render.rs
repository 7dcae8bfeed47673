use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::{DemoAccount, ModuleGrant, SessionPhase};
use crate::use_cases::{ConsoleView, Notice};

const DATE_FORMAT: &str = "%Y-%m-%d";

// Status lines printed while a request is outstanding. The view is only drawn
// once the request has settled, so these are the sole in-flight feedback.
pub const CHECKING_KEY: &str = "Checking admin key…";
pub const LOADING: &str = "Loading…";
pub const GRANTING: &str = "Granting…";

pub fn revoking(email: &str) -> String {
    format!("Revoking {email}…")
}

// Text rendering of a settled console view. `now` only feeds the "days left" column.
pub fn render_view(view: &ConsoleView, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    match view.phase {
        SessionPhase::Authenticated => render_dashboard(&mut out, view, now),
        SessionPhase::Unauthenticated | SessionPhase::Authenticating => {
            render_sign_in(&mut out, view)
        }
    }

    out
}

pub fn prompt(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Authenticated => "console> ",
        SessionPhase::Unauthenticated | SessionPhase::Authenticating => "admin key> ",
    }
}

fn render_sign_in(out: &mut String, view: &ConsoleView) {
    let _ = writeln!(out, "Demo access console");
    let _ = writeln!(out, "Enter the admin key to sign in (or `quit`).");
    if let Some(error) = &view.auth_error {
        let _ = writeln!(out, "✗ {error}");
    }
}

fn render_dashboard(out: &mut String, view: &ConsoleView, now: DateTime<Utc>) {
    let summary = view.summary();
    let _ = writeln!(out, "Demo access console");
    let _ = writeln!(out, "{} active · {} total", summary.active, summary.total);
    let _ = writeln!(out);

    if view.accounts.is_empty() {
        let _ = writeln!(out, "No demo accounts");
    } else {
        render_table(out, &view.accounts, now);
    }

    let _ = writeln!(out);
    let pending = if view.email_input.is_empty() {
        "-"
    } else {
        view.email_input.as_str()
    };
    let _ = writeln!(out, "Pending grant: {pending} for {} days", view.days_input);
    match &view.notice {
        Some(Notice::Success(message)) => {
            let _ = writeln!(out, "✓ {message}");
        }
        Some(Notice::Failure(message)) => {
            let _ = writeln!(out, "✗ {message}");
        }
        None => {}
    }
}

fn render_table(out: &mut String, accounts: &[DemoAccount], now: DateTime<Utc>) {
    let email_width = accounts
        .iter()
        .map(|account| account.email.chars().count())
        .max()
        .unwrap_or(0)
        .max("EMAIL".len());
    let modules: Vec<String> = accounts
        .iter()
        .map(|account| module_list(&account.modules))
        .collect();
    let modules_width = modules
        .iter()
        .map(|list| list.chars().count())
        .max()
        .unwrap_or(0)
        .max("MODULES".len());

    let _ = writeln!(
        out,
        "{:<email_width$}  {:<7}  {:<modules_width$}  {:<10}  TRIAL ENDS",
        "EMAIL", "STATUS", "MODULES", "GRANTED"
    );
    for (account, modules) in accounts.iter().zip(&modules) {
        let ends = account.trial_ends_at.format(DATE_FORMAT);
        let remaining = match account.days_left(now) {
            Some(days) => format!("{ends} ({days}d left)"),
            None => ends.to_string(),
        };
        let _ = writeln!(
            out,
            "{:<email_width$}  {:<7}  {:<modules_width$}  {:<10}  {}",
            account.email,
            status_badge(account),
            modules,
            account.granted_at.format(DATE_FORMAT).to_string(),
            remaining
        );
    }
}

fn status_badge(account: &DemoAccount) -> &'static str {
    if account.expired { "Expired" } else { "Active" }
}

fn module_list(modules: &[ModuleGrant]) -> String {
    if modules.is_empty() {
        return "-".to_string();
    }
    modules
        .iter()
        .map(|grant| {
            if grant.expired {
                format!("{} (expired)", grant.module)
            } else {
                grant.module.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
