// Command handlers.
//
// Each handler returns a typed result so it can be tested without a
// terminal. `execute` runs one parsed command, renders its result (or the
// failure message) and reports whether the operator cancelled a prompt.

use std::io::{self, Write};

use crate::api::PanelClient;
use crate::cli::{Commands, ListArgs, ServerCommands};
use crate::config::{Credential, CredentialStore};
use crate::error::PanelError;
use crate::models::{Account, PowerSignal, ResourceSnapshot, Server};
use crate::select::{select_server, Chooser};
use crate::ui;

/// How a command invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Finished, whether the panel call succeeded or a failure was reported.
    Completed,
    /// The operator interrupted an interactive prompt.
    Cancelled,
}

/// Exit status used when the operator interrupts a prompt.
pub const CANCELLED_EXIT: u8 = 130;

impl Status {
    /// Process exit status for this outcome. Handled failures still exit 0.
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Completed => 0,
            Status::Cancelled => CANCELLED_EXIT,
        }
    }
}

/// Load the stored credential or fail with `NotLoggedIn`.
pub fn require_credential(store: &CredentialStore) -> Result<Credential, PanelError> {
    store.load()?.ok_or(PanelError::NotLoggedIn)
}

/// Verify `api_key` against the panel and save it only if the panel
/// accepts it. The store is untouched on any failure.
pub fn login(client: &PanelClient, store: &CredentialStore, api_key: &str) -> Result<Account, PanelError> {
    let candidate = Credential::new(api_key).ok_or(PanelError::InvalidCredential)?;
    let account = ui::with_spinner("Verifying API key...", || client.account(&candidate))?;
    store.save(&candidate)?;
    Ok(account)
}

pub fn logout(store: &CredentialStore) -> Result<(), PanelError> {
    store.clear()
}

pub fn account(client: &PanelClient, store: &CredentialStore) -> Result<Account, PanelError> {
    let credential = require_credential(store)?;
    ui::with_spinner("Fetching account...", || client.account(&credential))
}

/// Servers matching `args`, at most `args.count`, in panel order.
pub fn list_servers(
    client: &PanelClient,
    store: &CredentialStore,
    args: &ListArgs,
) -> Result<Vec<Server>, PanelError> {
    let credential = require_credential(store)?;
    let servers = ui::with_spinner("Fetching servers...", || client.list_servers(&credential))?;
    Ok(filter_servers(servers, args))
}

pub fn filter_servers(servers: Vec<Server>, args: &ListArgs) -> Vec<Server> {
    servers
        .into_iter()
        .filter(|s| !args.mine || s.is_owned_by_caller)
        .filter(|s| !args.hide_suspended || !s.is_suspended)
        .take(args.count)
        .collect()
}

/// Details shown by `servers view`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerView {
    pub server: Server,
    pub snapshot: ResourceSnapshot,
}

/// Prompt for a server and fetch its details and live usage. `None` when
/// the account has no servers.
pub fn view_server(
    client: &PanelClient,
    store: &CredentialStore,
    chooser: &mut dyn Chooser,
) -> Result<Option<ServerView>, PanelError> {
    let credential = require_credential(store)?;
    let Some(identifier) = select_server(client, &credential, chooser)? else {
        return Ok(None);
    };
    let server = ui::with_spinner("Fetching server...", || client.server(&credential, &identifier))?;
    let snapshot = ui::with_spinner("Fetching usage...", || client.resources(&credential, &identifier))?;
    Ok(Some(ServerView { server, snapshot }))
}

/// What a power command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerReport {
    Sent(PowerSignal),
    AlreadyRunning,
    AlreadyStopped,
}

/// Prompt for a server and send `signal` to it.
///
/// `start` is skipped for a running or starting server and `stop` for a
/// stopped or stopping one; `restart` and `kill` are always sent.
pub fn power(
    client: &PanelClient,
    store: &CredentialStore,
    chooser: &mut dyn Chooser,
    signal: PowerSignal,
) -> Result<Option<PowerReport>, PanelError> {
    let credential = require_credential(store)?;
    let Some(identifier) = select_server(client, &credential, chooser)? else {
        return Ok(None);
    };

    if matches!(signal, PowerSignal::Start | PowerSignal::Stop) {
        let snapshot = ui::with_spinner("Checking server state...", || {
            client.resources(&credential, &identifier)
        })?;
        if signal == PowerSignal::Start && snapshot.current_state.is_up() {
            return Ok(Some(PowerReport::AlreadyRunning));
        }
        if signal == PowerSignal::Stop && snapshot.current_state.is_down() {
            return Ok(Some(PowerReport::AlreadyStopped));
        }
    }

    ui::with_spinner("Sending power signal...", || {
        client.send_power(&credential, &identifier, signal)
    })?;
    Ok(Some(PowerReport::Sent(signal)))
}

/// Run `command`, writing its report to `out`.
///
/// Panel and credential failures are written as messages and still count
/// as `Completed`. Only a cancelled prompt yields `Cancelled`; the caller
/// decides how the process ends in that case.
pub fn execute<W: Write>(
    out: &mut W,
    client: &PanelClient,
    store: &CredentialStore,
    chooser: &mut dyn Chooser,
    command: &Commands,
) -> io::Result<Status> {
    let result = match command {
        Commands::Login { api_key } => {
            let key = match api_key {
                Some(key) => Ok(key.clone()),
                None => ui::prompt_api_key(),
            };
            key.and_then(|key| login(client, store, &key)).and_then(|account| {
                render(out, ui::success(&format!("Successfully logged in as {}", account.email)))
            })
        }
        Commands::Logout => logout(store).and_then(|()| render(out, ui::success("Successfully logged out"))),
        Commands::Account => account(client, store).and_then(|account| render_account(out, &account)),
        Commands::Servers { command } => match command {
            ServerCommands::List(args) => {
                list_servers(client, store, args).and_then(|servers| render_list(out, &servers))
            }
            ServerCommands::View => view_server(client, store, chooser).and_then(|view| match view {
                Some(view) => render_view(out, &view),
                None => render(out, ui::failure("You have no servers.")),
            }),
            ServerCommands::Start => run_power(out, client, store, chooser, PowerSignal::Start),
            ServerCommands::Stop => run_power(out, client, store, chooser, PowerSignal::Stop),
            ServerCommands::Restart => run_power(out, client, store, chooser, PowerSignal::Restart),
            ServerCommands::Kill => run_power(out, client, store, chooser, PowerSignal::Kill),
        },
    };

    match result {
        Ok(()) => Ok(Status::Completed),
        Err(e) if e.is_cancellation() => Ok(Status::Cancelled),
        Err(e) => {
            writeln!(out, "{}", ui::failure(&e.to_string()))?;
            Ok(Status::Completed)
        }
    }
}

fn run_power<W: Write>(
    out: &mut W,
    client: &PanelClient,
    store: &CredentialStore,
    chooser: &mut dyn Chooser,
    signal: PowerSignal,
) -> Result<(), PanelError> {
    let message = match power(client, store, chooser, signal)? {
        None => ui::failure("You have no servers."),
        Some(PowerReport::AlreadyRunning) => ui::failure("This server is already running."),
        Some(PowerReport::AlreadyStopped) => ui::failure("This server is already stopped."),
        Some(PowerReport::Sent(signal)) => {
            let done = match signal {
                PowerSignal::Start => "started",
                PowerSignal::Stop => "stopped",
                PowerSignal::Restart => "restarted",
                PowerSignal::Kill => "killed",
            };
            ui::success(&format!("Successfully {done} server."))
        }
    };
    render(out, message)
}

// Terminal I/O shares the prompt error variant.
fn render<W: Write>(out: &mut W, line: String) -> Result<(), PanelError> {
    writeln!(out, "{line}").map_err(PanelError::Prompt)
}

fn render_account<W: Write>(out: &mut W, account: &Account) -> Result<(), PanelError> {
    render(out, ui::field("Email:", &account.email))?;
    render(out, ui::field("Username:", &account.username))?;
    if let Some(name) = account.full_name() {
        render(out, ui::field("Name:", name))?;
    }
    Ok(())
}

fn render_list<W: Write>(out: &mut W, servers: &[Server]) -> Result<(), PanelError> {
    if servers.is_empty() {
        return render(out, ui::failure("No servers to show."));
    }
    for server in servers {
        let mut line = format!("{} [{}]", server.name, server.identifier);
        if !server.is_owned_by_caller {
            line.push_str(" (shared)");
        }
        if server.is_suspended {
            line.push_str(" (suspended)");
        }
        render(out, ui::field("Name:", line))?;
    }
    Ok(())
}

fn render_view<W: Write>(out: &mut W, view: &ServerView) -> Result<(), PanelError> {
    let server = &view.server;
    let usage = &view.snapshot.resources;
    let limit = |value: Option<u64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

    render(out, ui::field("Name:", &server.name))?;
    render(out, ui::field("Current status:", view.snapshot.current_state.label()))?;
    render(out, ui::field("Owner:", server.is_owned_by_caller))?;
    render(
        out,
        ui::field("CPU Usage:", format!("{}/{}%", usage.cpu_absolute, limit(server.limits.cpu_percent()))),
    )?;
    render(
        out,
        ui::field("RAM Usage:", format!("{}/{}MB", mib(usage.memory_bytes), limit(server.limits.memory_mb()))),
    )?;
    render(
        out,
        ui::field("Disk Usage:", format!("{}/{}MB", mib(usage.disk_bytes), limit(server.limits.disk_mb()))),
    )?;
    render(out, ui::field("Network Usage (Inbound):", format!("{}MB", mib(usage.network_rx_bytes))))?;
    render(out, ui::field("Network Usage (Outbound):", format!("{}MB", mib(usage.network_tx_bytes))))
}

fn mib(bytes: u64) -> u64 {
    (bytes as f64 / 1024.0 / 1024.0).round() as u64
}
