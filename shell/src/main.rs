use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use todo_core::{Insertion, TodoApp, TodoClient, Transport};
use tracing_subscriber::EnvFilter;

use todo_shell::command::{Command, USAGE};
use todo_shell::render;
use todo_shell::transport::UreqTransport;

/// Terminal client for the todo service.
#[derive(Parser, Debug)]
#[command(name = "todo-shell", version, about)]
struct Cli {
    /// Base URL of the todo API.
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:5000")]
    base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TODO_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Where new todos appear: append or prepend.
    #[arg(long, default_value = "append")]
    insert: Insertion,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let transport = UreqTransport::new(Duration::from_secs(cli.timeout_secs));
    let mut app = TodoApp::new(TodoClient::new(&cli.base_url), cli.insert);
    tracing::info!(base_url = %cli.base_url, "starting todo shell");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    app.mount(&transport, Instant::now());
    write!(out, "{}", render::Screen(&app))?;
    writeln!(out, "type `help` for commands")?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read command")?;
        let now = Instant::now();
        app.tick(now);

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(out, "{USAGE}")?,
            Ok(cmd) => {
                if let Err(msg) = dispatch(&mut app, &transport, cmd, now) {
                    writeln!(out, "{msg}")?;
                }
            }
            Err(err) => writeln!(out, "{err}\n{USAGE}")?,
        }
        write!(out, "{}", render::Screen(&app))?;
        out.flush()?;
    }
    Ok(())
}

/// Apply one command to the app. Errors are user-facing hints.
fn dispatch<T: Transport>(
    app: &mut TodoApp,
    transport: &T,
    cmd: Command,
    now: Instant,
) -> Result<(), String> {
    match cmd {
        Command::Add(text) => {
            app.set_input(text);
            app.submit(transport, now);
        }
        Command::Done(n) => {
            let id = row_id(app, n)?;
            app.complete(transport, &id, now);
        }
        Command::Remove(n) => {
            let id = row_id(app, n)?;
            app.delete(transport, &id, now);
        }
        Command::Refresh => {
            if !app.refresh(transport, now) {
                return Err("a load is already in progress".to_string());
            }
        }
        Command::Toggle => app.toggle_completed(),
        Command::Redraw | Command::Help | Command::Quit => {}
    }
    Ok(())
}

fn row_id(app: &TodoApp, n: usize) -> Result<todo_core::TodoId, String> {
    render::visible_rows(app)
        .into_iter()
        .nth(n - 1)
        .ok_or_else(|| format!("no row {n}"))
}
