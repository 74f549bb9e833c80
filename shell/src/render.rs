//! Plain-text rendering of the app state.
//!
//! Rows are numbered in display order (pending first, then the completed
//! section when it is expanded); `visible_rows` returns the same order so
//! `done <n>` and `rm <n>` address what the user sees.

use std::fmt::{self, Write};

use todo_core::{FormState, ListStatus, Todo, TodoApp, TodoId, Tone, TransientMessage};

pub fn visible_rows(app: &TodoApp) -> Vec<TodoId> {
    let view = app.view();
    view.pending
        .iter()
        .chain(view.completed.iter())
        .map(|t| t.id.clone())
        .collect()
}

/// One frame of the app, formatted on demand.
pub struct Screen<'a>(pub &'a TodoApp);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_into(f, self.0)
    }
}

pub fn render(app: &TodoApp) -> String {
    Screen(app).to_string()
}

fn render_into<W: Write>(out: &mut W, app: &TodoApp) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "=== Todo List === {}", app.client().base_url())?;

    let form = app.form();
    if form.state() == FormState::Submitting {
        writeln!(out, "  Adding...")?;
    }
    if let Some(msg) = form.message().current() {
        writeln!(out, "  {}", tagged(msg))?;
    }

    let view = app.view();
    match view.status {
        ListStatus::Loading => {
            writeln!(out, "  Loading your todos...")?;
            return Ok(());
        }
        ListStatus::Failed(msg) => {
            writeln!(out, "  Failed to load todos")?;
            writeln!(out, "  {msg}")?;
            writeln!(out, "  Type `refresh` to retry.")?;
            return Ok(());
        }
        ListStatus::Refreshing => writeln!(out, "  Refreshing todos...")?,
        ListStatus::Ready => {}
    }
    if let Some(msg) = view.message {
        writeln!(out, "  {msg}")?;
    }

    let counts = view.counts;
    writeln!(
        out,
        "  [Total: {}] [Done: {}] [Pending: {}]",
        counts.total, counts.completed, counts.pending
    )?;

    if counts.total == 0 {
        writeln!(out, "  No todos yet")?;
        writeln!(out, "  Add your first todo with `add <text>`")?;
        return Ok(());
    }

    let mut n = 0;
    for todo in &view.pending {
        n += 1;
        row(out, app, n, todo)?;
    }
    if counts.completed > 0 {
        let arrow = if view.show_completed { "▲" } else { "▼" };
        writeln!(out, "  Completed ({}) {arrow}", counts.completed)?;
        for todo in &view.completed {
            n += 1;
            row(out, app, n, todo)?;
        }
    }
    Ok(())
}

fn row<W: Write>(out: &mut W, app: &TodoApp, n: usize, todo: &Todo) -> fmt::Result {
    let mark = if todo.completed { "x" } else { " " };
    let state = app.list().row(&todo.id);
    let busy = match state {
        Some(r) if r.is_completing() => "  (completing...)",
        Some(r) if r.is_deleting() => "  (deleting...)",
        _ if todo.completed => "  Done",
        _ => "  Pending",
    };
    writeln!(out, "  {n:>2}. [{mark}] {}{busy}", todo.body)?;
    if let Some(msg) = state.and_then(|r| r.message().current()) {
        writeln!(out, "        {}", tagged(msg))?;
    }
    Ok(())
}

fn tagged(msg: &TransientMessage) -> String {
    let tag = match msg.tone {
        Tone::Info => "info",
        Tone::Success => "ok",
        Tone::Warning => "warn",
        Tone::Error => "error",
    };
    format!("[{tag}] {}", msg.text)
}
