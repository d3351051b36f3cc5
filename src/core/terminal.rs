//! Terminal setup and the main event loop for roam.
//!
//! Handles raw mode and the alternate screen, drives one keypress per
//! iteration through the session's transition table and satisfies
//! listing requests: inline for local roots, through the fetch worker
//! (with the cancellable waiting loop) for remote ones.

use crate::app::session::{NavigatorSession, Step};
use crate::core::backend::{BackendKind, list_local};
use crate::core::fetch::{FetchResponse, Fetcher};
use crate::core::path::RelPath;
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::{io, time::Duration};

/// Idle poll interval of the outer loop.
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Redraw cadence of the fetch-waiting loop (spinner animation).
const FETCH_FRAME: Duration = Duration::from_millis(180);

/// Initializes the terminal and runs the navigator until it quits.
///
/// Returns the submitted location string when the session ends with a
/// picker submission, `None` on plain quit.
pub fn run_terminal(
    session: &mut NavigatorSession,
    fetcher: &Fetcher,
) -> io::Result<Option<String>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, session, fetcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    result
}

enum LoopOutcome {
    Continue,
    Quit(Option<String>),
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut NavigatorSession,
    fetcher: &Fetcher,
) -> io::Result<Option<String>>
where
    io::Error: From<<B as Backend>::Error>,
{
    draw(terminal, session)?;

    // A failing iteration recovers once by resetting to the root; a
    // second consecutive failure is treated as fatal.
    let mut recovering = false;
    loop {
        match iteration(terminal, session, fetcher) {
            Ok(LoopOutcome::Quit(result)) => return Ok(result),
            Ok(LoopOutcome::Continue) => recovering = false,
            Err(e) if !recovering => {
                recovering = true;
                session.recover_to_root(&format!("Recovered from error: {e}"));
                terminal.clear()?;
                draw(terminal, session)?;
            }
            Err(e) => return Err(e),
        }
    }
}

fn iteration<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut NavigatorSession,
    fetcher: &Fetcher,
) -> io::Result<LoopOutcome>
where
    io::Error: From<<B as Backend>::Error>,
{
    let mut changed = session.tick();

    // The current location's listing is derived from the cache each
    // iteration; a miss (initial load, recovery) becomes a request.
    if let Some(target) = session.missing_current() {
        load_listing(terminal, session, fetcher, &target)?;
        changed = true;
    }

    if changed {
        draw(terminal, session)?;
    }

    if !event::poll(POLL_INTERVAL)? {
        return Ok(LoopOutcome::Continue);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            match session.handle_key(key) {
                Step::Idle => {}
                Step::Redraw => draw(terminal, session)?,
                Step::Quit => return Ok(LoopOutcome::Quit(None)),
                Step::Submit(path) => return Ok(LoopOutcome::Quit(Some(path))),
                Step::NeedListing { target } => {
                    load_listing(terminal, session, fetcher, &target)?;
                    draw(terminal, session)?;
                }
            }
        }
        Event::Resize(_, _) => draw(terminal, session)?,
        _ => {}
    }
    Ok(LoopOutcome::Continue)
}

/// Satisfies one listing request. Local directories are listed inline
/// (fast); remote locations go through the fetch worker with the
/// cancellable waiting loop.
fn load_listing<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut NavigatorSession,
    fetcher: &Fetcher,
    target: &RelPath,
) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    match session.kind() {
        BackendKind::Local => {
            let Some(dir) = session.root().local_dir(target) else {
                session.fail_listing(target, "local path unavailable");
                return Ok(());
            };
            match list_local(&dir) {
                Ok(raw) => session.complete_listing(target, raw),
                Err(e) => session.fail_listing(target, &e.to_string()),
            }
            Ok(())
        }
        BackendKind::Remote => {
            let task = session.begin_fetch(target.clone());
            if fetcher.task_tx().send(task).is_err() {
                session.abort_pending();
                session.fail_listing(target, "fetch worker is gone");
                return Ok(());
            }
            wait_for_fetch(terminal, session, fetcher)
        }
    }
}

/// Blocks (from the user's perspective, with a visible spinner) until
/// the pending fetch completes, fails or is cancelled with Escape. The
/// stale view keeps being redrawn at the spinner cadence.
fn wait_for_fetch<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut NavigatorSession,
    fetcher: &Fetcher,
) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    while session.fetching() {
        draw(terminal, session)?;
        session.advance_spinner();

        if event::poll(FETCH_FRAME)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && key.code == KeyCode::Esc
        {
            session.cancel_fetch();
            break;
        }

        while let Ok(response) = fetcher.response_rx().try_recv() {
            match response {
                FetchResponse::Completed { lines, request_id } => {
                    session.finish_fetch(request_id, lines);
                }
                FetchResponse::Failed { error, request_id } => {
                    session.fail_fetch(request_id, &error);
                }
            }
        }
    }
    draw(terminal, session)
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, session: &mut NavigatorSession) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    terminal.draw(|f| ui::render(f, session))?;
    Ok(())
}
