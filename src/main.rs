//! main.rs
//! Entry point for roam

use roam_tui::app::{NavigatorSession, SelectionMode, SessionOptions};
use roam_tui::config::Config;
use roam_tui::core::backend::{BackendKind, detect_kind, parse_root};
use roam_tui::core::fetch::Fetcher;
use roam_tui::core::terminal;
use roam_tui::utils::cli::{CliAction, handle_args};

fn main() {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[roam] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let opts = match handle_args() {
        CliAction::Run(opts) => opts,
        CliAction::Exit { code } => std::process::exit(code),
    };

    let kind = detect_kind(&opts.root, opts.kind);
    let root = match parse_root(&opts.root, kind) {
        Ok(root) => root,
        Err(msg) => {
            eprintln!("[roam] Error: {msg}");
            std::process::exit(2);
        }
    };

    if kind == BackendKind::Remote && which::which("rclone").is_err() {
        eprintln!("[roam] Error: the remote backend needs rclone on PATH");
        std::process::exit(2);
    }

    let config = Config::load();
    let mut session = NavigatorSession::new(SessionOptions {
        root,
        max_depth: opts.max_depth,
        title: opts.title,
        selection: if opts.select {
            SelectionMode::Single
        } else {
            SelectionMode::Disabled
        },
        config,
    });

    let fetcher = Fetcher::spawn();
    match terminal::run_terminal(&mut session, &fetcher) {
        Ok(Some(picked)) => println!("{picked}"),
        Ok(None) => {}
        Err(e) => {
            eprintln!("[roam] Error: {e}");
            std::process::exit(1);
        }
    }
}
