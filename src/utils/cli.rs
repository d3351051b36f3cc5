//! Command-line argument parsing and help for roam.
//!
//! Usage errors are printed to stderr and exit with status 2; `--help`
//! and `--version` exit with 0.

use crate::core::backend::KindOverride;

/// Parsed, validated startup parameters.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub root: String,
    pub kind: KindOverride,
    pub max_depth: usize,
    pub title: String,
    pub select: bool,
}

pub enum CliAction {
    Run(CliOptions),
    Exit { code: i32 },
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

fn usage_error(msg: &str) -> CliAction {
    eprintln!("Error: {msg}");
    eprintln!("Try --help for available options");
    CliAction::Exit { code: 2 }
}

pub fn parse_args(args: &[String]) -> CliAction {
    let mut root: Option<String> = None;
    let mut kind = KindOverride::Auto;
    let mut max_depth = 0usize;
    let mut title = String::from("roam");
    let mut select = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return CliAction::Exit { code: 0 };
            }
            "-V" | "--version" => {
                println!("roam {}", env!("CARGO_PKG_VERSION"));
                return CliAction::Exit { code: 0 };
            }
            "--select" => select = true,
            "--kind" => {
                let Some(value) = iter.next() else {
                    return usage_error("--kind requires a value (auto|local|remote)");
                };
                kind = match value.as_str() {
                    "auto" => KindOverride::Auto,
                    "local" => KindOverride::Local,
                    "remote" => KindOverride::Remote,
                    other => {
                        return usage_error(&format!(
                            "invalid --kind '{other}' (expected auto|local|remote)"
                        ));
                    }
                };
            }
            "--max-depth" => {
                let Some(value) = iter.next() else {
                    return usage_error("--max-depth requires a non-negative integer");
                };
                max_depth = match value.parse::<usize>() {
                    Ok(n) => n,
                    Err(_) => {
                        return usage_error(&format!(
                            "invalid --max-depth '{value}' (expected a non-negative integer)"
                        ));
                    }
                };
            }
            "--title" => {
                let Some(value) = iter.next() else {
                    return usage_error("--title requires a value");
                };
                title = value.clone();
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return usage_error(&format!("unknown argument: {flag}"));
            }
            positional => {
                if root.is_some() {
                    return usage_error("only one ROOT argument is accepted");
                }
                root = Some(positional.to_owned());
            }
        }
    }

    let Some(root) = root else {
        return usage_error("missing required ROOT argument");
    };
    if root.trim().is_empty() {
        return usage_error("ROOT must not be empty");
    }

    CliAction::Run(CliOptions {
        root,
        kind,
        max_depth,
        title,
        select,
    })
}

fn print_help() {
    println!(
        r#"roam - a keyboard-driven folder navigator for local directories and rclone remotes

USAGE:
  roam [OPTIONS] <ROOT>

ROOT:
  Local directory or rclone spec (remote:path). Navigation is confined
  below this boundary.

OPTIONS:
      --kind <auto|local|remote>   Backend selection (default: auto)
      --max-depth <N>              Refuse to descend more than N levels (0 = unlimited)
      --title <STRING>             Title shown in the top bar
      --select                     Picker mode: Space marks an entry, Enter prints
                                   its full path to stdout and exits
  -h, --help                       Print help information
  -V, --version                    Print the installed version

KEYS:
  Up/Down         move selection        Right/Enter   enter directory
  Left/Backspace  go to parent          r             refresh listing
  g               go to relative path   Home/End      jump to first/last
  Space           mark entry (--select) q / Esc       quit (Esc also cancels a fetch)

ENVIRONMENT:
  ROAM_CONFIG     Override the default config path
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_full_invocation() {
        let action = parse_args(&args(&[
            "--kind",
            "remote",
            "--max-depth",
            "3",
            "--title",
            "Pick a report",
            "--select",
            "gdrive:reports",
        ]));
        match action {
            CliAction::Run(opts) => {
                assert_eq!(opts.root, "gdrive:reports");
                assert_eq!(opts.kind, KindOverride::Remote);
                assert_eq!(opts.max_depth, 3);
                assert_eq!(opts.title, "Pick a report");
                assert!(opts.select);
            }
            CliAction::Exit { .. } => panic!("expected Run"),
        }
    }

    #[test]
    fn defaults() {
        match parse_args(&args(&["/tmp"])) {
            CliAction::Run(opts) => {
                assert_eq!(opts.kind, KindOverride::Auto);
                assert_eq!(opts.max_depth, 0);
                assert!(!opts.select);
            }
            CliAction::Exit { .. } => panic!("expected Run"),
        }
    }

    #[test]
    fn rejects_bad_input() {
        for bad in [
            vec!["--max-depth", "-1", "/tmp"],
            vec!["--max-depth", "abc", "/tmp"],
            vec!["--kind", "ftp", "/tmp"],
            vec!["--unknown", "/tmp"],
            vec!["/a", "/b"],
            vec![],
        ] {
            match parse_args(&args(&bad)) {
                CliAction::Exit { code } => assert_eq!(code, 2, "args: {bad:?}"),
                CliAction::Run(_) => panic!("expected usage error for {bad:?}"),
            }
        }
    }
}
