//! Key-event handling for the navigator session.
//!
//! Implements the keyboard transition table on [NavigatorSession]: one
//! key per loop iteration, each producing a [Step] for the terminal
//! loop. Files are never entered; Right/Enter on a file is a no-op
//! unless picker submission applies.

use crate::app::session::{NavigatorSession, SelectionMode, Step};
use crate::core::listing::Entry;
use crate::core::path::{RelPath, resolve_under_root};

use crossterm::event::{KeyCode::*, KeyEvent};

impl NavigatorSession {
    /// Handles one keypress. While the go-to-path prompt is open, all
    /// keys go to the prompt instead of the navigation table.
    pub fn handle_key(&mut self, key: KeyEvent) -> Step {
        if self.prompt().is_some() {
            return self.handle_prompt_key(key);
        }

        match key.code {
            Up => {
                if self.move_up() {
                    Step::Redraw
                } else {
                    Step::Idle
                }
            }
            Down => {
                if self.move_down() {
                    Step::Redraw
                } else {
                    Step::Idle
                }
            }
            Home => {
                if self.jump_first() {
                    Step::Redraw
                } else {
                    Step::Idle
                }
            }
            End => {
                if self.jump_last() {
                    Step::Redraw
                } else {
                    Step::Idle
                }
            }
            Right => self.enter_selected(),
            Enter => {
                // With a mark staged, Enter submits; otherwise it
                // behaves like Right.
                if self.selection_mode() == SelectionMode::Single
                    && let Some(path) = self.marked_path()
                {
                    return Step::Submit(path);
                }
                self.enter_selected()
            }
            Left | Backspace => self.go_parent(),
            Char('r') => self.refresh_current(),
            Char(' ') => {
                if self.toggle_mark() {
                    Step::Redraw
                } else {
                    Step::Idle
                }
            }
            Char('g') => {
                self.open_prompt();
                Step::Redraw
            }
            Char('q') | Esc => Step::Quit,
            _ => Step::Idle,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Step {
        match key.code {
            Esc => {
                self.close_prompt();
                Step::Redraw
            }
            Enter => {
                let input = self.close_prompt().unwrap_or_default();
                if input.is_empty() {
                    return Step::Redraw;
                }
                match resolve_under_root(self.rel(), &input) {
                    Ok(target) => {
                        if self.depth_exceeded(&target) {
                            self.notify(format!(
                                "Refused: '{input}' exceeds max depth {}",
                                self.max_depth()
                            ));
                            Step::Redraw
                        } else {
                            self.navigate_to(target)
                        }
                    }
                    Err(e) => {
                        self.notify(format!("Invalid path '{input}': {e}"));
                        Step::Redraw
                    }
                }
            }
            Backspace => {
                self.prompt_pop();
                Step::Redraw
            }
            Char(c) => {
                self.prompt_push(c);
                Step::Redraw
            }
            _ => Step::Idle,
        }
    }

    /// Right/Enter: descend into the selected entry when it is a
    /// directory, or pop a segment for the synthetic parent row.
    fn enter_selected(&mut self) -> Step {
        let Some(entry) = self.selected_entry().cloned() else {
            return Step::Idle;
        };
        match entry {
            Entry::Parent => self.go_parent(),
            Entry::Directory(name) => {
                let target = self.rel().child(&name);
                if self.depth_exceeded(&target) {
                    self.notify(format!("Max depth {} reached", self.max_depth()));
                    return Step::Redraw;
                }
                self.navigate_to(target)
            }
            Entry::File(_) => Step::Idle,
        }
    }

    /// Left/Backspace: pop the last segment; no-op at the root.
    fn go_parent(&mut self) -> Step {
        match self.rel().parent() {
            Some(parent) => self.navigate_to(parent),
            None => Step::Idle,
        }
    }

    /// `r`: re-fetch the current location bypassing the cache. The
    /// stale listing stays on screen (and in the cache) until the new
    /// one arrives, so a cancelled refresh changes nothing.
    fn refresh_current(&mut self) -> Step {
        self.unblock_auto_fetch();
        Step::NeedListing {
            target: self.rel().clone(),
        }
    }

    /// Moves to `target` if its listing is cached, otherwise asks the
    /// loop to fetch it first.
    fn navigate_to(&mut self, target: RelPath) -> Step {
        self.unblock_auto_fetch();
        if self.is_cached(&target) {
            self.arrive(target);
            Step::Redraw
        } else {
            Step::NeedListing { target }
        }
    }

    fn depth_exceeded(&self, target: &RelPath) -> bool {
        self.max_depth() > 0 && target.depth() > self.max_depth()
    }
}
