//! Navigator session state for roam.
//!
//! [NavigatorSession] owns everything the event loop mutates: the
//! relative path below the root boundary, the listing cache, the
//! scroll/selection state, the optional marked entry and the pending
//! remote fetch. The loop itself holds no state of its own; the current
//! listing and location text are derived from the cache each iteration.
//!
//! Listing acquisition is a request/complete protocol: key handling
//! (see the handlers module) emits [Step::NeedListing] on a cache miss,
//! the loop satisfies it (inline for local roots, via the fetch worker
//! for remote ones) and hands the result back through
//! [NavigatorSession::complete_listing] or the request-id checked
//! fetch variants. This keeps the whole state machine drivable from
//! tests without a terminal or a backend.

use crate::config::Config;
use crate::core::backend::{BackendKind, RootSpec, partition_lsf};
use crate::core::cache::{CachedListing, ListingCache, ListingKey};
use crate::core::fetch::FetchTask;
use crate::core::listing::{Entry, Listing, RawListing};
use crate::core::path::RelPath;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How long a transient notice stays on the status line.
const NOTICE_TTL: Duration = Duration::from_millis(2500);

/// Animated indicator shown while a remote fetch is in flight.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Whether the session is a plain browser or a single-entry picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Disabled,
    Single,
}

/// Startup parameters for a session, fixed for its lifetime.
pub struct SessionOptions {
    pub root: RootSpec,
    pub max_depth: usize,
    pub title: String,
    pub selection: SelectionMode,
    pub config: Config,
}

/// What the event loop should do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing happened.
    Idle,
    /// State changed; redraw the frame.
    Redraw,
    /// A navigation needs a listing that is not cached yet.
    NeedListing { target: RelPath },
    /// Terminate with no result.
    Quit,
    /// Terminate, yielding the fully-qualified path of the marked entry.
    Submit(String),
}

/// An in-flight remote listing; at most one exists per session.
pub struct PendingFetch {
    pub target: RelPath,
    pub request_id: u64,
    pub cancel: Arc<AtomicBool>,
}

pub struct NavigatorSession {
    config: Config,
    root: RootSpec,
    max_depth: usize,
    title: String,
    selection: SelectionMode,

    rel: RelPath,
    cache: ListingCache,

    selected: usize,
    scroll: usize,
    visible_rows: usize,
    marked: Option<usize>,

    prompt: Option<String>,
    pending: Option<PendingFetch>,
    next_request_id: u64,
    spinner_frame: usize,
    auto_fetch_blocked: bool,

    notice: Option<(String, Instant)>,
}

impl NavigatorSession {
    pub fn new(opts: SessionOptions) -> Self {
        Self {
            config: opts.config,
            root: opts.root,
            max_depth: opts.max_depth,
            title: opts.title,
            selection: opts.selection,
            rel: RelPath::root(),
            cache: ListingCache::new(),
            selected: 0,
            scroll: 0,
            visible_rows: 1,
            marked: None,
            prompt: None,
            pending: None,
            next_request_id: 0,
            spinner_frame: 0,
            auto_fetch_blocked: false,
            notice: None,
        }
    }

    // Accessors

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn root(&self) -> &RootSpec {
        &self.root
    }

    #[inline]
    pub fn kind(&self) -> BackendKind {
        self.root.kind()
    }

    #[inline]
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn rel(&self) -> &RelPath {
        &self.rel
    }

    #[inline]
    pub fn selected_idx(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    #[inline]
    pub fn marked_idx(&self) -> Option<usize> {
        self.marked
    }

    #[inline]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    #[inline]
    pub fn fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn notice_text(&self) -> Option<&str> {
        self.notice.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    // Cache and listing access

    pub fn key_for(&self, rel: &RelPath) -> ListingKey {
        ListingKey {
            kind: self.root.kind(),
            root: self.root.identity(),
            rel: rel.joined(),
        }
    }

    /// The cached state for the current location, if visited already.
    pub fn current(&self) -> Option<&CachedListing> {
        self.cache.get(&self.key_for(&self.rel))
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.current().map(|c| &c.listing)
    }

    pub fn entry_count(&self) -> usize {
        self.listing().map(Listing::len).unwrap_or(0)
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.listing().and_then(|l| l.get(self.selected))
    }

    /// Location text for the top bar: the cached display string, or the
    /// qualified path derived from root + relative path.
    pub fn location_line(&self) -> String {
        self.current()
            .map(|c| c.location.clone())
            .unwrap_or_else(|| self.root.qualified(&self.rel))
    }

    pub fn is_cached(&self, rel: &RelPath) -> bool {
        self.cache.contains(&self.key_for(rel))
    }

    /// Emits the current location as a listing request when it is
    /// neither cached nor already being fetched. Called at the top of
    /// every loop iteration; this is what makes the initial load, the
    /// refresh key and error recovery all converge on one path.
    ///
    /// Suppressed after the user cancels a fetch for the location
    /// already shown, so cancellation does not immediately restart the
    /// same fetch; any navigation or refresh lifts the suppression.
    pub fn missing_current(&self) -> Option<RelPath> {
        if !self.auto_fetch_blocked && self.pending.is_none() && !self.is_cached(&self.rel) {
            Some(self.rel.clone())
        } else {
            None
        }
    }

    pub(super) fn unblock_auto_fetch(&mut self) {
        self.auto_fetch_blocked = false;
    }

    // Listing completion protocol

    /// Installs a fetched listing for `target` and completes the
    /// navigation that requested it.
    pub fn complete_listing(&mut self, target: &RelPath, raw: RawListing) {
        let listing = Listing::build(raw, !target.is_root());
        let cached = CachedListing {
            location: self.root.qualified(target),
            listing,
            depth: target.depth(),
        };
        self.cache.insert(self.key_for(target), cached);
        self.arrive(target.clone());
    }

    /// Reports a failed listing. A failure for the location already
    /// shown degrades to an empty listing (the navigator stays usable);
    /// a failed refresh keeps the stale listing; a failure while
    /// navigating somewhere new aborts that navigation and leaves the
    /// view where it was.
    pub fn fail_listing(&mut self, target: &RelPath, error: &str) {
        if *target == self.rel && !self.is_cached(target) {
            let listing = Listing::build(RawListing::default(), !target.is_root());
            let cached = CachedListing {
                location: self.root.qualified(target),
                listing,
                depth: target.depth(),
            };
            self.cache.insert(self.key_for(target), cached);
            self.clamp_selector();
        }
        self.notify(format!("Listing failed: {error}"));
    }

    // Remote fetch protocol

    /// Registers a pending fetch for `target` and returns the task to
    /// hand to the fetch worker.
    pub fn begin_fetch(&mut self, target: RelPath) -> FetchTask {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        let cancel = Arc::new(AtomicBool::new(false));
        let task = FetchTask {
            spec: self.root.qualified(&target),
            request_id: self.next_request_id,
            cancel: Arc::clone(&cancel),
        };
        self.pending = Some(PendingFetch {
            target,
            request_id: self.next_request_id,
            cancel,
        });
        task
    }

    /// Completes the pending fetch if `request_id` matches it; stale
    /// responses are discarded. Returns true when state changed.
    pub fn finish_fetch(&mut self, request_id: u64, lines: Vec<String>) -> bool {
        match self.pending.take() {
            Some(pending) if pending.request_id == request_id => {
                self.complete_listing(&pending.target, partition_lsf(lines));
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Fails the pending fetch if `request_id` matches it.
    pub fn fail_fetch(&mut self, request_id: u64, error: &str) -> bool {
        match self.pending.take() {
            Some(pending) if pending.request_id == request_id => {
                self.fail_listing(&pending.target, error);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Cancels the pending fetch: the navigation that triggered it is
    /// aborted, nothing is cached and the view stays where it was.
    pub fn cancel_fetch(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.store(true, Ordering::Release);
            if pending.target == self.rel && !self.is_cached(&self.rel) {
                // Cancelled the load of the location we are showing;
                // do not restart it behind the user's back.
                self.auto_fetch_blocked = true;
            }
            self.notify("Fetch cancelled".to_owned());
        }
    }

    /// Drops the pending fetch without a user-visible notice (loop
    /// internal cleanup, e.g. when the worker channel is gone).
    pub fn abort_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.store(true, Ordering::Release);
        }
    }

    // Navigation / selector state

    /// Switches the view to `target` and resets the selector. Called
    /// only once the target's listing is present in the cache.
    pub(super) fn arrive(&mut self, target: RelPath) {
        self.auto_fetch_blocked = false;
        if self.rel != target {
            self.rel = target;
            self.selected = 0;
            self.scroll = 0;
            self.marked = None;
        } else {
            // Refresh of the current location: keep the cursor, but
            // the entry set may have shrunk.
            self.marked = None;
            self.clamp_selector();
        }
    }

    /// Rendering tells the session how many rows fit in the pane.
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
        self.clamp_selector();
    }

    #[inline]
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn move_up(&mut self) -> bool {
        if self.entry_count() == 0 || self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.clamp_selector();
        true
    }

    pub fn move_down(&mut self) -> bool {
        let count = self.entry_count();
        if count == 0 || self.selected + 1 >= count {
            return false;
        }
        self.selected += 1;
        self.clamp_selector();
        true
    }

    pub fn jump_first(&mut self) -> bool {
        if self.entry_count() == 0 {
            return false;
        }
        self.selected = 0;
        self.clamp_selector();
        true
    }

    pub fn jump_last(&mut self) -> bool {
        let count = self.entry_count();
        if count == 0 {
            return false;
        }
        self.selected = count - 1;
        self.clamp_selector();
        true
    }

    /// Keeps `selected` in `[0, count-1]` and the scroll offset within
    /// `[0, count - visible_rows]` with the selection on screen.
    fn clamp_selector(&mut self) {
        let count = self.entry_count();
        if count == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        self.selected = self.selected.min(count - 1);

        let max_scroll = count.saturating_sub(self.visible_rows);
        self.scroll = self.scroll.min(max_scroll);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.visible_rows {
            self.scroll = self.selected + 1 - self.visible_rows;
        }
    }

    // Marking / submission

    /// Toggles the mark on the selected entry. The synthetic parent row
    /// cannot be marked.
    pub fn toggle_mark(&mut self) -> bool {
        if self.selection != SelectionMode::Single {
            return false;
        }
        match self.selected_entry() {
            None | Some(Entry::Parent) => false,
            Some(_) => {
                self.marked = if self.marked == Some(self.selected) {
                    None
                } else {
                    Some(self.selected)
                };
                true
            }
        }
    }

    /// Fully-qualified location of the marked entry, if one exists.
    pub fn marked_path(&self) -> Option<String> {
        let idx = self.marked?;
        let entry = self.listing()?.get(idx)?;
        match entry {
            Entry::Parent => None,
            Entry::Directory(name) | Entry::File(name) => {
                Some(self.root.qualified(&self.rel.child(name)))
            }
        }
    }

    // Prompt (go-to-path)

    pub(super) fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub(super) fn close_prompt(&mut self) -> Option<String> {
        self.prompt.take()
    }

    pub(super) fn prompt_push(&mut self, c: char) {
        if let Some(buffer) = self.prompt.as_mut() {
            buffer.push(c);
        }
    }

    pub(super) fn prompt_pop(&mut self) {
        if let Some(buffer) = self.prompt.as_mut() {
            buffer.pop();
        }
    }

    // Notices / recovery

    pub fn notify(&mut self, msg: String) {
        self.notice = Some((msg, Instant::now() + NOTICE_TTL));
    }

    /// Expires stale notices. Returns true when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if let Some((_, expiry)) = self.notice
            && Instant::now() >= expiry
        {
            self.notice = None;
            return true;
        }
        false
    }

    /// Last-resort recovery: abandon any pending fetch, go back to the
    /// root and force a re-fetch of its listing on the next iteration.
    pub fn recover_to_root(&mut self, msg: &str) {
        self.abort_pending();
        self.auto_fetch_blocked = false;
        self.prompt = None;
        self.rel = RelPath::root();
        self.selected = 0;
        self.scroll = 0;
        self.marked = None;
        let root_key = self.key_for(&RelPath::root());
        self.cache.invalidate(&root_key);
        self.notify(msg.to_owned());
    }
}
