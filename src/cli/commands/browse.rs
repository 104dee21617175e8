//! Line-oriented interactive listing.
//!
//! Every keypress-level decision (debounce, sort toggling, stale responses,
//! per-entry mutation order) is made by `ListingSync`; this loop only reads
//! commands, runs the queries it is handed and prints the result.

use crate::cli::commands::list::print_listing;
use crate::client::mutations::{Mutation, PendingMutation};
use crate::client::sync::{ListingSync, MutationFailure, Outgoing, ResponseOutcome};
use crate::config::Config;
use crate::core::entries::EntryLogic;
use crate::core::listing::{ListingLogic, ListingResponse};
use crate::core::query::SortField;
use crate::core::validate::parse_status;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{hint, notice, warning};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

const HELP: &str = "s <text> search · f <status|all> filter · o <field> sort · n/p next/prev · \
g <page> go · pp <n> per page · x <id> <status> set status · d <id> delete · r refresh · q quit";

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Search(String),
    Filter(String),
    Sort(SortField),
    Next,
    Previous,
    Goto(u32),
    PerPage(u32),
    SetStatus(i64, String),
    Delete(i64),
    Refresh,
    Help,
    Quit,
}

fn parse_action(line: &str) -> Option<Action> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd {
        "s" => Some(Action::Search(rest.to_string())),
        "f" => Some(Action::Filter(rest.to_string())),
        "o" => {
            let field = SortField::ALL.into_iter().find(|f| f.as_str() == rest)?;
            Some(Action::Sort(field))
        }
        "n" => Some(Action::Next),
        "p" => Some(Action::Previous),
        "g" => rest.parse().ok().map(Action::Goto),
        "pp" => rest.parse().ok().map(Action::PerPage),
        "x" => {
            let (id, status) = rest.split_once(' ')?;
            Some(Action::SetStatus(id.parse().ok()?, status.trim().to_string()))
        }
        "d" => rest.parse().ok().map(Action::Delete),
        "r" | "" => Some(Action::Refresh),
        "h" | "?" => Some(Action::Help),
        "q" | "quit" | "exit" => Some(Action::Quit),
        _ => None,
    }
}

struct Browser<'a> {
    pool: DbPool,
    sync: ListingSync,
    path: &'a str,
}

impl Browser<'_> {
    fn run_query(&mut self, out: Outgoing) {
        tracing::debug!(seq = out.seq, url = %out.url, "listing query");
        let result = ListingLogic::respond(&self.pool, &out.request, self.path).map_err(|e| e.to_string());

        if self.sync.on_response(out.seq, result) == ResponseOutcome::Applied
            && let Some(envelope) = self.sync.envelope().cloned()
        {
            let response = ListingResponse {
                entries: envelope,
                filters: self.sync.request().filters(),
            };
            print_listing(&response);
        }
        self.flush_notices();
    }

    fn flush_notices(&mut self) {
        for n in self.sync.take_notices() {
            notice(&n);
        }
    }

    fn apply(&mut self, pending: PendingMutation) -> Result<String, MutationFailure> {
        let id = pending.id;
        let result = match pending.mutation {
            Mutation::Replace(input) => {
                EntryLogic::replace(&mut self.pool, id, &input).map(|_| format!("Entry #{id} updated"))
            }
            Mutation::PatchStatus(status) => EntryLogic::set_status(&mut self.pool, id, status)
                .map(|e| format!("Entry #{id} is now {}", e.status)),
            Mutation::Delete => {
                EntryLogic::delete(&mut self.pool, id).map(|_| format!("Entry #{id} deleted"))
            }
        };
        result.map_err(|e| MutationFailure::from(&e))
    }

    fn mutate(&mut self, id: i64, mutation: Mutation) {
        let Some(mut pending) = self.sync.submit_mutation(id, mutation) else {
            warning(format!("Entry #{id} is busy; the change was queued."));
            return;
        };

        // Drain the queue for this entry, one mutation at a time.
        loop {
            let result = self.apply(pending);
            let outcome = self.sync.on_mutation_result(id, result);
            match outcome.next {
                Some(next) => pending = next,
                None => {
                    self.run_query(outcome.refresh);
                    break;
                }
            }
        }
    }

    fn search(&mut self, text: &str) {
        self.sync.set_search(text, Instant::now());
        // Nothing else can be typed while the line is read, so wait out the
        // quiet window here.
        if let Some(wait) = self.sync.debounce_remaining(Instant::now()) {
            thread::sleep(wait);
        }
        if let Some(out) = self.sync.poll(Instant::now()) {
            self.run_query(out);
        }
    }

    fn navigate(&mut self, forward: bool) {
        let url = self.sync.envelope().and_then(|e| {
            if forward {
                e.next_page_url.clone()
            } else {
                e.prev_page_url.clone()
            }
        });
        match url {
            Some(url) => {
                let out = self.sync.follow_link(&url);
                self.run_query(out);
            }
            None => warning(if forward {
                "Already on the last page."
            } else {
                "Already on the first page."
            }),
        }
    }
}

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut browser = Browser {
        pool: DbPool::new(&cfg.database)?,
        sync: ListingSync::new(&cfg.list_path, cfg.default_per_page, cfg.search_debounce()),
        path: &cfg.list_path,
    };

    hint(HELP);
    let first = browser.sync.refresh();
    browser.run_query(first);

    let stdin = io::stdin();
    loop {
        match browser.sync.search_input() {
            "" => print!("browse> "),
            text => print!("browse [{text}]> "),
        }
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let Some(action) = parse_action(&line) else {
            warning("Unknown command.");
            hint(HELP);
            continue;
        };

        match action {
            Action::Quit => break,
            Action::Help => hint(HELP),
            Action::Search(text) => browser.search(&text),
            Action::Filter(status) => {
                let out = browser.sync.set_status(&status);
                browser.run_query(out);
            }
            Action::Sort(field) => {
                let out = browser.sync.toggle_sort(field);
                browser.run_query(out);
            }
            Action::Next => browser.navigate(true),
            Action::Previous => browser.navigate(false),
            Action::Goto(page) => {
                let out = browser.sync.set_page(page);
                browser.run_query(out);
            }
            Action::PerPage(n) => {
                let out = browser.sync.set_per_page(n);
                browser.run_query(out);
            }
            Action::SetStatus(id, raw) => match parse_status(&raw) {
                Some(status) => browser.mutate(id, Mutation::PatchStatus(status)),
                None => warning(format!("Unknown status {raw:?}.")),
            },
            Action::Delete(id) => browser.mutate(id, Mutation::Delete),
            Action::Refresh => {
                let out = browser.sync.refresh();
                browser.run_query(out);
            }
        }
    }

    Ok(())
}
