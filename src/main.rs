//! Terminal front end and entry point.
//!
//! This is the thin shim between a line-oriented terminal and the shelfkeeper
//! library. It parses command-line flags, builds the [`CollectionStore`], then
//! reads one command per line and translates it into store intents.
//!
//! # Session Lifecycle
//!
//! 1. **Configure**: Read `--config`, apply `--data-dir` and `--offline`
//! 2. **Trace**: Initialize the JSON log file in the data directory
//! 3. **Open**: Load the catalog (or seed it), the theme, start the search worker
//! 4. **Loop**: Draw the view, read a command, dispatch it, print notifications
//!
//! # Command Mapping
//!
//! Commands are translated to store intents:
//!
//! - `search <q>` → `set_search_query` (an empty query clears the search)
//! - `sort <field>` → `set_sort_field`
//! - `dir` → `set_sort_direction` with the opposite direction
//! - `more` → `load_next_page`
//! - `add` / `edit <n>` → entry form, then `add_entry` / `update_entry`
//! - `rm <n>` → `delete_entry`
//! - `lend <n>` / `return <n>` → `check_out` / `check_in`
//! - `own <n>` → `add_entry` with the remote record
//! - `discover` / `local` → `set_view_mode`
//! - `theme` → `toggle_theme`
//!
//! `<n>` is the 1-based row number shown in the list. Whenever a remote page is
//! in flight after a command, the shell waits for it before redrawing.

#![allow(clippy::multiple_crate_versions)]

use chrono::NaiveDate;
use clap::Parser;
use shelfkeeper::domain::book::ISO_DATE_FORMAT;
use shelfkeeper::observability::init_tracing;
use shelfkeeper::store::QueueNotifier;
use shelfkeeper::ui::{render, render_entry_details, render_notification, Theme};
use shelfkeeper::{
    initialize, CatalogEntry, CatalogError, CollectionStore, Config, EntryDraft, Result, SortField,
    ViewMode,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const DEFAULT_COLUMNS: usize = 80;

/// Extra time granted to the worker beyond the HTTP timeout.
const SEARCH_GRACE: Duration = Duration::from_secs(1);

const HELP: &str = "\
search <q>      filter the library, or query Google Books in discover mode
sort <field>    title | authors | date | catalog (library), relevance | newest (discover)
dir             flip the sort direction
more            reveal more rows or fetch the next page
add             add a book
edit <n>        edit book n
rm <n>          remove book n
lend <n>        check book n out
return <n>      check book n back in
show <n>        show every field of book n
own <n>         add search result n to your library
discover/local  switch view
theme           cycle light, dark and system themes
quit            leave";

#[derive(Parser, Debug)]
#[command(name = "shelfkeeper", version, about = "Personal book catalog with Google Books discovery")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the catalog, preferences and log file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep the catalog in memory and never search remotely.
    #[arg(long)]
    offline: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shelfkeeper: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    config.offline |= cli.offline;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    init_tracing(&config);
    let _span = tracing::info_span!("session", offline = config.offline).entered();

    let notifications = QueueNotifier::new();
    let store = initialize(&config, Box::new(notifications.clone()))?;

    let columns = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(DEFAULT_COLUMNS);

    let stdin = io::stdin();
    let mut shell = Shell {
        store,
        notifications,
        input: stdin.lock().lines(),
        out: io::stdout().lock(),
        colorfgbg: std::env::var("COLORFGBG").ok(),
        columns,
        search_timeout: config.request_timeout() + SEARCH_GRACE,
    };
    shell.run()
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Search(String),
    Sort(String),
    Direction,
    More,
    Add,
    Edit(usize),
    Remove(usize),
    Lend(usize),
    Return(usize),
    Show(usize),
    Own(usize),
    Discover,
    Local,
    Theme,
    Help,
    Quit,
    Unknown(String),
}

/// Parses a command line. Blank lines yield `None`.
fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let row = || rest.parse::<usize>().ok().filter(|n| *n > 0);

    let command = match word {
        "search" | "/" => Command::Search(rest.to_string()),
        "sort" => Command::Sort(rest.to_string()),
        "dir" => Command::Direction,
        "more" => Command::More,
        "add" => Command::Add,
        "discover" => Command::Discover,
        "local" => Command::Local,
        "theme" => Command::Theme,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "edit" | "rm" | "lend" | "return" | "show" | "own" => match row() {
            Some(n) => match word {
                "edit" => Command::Edit(n),
                "rm" => Command::Remove(n),
                "lend" => Command::Lend(n),
                "return" => Command::Return(n),
                "show" => Command::Show(n),
                _ => Command::Own(n),
            },
            None => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

enum Flow {
    Redraw,
    Stay,
    Quit,
}

struct Shell<R, W> {
    store: CollectionStore,
    notifications: QueueNotifier,
    input: io::Lines<R>,
    out: W,
    colorfgbg: Option<String>,
    columns: usize,
    search_timeout: Duration,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    fn run(&mut self) -> Result<()> {
        self.draw()?;
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = self.input.next() else {
                break;
            };
            let Some(command) = parse_command(&line?) else {
                continue;
            };
            tracing::debug!(command = ?command, "command received");

            let flow = match self.execute(command) {
                Ok(flow) => flow,
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    Flow::Stay
                }
            };

            if self.store.is_loading() {
                writeln!(self.out, "Searching...")?;
                self.store.wait_for_search(self.search_timeout);
            }
            self.print_notifications()?;

            match flow {
                Flow::Redraw => self.draw()?,
                Flow::Stay => {}
                Flow::Quit => break,
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Search(query) => {
                self.store.set_search_query(&query);
                self.store.reset_visible_window();
            }
            Command::Sort(field) => {
                let field = field.parse::<SortField>().map_err(CatalogError::Validation)?;
                if field.scope() != self.store.state().view_mode {
                    return Err(CatalogError::Validation(format!(
                        "{field} does not apply to this view"
                    )));
                }
                self.store.set_sort_field(field);
            }
            Command::Direction => {
                let direction = self.store.state().sort_direction.toggled();
                self.store.set_sort_direction(direction);
                self.store.reset_visible_window();
            }
            Command::More => self.store.load_next_page(),
            Command::Add => {
                let draft = self.fill_draft(EntryDraft::default(), None)?;
                self.store.add_entry(draft.into_entry(None))?;
            }
            Command::Edit(n) => {
                let entry = self.owned_entry_at(n)?;
                let draft = self.fill_draft(EntryDraft::from_entry(&entry), Some(&entry.id))?;
                self.store.update_entry(draft.into_entry(Some(&entry)))?;
            }
            Command::Remove(n) => {
                let entry = self.owned_entry_at(n)?;
                self.store.delete_entry(&entry.id);
            }
            Command::Lend(n) => {
                let entry = self.owned_entry_at(n)?;
                if entry.is_checked_out {
                    return Err(CatalogError::Validation(format!(
                        "\"{}\" is already checked out to {}",
                        entry.title, entry.checked_out_by
                    )));
                }
                let borrower = self.prompt("Borrower", "")?;
                let due_date = self.prompt("Due date (YYYY-MM-DD)", "")?;
                check_due_date(&due_date, today())?;
                self.store.check_out(&entry.id, borrower.trim(), &due_date)?;
            }
            Command::Return(n) => {
                let entry = self.owned_entry_at(n)?;
                self.store.check_in(&entry.id);
            }
            Command::Show(n) => {
                let entry = self.entry_at(n)?;
                let owned = self.store.is_in_library(&entry.id);
                let theme = self.theme()?;
                render_entry_details(&entry, owned, &theme, &mut self.out)?;
                return Ok(Flow::Stay);
            }
            Command::Own(n) => {
                let entry = self.entry_at(n)?;
                if self.store.is_in_library(&entry.id) {
                    writeln!(self.out, "\"{}\" is already in your library", entry.title)?;
                    return Ok(Flow::Stay);
                }
                self.store.add_entry(entry)?;
            }
            Command::Discover => self.store.set_view_mode(ViewMode::Discover),
            Command::Local => self.store.set_view_mode(ViewMode::Local),
            Command::Theme => {
                let mode = self.store.toggle_theme();
                writeln!(self.out, "Theme: {mode}")?;
            }
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(Flow::Stay);
            }
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(line) => {
                writeln!(self.out, "Unknown command: {line} (try `help`)")?;
                return Ok(Flow::Stay);
            }
        }
        Ok(Flow::Redraw)
    }

    fn theme(&self) -> Result<Theme> {
        Theme::for_mode(self.store.theme_mode(), self.colorfgbg.as_deref())
    }

    fn draw(&mut self) -> Result<()> {
        let theme = self.theme()?;
        let vm = self.store.viewmodel();
        render(&vm, &theme, self.columns, &mut self.out)?;
        Ok(())
    }

    fn print_notifications(&mut self) -> Result<()> {
        let pending = self.notifications.drain();
        if pending.is_empty() {
            return Ok(());
        }
        let theme = self.theme()?;
        for notification in &pending {
            render_notification(notification, &theme, &mut self.out)?;
        }
        Ok(())
    }

    /// The entry on row `n` of the current list.
    fn entry_at(&self, n: usize) -> Result<CatalogEntry> {
        self.store
            .visible_entries()
            .into_iter()
            .nth(n - 1)
            .ok_or_else(|| CatalogError::Validation(format!("No book on row {n}")))
    }

    fn owned_entry_at(&self, n: usize) -> Result<CatalogEntry> {
        let entry = self.entry_at(n)?;
        if self.store.is_in_library(&entry.id) {
            Ok(entry)
        } else {
            Err(CatalogError::Validation(format!(
                "\"{}\" is not in your library (use `own {n}`)",
                entry.title
            )))
        }
    }

    /// Reads one field. An empty answer keeps `current`.
    fn prompt(&mut self, label: &str, current: &str) -> Result<String> {
        if current.is_empty() {
            write!(self.out, "{label}: ")?;
        } else {
            write!(self.out, "{label} [{current}]: ")?;
        }
        self.out.flush()?;

        let line = self
            .input
            .next()
            .ok_or_else(|| CatalogError::Validation("Input closed".to_string()))??;
        let answer = line.trim();
        Ok(if answer.is_empty() {
            current.to_string()
        } else {
            answer.to_string()
        })
    }

    /// Walks the form fields and validates the result.
    fn fill_draft(&mut self, mut draft: EntryDraft, editing_id: Option<&str>) -> Result<EntryDraft> {
        draft.title = self.prompt("Title", &draft.title)?;
        draft.authors = self.prompt("Authors", &draft.authors)?;
        draft.catalog_number = self.prompt("Catalog number", &draft.catalog_number)?;
        draft.published_date = self.prompt("Published (YYYY or YYYY-MM-DD)", &draft.published_date)?;
        draft.publisher = self.prompt("Publisher", &draft.publisher)?;

        let pages = draft.page_count.map(|n| n.to_string()).unwrap_or_default();
        let pages = self.prompt("Pages", &pages)?;
        draft.page_count = if pages.is_empty() {
            None
        } else {
            Some(pages.parse().map_err(|_| {
                CatalogError::Validation("Page count must be a whole number".to_string())
            })?)
        };

        draft.categories = self.prompt("Categories", &draft.categories)?;
        draft.thumbnail = self.prompt("Cover URL", &draft.thumbnail)?;
        draft.description = self.prompt("Description", &draft.description)?;

        let store = &self.store;
        draft
            .validate(|number| store.is_catalog_number_taken(number, editing_id))
            .map_err(|errors| CatalogError::Validation(errors.to_string()))?;
        Ok(draft)
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Due dates must be real calendar dates no earlier than `today`.
fn check_due_date(value: &str, today: NaiveDate) -> Result<()> {
    let due = NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| CatalogError::Validation("Use a date like 2026-03-15".to_string()))?;
    if due < today {
        return Err(CatalogError::Validation(
            "Due date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}
