//! Line-oriented renderer for the collection view.
//!
//! The renderer turns a [`CollectionViewModel`] into ANSI-styled lines written
//! to any [`Write`] sink. It never computes anything the view model does not
//! already hold; the only layout decisions are padding and truncation to the
//! terminal width.
//!
//! # Layout
//!
//! ```text
//! My Library                                    <- header
//! Showing 4 of 4 books                          <- summary
//! ──────────────────────────────────────────
//!  1  Clean Code  · Robert C. Martin  CS-001  2008  available
//!  2  ...
//! ──────────────────────────────────────────
//! You've seen all 4 books                       <- footer message
//! search <q>  sort <field>  ...                 <- command hints
//! ```

use crate::app::Notification;
use crate::domain::CatalogEntry;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Badge, CollectionViewModel, DisplayItem, EmptyState};
use std::io::{self, Write};

/// Width of the title column before truncation.
const TITLE_WIDTH: usize = 36;

/// Width of the authors column before truncation.
const AUTHORS_WIDTH: usize = 24;

/// Renders a full frame of the collection view.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render<W: Write>(vm: &CollectionViewModel, theme: &Theme, cols: usize, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}{}{}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        vm.header.title,
        Theme::reset()
    )?;
    writeln!(
        out,
        "{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        vm.summary,
        Theme::reset()
    )?;
    render_separator(theme, cols, out)?;

    if let Some(empty) = &vm.empty_state {
        render_empty_state(empty, theme, out)?;
    } else {
        for item in &vm.items {
            render_item(item, theme, out)?;
        }
    }

    render_separator(theme, cols, out)?;
    if let Some(message) = &vm.footer.message {
        writeln!(out, "{}{}{}", Theme::fg(&theme.colors.text_normal), message, Theme::reset())?;
    }
    writeln!(
        out,
        "{}{}{}{}",
        Theme::dim(),
        Theme::fg(&theme.colors.text_dim),
        vm.footer.keybindings,
        Theme::reset()
    )
}

fn render_separator<W: Write>(theme: &Theme, cols: usize, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}{}{}",
        Theme::fg(&theme.colors.border),
        "─".repeat(cols.max(1)),
        Theme::reset()
    )
}

fn render_empty_state<W: Write>(empty: &EmptyState, theme: &Theme, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {}{}{}",
        Theme::fg(&theme.colors.empty_state_fg),
        empty.title,
        Theme::reset()
    )?;
    writeln!(
        out,
        "  {}{}{}{}",
        Theme::dim(),
        Theme::fg(&theme.colors.text_dim),
        empty.hint,
        Theme::reset()
    )?;
    writeln!(out)
}

fn render_item<W: Write>(item: &DisplayItem, theme: &Theme, out: &mut W) -> io::Result<()> {
    let (badge_text, badge_color) = match &item.badge {
        Badge::Available => ("available".to_string(), &theme.colors.success_fg),
        Badge::CheckedOut {
            borrower,
            due_date,
            overdue: true,
        } => (format!("OVERDUE {borrower}, due {due_date}"), &theme.colors.danger_fg),
        Badge::CheckedOut { borrower, due_date, .. } => {
            (format!("lent to {borrower}, due {due_date}"), &theme.colors.warning_fg)
        }
        Badge::External => ("not in library".to_string(), &theme.colors.external_fg),
    };

    writeln!(
        out,
        "{}{:>3}{}  {}{:<title_w$}{}  {}{:<authors_w$}{}  {:<10} {:<10}  {}{}{}",
        Theme::fg(&theme.colors.position_fg),
        item.position,
        Theme::reset(),
        Theme::fg(&theme.colors.text_normal),
        truncate(&item.title, TITLE_WIDTH),
        Theme::reset(),
        Theme::fg(&theme.colors.text_dim),
        truncate(&item.authors, AUTHORS_WIDTH),
        Theme::reset(),
        item.catalog_number,
        item.published_date,
        Theme::fg(badge_color),
        badge_text,
        Theme::reset(),
        title_w = TITLE_WIDTH,
        authors_w = AUTHORS_WIDTH,
    )
}

/// Renders every field of one entry.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render_entry_details<W: Write>(entry: &CatalogEntry, owned: bool, theme: &Theme, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}{}{}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        entry.title,
        Theme::reset()
    )?;

    let page_count = entry.page_count.map(|n| n.to_string()).unwrap_or_default();
    let fields = [
        ("Authors", entry.authors.as_str()),
        ("Catalog #", entry.catalog_number.as_str()),
        ("Publisher", entry.publisher.as_str()),
        ("Published", entry.published_date.as_str()),
        ("Pages", page_count.as_str()),
        ("Categories", entry.categories.as_str()),
        ("Cover", entry.thumbnail.as_str()),
    ];
    for (label, value) in fields.iter().filter(|(_, value)| !value.is_empty()) {
        writeln!(
            out,
            "  {}{:<11}{}{}",
            Theme::fg(&theme.colors.text_dim),
            label,
            Theme::reset(),
            value
        )?;
    }

    let status = if !owned {
        "Not in your library".to_string()
    } else if entry.is_checked_out {
        format!("Checked out by {} until {}", entry.checked_out_by, entry.due_date)
    } else {
        "Available".to_string()
    };
    writeln!(out, "  {}{:<11}{}{}", Theme::fg(&theme.colors.text_dim), "Status", Theme::reset(), status)?;

    if !entry.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "  {}", entry.description)?;
    }
    Ok(())
}

/// Renders a notification line in its tone color.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render_notification<W: Write>(notification: &Notification, theme: &Theme, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}{}{}",
        Theme::fg(theme.tone_fg(notification.tone)),
        notification.message,
        Theme::reset()
    )
}

/// Shortens `text` to at most `width` characters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
