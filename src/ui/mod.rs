//! Terminal presentation layer.
//!
//! This module turns computed view models into ANSI-styled text. It holds no
//! state of its own beyond the active theme.
//!
//! # Architecture
//!
//! ```text
//! CollectionState → compute_viewmodel → CollectionViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable state
//! - [`renderer`]: Frame, detail and notification rendering
//! - [`theme`]: Theme preference, palettes and ANSI escape sequences

pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_entry_details, render_notification};
pub use theme::{Appearance, Theme, ThemeMode, THEME_PREFERENCE_KEY};
pub use viewmodel::{Badge, CollectionViewModel, DisplayItem, EmptyState, FooterInfo, HeaderInfo};
