//! Client-side state between `latchkey-api` and the CLI.
//!
//! - **[`router`]**: static route table, the auth guard every navigation
//!   passes through, and the navigation menu derived from it.
//! - **[`pagination`]**: the page window shown under list views.
//! - **[`validation`]**: ordered form rules evaluated before a request.
//! - **[`flash`]**: the single transient status message.
//! - **[`theme`]**: persisted light/dark preference and its palette.

pub mod error;
pub mod flash;
pub mod pagination;
pub mod router;
pub mod theme;
pub mod validation;

pub use error::CoreError;
pub use flash::{Flash, FlashKind, FlashMessage};
pub use pagination::{PageItem, PaginationState, PaginationUpdate, visible_pages};
pub use router::{
    Decision, NavItem, Route, RouteMeta, Target, guard, navigate, navigation_menu, resolve,
};
pub use theme::{Palette, Theme, ThemePreference, ThemeStore};
pub use validation::{FormValidator, Format, Rule, validate};
