//! Component trait system for the grid TUI
//!
//! App routes input and owns the panels; panels declare what they can do
//! through traits instead of App knowing how to render or copy each one.
//!
//! ```text
//!                ┌──────────────┐
//!                │     App      │
//!                └──────────────┘
//!                       │
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!     ┌─────────┐  ┌─────────┐  ┌─────────┐
//!     │  Grid   │  │ Caption │  │  Logs   │
//!     └─────────┘  └─────────┘  └─────────┘
//! ```
//!
//! - [`Component`] - render + identity
//! - [`Interactive`] - keyboard input
//! - [`Copyable`] - clipboard content

mod component;
mod copyable;
mod interactive;

pub use component::{Component, ComponentId, RenderContext};
pub use copyable::Copyable;
pub use interactive::{Handled, Interactive};
