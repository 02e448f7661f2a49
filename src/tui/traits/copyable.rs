//! Copyable trait for components that provide clipboard content

use super::Component;

pub trait Copyable: Component {
    /// Human-readable text for the clipboard, `None` when there is nothing
    /// to copy
    fn copy_text(&self) -> Option<String>;
}
