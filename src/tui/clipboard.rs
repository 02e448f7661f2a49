//! Clipboard helper for copying captions to the system clipboard
//!
//! Uses `arboard` for cross-platform support. The clipboard is opened per
//! copy so no handle outlives the TUI.

use anyhow::{bail, Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard
///
/// Fails on empty text and when no clipboard is reachable (headless Linux).
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Nothing to copy");
    }
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected_before_touching_the_clipboard() {
        let err = copy_to_clipboard("   ").unwrap_err();
        assert_eq!(err.to_string(), "Nothing to copy");
    }
}
