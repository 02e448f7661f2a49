// Components module - building blocks of the grid screen
//
// - Grid panel: the color-coded array and its click handling
// - Caption bar: selection statistics
// - Logs panel: captured log entries (toggle with `l`)
// - Status bar: key hints and selection count
// - Toast: transient notifications

pub mod caption_bar;
pub mod grid_panel;
pub mod logs_panel;
pub mod status_bar;
pub mod toast;

pub use grid_panel::GridPanel;
pub use logs_panel::LogsPanel;
pub use toast::Toast;
