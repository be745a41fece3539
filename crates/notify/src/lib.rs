pub mod render;
pub mod webhook;

pub use render::{render_alert, render_match, DEFAULT_MAX_LEN};
pub use webhook::{LogNotifier, WebhookNotifier};
