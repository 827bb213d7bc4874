//! Delivery channels. Implement `NotifierPort`.

pub mod console;
pub mod email;
pub mod webhook;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use webhook::{DiscordWebhook, SlackWebhook};
