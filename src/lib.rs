pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod scanner;
pub mod seen;
pub mod types;

pub use api::CowinClient;
pub use config::Config;
pub use error::{Result, ScannerError};
pub use notify::{Notifier, TelegramNotifier};
pub use scanner::SlotScanner;
pub use seen::SeenSlots;
pub use types::{CalendarResponse, Center, Session};
