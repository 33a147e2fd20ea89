// Adapters layer: concrete implementations of the domain ports.

pub mod console;
pub mod textmagic;

pub use console::ConsoleSender;
pub use textmagic::TextMagicClient;
