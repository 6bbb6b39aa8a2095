pub mod channel;
pub mod loader;
pub mod schema;

pub use channel::{ChannelConfiguration, ChannelRow};
pub use loader::{load, load_from_dir, load_settings_from_str, sanitize_customer, DEFAULT_CONFIG_DIR};
pub use schema::{
    ChannelSection, ConnectionSettings, DatabaseSection, IntakeSettings, LoggingSection, PollerSection,
};
