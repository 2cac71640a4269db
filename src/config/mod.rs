pub mod app_config;
pub mod probe_config;

pub use app_config::{load_config, load_config_with, setup_http_client};
pub use probe_config::{Config, CredentialSource};
