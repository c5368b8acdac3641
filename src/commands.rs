mod export;
mod generate;
mod host;
mod import;
mod server;
mod watch;

pub use export::run_export;
pub use generate::run_generate;
pub use host::run_host;
pub use import::run_import;
pub use server::{run_health, run_save_config, run_tokens};
pub use watch::run_watch;
