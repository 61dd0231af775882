pub mod launcher;
pub mod relay;

pub use launcher::launch;
pub use relay::{exit_code, wait_with_relay};
