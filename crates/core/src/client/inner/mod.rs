mod cookie_store;
mod logging;
mod transport;

pub use cookie_store::CredentialJar;
pub use logging::{init_log, set_log_level};
pub use transport::{HttpTransport, Transport};
