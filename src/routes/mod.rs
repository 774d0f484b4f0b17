mod health_check;
mod send_email;

pub use health_check::*;
pub use send_email::*;
