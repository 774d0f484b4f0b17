#[cfg(test)]
pub(crate) mod fixtures;
mod recipient_email;
mod recipient_list;
mod send_request;

pub use recipient_email::{RecipientEmail, is_valid_email_format};
pub use recipient_list::{
    BATCH_REJECTED_ALERT, INVALID_FORMAT_ALERT, IgnoreReason, Key, KeyResponse, RecipientEntry,
    RecipientInput, RecipientOption, RecipientSet, RejectReason, TokenOutcome,
};
pub use send_request::{MissingFieldError, SendRequest, SendResult, SenderCredentials};
