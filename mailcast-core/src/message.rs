use serde::{Deserialize, Serialize};

/// A fully rendered three-part email message.
///
/// All three parts are produced from the same template bundle and the same
/// render context, so they are mutually consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
}

/// Sender and recipient addressing for one delivery.
///
/// Values are bare email addresses; display names are left empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub from: String,
    pub to: String,
}
