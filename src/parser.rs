//! Internal module for decoding message bodies.

use crate::error::{Error, Result};
use mailparse::parse_mail;
use tracing::debug;

/// Parses a raw message and returns its decoded body text.
///
/// `index` is the message's position in the mailbox and only feeds errors
/// and log fields.
pub(crate) fn message_body(index: usize, raw: &[u8]) -> Result<String> {
    let parsed = parse_mail(raw).map_err(|source| Error::ParseEmail { index, source })?;

    let text = extract_body_text(&parsed).map_err(|source| Error::ExtractBody { index, source })?;

    debug!(
        index,
        mimetype = %parsed.ctype.mimetype,
        body_len = text.len(),
        "Decoded message body"
    );
    Ok(text)
}

/// Extracts text content from a parsed email, handling multipart messages.
///
/// The router's notifications carry their table in HTML, so `text/html`
/// wins over `text/plain`.
fn extract_body_text(
    parsed: &mailparse::ParsedMail<'_>,
) -> std::result::Result<String, mailparse::MailParseError> {
    if !parsed.subparts.is_empty() {
        for wanted in ["text/html", "text/plain"] {
            if let Some(part) = parsed
                .subparts
                .iter()
                .find(|part| part.ctype.mimetype.eq_ignore_ascii_case(wanted))
            {
                return part.get_body();
            }
        }

        if let Some(first_part) = parsed.subparts.first() {
            return extract_body_text(first_part);
        }
    }

    // Single part message or fallback
    parsed.get_body()
}
