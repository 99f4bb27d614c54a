//! Email record types.
//!
//! A [`RawRow`] is one line of the exported mailbox as read from disk. The
//! normalizer turns it into an [`EmailRecord`], which is what every extractor
//! and the aggregator work from.

use chrono::NaiveDateTime;
use mailparse::MailAddr;
use serde::{Deserialize, Serialize};

/// One input row with the four logical fields of an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Sender header, e.g. `"Ana Pérez <ana@example.com>"`.
    pub from_header: String,
    pub subject: String,
    pub body: String,
    /// Date as exported, unparsed.
    pub date: String,
}

impl RawRow {
    pub fn new(
        from_header: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            from_header: from_header.into(),
            subject: subject.into(),
            body: body.into(),
            date: date.into(),
        }
    }
}

/// A normalized message. Records only exist with a parsed timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Display name, or the address local part when the header had none.
    pub display_name: String,
    /// Lower-cased sender address.
    pub email_address: String,
    /// Whether `display_name` came from the header rather than the fallback.
    pub has_display_name: bool,
    /// Trimmed, lower-cased subject.
    pub subject: String,
    /// Trimmed, lower-cased body.
    pub body: String,
    pub timestamp: NaiveDateTime,
}

impl EmailRecord {
    /// Text the extractors look at: subject and body joined by one space.
    pub fn text(&self) -> String {
        format!("{} {}", self.subject, self.body)
    }
}

/// A parsed `From` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Lower-cased email address.
    pub email: String,
    /// Display name (e.g., "John Doe").
    pub name: Option<String>,
    /// Address local part with its original casing.
    local_part: String,
}

impl Address {
    /// Parses a `From` header in `Name <addr>` or bare-address form.
    ///
    /// Never fails: a header the RFC 5322 parser rejects is read leniently,
    /// taking the bracketed part (or the whole header) as the address. Only
    /// `email` is lower-cased; an empty display name becomes `None`.
    pub fn parse(header: &str) -> Self {
        let header = header.trim();

        let parsed = mailparse::addrparse(header).ok().and_then(|list| {
            list.iter().find_map(|addr| match addr {
                MailAddr::Single(info) => Some((info.display_name.clone(), info.addr.clone())),
                MailAddr::Group(group) => group
                    .addrs
                    .first()
                    .map(|info| (info.display_name.clone(), info.addr.clone())),
            })
        });

        let (name, email) = match parsed {
            Some((name, email)) if !email.trim().is_empty() => (name, email),
            _ => lenient_split(header),
        };
        let email = email.trim();

        Self {
            email: email.to_lowercase(),
            name: name
                .map(|n| n.trim().trim_matches('"').trim().to_string())
                .filter(|n| !n.is_empty()),
            local_part: email.split('@').next().unwrap_or_default().to_string(),
        }
    }

    /// Substring before the first `@`, or the whole address when there is none.
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// The display name, falling back to the local part.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.local_part.as_str())
    }
}

/// Splits `Name <addr>` by hand for headers the strict parser rejects.
fn lenient_split(header: &str) -> (Option<String>, String) {
    if let (Some(open), Some(close)) = (header.rfind('<'), header.rfind('>')) {
        if open < close {
            let name = header[..open].trim();
            let email = header[open + 1..close].trim();
            let name = (!name.is_empty()).then(|| name.to_string());
            return (name, email.to_string());
        }
    }
    (None, header.to_string())
}
