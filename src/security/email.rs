//! Email address syntax checks.

use email_address::{EmailAddress, Options};

/// Characters kept by the sanitization filter; everything else is stripped.
const ALLOWED_SPECIALS: &str = "!#$%&'*+-=?^_`{|}~@.[]";

/// Remove every character outside the email character set.
pub fn sanitize_email(email: &str) -> String {
    email
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ALLOWED_SPECIALS.contains(*c))
        .collect()
}

/// Whether `email` survives sanitization unchanged and parses as an address.
///
/// The sanitization pass also rules out the `Name <addr>` display form,
/// which the parser would otherwise accept. The domain needs a TLD and
/// hostname labels only.
pub fn is_valid_email(email: &str) -> bool {
    let sanitized = sanitize_email(email);
    if sanitized.is_empty() || sanitized != email {
        return false;
    }
    if EmailAddress::parse_with_options(email, Options::default().with_required_tld()).is_err() {
        return false;
    }
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.split('.').all(is_hostname_label))
}

/// `[A-Za-z0-9-]`, non-empty, no leading or trailing hyphen.
fn is_hostname_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
