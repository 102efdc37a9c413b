/// Minimum accepted password length on signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Shape check for `local@domain.tld`-style addresses: no whitespace, exactly
/// one `@`, and a domain with an interior dot. Intentionally loose — this is
/// a typo guard, not RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    match (domain.find('.'), domain.rfind('.')) {
        (Some(first), Some(last)) => first > 0 && last < domain.len() - 1,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("ana.kovac@example.org"));
        assert!(is_valid_email("user+tag@mail.co.uk"));
    }

    #[test]
    fn test_rejects_missing_at_or_domain() {
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@"));
    }

    #[test]
    fn test_rejects_bad_dot_placement() {
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_rejects_whitespace_and_double_at() {
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email(""));
    }
}
