/// Checks that an email has a basic `local@domain.tld` shape.
///
/// This is intentionally loose -- the API only rejects obviously malformed
/// addresses; deliverability is not its problem.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// True if every string is present and non-empty after trimming.
pub fn all_present(fields: &[Option<&str>]) -> bool {
    fields
        .iter()
        .all(|f| f.is_some_and(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("a+tag@b.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("ana@nodot"));
        assert!(!is_valid_email("ana@x."));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana lee@x.com"));
        assert!(!is_valid_email("ana@x@y.com"));
    }

    #[test]
    fn test_all_present() {
        assert!(all_present(&[Some("a"), Some("b")]));
        assert!(!all_present(&[Some("a"), None]));
        assert!(!all_present(&[Some("  "), Some("b")]));
        assert!(all_present(&[]));
    }
}
