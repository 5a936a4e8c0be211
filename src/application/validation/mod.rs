use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("valid regex"));

/// Usernames that would collide with fixed `/api/profile/*` routes.
const RESERVED_USERNAMES: &[&str] = &["about", "link"];

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
        && !RESERVED_USERNAMES
            .iter()
            .any(|r| r.eq_ignore_ascii_case(username))
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(is_valid_email("a.b+tag@example.co"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn usernames() {
        assert!(is_valid_username("alice_01"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("a-very-long-username-indeed"));
        assert!(!is_valid_username("bad-dash"));
        assert!(!is_valid_username("About"));
        assert!(!is_valid_username("link"));
    }

    #[test]
    fn passwords() {
        assert!(is_valid_password("secret"));
        assert!(!is_valid_password("12345"));
    }
}
