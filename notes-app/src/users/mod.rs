use uuid::Uuid;

pub type UserId = Uuid;

pub mod auth;
pub mod password;

pub const USERNAME_MAX_LENGTH: usize = 150;

/// Letters, digits and `@.+-_`, like most account systems accept.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= USERNAME_MAX_LENGTH
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(is_valid_username("reader"));
        assert!(is_valid_username("Лев_Толстой"));
        assert!(is_valid_username("a.b+c@d-e"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("two words"));
        assert!(!is_valid_username(&"a".repeat(USERNAME_MAX_LENGTH + 1)));
    }
}
