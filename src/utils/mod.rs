//! Utility modules for the catalog gateway
//!
//! ## Module Organization
//!
//! - **crypto**: Password hashing for newly created accounts
//! - **error**: Error handling and the HTTP error mapping
//! - **logging**: Tracing subscriber setup

pub mod crypto;
pub mod error;
pub mod logging;

/// Truncate string to specified length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("пароль-пароль", 6), "пар...");
    }
}
