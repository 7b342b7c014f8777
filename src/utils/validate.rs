//! 输入校验
//!
//! 返回的错误信息直接写入 API 响应。

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,16}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const MAX_DISPLAY_NAME_CHARS: usize = 64;
const MAX_TITLE_CHARS: usize = 200;
const MAX_AVATAR_URL_CHARS: usize = 512;
const MAX_SUBMISSION_CHARS: usize = 100_000;
const MAX_FEEDBACK_CHARS: usize = 10_000;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "letmein1",
    "welcome1",
];

/// 用户名：5-16 位字母、数字、下划线或连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err("Username must be 5-16 characters of letters, digits, underscores or hyphens")
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() <= 254 && EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err("Email format is invalid")
    }
}

/// 密码策略：至少 8 位，同时包含大写、小写字母和数字，且不在常见弱密码列表中
///
/// 返回所有未满足的规则。
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut violations = Vec::new();

    if password.chars().count() < 8 {
        violations.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain at least one digit");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        violations.push("Password is too common, please choose a stronger password");
    }

    violations
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let violations = password_violations(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

pub fn validate_display_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_DISPLAY_NAME_CHARS {
        return Err("Display name must be between 1 and 64 characters");
    }
    Ok(())
}

pub fn validate_avatar_url(url: &str) -> Result<(), &'static str> {
    if url.len() > MAX_AVATAR_URL_CHARS {
        return Err("Avatar URL is too long");
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err("Avatar URL must start with http:// or https://");
    }
    Ok(())
}

/// 课程、作业标题
pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err("Title must not be empty");
    }
    if len > MAX_TITLE_CHARS {
        return Err("Title must be at most 200 characters");
    }
    Ok(())
}

pub fn validate_submission_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("Submission content must not be empty");
    }
    if content.chars().count() > MAX_SUBMISSION_CHARS {
        return Err("Submission content is too long");
    }
    Ok(())
}

pub fn validate_feedback(feedback: &str) -> Result<(), &'static str> {
    if feedback.chars().count() > MAX_FEEDBACK_CHARS {
        return Err("Feedback is too long");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_the-2nd").is_ok());
        assert!(validate_username("abcd").is_err());
        assert!(validate_username("a_very_long_username").is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username("中文用户名字").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("student@example.edu").is_ok());
        assert!(validate_email("a.b+c@sub.example.org").is_ok());
        assert!(validate_email("missing-at.example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@example.c|m").is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(validate_password("MyP@ssw0rd").is_ok());
    }

    #[test]
    fn test_password_violations_are_collected() {
        let violations = password_violations("abc");
        assert!(violations.contains(&"Password must be at least 8 characters long"));
        assert!(violations.contains(&"Password must contain at least one uppercase letter"));
        assert!(violations.contains(&"Password must contain at least one digit"));
        assert!(!violations.contains(&"Password must contain at least one lowercase letter"));

        let message = validate_password("ABCDEFGH").unwrap_err();
        assert!(message.contains("lowercase"));
        assert!(message.contains("digit"));
    }

    #[test]
    fn test_common_password_rejected() {
        assert!(
            password_violations("Password1")
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_titles_and_content() {
        assert!(validate_title("Lab 3: Parsers").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
        assert!(validate_submission_content("my answer").is_ok());
        assert!(validate_submission_content("\n\t").is_err());
    }

    #[test]
    fn test_profile_fields() {
        assert!(validate_display_name("Ada Lovelace").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_avatar_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_avatar_url("javascript:alert(1)").is_err());
    }
}
