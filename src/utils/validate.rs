use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 课程代码：字母开头，字母数字与连字符，如 CS601、EE-210
static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]{1,19}$").expect("Invalid course code regex"));

const MAX_COURSE_NAME_LEN: usize = 200;
const MAX_FEEDBACK_CONTENT_LEN: usize = 10_000;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略：至少 8 个字符，同时包含大写字母、小写字母和数字
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

pub fn validate_course_code(code: &str) -> Result<(), &'static str> {
    if !COURSE_CODE_RE.is_match(code) {
        return Err(
            "Course code must start with a letter and contain 2-20 letters, digits or hyphens",
        );
    }
    Ok(())
}

pub fn validate_course_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Course name must not be empty");
    }
    if name.chars().count() > MAX_COURSE_NAME_LEN {
        return Err("Course name must be at most 200 characters");
    }
    Ok(())
}

pub fn validate_feedback_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("Feedback content must not be empty");
    }
    if content.chars().count() > MAX_FEEDBACK_CONTENT_LEN {
        return Err("Feedback content must be at most 10000 characters");
    }
    Ok(())
}
