/// Validation rules for verification submissions. The campus domain is
/// configured (`CAMPUS_EMAIL_DOMAIN`), these helpers only encode shape.
pub fn validate_real_name(real_name: &str) -> bool {
    !real_name.trim().is_empty()
}

/// Class numbers are exactly four ASCII digits, e.g. "2501".
pub fn validate_class_number(class_number: &str) -> bool {
    class_number.len() == 4 && class_number.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_campus_email(email: &str, campus_domain: &str) -> bool {
    if !email_address::EmailAddress::is_valid(email) {
        return false;
    }

    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.eq_ignore_ascii_case(campus_domain))
        .unwrap_or(false)
}

pub fn validate_image_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Trimmed, non-empty content for posts and comments.
pub fn normalize_content(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_number_must_be_four_digits() {
        assert!(validate_class_number("2501"));
        assert!(!validate_class_number("250"));
        assert!(!validate_class_number("25011"));
        assert!(!validate_class_number("25a1"));
        assert!(!validate_class_number(""));
    }

    #[test]
    fn campus_email_checks_domain_and_shape() {
        assert!(is_campus_email("li.hua@hsefz.cn", "hsefz.cn"));
        assert!(is_campus_email("li.hua@HSEFZ.CN", "hsefz.cn"));
        assert!(!is_campus_email("li.hua@gmail.com", "hsefz.cn"));
        assert!(!is_campus_email("not-an-email", "hsefz.cn"));
        // A subdomain is not the campus domain.
        assert!(!is_campus_email("li.hua@mail.hsefz.cn", "hsefz.cn"));
    }

    #[test]
    fn content_normalization_trims_and_rejects_blank() {
        assert_eq!(normalize_content("  hello  "), Some("hello"));
        assert_eq!(normalize_content("   "), None);
        assert_eq!(normalize_content(""), None);
    }

    #[test]
    fn image_urls_must_be_http() {
        assert!(validate_image_url("https://blob.example/img.avif"));
        assert!(!validate_image_url("ftp://blob.example/img.avif"));
        assert!(!validate_image_url("javascript:alert(1)"));
    }
}
