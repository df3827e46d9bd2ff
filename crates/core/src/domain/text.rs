//! Trimmed, length-bounded text values used by catalog records and comments.

use super::DomainError;

fn bounded(field: &'static str, value: String, max: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(DomainError::EmptyField(field));
    }

    let len = trimmed.chars().count();
    if len > max {
        return Err(DomainError::FieldTooLong { field, len, max });
    }

    Ok(trimmed.to_string())
}

macro_rules! define_text_type {
    ($name:ident, $field:literal, $max:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub const MAX_LEN: usize = $max;

            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                bounded($field, value.into(), Self::MAX_LEN).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }
    };
}

define_text_type!(DisplayName, "name", 120);
define_text_type!(CompanyName, "company name", 200);
define_text_type!(RegistrationId, "registration id", 64);
define_text_type!(Title, "title", 200);
define_text_type!(Description, "description", 10_000);
define_text_type!(ResponseBody, "response text", 20_000);
define_text_type!(Comment, "comment", 2_000);

impl Comment {
    /// Blank comments are treated as absent.
    pub fn optional(value: Option<String>) -> Result<Option<Self>, DomainError> {
        match value {
            Some(text) if !text.trim().is_empty() => Self::new(text).map(Some),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub const MAX_LEN: usize = 255;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = bounded("email", value.into(), Self::MAX_LEN)?.to_lowercase();

        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !value.contains(char::is_whitespace)
            }
            None => false,
        };

        if valid {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidEmail(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed() {
        let title = Title::new("  Build a parser  ").expect("title should be valid");
        assert_eq!(title.as_str(), "Build a parser");
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = Title::new("   ").expect_err("blank title should be rejected");
        assert_eq!(err, DomainError::EmptyField("title"));
    }

    #[test]
    fn too_long_text_is_rejected() {
        let long = "a".repeat(Comment::MAX_LEN + 1);
        let err = Comment::new(long).expect_err("too long comment should be rejected");
        assert_eq!(
            err,
            DomainError::FieldTooLong {
                field: "comment",
                len: 2_001,
                max: 2_000,
            }
        );
    }

    #[test]
    fn blank_comment_is_absent() {
        assert_eq!(Comment::optional(None).expect("none is fine"), None);
        assert_eq!(
            Comment::optional(Some("  ".to_string())).expect("blank is fine"),
            None
        );
        let comment = Comment::optional(Some(" solid work ".to_string()))
            .expect("comment should be valid")
            .expect("comment should be present");
        assert_eq!(comment.as_str(), "solid work");
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new(" Ana@Example.COM ").expect("email should be valid");
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["ana", "@example.com", "ana@example", "ana@@example.com", "a b@x.io"] {
            assert!(Email::new(raw).is_err(), "{raw} should be rejected");
        }
    }
}
