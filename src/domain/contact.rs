//! Contact form submissions and their server-side validation rules.

use thiserror::Error;

pub const NAME_MAX_CHARS: usize = 100;
pub const SUBJECT_MAX_CHARS: usize = 200;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const DEFAULT_MESSAGE_MAX_CHARS: usize = 5000;
const EMAIL_MAX_CHARS: usize = 254;

/// Limits applied when validating a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPolicy {
    pub message_max_chars: usize,
}

impl Default for ContactPolicy {
    fn default() -> Self {
        Self {
            message_max_chars: DEFAULT_MESSAGE_MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every rejected field of a submission, in form order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("contact submission rejected: {} invalid field(s)", .violations.len())]
pub struct ContactValidationError {
    pub violations: Vec<FieldViolation>,
}

/// Raw form values as received from the client.
#[derive(Debug, Clone, Copy)]
pub struct ContactDraft<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: Option<&'a str>,
    pub message: &'a str,
}

/// A submission that passed validation. Values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
}

impl ContactSubmission {
    pub fn validate(
        draft: ContactDraft<'_>,
        policy: &ContactPolicy,
    ) -> Result<Self, ContactValidationError> {
        let mut violations = Vec::new();

        let name = draft.name.trim();
        let name_len = name.chars().count();
        if name_len == 0 {
            violations.push(FieldViolation::new("name", "name is required"));
        } else if name_len > NAME_MAX_CHARS {
            violations.push(FieldViolation::new(
                "name",
                format!("name must be at most {NAME_MAX_CHARS} characters"),
            ));
        }

        let email = draft.email.trim();
        if email.is_empty() {
            violations.push(FieldViolation::new("email", "email is required"));
        } else if !is_plausible_email(email) {
            violations.push(FieldViolation::new("email", "email address is not valid"));
        }

        let subject = draft
            .subject
            .map(str::trim)
            .filter(|subject| !subject.is_empty());
        if let Some(subject) = subject
            && subject.chars().count() > SUBJECT_MAX_CHARS
        {
            violations.push(FieldViolation::new(
                "subject",
                format!("subject must be at most {SUBJECT_MAX_CHARS} characters"),
            ));
        }

        let message = draft.message.trim();
        let message_len = message.chars().count();
        if message_len < MESSAGE_MIN_CHARS {
            violations.push(FieldViolation::new(
                "message",
                format!("message must be at least {MESSAGE_MIN_CHARS} characters"),
            ));
        } else if message_len > policy.message_max_chars {
            violations.push(FieldViolation::new(
                "message",
                format!(
                    "message must be at most {} characters",
                    policy.message_max_chars
                ),
            ));
        }

        if !violations.is_empty() {
            return Err(ContactValidationError { violations });
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.map(str::to_string),
            message: message.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().count() > EMAIL_MAX_CHARS || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft<'a>(name: &'a str, email: &'a str, message: &'a str) -> ContactDraft<'a> {
        ContactDraft {
            name,
            email,
            subject: None,
            message,
        }
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let submission = ContactSubmission::validate(
            ContactDraft {
                name: "  Ada Lovelace ",
                email: " ada@example.com ",
                subject: Some("   "),
                message: "  Hello there, nice portfolio!  ",
            },
            &ContactPolicy::default(),
        )
        .expect("valid submission");

        assert_eq!(submission.name(), "Ada Lovelace");
        assert_eq!(submission.email(), "ada@example.com");
        assert_eq!(submission.subject(), None);
        assert_eq!(submission.message(), "Hello there, nice portfolio!");
    }

    #[test]
    fn all_violations_are_reported_together() {
        let err = ContactSubmission::validate(draft("", "nope", "short"), &ContactPolicy::default())
            .expect_err("invalid submission");

        let fields: Vec<_> = err.violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn message_limit_follows_policy() {
        let policy = ContactPolicy {
            message_max_chars: 20,
        };
        let err = ContactSubmission::validate(
            draft("Ada", "ada@example.com", "This message is far too long"),
            &policy,
        )
        .expect_err("too long");

        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "message");
        assert!(err.violations[0].message.contains("20"));
    }

    #[test]
    fn email_plausibility_rules() {
        assert!(is_plausible_email("a@b.co"));
        assert!(is_plausible_email("first.last+tag@sub.example.org"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ada@localhost"));
        assert!(!is_plausible_email("ada@example..com"));
        assert!(!is_plausible_email("ada@@example.com"));
        assert!(!is_plausible_email("ada lovelace@example.com"));
    }

    #[test]
    fn long_subject_is_rejected() {
        let subject = "x".repeat(SUBJECT_MAX_CHARS + 1);
        let err = ContactSubmission::validate(
            ContactDraft {
                name: "Ada",
                email: "ada@example.com",
                subject: Some(&subject),
                message: "A perfectly fine message.",
            },
            &ContactPolicy::default(),
        )
        .expect_err("subject too long");

        assert_eq!(err.violations[0].field, "subject");
    }
}
