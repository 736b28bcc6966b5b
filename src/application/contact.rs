//! Contact form intake: validation, then hand-off to an inbox.

use std::sync::Arc;

use async_trait::async_trait;
use folio_api_types::ContactFormRequest;
use metrics::counter;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::contact::{
    ContactDraft, ContactPolicy, ContactSubmission, ContactValidationError,
};

/// A stored, validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub id: Uuid,
    pub submitted_at: OffsetDateTime,
    pub submission: ContactSubmission,
}

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("contact inbox unavailable: {0}")]
    Unavailable(String),
}

/// Destination for accepted submissions.
#[async_trait]
pub trait ContactInbox: Send + Sync {
    async fn deliver(&self, record: ContactRecord) -> Result<(), InboxError>;

    /// Most recent submissions first.
    async fn recent(&self, limit: usize) -> Result<Vec<ContactRecord>, InboxError>;
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error(transparent)]
    Invalid(#[from] ContactValidationError),
    #[error(transparent)]
    Inbox(#[from] InboxError),
}

#[derive(Clone)]
pub struct ContactService {
    inbox: Arc<dyn ContactInbox>,
    policy: ContactPolicy,
}

impl ContactService {
    pub fn new(inbox: Arc<dyn ContactInbox>, policy: ContactPolicy) -> Self {
        Self { inbox, policy }
    }

    pub fn policy(&self) -> &ContactPolicy {
        &self.policy
    }

    pub async fn submit(&self, form: &ContactFormRequest) -> Result<ContactRecord, ContactError> {
        let draft = ContactDraft {
            name: &form.name,
            email: &form.email,
            subject: form.subject.as_deref(),
            message: &form.message,
        };

        let submission = match ContactSubmission::validate(draft, &self.policy) {
            Ok(submission) => submission,
            Err(err) => {
                counter!("folio_contact_submissions_total", "outcome" => "rejected").increment(1);
                return Err(err.into());
            }
        };

        let record = ContactRecord {
            id: Uuid::new_v4(),
            submitted_at: OffsetDateTime::now_utc(),
            submission,
        };

        if let Err(err) = self.inbox.deliver(record.clone()).await {
            counter!("folio_contact_submissions_total", "outcome" => "failed").increment(1);
            warn!(
                target = "application::contact",
                id = %record.id,
                error = %err,
                "contact submission could not be delivered"
            );
            return Err(err.into());
        }

        counter!("folio_contact_submissions_total", "outcome" => "accepted").increment(1);
        info!(
            target = "application::contact",
            id = %record.id,
            "contact submission accepted"
        );
        Ok(record)
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<ContactRecord>, ContactError> {
        Ok(self.inbox.recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryContactInbox;

    struct ClosedInbox;

    #[async_trait]
    impl ContactInbox for ClosedInbox {
        async fn deliver(&self, _record: ContactRecord) -> Result<(), InboxError> {
            Err(InboxError::Unavailable("mailbox closed".to_string()))
        }

        async fn recent(&self, _limit: usize) -> Result<Vec<ContactRecord>, InboxError> {
            Ok(Vec::new())
        }
    }

    fn form(message: &str) -> ContactFormRequest {
        ContactFormRequest {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            subject: Some("Hello".to_string()),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn accepted_submission_reaches_inbox() {
        let inbox = Arc::new(InMemoryContactInbox::new(10));
        let service = ContactService::new(inbox.clone(), ContactPolicy::default());

        let record = service
            .submit(&form("I enjoyed your compiler talk."))
            .await
            .expect("accepted");

        let stored = service.recent(5).await.expect("recent");
        assert_eq!(stored, vec![record]);
        assert_eq!(stored[0].submission.subject(), Some("Hello"));
    }

    #[tokio::test]
    async fn invalid_submission_is_not_delivered() {
        let inbox = Arc::new(InMemoryContactInbox::new(10));
        let service = ContactService::new(inbox.clone(), ContactPolicy::default());

        let err = service.submit(&form("short")).await.expect_err("rejected");
        assert!(matches!(err, ContactError::Invalid(_)));
        assert!(service.recent(5).await.expect("recent").is_empty());
    }

    #[tokio::test]
    async fn inbox_failures_propagate() {
        let service = ContactService::new(Arc::new(ClosedInbox), ContactPolicy::default());
        let err = service
            .submit(&form("A long enough message."))
            .await
            .expect_err("inbox closed");
        assert!(matches!(err, ContactError::Inbox(_)));
    }
}
