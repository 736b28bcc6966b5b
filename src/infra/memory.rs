//! In-process contact inbox.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::contact::{ContactInbox, ContactRecord, InboxError};

/// Bounded inbox holding the newest submissions in memory. When full, the
/// oldest record is evicted.
#[derive(Debug)]
pub struct InMemoryContactInbox {
    capacity: usize,
    records: Mutex<VecDeque<ContactRecord>>,
}

impl InMemoryContactInbox {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl ContactInbox for InMemoryContactInbox {
    async fn deliver(&self, record: ContactRecord) -> Result<(), InboxError> {
        let mut records = self.records.lock().await;
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ContactRecord>, InboxError> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
