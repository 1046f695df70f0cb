//! In-process event handlers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::events::{DomainEvent, DomainEventHandler};
use crate::domain::foundation::DomainError;
use crate::ports::DraftRepository;

/// Deletes an author's remaining drafts when the author is removed.
pub struct DeleteDraftsOfAuthor {
    drafts: Arc<dyn DraftRepository>,
}

impl DeleteDraftsOfAuthor {
    /// Creates the handler over the draft repository.
    pub fn new(drafts: Arc<dyn DraftRepository>) -> Self {
        Self { drafts }
    }
}

#[async_trait]
impl DomainEventHandler for DeleteDraftsOfAuthor {
    async fn handle(&self, event: DomainEvent) -> Result<(), DomainError> {
        let DomainEvent::AuthorDeleted(event) = event else {
            return Err(DomainError::handler(
                "DeleteDraftsOfAuthor received an event of an unexpected kind",
            ));
        };
        let removed = self.drafts.delete_drafts_of_author(&event.author_id).await?;
        tracing::info!(
            author_id = %event.author_id,
            removed,
            "deleted drafts of removed author"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "DeleteDraftsOfAuthor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingDraftRepository {
        deleted_for: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DraftRepository for RecordingDraftRepository {
        async fn delete_drafts_of_author(&self, author_id: &str) -> Result<u64, DomainError> {
            self.deleted_for.lock().unwrap().push(author_id.to_string());
            Ok(2)
        }
    }

    #[tokio::test]
    async fn author_deleted_cascades_to_drafts() {
        let drafts = Arc::new(RecordingDraftRepository {
            deleted_for: Mutex::new(Vec::new()),
        });
        let handler = DeleteDraftsOfAuthor::new(drafts.clone());

        handler
            .handle(DomainEvent::author_deleted("a1"))
            .await
            .unwrap();

        assert_eq!(*drafts.deleted_for.lock().unwrap(), vec!["a1".to_string()]);
    }

    #[tokio::test]
    async fn other_event_kinds_are_rejected() {
        let drafts = Arc::new(RecordingDraftRepository {
            deleted_for: Mutex::new(Vec::new()),
        });
        let handler = DeleteDraftsOfAuthor::new(drafts.clone());

        let result = handler
            .handle(DomainEvent::news_article_published("n1", "a1"))
            .await;

        assert!(result.is_err());
        assert!(drafts.deleted_for.lock().unwrap().is_empty());
    }
}
