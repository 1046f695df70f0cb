//! DraftRepository port - the slice of draft persistence the event
//! handlers need.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for mutating editorial drafts in reaction to domain events.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Deletes every draft belonging to the given author.
    ///
    /// Returns the number of drafts removed.
    async fn delete_drafts_of_author(&self, author_id: &str) -> Result<u64, DomainError>;
}
