//! Startup wiring for domain event handling.
//!
//! The handler registry is assembled here explicitly, during application
//! startup, and shared read-only afterwards - no registration happens as a
//! side effect of module loading.

mod handlers;

pub use handlers::DeleteDraftsOfAuthor;

use std::sync::Arc;

use crate::domain::events::{DomainEventHandlerRegistry, DomainEventKind};
use crate::ports::DraftRepository;

/// Builds the process-wide handler registry.
///
/// Both the commit-time dispatcher and the background event server consume
/// the result; it must be fully built before either starts.
pub fn build_handler_registry(drafts: Arc<dyn DraftRepository>) -> DomainEventHandlerRegistry {
    let mut registry = DomainEventHandlerRegistry::new();
    registry.register(
        DomainEventKind::AuthorDeleted,
        Arc::new(DeleteDraftsOfAuthor::new(drafts)),
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use async_trait::async_trait;

    struct NoopDraftRepository;

    #[async_trait]
    impl DraftRepository for NoopDraftRepository {
        async fn delete_drafts_of_author(&self, _: &str) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    #[test]
    fn registry_covers_author_deletion() {
        let registry = build_handler_registry(Arc::new(NoopDraftRepository));

        let handlers = registry.get_handlers(DomainEventKind::AuthorDeleted);
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].name(), "DeleteDraftsOfAuthor");
    }
}
