// src/services/attachment_service.rs
//
// File references attached to an asset. Uploading and deleting the blob
// itself belongs to the caller.

use std::sync::Arc;

use crate::domain::{Attachment, NewAttachment};
use crate::error::AppResult;
use crate::events::{AttachmentAdded, EventBus};
use crate::repositories::AttachmentRepository;
use crate::services::identifier_resolver::IdentifierResolver;

pub struct AttachmentService {
    attachment_repo: Arc<dyn AttachmentRepository>,
    resolver: Arc<IdentifierResolver>,
    event_bus: Arc<EventBus>,
}

impl AttachmentService {
    pub fn new(
        attachment_repo: Arc<dyn AttachmentRepository>,
        resolver: Arc<IdentifierResolver>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            attachment_repo,
            resolver,
            event_bus,
        }
    }

    pub fn attach(&self, identifier: &str, file_name: &str, storage_key: &str) -> AppResult<Attachment> {
        let asset = self.resolver.resolve(identifier)?;
        let draft = NewAttachment::new(asset.creation_key, file_name, storage_key)?;

        let attachment = self.attachment_repo.insert(&draft)?;
        self.event_bus.emit(AttachmentAdded::new(
            asset.creation_key,
            attachment.id,
            attachment.storage_key.clone(),
        ));
        Ok(attachment)
    }

    pub fn list(&self, identifier: &str) -> AppResult<Vec<Attachment>> {
        let asset = self.resolver.resolve(identifier)?;
        self.attachment_repo.list_for_asset(asset.creation_key)
    }
}
