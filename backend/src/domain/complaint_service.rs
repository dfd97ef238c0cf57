//! Complaint lifecycle service.
//!
//! Implements the complaint driving ports over a repository and an
//! attachment store. Creation stages the attachment binary before the record
//! is persisted and deletes it again on every failure path after staging, so
//! a stored binary without a referencing record never outlives the request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    AttachmentStore, ComplaintCommand, ComplaintListFilter, ComplaintQuery, ComplaintRepository,
    ComplaintRepositoryError, CreateComplaintRequest, NewComplaintRecord,
};
use crate::domain::{
    AttachmentUpload, Category, ComplaintAction, ComplaintFilter, ComplaintWithOwner, Description,
    Error, Identity, Priority, Status, attachment, policy,
};

fn map_repository_error(error: ComplaintRepositoryError) -> Error {
    match error {
        ComplaintRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("complaint repository unavailable: {message}"))
        }
        ComplaintRepositoryError::Query { message } => {
            Error::storage_failure(format!("complaint repository error: {message}"))
        }
    }
}

/// Complaint service implementing the command and query driving ports.
#[derive(Clone)]
pub struct ComplaintService<R, S> {
    complaint_repo: Arc<R>,
    attachment_store: Arc<S>,
}

impl<R, S> ComplaintService<R, S> {
    /// Create a new service over the repository and attachment store.
    pub fn new(complaint_repo: Arc<R>, attachment_store: Arc<S>) -> Self {
        Self {
            complaint_repo,
            attachment_store,
        }
    }
}

impl<R, S> ComplaintService<R, S>
where
    R: ComplaintRepository,
    S: AttachmentStore,
{
    /// Stage the attachment binary, when one was supplied.
    async fn stage_attachment(
        &self,
        upload: Option<&AttachmentUpload>,
    ) -> Result<Option<String>, Error> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        let validated = attachment::validate(upload)?;
        let name = validated.storage_name(Utc::now());
        let stored = self
            .attachment_store
            .save(validated.bytes(), &name)
            .await
            .map_err(|err| Error::storage_failure(format!("attachment staging failed: {err}")))?;
        Ok(Some(stored))
    }

    /// Remove a staged binary after a post-staging failure.
    ///
    /// The original error always wins; a failed cleanup is logged and the
    /// orphaned name surfaced for operators rather than returned to the
    /// caller.
    async fn discard_staged(&self, name: &str) {
        if let Err(err) = self.attachment_store.delete(name).await {
            tracing::warn!(attachment = name, error = %err, "failed to remove staged attachment");
        }
    }
}

#[async_trait]
impl<R, S> ComplaintCommand for ComplaintService<R, S>
where
    R: ComplaintRepository,
    S: AttachmentStore,
{
    async fn create(
        &self,
        caller: &Identity,
        request: CreateComplaintRequest,
        attachment: Option<AttachmentUpload>,
    ) -> Result<ComplaintWithOwner, Error> {
        policy::authorize(caller, ComplaintAction::Create)?;

        let staged = self.stage_attachment(attachment.as_ref()).await?;

        let outcome = async {
            let category = request
                .category
                .parse::<Category>()
                .map_err(|err| Error::invalid_category(err.to_string()))?;
            let description = Description::new(request.description)
                .map_err(|err| Error::invalid_description_length(err.to_string()))?;
            let priority = Priority::from_request(request.priority.as_deref());

            self.complaint_repo
                .insert(NewComplaintRecord {
                    owner_id: caller.id,
                    category,
                    description,
                    priority,
                    attachment_ref: staged.clone(),
                })
                .await
                .map_err(map_repository_error)
        }
        .await;

        match outcome {
            Ok(created) => Ok(created),
            Err(err) => {
                if let Some(name) = staged.as_deref() {
                    self.discard_staged(name).await;
                }
                Err(err)
            }
        }
    }

    async fn update_status(
        &self,
        caller: &Identity,
        id: i64,
        status: &str,
    ) -> Result<ComplaintWithOwner, Error> {
        policy::authorize(caller, ComplaintAction::UpdateStatus)?;

        // Parse before touching the repository so an invalid status reports
        // InvalidStatus even when the id does not exist.
        let status = status
            .parse::<Status>()
            .map_err(|err| Error::invalid_status(err.to_string()))?;

        self.complaint_repo
            .update_status(id, status, Utc::now())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("complaint {id} not found")))
    }
}

#[async_trait]
impl<R, S> ComplaintQuery for ComplaintService<R, S>
where
    R: ComplaintRepository,
    S: AttachmentStore,
{
    async fn list_mine(&self, caller: &Identity) -> Result<Vec<ComplaintWithOwner>, Error> {
        policy::authorize(caller, ComplaintAction::ListMine)?;

        self.complaint_repo
            .list_for_owner(caller.id)
            .await
            .map_err(map_repository_error)
    }

    async fn list_all(
        &self,
        caller: &Identity,
        filter: ComplaintListFilter,
    ) -> Result<Vec<ComplaintWithOwner>, Error> {
        policy::authorize(caller, ComplaintAction::ListAll)?;

        let status = filter
            .status
            .as_deref()
            .map(str::parse::<Status>)
            .transpose()
            .map_err(|err| Error::invalid_filter(err.to_string()))?;
        let category = filter
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|err| Error::invalid_filter(err.to_string()))?;

        self.complaint_repo
            .list_filtered(ComplaintFilter { status, category })
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "complaint_service_tests.rs"]
mod tests;
