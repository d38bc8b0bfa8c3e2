use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::coordinator::resolve;
use crate::errors::{SyncError, SyncResult};
use crate::models::mentor::{CreateMentorRequest, Mentor, MentorStatus};
use crate::store::{DurableStore, LedgerWrite, with_deadline};

/// Plain create/read access to mentor profiles.
#[derive(Clone)]
pub struct MentorDirectory {
    store: Arc<dyn DurableStore>,
    store_timeout: Option<Duration>,
}

impl MentorDirectory {
    pub fn new(store: Arc<dyn DurableStore>, store_timeout: Option<Duration>) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub async fn create_mentor(&self, request: CreateMentorRequest) -> SyncResult<Mentor> {
        if request.name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(SyncError::Invalid("Name and email are required".to_string()));
        }
        if request.experience_years < 0 {
            return Err(SyncError::Invalid(
                "Years of experience must be positive".to_string(),
            ));
        }

        let now = Utc::now();
        let mentor = Mentor {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            skills: request.skills,
            experience_years: request.experience_years,
            status: MentorStatus::Active,
            created_at: now,
            updated_at: now,
        };

        with_deadline(
            self.store_timeout,
            "insert mentor",
            self.store.transact(vec![LedgerWrite::InsertMentor(mentor.clone())]),
        )
        .await
        .map_err(|err| resolve("create_mentor", err))?;

        info!(mentor_id = %mentor.id, "mentor created");
        Ok(mentor)
    }

    pub async fn get_mentor(&self, mentor_id: Uuid) -> SyncResult<Option<Mentor>> {
        with_deadline(self.store_timeout, "read mentor", self.store.get_mentor(mentor_id))
            .await
            .map_err(|err| resolve("get_mentor", err))
    }

    /// Active mentors only.
    pub async fn list_mentors(&self) -> SyncResult<Vec<Mentor>> {
        with_deadline(
            self.store_timeout,
            "list mentors",
            self.store.list_mentors(Some(MentorStatus::Active)),
        )
        .await
        .map_err(|err| resolve("list_mentors", err))
    }
}
