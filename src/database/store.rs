use crate::models::{Event, Formation, Registration, Student, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Persistence primitives the services are written against.
///
/// Implementations own all persisted state; callers never keep an
/// authoritative copy of a document.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;

    /// Fails with [`AppError::Validation`] when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_users_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError>;

    async fn insert_event(&self, event: &Event) -> Result<(), AppError>;

    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    async fn find_event(&self, id: &ObjectId) -> Result<Option<Event>, AppError>;

    /// Appends `registration` only if the event exists and still has room
    /// for it, as one atomic step. Returns whether it was appended.
    async fn append_registration_within_capacity(
        &self,
        event_id: &ObjectId,
        registration: &Registration,
    ) -> Result<bool, AppError>;

    async fn insert_formation(&self, formation: &Formation) -> Result<(), AppError>;

    async fn list_formations(&self) -> Result<Vec<Formation>, AppError>;

    /// Returns `false` when no formation has this id.
    async fn append_student(
        &self,
        formation_id: &ObjectId,
        student: &Student,
    ) -> Result<bool, AppError>;

    async fn count_users(&self) -> Result<u64, AppError>;

    async fn count_events(&self) -> Result<u64, AppError>;

    async fn count_formations(&self) -> Result<u64, AppError>;
}
