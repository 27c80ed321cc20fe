//! In-process [`DataStore`] used by the test suites.

use super::DataStore;
use crate::models::{Event, Formation, Registration, Student, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    events: Mutex<Vec<Event>>,
    formations: Mutex<Vec<Formation>>,
    unreachable: AtomicBool,
}

impl MemoryStore {
    /// Makes every later `ping` fail, as if the server went away.
    pub fn set_unreachable(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::Database("server selection timed out".to_string()));
        }
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Validation("Email already registered".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(lock(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        Ok(lock(&self.users)
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        lock(&self.events).push(event.clone());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        Ok(lock(&self.events).clone())
    }

    async fn find_event(&self, id: &ObjectId) -> Result<Option<Event>, AppError> {
        Ok(lock(&self.events).iter().find(|e| &e.id == id).cloned())
    }

    async fn append_registration_within_capacity(
        &self,
        event_id: &ObjectId,
        registration: &Registration,
    ) -> Result<bool, AppError> {
        let mut events = lock(&self.events);
        match events.iter_mut().find(|e| &e.id == event_id) {
            Some(event) if event.has_room_for(registration.participants) => {
                event.registrations.push(registration.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_formation(&self, formation: &Formation) -> Result<(), AppError> {
        lock(&self.formations).push(formation.clone());
        Ok(())
    }

    async fn list_formations(&self) -> Result<Vec<Formation>, AppError> {
        Ok(lock(&self.formations).clone())
    }

    async fn append_student(
        &self,
        formation_id: &ObjectId,
        student: &Student,
    ) -> Result<bool, AppError> {
        let mut formations = lock(&self.formations);
        match formations.iter_mut().find(|f| &f.id == formation_id) {
            Some(formation) => {
                formation.students.push(student.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        Ok(lock(&self.users).len() as u64)
    }

    async fn count_events(&self) -> Result<u64, AppError> {
        Ok(lock(&self.events).len() as u64)
    }

    async fn count_formations(&self) -> Result<u64, AppError> {
        Ok(lock(&self.formations).len() as u64)
    }
}

/// Fixtures shared by the service and API tests.
pub mod fixtures {
    use crate::models::{Event, Formation, ScheduleSlot};
    use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

    pub fn event(capacity: i64) -> Event {
        Event {
            id: ObjectId::new(),
            title: "Soirée culturelle".into(),
            description: "Music and dance".into(),
            date: Some(BsonDateTime::now()),
            location: "Dakar".into(),
            capacity,
            price: 5000.0,
            category: "culture".into(),
            image: None,
            registrations: Vec::new(),
        }
    }

    pub fn formation() -> Formation {
        Formation {
            id: ObjectId::new(),
            title: "Initiation au numérique".into(),
            description: "Computer basics".into(),
            duration: "6 weeks".into(),
            level: "beginner".into(),
            instructor: "M. Diop".into(),
            schedule: vec![ScheduleSlot { day: "Monday".into(), time: "18:00".into() }],
            students: Vec::new(),
        }
    }
}
