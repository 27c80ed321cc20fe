mod store;
#[cfg(test)]
pub mod memory;

pub use store::DataStore;

use crate::models::{
    Event, Formation, Registration, Student, User, EVENTS_COLLECTION, FORMATIONS_COLLECTION,
    USERS_COLLECTION,
};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

const DEFAULT_DATABASE: &str = "ashilac";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("📊 Using database: {}", db_name);

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the indexes the data model relies on.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        // users(email) unique - enforces one account per email
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.users().create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index ready: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS_COLLECTION)
    }

    fn events(&self) -> Collection<Event> {
        self.collection(EVENTS_COLLECTION)
    }

    fn formations(&self) -> Collection<Formation> {
        self.collection(FORMATIONS_COLLECTION)
    }
}

#[async_trait]
impl DataStore for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_users_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        self.events().insert_one(event).await?;
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let cursor = self.events().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_event(&self, id: &ObjectId) -> Result<Option<Event>, AppError> {
        Ok(self.events().find_one(doc! { "_id": id }).await?)
    }

    async fn append_registration_within_capacity(
        &self,
        event_id: &ObjectId,
        registration: &Registration,
    ) -> Result<bool, AppError> {
        // The filter re-evaluates the seat count server-side, so the push
        // only lands if the event still has room at write time.
        let filter = doc! {
            "_id": event_id,
            "$expr": {
                "$lte": [
                    { "$add": [
                        { "$sum": "$registrations.participants" },
                        registration.participants,
                    ] },
                    "$capacity",
                ]
            }
        };
        let update = doc! { "$push": { "registrations": to_bson(registration)? } };

        let result = self.events().update_one(filter, update).await?;
        Ok(result.modified_count == 1)
    }

    async fn insert_formation(&self, formation: &Formation) -> Result<(), AppError> {
        self.formations().insert_one(formation).await?;
        Ok(())
    }

    async fn list_formations(&self) -> Result<Vec<Formation>, AppError> {
        let cursor = self.formations().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn append_student(
        &self,
        formation_id: &ObjectId,
        student: &Student,
    ) -> Result<bool, AppError> {
        let update = doc! { "$push": { "students": to_bson(student)? } };
        let result = self
            .formations()
            .update_one(doc! { "_id": formation_id }, update)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        Ok(self.users().count_documents(doc! {}).await?)
    }

    async fn count_events(&self) -> Result<u64, AppError> {
        Ok(self.events().count_documents(doc! {}).await?)
    }

    async fn count_formations(&self) -> Result<u64, AppError> {
        Ok(self.formations().count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_roundtrip() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/ashilac_test".to_string());

        let db = MongoDB::new(&uri).await.unwrap();
        let user = User::new("Smoke".into(), format!("{}@example.org", ObjectId::new()), "x".into());
        db.insert_user(&user).await.unwrap();

        let found = db.find_user_by_email(&user.email).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let duplicate = db.insert_user(&User { id: ObjectId::new(), ..user }).await;
        assert!(matches!(duplicate, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_capacity_guard() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/ashilac_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();
        db.ping().await.unwrap();

        let event = crate::database::memory::fixtures::event(10);
        db.insert_event(&event).await.unwrap();

        let user = ObjectId::new();
        for participants in [7, 3] {
            let appended = db
                .append_registration_within_capacity(&event.id, &Registration::new(user, participants))
                .await
                .unwrap();
            assert!(appended);
        }

        let full = db
            .append_registration_within_capacity(&event.id, &Registration::new(user, 1))
            .await
            .unwrap();
        assert!(!full);

        let stored = db.find_event(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.registrations.len(), 2);
        assert_eq!(stored.registered_participants(), 10);

        let missing = db
            .append_registration_within_capacity(&ObjectId::new(), &Registration::new(user, 1))
            .await
            .unwrap();
        assert!(!missing);

        let formation = crate::database::memory::fixtures::formation();
        db.insert_formation(&formation).await.unwrap();
        assert!(db.append_student(&formation.id, &Student::enroll(user)).await.unwrap());
        assert!(!db.append_student(&ObjectId::new(), &Student::enroll(user)).await.unwrap());
    }
}
