use super::PublicUser;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const FORMATIONS_COLLECTION: &str = "formations";

/// Training course (`formations` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
    #[serde(default)]
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct ScheduleSlot {
    pub day: String,
    pub time: String,
}

/// Enrollment entry. `progress` and `completed` keep their initial values:
/// nothing exposed updates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub completed: bool,
}

impl Student {
    pub fn enroll(user: ObjectId) -> Self {
        Self {
            id: ObjectId::new(),
            user,
            progress: 0,
            completed: false,
        }
    }
}

impl Formation {
    pub fn user_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.students.iter().map(|s| s.user)
    }

    pub fn into_response(self, users: &HashMap<ObjectId, PublicUser>) -> FormationResponse {
        FormationResponse {
            id: self.id.to_hex(),
            title: self.title,
            description: self.description,
            duration: self.duration,
            level: self.level,
            instructor: self.instructor,
            schedule: self.schedule,
            students: self
                .students
                .into_iter()
                .map(|s| StudentResponse {
                    id: s.id.to_hex(),
                    user: users.get(&s.user).cloned(),
                    progress: s.progress,
                    completed: s.completed,
                })
                .collect(),
        }
    }
}

/// Body of `POST /api/formations/{id}/register`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FormationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub level: String,
    pub instructor: String,
    pub schedule: Vec<ScheduleSlot>,
    pub students: Vec<StudentResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: Option<PublicUser>,
    pub progress: i32,
    pub completed: bool,
}
