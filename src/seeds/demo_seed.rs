use crate::database::DataStore;
use crate::models::{Event, Formation, ScheduleSlot};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Seeds demo events and formations.
/// Each collection is only filled when it is empty; failures are logged, never fatal.
pub async fn seed_demo_data(store: &dyn DataStore) {
    match store.count_events().await {
        Ok(0) => {
            log::info!("🌱 Seeding demo events...");
            let mut inserted = 0;
            for event in build_demo_events(BsonDateTime::now()) {
                match store.insert_event(&event).await {
                    Ok(()) => inserted += 1,
                    Err(e) => log::error!("   ❌ Failed to seed event '{}': {}", event.title, e),
                }
            }
            log::info!("   ✅ Inserted {} demo events", inserted);
        }
        Ok(count) => log::info!("📋 Events: {} already in DB — skipping seed", count),
        Err(e) => log::error!("❌ Could not count events, skipping seed: {}", e),
    }

    match store.count_formations().await {
        Ok(0) => {
            log::info!("🌱 Seeding demo formations...");
            let mut inserted = 0;
            for formation in build_demo_formations() {
                match store.insert_formation(&formation).await {
                    Ok(()) => inserted += 1,
                    Err(e) => log::error!("   ❌ Failed to seed formation '{}': {}", formation.title, e),
                }
            }
            log::info!("   ✅ Inserted {} demo formations", inserted);
        }
        Ok(count) => log::info!("📋 Formations: {} already in DB — skipping seed", count),
        Err(e) => log::error!("❌ Could not count formations, skipping seed: {}", e),
    }
}

fn days_after(now: BsonDateTime, days: i64) -> BsonDateTime {
    BsonDateTime::from_millis(now.timestamp_millis() + days * DAY_MS)
}

fn build_demo_events(now: BsonDateTime) -> Vec<Event> {
    vec![
        Event {
            id: ObjectId::new(),
            title: "Assemblée générale annuelle".into(),
            description: "Bilan de l'année et élection du bureau.".into(),
            date: Some(days_after(now, 14)),
            location: "Salle polyvalente".into(),
            capacity: 120,
            price: 0.0,
            category: "association".into(),
            image: None,
            registrations: Vec::new(),
        },
        Event {
            id: ObjectId::new(),
            title: "Soirée culturelle".into(),
            description: "Musique, danse et cuisine traditionnelle.".into(),
            date: Some(days_after(now, 30)),
            location: "Centre culturel".into(),
            capacity: 80,
            price: 5000.0,
            category: "culture".into(),
            image: Some("/images/soiree-culturelle.jpg".into()),
            registrations: Vec::new(),
        },
        Event {
            id: ObjectId::new(),
            title: "Journée sportive".into(),
            description: "Tournoi de football et course solidaire.".into(),
            date: Some(days_after(now, 45)),
            location: "Stade municipal".into(),
            capacity: 200,
            price: 2000.0,
            category: "sport".into(),
            image: None,
            registrations: Vec::new(),
        },
    ]
}

fn build_demo_formations() -> Vec<Formation> {
    vec![
        Formation {
            id: ObjectId::new(),
            title: "Initiation à l'informatique".into(),
            description: "Bureautique, internet et messagerie.".into(),
            duration: "8 semaines".into(),
            level: "débutant".into(),
            instructor: "Fatou Sarr".into(),
            schedule: vec![
                ScheduleSlot { day: "Lundi".into(), time: "18:00".into() },
                ScheduleSlot { day: "Mercredi".into(), time: "18:00".into() },
            ],
            students: Vec::new(),
        },
        Formation {
            id: ObjectId::new(),
            title: "Gestion de projet associatif".into(),
            description: "Monter, financer et suivre un projet.".into(),
            duration: "4 semaines".into(),
            level: "intermédiaire".into(),
            instructor: "Ibrahima Fall".into(),
            schedule: vec![ScheduleSlot { day: "Samedi".into(), time: "10:00".into() }],
            students: Vec::new(),
        },
    ]
}
