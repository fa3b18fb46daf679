//! Park and court entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{Court, Park, ParkStatus, SportType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping to the PostgreSQL `sport_type` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "sport_type", rename_all = "snake_case")]
pub enum SportTypeDb {
    Basketball,
    PickleballSingles,
    PickleballDoubles,
    TennisSingles,
    TennisDoubles,
}

impl From<SportTypeDb> for SportType {
    fn from(db: SportTypeDb) -> Self {
        match db {
            SportTypeDb::Basketball => SportType::Basketball,
            SportTypeDb::PickleballSingles => SportType::PickleballSingles,
            SportTypeDb::PickleballDoubles => SportType::PickleballDoubles,
            SportTypeDb::TennisSingles => SportType::TennisSingles,
            SportTypeDb::TennisDoubles => SportType::TennisDoubles,
        }
    }
}

impl From<SportType> for SportTypeDb {
    fn from(sport: SportType) -> Self {
        match sport {
            SportType::Basketball => SportTypeDb::Basketball,
            SportType::PickleballSingles => SportTypeDb::PickleballSingles,
            SportType::PickleballDoubles => SportTypeDb::PickleballDoubles,
            SportType::TennisSingles => SportTypeDb::TennisSingles,
            SportType::TennisDoubles => SportTypeDb::TennisDoubles,
        }
    }
}

/// Database enum mapping to the PostgreSQL `park_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "park_status", rename_all = "snake_case")]
pub enum ParkStatusDb {
    Pending,
    Approved,
    Denied,
}

impl From<ParkStatusDb> for ParkStatus {
    fn from(db: ParkStatusDb) -> Self {
        match db {
            ParkStatusDb::Pending => ParkStatus::Pending,
            ParkStatusDb::Approved => ParkStatus::Approved,
            ParkStatusDb::Denied => ParkStatus::Denied,
        }
    }
}

impl From<ParkStatus> for ParkStatusDb {
    fn from(status: ParkStatus) -> Self {
        match status {
            ParkStatus::Pending => ParkStatusDb::Pending,
            ParkStatus::Approved => ParkStatusDb::Approved,
            ParkStatus::Denied => ParkStatusDb::Denied,
        }
    }
}

/// Database row mapping for the parks table.
#[derive(Debug, Clone, FromRow)]
pub struct ParkEntity {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ParkStatusDb,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row mapping for the courts table.
#[derive(Debug, Clone, FromRow)]
pub struct CourtEntity {
    pub id: Uuid,
    pub park_id: Uuid,
    pub court_number: i32,
    pub sport_type: SportTypeDb,
}

impl From<CourtEntity> for Court {
    fn from(entity: CourtEntity) -> Self {
        Self {
            id: entity.id,
            court_number: entity.court_number,
            sport_type: entity.sport_type.into(),
        }
    }
}

impl ParkEntity {
    /// Builds the domain park from this row and its court rows.
    pub fn into_park(self, courts: Vec<CourtEntity>) -> Park {
        Park {
            id: self.id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            status: self.status.into(),
            courts: courts.into_iter().map(Court::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_type_roundtrip() {
        for sport in [
            SportType::Basketball,
            SportType::PickleballSingles,
            SportType::PickleballDoubles,
            SportType::TennisSingles,
            SportType::TennisDoubles,
        ] {
            let db: SportTypeDb = sport.into();
            let back: SportType = db.into();
            assert_eq!(back, sport);
        }
    }

    #[test]
    fn test_into_park_orders_courts_as_given() {
        let park_id = Uuid::new_v4();
        let entity = ParkEntity {
            id: park_id,
            name: "Riverside Park".to_string(),
            latitude: 37.77,
            longitude: -122.42,
            status: ParkStatusDb::Approved,
            submitted_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let courts = vec![
            CourtEntity {
                id: Uuid::new_v4(),
                park_id,
                court_number: 1,
                sport_type: SportTypeDb::Basketball,
            },
            CourtEntity {
                id: Uuid::new_v4(),
                park_id,
                court_number: 2,
                sport_type: SportTypeDb::TennisSingles,
            },
        ];

        let park = entity.into_park(courts);
        assert_eq!(park.courts.len(), 2);
        assert_eq!(park.courts[0].court_number, 1);
    }
}
