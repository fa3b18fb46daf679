//! Park and court domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sport played on a specific court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
    Basketball,
    PickleballSingles,
    PickleballDoubles,
    TennisSingles,
    TennisDoubles,
}

impl SportType {
    /// The prompt-level grouping for this sport.
    pub fn category(&self) -> SportCategory {
        match self {
            SportType::Basketball => SportCategory::Basketball,
            SportType::PickleballSingles | SportType::PickleballDoubles => {
                SportCategory::Pickleball
            }
            SportType::TennisSingles | SportType::TennisDoubles => SportCategory::Tennis,
        }
    }
}

impl std::fmt::Display for SportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SportType::Basketball => "Basketball",
            SportType::PickleballSingles => "Pickleball (Singles)",
            SportType::PickleballDoubles => "Pickleball (Doubles)",
            SportType::TennisSingles => "Tennis (Singles)",
            SportType::TennisDoubles => "Tennis (Doubles)",
        };
        write!(f, "{}", label)
    }
}

/// Grouping of sport subtypes used when prompting the user.
///
/// Pickleball and tennis courts come in singles/doubles variants; the prompt
/// only asks for the category and the variant follows from the court picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportCategory {
    Basketball,
    Pickleball,
    Tennis,
}

impl std::fmt::Display for SportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SportCategory::Basketball => "Basketball",
            SportCategory::Pickleball => "Pickleball",
            SportCategory::Tennis => "Tennis",
        };
        write!(f, "{}", label)
    }
}

/// A single court within a park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Court {
    pub id: Uuid,
    pub court_number: i32,
    pub sport_type: SportType,
}

impl Court {
    /// Human-readable name used in court selection prompts.
    pub fn display_name(&self) -> String {
        format!("Court {} - {}", self.court_number, self.sport_type)
    }
}

/// Moderation state of a submitted park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParkStatus {
    Pending,
    Approved,
    Denied,
}

/// A park with its courts, ordered by court number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Park {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ParkStatus,
    pub courts: Vec<Court>,
}

impl Park {
    /// Distinct sport categories present among this park's courts,
    /// in first-seen court order.
    pub fn sport_categories(&self) -> Vec<SportCategory> {
        let mut seen = Vec::new();
        for court in &self.courts {
            let category = court.sport_type.category();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Courts matching the given category, in court order.
    pub fn courts_in_category(&self, category: SportCategory) -> Vec<&Court> {
        self.courts
            .iter()
            .filter(|c| c.sport_type.category() == category)
            .collect()
    }
}
