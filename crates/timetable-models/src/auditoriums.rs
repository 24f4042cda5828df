//! Building and auditorium directory models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::ids::{AuditoriumId, BuildingId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Building {
    pub id: BuildingId,
    /// Building name, e.g. "Главный корпус"
    pub title: String,
    /// Letter appended to room numbers, e.g. "А"; may be empty
    pub letter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Auditorium {
    pub id: AuditoriumId,
    /// Room number as printed on the door, e.g. "305"
    pub number: String,
    /// Number followed by the building letter, e.g. "305 А"
    pub display_name: String,
    pub building: Option<Building>,
}

impl Auditorium {
    pub fn new(id: AuditoriumId, number: impl Into<String>, building: Option<Building>) -> Self {
        let number = number.into();
        let display_name = match building.as_ref().map(|b| b.letter.trim()) {
            Some(letter) if !letter.is_empty() => format!("{} {}", number, letter),
            _ => number.clone(),
        };

        Self {
            id,
            number,
            display_name,
            building,
        }
    }
}

/// Flat auditorium row joined with its building.
#[derive(Debug, Clone, FromRow)]
pub struct AuditoriumRow {
    pub id: AuditoriumId,
    pub number: String,
    pub building_id: Option<BuildingId>,
    pub building_title: Option<String>,
    pub building_letter: Option<String>,
}

impl From<AuditoriumRow> for Auditorium {
    fn from(row: AuditoriumRow) -> Self {
        let building = row.building_id.map(|id| Building {
            id,
            title: row.building_title.unwrap_or_default(),
            letter: row.building_letter.unwrap_or_default(),
        });
        Auditorium::new(row.id, row.number, building)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct AuditoriumFilterParams {
    /// Restrict to one building; empty or 0 lists every auditorium
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_id")]
    pub building_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_appends_letter() {
        let auditorium = Auditorium::new(
            AuditoriumId::new(1),
            "305",
            Some(Building {
                id: BuildingId::new(2),
                title: "Корпус А".into(),
                letter: "А".into(),
            }),
        );
        assert_eq!(auditorium.display_name, "305 А");
    }

    #[test]
    fn test_display_name_without_letter() {
        let auditorium = Auditorium::new(AuditoriumId::new(1), "12", None);
        assert_eq!(auditorium.display_name, "12");

        let row = AuditoriumRow {
            id: AuditoriumId::new(3),
            number: "7".into(),
            building_id: Some(BuildingId::new(4)),
            building_title: Some("Лабораторный".into()),
            building_letter: Some(" ".into()),
        };
        assert_eq!(Auditorium::from(row).display_name, "7");
    }
}
