//! Strongly-typed ID newtypes for directory entities.
//!
//! Every table in the timetable schema uses an `integer` primary key. Wrapping
//! them keeps a `TeacherId` from being passed where an `AuditoriumId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use timetable_models::ids::{AuditoriumId, TeacherId};
//!
//! fn teacher_schedule(id: TeacherId) { /* ... */ }
//!
//! teacher_schedule(TeacherId::new(42));       // OK
//! // teacher_schedule(AuditoriumId::new(42)); // Compile error
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

/// Defines an `i32`-backed ID newtype with SQLx, serde and OpenAPI support.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
        #[schema(value_type = i32, example = 1)]
        pub struct $name(pub i32);

        impl $name {
            #[inline]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            #[inline]
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            #[inline]
            fn from(id: $name) -> i32 {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <i32 as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <i32 as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i32 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i32 as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <i32 as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                i32::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// ID of a faculty.
    FacultyId
);

define_id!(
    /// ID of a department (кафедра).
    DepartmentId
);

define_id!(
    /// ID of a student group row.
    GroupId
);

define_id!(
    /// ID of a teacher.
    TeacherId
);

define_id!(
    /// ID of a building.
    BuildingId
);

define_id!(
    /// ID of an auditorium (lecture hall, lab, classroom).
    AuditoriumId
);

define_id!(
    /// ID of a single dated lesson row.
    LessonId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_debug_names_type() {
        assert_eq!(format!("{:?}", TeacherId::new(7)), "TeacherId(7)");
    }

    #[test]
    fn test_id_display_is_bare_number() {
        assert_eq!(AuditoriumId::new(12).to_string(), "12");
    }

    #[test]
    fn test_id_from_str() {
        let id: TeacherId = " 42 ".parse().unwrap();
        assert_eq!(id.into_inner(), 42);
        assert!("abc".parse::<TeacherId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = LessonId::new(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let back: LessonId = serde_json::from_str("5").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![LessonId::new(3), LessonId::new(1), LessonId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![LessonId::new(1), LessonId::new(2), LessonId::new(3)]);
    }
}
