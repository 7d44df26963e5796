//! Partial updates
//!
//! `PUT /farms/{id}` and `PUT /livestock/{id}` send only the fields that
//! change. Text fields ignore absent and empty values. Nullable numeric
//! fields, `notes` and `recordedAt` use `Option<Option<T>>`: the outer `None`
//! keeps the stored value, `Some(None)` clears it.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::FarmId;

use crate::domain::entities::{Farm, Livestock};

#[derive(Debug, Clone, Default)]
pub struct FarmPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub farm_type: Option<String>,
}

impl FarmPatch {
    pub fn apply(self, current: &Farm) -> Farm {
        Farm {
            name: non_empty(self.name).unwrap_or_else(|| current.name.clone()),
            location: non_empty(self.location).or_else(|| current.location.clone()),
            address: non_empty(self.address).or_else(|| current.address.clone()),
            farm_type: non_empty(self.farm_type).or_else(|| current.farm_type.clone()),
            ..current.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LivestockPatch {
    pub farm_id: Option<FarmId>,
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub status: Option<String>,
    pub height: Option<Option<f32>>,
    pub weight: Option<Option<f32>>,
    pub body_condition_score: Option<Option<i32>>,
    pub notes: Option<Option<String>>,
    pub recorded_at: Option<Option<DateTime<Utc>>>,
}

impl LivestockPatch {
    /// Merge into `current`. `updated_at` is left to the store.
    pub fn apply(self, current: &Livestock) -> Livestock {
        Livestock {
            farm_id: self.farm_id.or(current.farm_id),
            name: non_empty(self.name).unwrap_or_else(|| current.name.clone()),
            species: non_empty(self.species).unwrap_or_else(|| current.species.clone()),
            breed: non_empty(self.breed).or_else(|| current.breed.clone()),
            gender: non_empty(self.gender).or_else(|| current.gender.clone()),
            birth_date: self.birth_date.or(current.birth_date),
            photo_url: non_empty(self.photo_url).or_else(|| current.photo_url.clone()),
            status: non_empty(self.status).or_else(|| current.status.clone()),
            height: self.height.unwrap_or(current.height),
            weight: self.weight.unwrap_or(current.weight),
            body_condition_score: self
                .body_condition_score
                .unwrap_or(current.body_condition_score),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
            recorded_at: self.recorded_at.unwrap_or(current.recorded_at),
            ..current.clone()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
