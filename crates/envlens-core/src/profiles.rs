use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A monitored location: where its readings come from and which variables it tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationProfile {
    pub id: String,
    /// Path of the batch export, relative to the configured data directory.
    pub source: String,
    /// Tracked variables, in display order.
    pub variables: Vec<String>,
}

impl LocationProfile {
    pub fn new<I, S>(id: impl Into<String>, source: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            source: source.into(),
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }
}

const ROOM_VARIABLES: [&str; 5] = ["co2", "temperature", "humidity", "pressure", "voc"];

static REFERENCE_PROFILES: Lazy<Vec<LocationProfile>> = Lazy::new(|| {
    vec![
        LocationProfile::new("room1", "json/mane_room_1.json", ROOM_VARIABLES),
        LocationProfile::new("room2", "json/mane_room_2.json", ROOM_VARIABLES),
        LocationProfile::new("freezer", "json/freezer.json", ["temperature"]),
        LocationProfile::new("incubator", "json/incubator.json", ["inc_co2", "inc_temp"]),
        LocationProfile::new("planer", "json/planer_inc.json", ["temp_a", "temp_b"]),
        LocationProfile::new("weight_n2", "json/weight_n2.json", ["n2"]),
    ]
});

/// The six locations of the reference deployment.
pub fn reference_profiles() -> &'static [LocationProfile] {
    REFERENCE_PROFILES.as_slice()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile id must not be empty")]
    EmptyId,
    #[error("duplicate profile id '{0}'")]
    DuplicateId(String),
    #[error("profile '{0}' has no data source")]
    MissingSource(String),
    #[error("profile '{0}' tracks no variables")]
    NoVariables(String),
    #[error("profile '{profile}' lists variable '{variable}' more than once")]
    DuplicateVariable { profile: String, variable: String },
}

/// Validated, read-only set of location profiles.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<LocationProfile>,
}

impl ProfileRegistry {
    pub fn new(profiles: Vec<LocationProfile>) -> Result<Self, ProfileError> {
        let mut ids = HashSet::new();
        for profile in &profiles {
            if profile.id.trim().is_empty() {
                return Err(ProfileError::EmptyId);
            }
            if !ids.insert(profile.id.as_str()) {
                return Err(ProfileError::DuplicateId(profile.id.clone()));
            }
            if profile.source.trim().is_empty() {
                return Err(ProfileError::MissingSource(profile.id.clone()));
            }
            if profile.variables.is_empty() {
                return Err(ProfileError::NoVariables(profile.id.clone()));
            }
            let mut seen = HashSet::new();
            for variable in &profile.variables {
                if !seen.insert(variable.as_str()) {
                    return Err(ProfileError::DuplicateVariable {
                        profile: profile.id.clone(),
                        variable: variable.clone(),
                    });
                }
            }
        }

        Ok(Self { profiles })
    }

    pub fn reference() -> Self {
        Self {
            profiles: reference_profiles().to_vec(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&LocationProfile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|profile| profile.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::reference()
    }
}
