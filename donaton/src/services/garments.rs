//! Donated garments (prendas)

use super::users::UserId;
use crate::error::Error;
use donaton_di::abstraction;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard}
};

/// Identifier of a garment
pub type GarmentId = u64;

/// Publication state of a garment
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum UploadStatus {
    /// Waiting for review
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    /// Published in the feed
    #[serde(rename = "Cargado")]
    Uploaded,
    /// Handed over to a recipient
    #[serde(rename = "Donado")]
    Donated,
}

/// A donated garment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Garment {
    /// Garment identifier
    pub id: GarmentId,
    /// Donor
    pub owner: UserId,
    /// Short name, e.g. "Chaqueta de jean"
    pub name: String,
    /// Size label
    pub size: String,
    /// Condition or intended use
    pub usage: Option<String>,
    /// Relative path of the main photo
    pub image_path: Option<String>,
    /// Publication state
    pub status: UploadStatus,
    /// How many times the garment page was opened
    pub visits: u64,
}

/// Data of a garment to be published
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGarment {
    /// Donor
    pub owner: UserId,
    /// Short name
    pub name: String,
    /// Size label
    pub size: String,
    /// Condition or intended use
    #[serde(default)]
    pub usage: Option<String>,
    /// Relative path of the main photo
    #[serde(default)]
    pub image_path: Option<String>,
    /// Initial publication state
    #[serde(default)]
    pub status: UploadStatus,
}

/// Partial update of a garment, `None` fields are left as is
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GarmentChanges {
    /// New name
    pub name: Option<String>,
    /// New size label
    pub size: Option<String>,
    /// New condition
    pub usage: Option<String>,
    /// New main photo
    pub image_path: Option<String>,
    /// New publication state
    pub status: Option<UploadStatus>,
}

/// Storage of donated garments
pub trait GarmentRepository: Send + Sync {
    /// Stores a new garment
    ///
    /// # Errors
    /// [`Error::Validation`] if the name is blank
    fn create_garment(&self, garment: NewGarment) -> Result<Garment, Error>;

    /// Returns the garment with the given `id`
    fn find_by_id(&self, id: GarmentId) -> Option<Garment>;

    /// Applies `changes` to the garment and returns the updated garment
    fn update_garment(&self, id: GarmentId, changes: GarmentChanges) -> Result<Garment, Error>;

    /// Deletes the garment, returns `false` if there was no such garment
    fn delete_garment(&self, id: GarmentId) -> bool;

    /// Returns the garments in the given state ordered by id
    fn garments_by_status(&self, status: UploadStatus) -> Vec<Garment>;

    /// Counts a visit of the garment page, returns `false` if there is no such garment
    fn increment_visits(&self, id: GarmentId) -> bool;
}

#[derive(Debug, Default)]
struct Garments {
    by_id: BTreeMap<GarmentId, Garment>,
    last_id: GarmentId,
}

/// [`GarmentRepository`] that keeps garments in memory
#[derive(Debug, Default)]
pub struct InMemoryGarmentRepository {
    garments: RwLock<Garments>,
}

impl InMemoryGarmentRepository {
    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Garments> {
        self.garments.read().expect("garment repository lock poisoned")
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Garments> {
        self.garments.write().expect("garment repository lock poisoned")
    }
}

fn require_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(Error::validation("garment name is empty"))
    } else {
        Ok(())
    }
}

impl GarmentRepository for InMemoryGarmentRepository {
    fn create_garment(&self, garment: NewGarment) -> Result<Garment, Error> {
        require_name(&garment.name)?;

        let mut garments = self.write();
        garments.last_id += 1;
        let created = Garment {
            id: garments.last_id,
            owner: garment.owner,
            name: garment.name,
            size: garment.size,
            usage: garment.usage,
            image_path: garment.image_path,
            status: garment.status,
            visits: 0,
        };
        garments.by_id.insert(created.id, created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: GarmentId) -> Option<Garment> {
        self.read().by_id.get(&id).cloned()
    }

    fn update_garment(&self, id: GarmentId, changes: GarmentChanges) -> Result<Garment, Error> {
        if let Some(name) = &changes.name {
            require_name(name)?;
        }

        let mut garments = self.write();
        let garment = garments.by_id
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("garment {id}")))?;
        if let Some(name) = changes.name {
            garment.name = name;
        }
        if let Some(size) = changes.size {
            garment.size = size;
        }
        if let Some(usage) = changes.usage {
            garment.usage = Some(usage);
        }
        if let Some(image_path) = changes.image_path {
            garment.image_path = Some(image_path);
        }
        if let Some(status) = changes.status {
            garment.status = status;
        }
        Ok(garment.clone())
    }

    fn delete_garment(&self, id: GarmentId) -> bool {
        self.write().by_id.remove(&id).is_some()
    }

    fn garments_by_status(&self, status: UploadStatus) -> Vec<Garment> {
        self.read()
            .by_id
            .values()
            .filter(|garment| garment.status == status)
            .cloned()
            .collect()
    }

    fn increment_visits(&self, id: GarmentId) -> bool {
        match self.write().by_id.get_mut(&id) {
            Some(garment) => {
                garment.visits += 1;
                true
            },
            None => false
        }
    }
}

abstraction!(dyn GarmentRepository => InMemoryGarmentRepository);
