use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

mod builder;
mod field;

pub use builder::MapBookmarkBuilder;
pub use field::Field;

/// Bookmark identifier (UUID, nil when never assigned)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(Uuid);

impl BookmarkId {
    /// Mint a fresh, time-ordered id (UUIDv7)
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for BookmarkId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of the map zone a bookmark is placed on
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marker drawn on the map for a bookmark
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MapMarker {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, icon: None }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Immutable bookmark snapshot.
///
/// Only produced by [`MapBookmarkBuilder::build`] and
/// [`MapBookmarkBuilder::apply_to`] (or deserialization); there are no
/// setters. To change a bookmark, derive a builder from it and build again.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBookmark {
    id: BookmarkId,
    name: String,
    reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zone_id: Option<ZoneId>,
    short_notes: String,
    notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    map_marker: Option<MapMarker>,
    order: f64,
}

impl MapBookmark {
    pub fn id(&self) -> BookmarkId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form reference value (e.g. a handout or macro the bookmark links to)
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn zone_id(&self) -> Option<&ZoneId> {
        self.zone_id.as_ref()
    }

    pub fn short_notes(&self) -> &str {
        &self.short_notes
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn map_marker(&self) -> Option<&MapMarker> {
        self.map_marker.as_ref()
    }

    /// Sort key when listing bookmarks
    pub fn order(&self) -> f64 {
        self.order
    }
}

/// Names of the fields a [`MapBookmarkBuilder`] tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BookmarkField {
    Id,
    Name,
    Reference,
    ZoneId,
    ShortNotes,
    Notes,
    MapMarker,
    Order,
}

impl BookmarkField {
    /// Every field, in declaration order
    pub const ALL: [BookmarkField; 8] = [
        BookmarkField::Id,
        BookmarkField::Name,
        BookmarkField::Reference,
        BookmarkField::ZoneId,
        BookmarkField::ShortNotes,
        BookmarkField::Notes,
        BookmarkField::MapMarker,
        BookmarkField::Order,
    ];
}
