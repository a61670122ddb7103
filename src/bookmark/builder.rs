use super::field::Field;
use super::{BookmarkField, BookmarkId, MapBookmark, MapMarker, ZoneId};

/// Builder for [`MapBookmark`] snapshots.
///
/// Every field carries an explicitly-set flag alongside its value, so merge
/// logic can tell "left alone" from "set to an empty/zero value".
///
/// Sentinel convention:
/// - `zone_id` and `map_marker` take `Option`s; `None` leaves them unset.
/// - every other setter marks the field set whatever the value, `""` and
///   `0.0` included.
#[derive(Clone, Debug, Default)]
pub struct MapBookmarkBuilder {
    id: Field<BookmarkId>,
    name: Field<String>,
    reference: Field<String>,
    zone_id: Field<Option<ZoneId>>,
    short_notes: Field<String>,
    notes: Field<String>,
    map_marker: Field<Option<MapMarker>>,
    order: Field<f64>,
}

impl MapBookmarkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder prepopulated from `bookmark`, with `id` as the identity.
    ///
    /// Every field is marked set, including empty optionals, so applying the
    /// builder to another bookmark reproduces `bookmark` exactly.
    pub fn from_existing(bookmark: &MapBookmark, id: BookmarkId) -> Self {
        Self {
            id: Field::explicit(id),
            name: Field::explicit(bookmark.name.clone()),
            reference: Field::explicit(bookmark.reference.clone()),
            zone_id: Field::explicit(bookmark.zone_id.clone()),
            short_notes: Field::explicit(bookmark.short_notes.clone()),
            notes: Field::explicit(bookmark.notes.clone()),
            map_marker: Field::explicit(bookmark.map_marker.clone()),
            order: Field::explicit(bookmark.order),
        }
    }

    pub fn copy_with_same_id(bookmark: &MapBookmark) -> Self {
        Self::from_existing(bookmark, bookmark.id)
    }

    pub fn copy_with_new_id(bookmark: &MapBookmark) -> Self {
        Self::from_existing(bookmark, BookmarkId::generate())
    }

    pub fn id(&self) -> BookmarkId {
        *self.id.get()
    }

    pub fn name(&self) -> &str {
        self.name.get()
    }

    pub fn reference(&self) -> &str {
        self.reference.get()
    }

    pub fn zone_id(&self) -> Option<&ZoneId> {
        self.zone_id.get().as_ref()
    }

    pub fn short_notes(&self) -> &str {
        self.short_notes.get()
    }

    pub fn notes(&self) -> &str {
        self.notes.get()
    }

    pub fn map_marker(&self) -> Option<&MapMarker> {
        self.map_marker.get().as_ref()
    }

    pub fn order(&self) -> f64 {
        *self.order.get()
    }

    pub fn set_id(&mut self, id: BookmarkId) -> &mut Self {
        self.id.set(id);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name.set(name.into());
        self
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) -> &mut Self {
        self.reference.set(reference.into());
        self
    }

    pub fn set_zone_id(&mut self, zone_id: impl Into<Option<ZoneId>>) -> &mut Self {
        self.zone_id.set_present(zone_id.into());
        self
    }

    pub fn set_short_notes(&mut self, short_notes: impl Into<String>) -> &mut Self {
        self.short_notes.set(short_notes.into());
        self
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> &mut Self {
        self.notes.set(notes.into());
        self
    }

    pub fn set_map_marker(&mut self, marker: impl Into<Option<MapMarker>>) -> &mut Self {
        self.map_marker.set_present(marker.into());
        self
    }

    /// Set the ordering value. Zero is a real value here, not "unset".
    pub fn set_order(&mut self, order: f64) -> &mut Self {
        self.order.set(order);
        self
    }

    pub fn is_id_set(&self) -> bool {
        self.id.is_set()
    }

    pub fn is_name_set(&self) -> bool {
        self.name.is_set()
    }

    pub fn is_reference_set(&self) -> bool {
        self.reference.is_set()
    }

    pub fn is_zone_id_set(&self) -> bool {
        self.zone_id.is_set()
    }

    pub fn is_short_notes_set(&self) -> bool {
        self.short_notes.is_set()
    }

    pub fn is_notes_set(&self) -> bool {
        self.notes.is_set()
    }

    pub fn is_map_marker_set(&self) -> bool {
        self.map_marker.is_set()
    }

    pub fn is_order_set(&self) -> bool {
        self.order.is_set()
    }

    /// Explicitly-set flag for `field`
    pub fn is_field_set(&self, field: BookmarkField) -> bool {
        match field {
            BookmarkField::Id => self.is_id_set(),
            BookmarkField::Name => self.is_name_set(),
            BookmarkField::Reference => self.is_reference_set(),
            BookmarkField::ZoneId => self.is_zone_id_set(),
            BookmarkField::ShortNotes => self.is_short_notes_set(),
            BookmarkField::Notes => self.is_notes_set(),
            BookmarkField::MapMarker => self.is_map_marker_set(),
            BookmarkField::Order => self.is_order_set(),
        }
    }

    /// Fields explicitly set so far, in declaration order
    pub fn set_fields(&self) -> impl Iterator<Item = BookmarkField> + '_ {
        BookmarkField::ALL
            .into_iter()
            .filter(move |field| self.is_field_set(*field))
    }

    /// Build a bookmark from the current values; unset fields take defaults.
    pub fn build(&self) -> MapBookmark {
        MapBookmark {
            id: *self.id.get(),
            name: self.name.get().clone(),
            reference: self.reference.get().clone(),
            zone_id: self.zone_id.get().clone(),
            short_notes: self.short_notes.get().clone(),
            notes: self.notes.get().clone(),
            map_marker: self.map_marker.get().clone(),
            order: *self.order.get(),
        }
    }

    /// Merge onto `target`: fields set on this builder replace the target's,
    /// everything else is carried over unchanged.
    pub fn apply_to(&self, target: &MapBookmark) -> MapBookmark {
        MapBookmark {
            id: self.id.merged(&target.id),
            name: self.name.merged(&target.name),
            reference: self.reference.merged(&target.reference),
            zone_id: self.zone_id.merged(&target.zone_id),
            short_notes: self.short_notes.merged(&target.short_notes),
            notes: self.notes.merged(&target.notes),
            map_marker: self.map_marker.merged(&target.map_marker),
            order: self.order.merged(&target.order),
        }
    }
}
