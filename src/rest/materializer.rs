//! Turning raw JSON into entities.
//!
//! Every payload the API returns goes through [`Client::materialize`]:
//!
//! - scalars and bare arrays are passed through unchanged
//! - a collection envelope (an object with a `data` array) becomes a list of
//!   entities, or a [`Page`] when the caller wants the envelope metadata
//! - any other object becomes a single [`Entity`], whose shape comes from the
//!   record's `type` tag or, failing that, the caller's type hint
//!
//! Records nested inside a record are materialized recursively. Items of an
//! embedded collection (`album.tracks`) get the enclosing entity as their
//! parent; nested single records (`track.artist`) get the caller's parent.
//!
//! # Example
//!
//! ```rust,ignore
//! use deezer::rest::{Kind, MaterializeOptions};
//! use serde_json::json;
//!
//! let chart = client
//!     .materialize(json!({"id": 0, "tracks": {"data": []}}), MaterializeOptions::new().type_hint(Kind::Chart))?
//!     .into_entity()?;
//! assert_eq!(chart.kind(), "chart");
//! ```

use serde_json::{Map, Value};

use crate::rest::dates::{parse_date, parse_datetime};
use crate::rest::entity::{Entity, Field, FromEntity, Identity};
use crate::rest::registry::{FieldParser, Kind, Shape};
use crate::rest::{Client, ResourceError};

/// Options for one materialization.
#[derive(Clone, Debug, Default)]
pub struct MaterializeOptions<'a> {
    parent: Option<&'a Entity>,
    type_hint: Option<Kind>,
    implicit_id: Option<Identity>,
    paginate: bool,
}

impl<'a> MaterializeOptions<'a> {
    /// Creates options with no parent, hint or implicit identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity the payload was fetched through.
    #[must_use]
    pub fn parent(mut self, parent: &'a Entity) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the kind to use for records that carry no `type` tag.
    #[must_use]
    pub fn type_hint(mut self, kind: Kind) -> Self {
        self.type_hint = Some(kind);
        self
    }

    /// Sets the identity to inject into a top-level record lacking an `id`.
    #[must_use]
    pub fn implicit_id(mut self, id: impl Into<Identity>) -> Self {
        self.implicit_id = Some(id.into());
        self
    }

    /// Keeps collection envelope metadata ([`Materialized::Page`]).
    #[must_use]
    pub fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }
}

/// One page of a collection, with its envelope metadata.
#[derive(Clone, Debug, Default)]
pub struct Page {
    /// The materialized items.
    pub data: Vec<Entity>,
    /// The size of the whole collection, when the API reports it.
    pub total: Option<usize>,
    /// Absolute URL of the next page, absent on the last page.
    pub next: Option<String>,
}

/// The result of materializing a payload.
#[derive(Clone, Debug)]
pub enum Materialized {
    /// A single record.
    Entity(Entity),
    /// The items of a collection envelope.
    List(Vec<Entity>),
    /// A collection envelope with its metadata.
    Page(Page),
    /// Anything that is not a record, passed through unchanged.
    Scalar(Value),
}

impl Materialized {
    /// Returns the single entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] for any other variant.
    pub fn into_entity(self) -> Result<Entity, ResourceError> {
        match self {
            Self::Entity(entity) => Ok(entity),
            other => Err(ResourceError::malformed(format!(
                "expected a single record, got {}",
                other.describe()
            ))),
        }
    }

    /// Returns the single entity as a typed view.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] if the payload is not a
    /// single record of the expected kind.
    pub fn into_typed<T: FromEntity>(self) -> Result<T, ResourceError> {
        T::from_entity(self.into_entity()?)
    }

    /// Returns the items of a collection, with or without metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] if the payload is not a
    /// collection.
    pub fn into_list(self) -> Result<Vec<Entity>, ResourceError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Page(page) => Ok(page.data),
            other => Err(ResourceError::malformed(format!(
                "expected a collection, got {}",
                other.describe()
            ))),
        }
    }

    /// Returns the items of a collection as typed views.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] if the payload is not a
    /// collection or an item has the wrong kind.
    pub fn into_typed_list<T: FromEntity>(self) -> Result<Vec<T>, ResourceError> {
        self.into_list()?.into_iter().map(T::from_entity).collect()
    }

    /// Returns the collection page with its metadata.
    ///
    /// A plain list is promoted to a page with no metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] if the payload is not a
    /// collection.
    pub fn into_page(self) -> Result<Page, ResourceError> {
        match self {
            Self::Page(page) => Ok(page),
            Self::List(data) => Ok(Page {
                data,
                ..Page::default()
            }),
            other => Err(ResourceError::malformed(format!(
                "expected a collection, got {}",
                other.describe()
            ))),
        }
    }

    /// Returns the boolean answer of a write endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] if the payload is not a
    /// boolean.
    pub fn into_bool(self) -> Result<bool, ResourceError> {
        match self {
            Self::Scalar(Value::Bool(b)) => Ok(b),
            other => Err(ResourceError::malformed(format!(
                "expected a boolean, got {}",
                other.describe()
            ))),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Entity(entity) => format!("a '{}' record", entity.kind()),
            Self::List(items) => format!("a collection of {}", items.len()),
            Self::Page(page) => format!("a page of {}", page.data.len()),
            Self::Scalar(value) => format!("the value {value}"),
        }
    }
}

fn is_envelope(record: &Map<String, Value>) -> bool {
    matches!(record.get("data"), Some(Value::Array(_)))
}

fn take_data(record: &mut Map<String, Value>) -> Vec<Value> {
    match record.remove("data") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn set_field(fields: &mut Vec<(String, Field)>, name: &str, value: Field) {
    if let Some(slot) = fields.iter_mut().find(|(n, _)| n == name) {
        slot.1 = value;
    } else {
        fields.push((name.to_string(), value));
    }
}

/// The recursive materialization routine, bound to one client.
pub(crate) struct Materializer<'c> {
    client: &'c Client,
}

impl<'c> Materializer<'c> {
    pub(crate) const fn new(client: &'c Client) -> Self {
        Self { client }
    }

    pub(crate) fn materialize(
        &self,
        value: Value,
        options: &MaterializeOptions<'_>,
    ) -> Result<Materialized, ResourceError> {
        let Value::Object(mut record) = value else {
            return Ok(Materialized::Scalar(value));
        };

        if is_envelope(&record) {
            let items = self.items(take_data(&mut record), options.parent, options.type_hint)?;
            if !options.paginate {
                return Ok(Materialized::List(items));
            }
            return Ok(Materialized::Page(Page {
                data: items,
                total: record
                    .get("total")
                    .and_then(Value::as_u64)
                    .and_then(|t| usize::try_from(t).ok()),
                next: record
                    .get("next")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }));
        }

        // Write endpoints answer `{"results": true}` with no tag to hint on.
        if options.type_hint.is_none()
            && !record.contains_key("type")
            && record.get("results") == Some(&Value::Bool(true))
        {
            return Ok(Materialized::Scalar(Value::Bool(true)));
        }

        self.entity(
            record,
            options.parent,
            options.type_hint,
            options.implicit_id.clone(),
        )
        .map(Materialized::Entity)
    }

    fn items(
        &self,
        data: Vec<Value>,
        parent: Option<&Entity>,
        type_hint: Option<Kind>,
    ) -> Result<Vec<Entity>, ResourceError> {
        data.into_iter()
            .map(|item| match item {
                Value::Object(record) => self.entity(record, parent, type_hint, None),
                other => Err(ResourceError::malformed(format!(
                    "collection item is not a record: {other}"
                ))),
            })
            .collect()
    }

    fn resolve(
        &self,
        record: &Map<String, Value>,
        type_hint: Option<Kind>,
    ) -> Result<(String, &'static Shape), ResourceError> {
        let registry = self.client.registry();
        if let Some(tag) = record.get("type").and_then(Value::as_str) {
            let shape = registry.lookup(tag).unwrap_or_else(|| {
                tracing::warn!(tag, "unregistered resource type, using a generic entity");
                registry.resolve(tag)
            });
            return Ok((tag.to_string(), shape));
        }

        match type_hint {
            Some(kind) => Ok((kind.as_str().to_string(), registry.shape(kind))),
            None => Err(ResourceError::UnknownResource {
                record: Value::Object(record.clone()).to_string(),
            }),
        }
    }

    fn entity(
        &self,
        record: Map<String, Value>,
        parent: Option<&Entity>,
        type_hint: Option<Kind>,
        implicit_id: Option<Identity>,
    ) -> Result<Entity, ResourceError> {
        let (kind, shape) = self.resolve(&record, type_hint)?;
        let entity = Entity::new(kind, shape, self.client.clone());
        let fields = self.fields_for(&entity, record, parent, implicit_id)?;
        entity.set_fields(fields);
        Ok(entity)
    }

    /// Builds the field set of `enclosing` from a raw record.
    pub(crate) fn fields_for(
        &self,
        enclosing: &Entity,
        record: Map<String, Value>,
        parent: Option<&Entity>,
        implicit_id: Option<Identity>,
    ) -> Result<Vec<(String, Field)>, ResourceError> {
        let shape = enclosing.shape();
        let mut fields = Vec::with_capacity(record.len() + 2);

        for (name, value) in record {
            let field = match value {
                Value::Object(mut nested) if is_envelope(&nested) => Field::List(
                    self.items(take_data(&mut nested), Some(enclosing), None)?
                        .into_iter()
                        .map(Field::Entity)
                        .collect(),
                ),
                Value::Object(nested) if nested.contains_key("type") => {
                    Field::Entity(self.entity(nested, parent, None, None)?)
                }
                raw => self.parse_field(shape, &name, raw)?,
            };
            fields.push((name, field));
        }

        if let Some(parent) = parent {
            set_field(&mut fields, parent.kind(), Field::Parent(parent.downgrade()));
        }
        if let Some(id) = implicit_id {
            if !fields.iter().any(|(n, _)| n == "id") {
                fields.push(("id".to_string(), id.into()));
            }
        }

        Ok(fields)
    }

    fn parse_field(&self, shape: &Shape, name: &str, raw: Value) -> Result<Field, ResourceError> {
        match (shape.parser_for(name), raw) {
            (Some(FieldParser::Date), Value::String(s)) => {
                Ok(parse_date(&s)?.map_or(Field::Null, Field::Date))
            }
            (Some(FieldParser::DateTime), Value::String(s)) => {
                Ok(parse_datetime(&s)?.map_or(Field::Null, Field::DateTime))
            }
            (Some(FieldParser::ArtistList), Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => self
                        .entity(record, None, Some(Kind::Artist), None)
                        .map(Field::Entity),
                    other => Ok(Field::from_json(other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Field::List),
            (_, raw) => Ok(Field::from_json(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> Client {
        Client::new(&crate::ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_scalars_pass_through() {
        let client = client();
        let result = client.materialize(json!(true), MaterializeOptions::new()).unwrap();
        assert!(matches!(result, Materialized::Scalar(Value::Bool(true))));

        let result = client.materialize(json!([1, 2]), MaterializeOptions::new()).unwrap();
        assert!(matches!(result, Materialized::Scalar(Value::Array(_))));
    }

    #[test]
    fn test_tagged_record_becomes_entity() {
        let album = client()
            .materialize(
                json!({"id": 302_127, "type": "album", "release_date": "2001-03-07"}),
                MaterializeOptions::new(),
            )
            .unwrap()
            .into_entity()
            .unwrap();

        assert_eq!(album.kind(), "album");
        assert_eq!(album.shape().kind, Kind::Album);
        let date = album.get("release_date").unwrap().as_date().unwrap();
        assert_eq!(date.to_string(), "2001-03-07");
    }

    #[test]
    fn test_zero_release_date_is_null() {
        let album = client()
            .materialize(
                json!({"id": 1, "type": "album", "release_date": "0000-00-00"}),
                MaterializeOptions::new(),
            )
            .unwrap()
            .into_entity()
            .unwrap();
        assert!(album.get("release_date").unwrap().is_null());
    }

    #[test]
    fn test_unknown_tag_falls_back_to_generic() {
        let thing = client()
            .materialize(json!({"id": 5, "type": "hologram", "glow": 3}), MaterializeOptions::new())
            .unwrap()
            .into_entity()
            .unwrap();

        assert_eq!(thing.kind(), "hologram");
        assert_eq!(thing.shape().kind, Kind::Generic);
        assert_eq!(thing.get("glow").unwrap().as_i64(), Some(3));
    }

    #[test]
    fn test_tagless_record_without_hint_is_unknown() {
        let error = client()
            .materialize(json!({"title": "X"}), MaterializeOptions::new())
            .unwrap_err();
        assert!(matches!(error, ResourceError::UnknownResource { ref record } if record.contains("\"title\"")));
    }

    #[test]
    fn test_type_hint_and_implicit_id() {
        let chart = client()
            .materialize(
                json!({"tracks": {"data": []}}),
                MaterializeOptions::new().type_hint(Kind::Chart).implicit_id(0),
            )
            .unwrap()
            .into_entity()
            .unwrap();

        assert_eq!(chart.kind(), "chart");
        assert_eq!(chart.id(), Some(Identity::Int(0)));
        assert_eq!(chart.get("tracks").unwrap().as_list().map(<[Field]>::len), Some(0));
    }

    #[test]
    fn test_implicit_id_does_not_override() {
        let album = client()
            .materialize(
                json!({"id": 7, "type": "album"}),
                MaterializeOptions::new().implicit_id(99),
            )
            .unwrap()
            .into_entity()
            .unwrap();
        assert_eq!(album.id(), Some(Identity::Int(7)));
    }

    #[test]
    fn test_results_true_is_a_boolean() {
        let result = client()
            .materialize(json!({"results": true}), MaterializeOptions::new())
            .unwrap();
        assert!(result.into_bool().unwrap());
    }

    #[test]
    fn test_envelope_items_share_the_enclosing_parent() {
        let album = client()
            .materialize(
                json!({
                    "id": 302_127,
                    "type": "album",
                    "tracks": {"data": [
                        {"id": 1, "type": "track"},
                        {"id": 2, "type": "track"}
                    ]}
                }),
                MaterializeOptions::new(),
            )
            .unwrap()
            .into_entity()
            .unwrap();

        let tracks = album.get("tracks").unwrap().entities();
        assert_eq!(tracks.len(), 2);
        for track in tracks {
            let parent = track.get("album").unwrap().as_entity().unwrap();
            assert!(Entity::ptr_eq(&parent, &album));
        }
    }

    #[test]
    fn test_parent_is_injected_under_its_kind() {
        let client = client();
        let artist = client
            .materialize(json!({"id": 27, "type": "artist"}), MaterializeOptions::new())
            .unwrap()
            .into_entity()
            .unwrap();

        let albums = client
            .materialize(
                json!({"data": [{"id": 1, "type": "album"}], "total": 1}),
                MaterializeOptions::new().parent(&artist),
            )
            .unwrap()
            .into_list()
            .unwrap();

        let parent = albums[0].get("artist").unwrap().as_entity().unwrap();
        assert!(Entity::ptr_eq(&parent, &artist));
    }

    #[test]
    fn test_paginate_keeps_envelope_metadata() {
        let page = client()
            .materialize(
                json!({
                    "data": [{"id": 1, "type": "track"}],
                    "total": 7,
                    "next": "https://api.deezer.com/chart/0/tracks?index=1"
                }),
                MaterializeOptions::new().paginate(true),
            )
            .unwrap()
            .into_page()
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total, Some(7));
        assert_eq!(page.next.as_deref(), Some("https://api.deezer.com/chart/0/tracks?index=1"));
    }

    #[test]
    fn test_contributors_become_artists() {
        let track = client()
            .materialize(
                json!({
                    "id": 3_135_556,
                    "type": "track",
                    "contributors": [
                        {"id": 27, "name": "Daft Punk", "type": "artist", "role": "Main"}
                    ]
                }),
                MaterializeOptions::new(),
            )
            .unwrap()
            .into_entity()
            .unwrap();

        let contributors = track.get("contributors").unwrap().entities();
        assert_eq!(contributors.len(), 1);
        assert_eq!(contributors[0].kind(), "artist");
        assert_eq!(contributors[0].get("role").unwrap().as_str(), Some("Main"));
    }

    #[test]
    fn test_non_record_collection_item_is_malformed() {
        let error = client()
            .materialize(json!({"data": [1, 2]}), MaterializeOptions::new())
            .unwrap_err();
        assert!(matches!(error, ResourceError::MalformedRecord { .. }));
    }
}
