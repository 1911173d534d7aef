//! Materialized entities and their fields.
//!
//! An [`Entity`] is a cheap, clonable handle to one API object. Clones share
//! the same field set: identity is pointer identity, checked with
//! [`Entity::ptr_eq`]. This is what lets a track reached through
//! `album.tracks` point back to *that* album rather than a copy.
//!
//! # Ownership
//!
//! Ownership flows downwards. An entity owns the entities nested in its
//! fields ([`Field::Entity`]); a child only keeps a weak back-reference to
//! the parent it was fetched through ([`Field::Parent`]). Dropping a parent
//! therefore never leaks, and children never keep it alive.
//!
//! # Lazy fields
//!
//! [`Entity::get`] only reads what is stored. [`Entity::get_or_fetch`] runs
//! the full resolution:
//!
//! 1. a stored field is returned as is
//! 2. a derivable field (such as `link`) is computed from the identity and memoized
//! 3. a field the kind declares triggers one `GET {kind}/{id}`, whose fields
//!    are merged into the entity without overwriting local ones
//! 4. anything else is [`ResourceError::MissingAttribute`]
//!
//! Step 3 happens at most once per entity, even under concurrent reads.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::clients::{HttpMethod, QueryParams};
use crate::rest::dates::{format_date, format_datetime};
use crate::rest::materializer::{MaterializeOptions, Materialized, Materializer};
use crate::rest::pagination::PaginatedList;
use crate::rest::path::{entity_path, relation_path};
use crate::rest::registry::{Derivation, Kind, Shape};
use crate::rest::{Client, ResourceError};

/// The identity of an entity, as found in its `id` field.
///
/// Deezer uses integers almost everywhere, but a few endpoints accept the
/// string `"me"` for the current user, so both forms are kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identity {
    /// A numeric identifier.
    Int(i64),
    /// A string identifier.
    Str(String),
}

impl Identity {
    /// Reads an identity from a raw JSON value.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.as_i64().map_or_else(|| Self::Str(n.to_string()), Self::Int)),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Returns the identity as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Str(s) => Value::String(s.clone()),
        }
    }

    /// Returns the numeric form, if this identity is numeric.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identity {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for Identity {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for Identity {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// A single field value of an entity.
#[derive(Clone, Debug)]
pub enum Field {
    /// JSON null, or an unset date.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, kept exactly as received.
    Number(Number),
    /// A string.
    String(String),
    /// A parsed `YYYY-MM-DD` date.
    Date(NaiveDate),
    /// A parsed `YYYY-MM-DD HH:MM:SS` timestamp.
    DateTime(NaiveDateTime),
    /// A nested entity owned by this one.
    Entity(Entity),
    /// The entity this one was fetched through.
    Parent(WeakEntity),
    /// A list of values, such as an embedded collection.
    List(Vec<Field>),
    /// A nested object that is neither a record nor an envelope.
    Object(Map<String, Value>),
}

impl Field {
    /// Converts a raw JSON value without any materialization.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Object(map),
        }
    }

    /// Exports the value as JSON.
    ///
    /// Nested entities are exported recursively. A parent reference is
    /// exported as an `{"id", "type"}` stub so that exports never recurse
    /// back up the tree.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Date(d) => Value::String(format_date(d)),
            Self::DateTime(dt) => Value::String(format_datetime(dt)),
            Self::Entity(entity) => entity.to_json(),
            Self::Parent(weak) => weak.upgrade().map_or(Value::Null, |parent| parent.stub()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(map.clone()),
        }
    }

    /// Returns `true` for [`Field::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a signed integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the value as a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date value.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the timestamp value.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the referenced entity.
    ///
    /// Works for both owned entities and parent references; a parent that
    /// has already been dropped yields `None`.
    #[must_use]
    pub fn as_entity(&self) -> Option<Entity> {
        match self {
            Self::Entity(entity) => Some(entity.clone()),
            Self::Parent(weak) => weak.upgrade(),
            _ => None,
        }
    }

    /// Returns the list items.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entities of a list, skipping any non-entity item.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.as_list()
            .map(|items| items.iter().filter_map(Self::as_entity).collect())
            .unwrap_or_default()
    }
}

impl From<Identity> for Field {
    fn from(id: Identity) -> Self {
        match id {
            Identity::Int(i) => Self::Number(Number::from(i)),
            Identity::Str(s) => Self::String(s),
        }
    }
}

#[derive(Debug, Default)]
struct EntityState {
    fields: Vec<(String, Field)>,
    fetched: bool,
}

impl EntityState {
    fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

struct EntityInner {
    kind: String,
    shape: &'static Shape,
    client: Client,
    state: RwLock<EntityState>,
    refetch: tokio::sync::Mutex<()>,
}

/// A materialized API object.
///
/// See the [module documentation](self) for the ownership model and the
/// lazy field protocol.
///
/// # Example
///
/// ```rust,ignore
/// let album = client.get_album(302127).await?;
///
/// // Stored field, no I/O.
/// let title = album.get("title");
///
/// // Derived field, no I/O.
/// let link = album.get_or_fetch("link").await?;
///
/// // Every track points back to this very album.
/// for track in album.get_or_fetch("tracks").await?.entities() {
///     let parent = track.get("album").and_then(|f| f.as_entity()).unwrap();
///     assert!(Entity::ptr_eq(&parent, &album));
/// }
/// ```
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityInner>,
}

// Verify Entity is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Entity>();
    assert_send_sync::<Field>();
};

impl Entity {
    pub(crate) fn new(kind: impl Into<String>, shape: &'static Shape, client: Client) -> Self {
        Self {
            inner: Arc::new(EntityInner {
                kind: kind.into(),
                shape,
                client,
                state: RwLock::new(EntityState::default()),
                refetch: tokio::sync::Mutex::new(()),
            }),
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, EntityState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, EntityState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_fields(&self, fields: Vec<(String, Field)>) {
        self.state_mut().fields = fields;
    }

    /// Adds every field not already present and marks the entity fetched.
    pub(crate) fn merge_missing(&self, fields: Vec<(String, Field)>) {
        let mut state = self.state_mut();
        for (name, value) in fields {
            if !state.contains(&name) {
                state.fields.push((name, value));
            }
        }
        state.fetched = true;
    }

    /// Returns the wire kind tag (`"album"`, `"track"`, ...).
    ///
    /// For an unregistered tag this is the tag itself, even though the
    /// entity uses the generic shape.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.inner.kind
    }

    /// Returns the shape this entity was built with.
    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.inner.shape
    }

    /// Returns the client used for lazy loads and relations.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// Returns the identity, if the entity has one.
    #[must_use]
    pub fn id(&self) -> Option<Identity> {
        let id = self.state().get("id").cloned()?;
        Identity::from_json(&id.to_json())
    }

    fn require_id(&self) -> Result<Identity, ResourceError> {
        self.id()
            .ok_or_else(|| ResourceError::missing(self.kind(), "id"))
    }

    /// Returns `true` if both handles point at the same entity.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Creates a non-owning reference to this entity.
    #[must_use]
    pub fn downgrade(&self) -> WeakEntity {
        WeakEntity {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Returns the names of the stored fields, in insertion order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.state().fields.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Returns `true` if the field is stored on the entity.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.state().contains(name)
    }

    /// Returns a stored field. Never performs I/O and never derives.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Field> {
        self.state().get(name).cloned()
    }

    /// Returns `true` once the entity has loaded its full representation.
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        self.state().fetched
    }

    /// Computes a derivable field from the identity and stores it.
    ///
    /// Returns `None` when the shape has no rule for `name` or when the
    /// entity has no identity.
    #[must_use]
    pub fn try_derive(&self, name: &str) -> Option<Field> {
        let rule = self.shape().derivation_for(name)?;
        let id = self.id()?;
        let value = match rule {
            Derivation::CanonicalLink => self.canonical_link(&id),
            Derivation::ShareLink => {
                let link = self
                    .get("link")
                    .and_then(|f| f.as_str().map(str::to_string))
                    .unwrap_or_else(|| self.canonical_link(&id));
                format!(
                    "{link}?utm_source=deezer&utm_content={}-{id}&utm_medium=web",
                    self.kind()
                )
            }
        };

        let field = Field::String(value);
        let mut state = self.state_mut();
        if let Some(existing) = state.get(name) {
            return Some(existing.clone());
        }
        state.fields.push((name.to_string(), field.clone()));
        Some(field)
    }

    fn canonical_link(&self, id: &Identity) -> String {
        format!("https://www.deezer.com/{}/{id}", self.kind())
    }

    fn resolve_local(&self, name: &str) -> Option<Field> {
        self.get(name).or_else(|| self.try_derive(name))
    }

    /// Returns a field, loading the full entity if needed.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MissingAttribute`] if the field is absent after
    ///   resolution, or not declared by the entity's kind
    /// - any transport or functional error raised by the self-fetch
    pub async fn get_or_fetch(&self, name: &str) -> Result<Field, ResourceError> {
        if let Some(value) = self.resolve_local(name) {
            return Ok(value);
        }
        if !self.shape().declares(name) {
            return Err(ResourceError::missing(self.kind(), name));
        }

        self.load_missing().await?;

        self.resolve_local(name)
            .ok_or_else(|| ResourceError::missing(self.kind(), name))
    }

    /// Performs the one self-fetch of this entity, if it has not happened yet.
    async fn load_missing(&self) -> Result<(), ResourceError> {
        let _guard = self.inner.refetch.lock().await;
        if self.is_fetched() {
            return Ok(());
        }

        let id = self.require_id()?;
        tracing::debug!(kind = %self.kind(), %id, "loading full entity for missing field");

        let body = self
            .client()
            .request_json(HttpMethod::Get, &entity_path(self.kind(), &id), QueryParams::new())
            .await?;
        let Value::Object(record) = body else {
            return Err(ResourceError::malformed(format!(
                "expected an object for {}/{id}",
                self.kind()
            )));
        };

        let fields = Materializer::new(self.client()).fields_for(self, record, None, None)?;
        self.merge_missing(fields);
        Ok(())
    }

    /// Fetches a fresh, complete copy of this entity.
    ///
    /// Unlike [`get_or_fetch`](Self::get_or_fetch), this always issues a
    /// request and returns a new entity; `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no identity or the request fails.
    pub async fn fetch(&self) -> Result<Self, ResourceError> {
        let id = self.require_id()?;
        self.client()
            .request(
                HttpMethod::Get,
                &entity_path(self.kind(), &id),
                QueryParams::new(),
                MaterializeOptions::new().type_hint(self.shape().kind),
            )
            .await?
            .into_entity()
    }

    /// Fetches a relation of this entity (`{kind}/{id}/{relation}`).
    ///
    /// Every entity in the result gets this entity as its parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no identity, the request fails, or
    /// the payload cannot be materialized.
    pub async fn get_relation(
        &self,
        relation: &str,
        params: QueryParams,
        type_hint: Option<Kind>,
    ) -> Result<Materialized, ResourceError> {
        let path = relation_path(self.kind(), self.require_id()?, relation);
        let mut options = MaterializeOptions::new().parent(self);
        if let Some(kind) = type_hint {
            options = options.type_hint(kind);
        }
        self.client()
            .request(HttpMethod::Get, &path, params, options)
            .await
    }

    /// Returns a lazy sequence over a paginated relation of this entity.
    ///
    /// No request is made until the sequence is read.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the entity has no
    /// identity.
    pub fn paginate<T: crate::rest::FromEntity>(
        &self,
        relation: &str,
        params: QueryParams,
    ) -> Result<PaginatedList<T>, ResourceError> {
        let path = relation_path(self.kind(), self.require_id()?, relation);
        Ok(PaginatedList::new(self.client().clone(), path, params).with_parent(self.clone()))
    }

    /// Posts to a relation of this entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no identity or the request fails.
    pub async fn post_relation(
        &self,
        relation: &str,
        params: QueryParams,
    ) -> Result<Materialized, ResourceError> {
        let path = relation_path(self.kind(), self.require_id()?, relation);
        self.client()
            .request(HttpMethod::Post, &path, params, MaterializeOptions::new())
            .await
    }

    /// Deletes from a relation of this entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no identity or the request fails.
    pub async fn delete_relation(
        &self,
        relation: &str,
        params: QueryParams,
    ) -> Result<Materialized, ResourceError> {
        let path = relation_path(self.kind(), self.require_id()?, relation);
        self.client()
            .request(HttpMethod::Delete, &path, params, MaterializeOptions::new())
            .await
    }

    /// Exports the stored fields as a JSON map.
    ///
    /// Dates use the wire format, nested entities are exported recursively,
    /// and parent references become `{"id", "type"}` stubs.
    #[must_use]
    pub fn as_map(&self) -> Map<String, Value> {
        // Nested exports lock other entities, so release ours first.
        let fields = self.state().fields.clone();
        fields
            .into_iter()
            .map(|(name, value)| (name, value.to_json()))
            .collect()
    }

    /// Exports the stored fields as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.as_map())
    }

    fn stub(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "id".to_string(),
            self.id().map_or(Value::Null, |id| id.to_json()),
        );
        map.insert("type".to_string(), Value::String(self.kind().to_string()));
        Value::Object(map)
    }

    fn label(&self) -> String {
        ["title", "name"]
            .iter()
            .find_map(|name| self.get(name).and_then(|f| f.as_str().map(str::to_string)))
            .or_else(|| self.id().map(|id| id.to_string()))
            .unwrap_or_default()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &self.kind())
            .field("id", &self.id())
            .field("fields", &self.field_names())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.kind().chars();
        let kind: String = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        write!(f, "<{kind}: {}>", self.label())
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A non-owning reference to an [`Entity`].
#[derive(Clone, Default)]
pub struct WeakEntity {
    inner: Weak<EntityInner>,
}

impl WeakEntity {
    /// Returns the entity if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Entity> {
        self.inner.upgrade().map(|inner| Entity { inner })
    }
}

impl fmt::Debug for WeakEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(entity) => write!(f, "WeakEntity({}/{:?})", entity.kind(), entity.id()),
            None => f.write_str("WeakEntity(dropped)"),
        }
    }
}

/// Conversion from a materialized entity into a typed view.
///
/// [`Entity`] itself implements this trait, so untyped sequences and
/// results work with the same machinery as typed ones.
pub trait FromEntity: Sized + Clone + Send + Sync {
    /// Wraps `entity`, checking its kind where the target is typed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedRecord`] if the entity's kind does
    /// not match the target type.
    fn from_entity(entity: Entity) -> Result<Self, ResourceError>;
}

impl FromEntity for Entity {
    fn from_entity(entity: Entity) -> Result<Self, ResourceError> {
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::registry::{ALBUM, EPISODE, GENERIC};
    use serde_json::json;

    fn offline_client() -> Client {
        Client::new(&crate::ClientConfig::default()).unwrap()
    }

    fn entity_with(shape: &'static Shape, kind: &str, fields: Value) -> Entity {
        let entity = Entity::new(kind, shape, offline_client());
        let Value::Object(map) = fields else {
            panic!("fields must be an object")
        };
        entity.set_fields(map.into_iter().map(|(k, v)| (k, Field::from_json(v))).collect());
        entity
    }

    #[test]
    fn test_identity_from_json() {
        assert_eq!(Identity::from_json(&json!(302_127)), Some(Identity::Int(302_127)));
        assert_eq!(Identity::from_json(&json!("me")), Some(Identity::Str("me".into())));
        assert_eq!(Identity::from_json(&json!(null)), None);
        assert_eq!(Identity::from(12).to_string(), "12");
    }

    #[test]
    fn test_get_reads_stored_fields_only() {
        let album = entity_with(&ALBUM, "album", json!({"id": 1, "title": "Discovery"}));

        assert_eq!(album.get("title").unwrap().as_str(), Some("Discovery"));
        assert!(album.get("link").is_none());
        assert!(album.has_field("id"));
        assert_eq!(album.field_names(), vec!["id", "title"]);
    }

    #[test]
    fn test_link_is_derived_and_memoized() {
        let album = entity_with(&ALBUM, "album", json!({"id": 302_127}));

        let link = album.try_derive("link").unwrap();
        assert_eq!(link.as_str(), Some("https://www.deezer.com/album/302127"));
        assert!(album.has_field("link"));
    }

    #[test]
    fn test_episode_share_builds_on_link() {
        let episode = entity_with(&EPISODE, "episode", json!({"id": 343_457_312}));

        let share = episode.try_derive("share").unwrap();
        assert_eq!(
            share.as_str(),
            Some("https://www.deezer.com/episode/343457312?utm_source=deezer&utm_content=episode-343457312&utm_medium=web")
        );
    }

    #[test]
    fn test_derivation_needs_identity() {
        let album = entity_with(&ALBUM, "album", json!({"title": "No id"}));
        assert!(album.try_derive("link").is_none());
    }

    #[test]
    fn test_generic_entity_keeps_unknown_tag_as_kind() {
        let thing = entity_with(&GENERIC, "hologram", json!({"id": 9, "type": "hologram"}));

        assert_eq!(thing.kind(), "hologram");
        assert_eq!(thing.shape().kind, Kind::Generic);
        assert_eq!(
            thing.try_derive("link").unwrap().as_str(),
            Some("https://www.deezer.com/hologram/9")
        );
    }

    #[tokio::test]
    async fn test_undeclared_field_fails_without_io() {
        // The offline client points at the real API; reaching it would hang
        // or fail with a transport error instead of MissingAttribute.
        let album = entity_with(&ALBUM, "album", json!({"id": 1}));

        let error = album.get_or_fetch("bpm").await.unwrap_err();
        assert!(matches!(
            error,
            ResourceError::MissingAttribute { ref kind, ref field } if kind == "album" && field == "bpm"
        ));
        assert!(!album.is_fetched());
    }

    #[test]
    fn test_merge_missing_keeps_local_fields() {
        let album = entity_with(&ALBUM, "album", json!({"id": 1, "title": "Local"}));
        album.merge_missing(vec![
            ("title".to_string(), Field::String("Remote".to_string())),
            ("label".to_string(), Field::String("Virgin".to_string())),
        ]);

        assert_eq!(album.get("title").unwrap().as_str(), Some("Local"));
        assert_eq!(album.get("label").unwrap().as_str(), Some("Virgin"));
        assert!(album.is_fetched());
    }

    #[test]
    fn test_parent_reference_exports_as_stub() {
        let album = entity_with(&ALBUM, "album", json!({"id": 1, "type": "album", "title": "A"}));
        let track = entity_with(&crate::rest::registry::TRACK, "track", json!({"id": 2}));
        track.merge_missing(vec![("album".to_string(), Field::Parent(album.downgrade()))]);

        assert_eq!(
            track.to_json(),
            json!({"id": 2, "album": {"id": 1, "type": "album"}})
        );
        let parent = track.get("album").unwrap().as_entity().unwrap();
        assert!(Entity::ptr_eq(&parent, &album));
    }

    #[test]
    fn test_dropped_parent_does_not_keep_it_alive() {
        let track = entity_with(&crate::rest::registry::TRACK, "track", json!({"id": 2}));
        {
            let album = entity_with(&ALBUM, "album", json!({"id": 1}));
            track.merge_missing(vec![("album".to_string(), Field::Parent(album.downgrade()))]);
        }

        assert!(track.get("album").unwrap().as_entity().is_none());
        assert_eq!(track.to_json()["album"], Value::Null);
    }

    #[test]
    fn test_dates_export_in_wire_format() {
        let album = entity_with(&ALBUM, "album", json!({"id": 1}));
        let date = NaiveDate::from_ymd_opt(2001, 3, 7).unwrap();
        album.merge_missing(vec![("release_date".to_string(), Field::Date(date))]);

        assert_eq!(album.to_json()["release_date"], "2001-03-07");
    }

    #[test]
    fn test_display_uses_title_or_name() {
        let album = entity_with(&ALBUM, "album", json!({"id": 1, "title": "Discovery"}));
        assert_eq!(album.to_string(), "<Album: Discovery>");

        let generic = entity_with(&GENERIC, "thing", json!({"id": 4}));
        assert_eq!(generic.to_string(), "<Thing: 4>");
    }
}
