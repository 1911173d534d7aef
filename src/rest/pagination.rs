//! Lazy, cached sequences over paginated collections.
//!
//! A [`PaginatedList`] looks like an indexable sequence whose items are
//! fetched from the remote collection on demand. It keeps three pieces of
//! state:
//!
//! - the buffer of items fetched so far
//! - the request for the next page, absent once the collection is exhausted
//! - the total size, once any response has reported it
//!
//! [`grow`](PaginatedList::grow) is the only state transition: it fetches one
//! page and applies all three updates together after the request completes.
//! Dropping a pending operation therefore leaves the sequence exactly as it
//! was. Items are fetched at most once; every later read is served from the
//! buffer.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut tracks = album.tracks()?;
//!
//! // One request for the first page.
//! let first = tracks.get(0).await?;
//!
//! // Walks pages only as far as needed.
//! let some = tracks.slice(10, Some(20)).await?;
//!
//! // Reuses the observed total, or asks for it with a one-item page.
//! let len = tracks.len().await?;
//!
//! let mut iter = tracks.iter();
//! while let Some(track) = iter.next().await {
//!     println!("{}", track?);
//! }
//! ```

use std::fmt;

use crate::clients::{HttpMethod, QueryParams};
use crate::rest::entity::{Entity, FromEntity};
use crate::rest::materializer::{MaterializeOptions, Page};
use crate::rest::path::PageRequest;
use crate::rest::registry::Kind;
use crate::rest::{Client, ResourceError};

/// How many buffered items the `Debug` output shows.
const DEBUG_PREVIEW: usize = 5;

/// A lazy sequence over a paginated collection.
///
/// See the [module documentation](self) for the growth model.
pub struct PaginatedList<T = Entity> {
    client: Client,
    base: PageRequest,
    parent: Option<Entity>,
    type_hint: Option<Kind>,
    elements: Vec<T>,
    cursor: Option<PageRequest>,
    total: Option<usize>,
}

impl<T: FromEntity> PaginatedList<T> {
    /// Creates a sequence over `path`. No request is made yet.
    #[must_use]
    pub fn new(client: Client, path: impl Into<String>, params: QueryParams) -> Self {
        let base = PageRequest::new(path, params);
        Self {
            client,
            cursor: Some(base.clone()),
            base,
            parent: None,
            type_hint: None,
            elements: Vec::new(),
            total: None,
        }
    }

    /// Sets the entity every fetched item gets as its parent.
    ///
    /// The sequence keeps the parent alive for as long as it exists.
    #[must_use]
    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the kind used for items that carry no `type` tag.
    #[must_use]
    pub fn with_type_hint(mut self, kind: Kind) -> Self {
        self.type_hint = Some(kind);
        self
    }

    /// Adds query parameters (such as `limit`) to the sequence's requests.
    ///
    /// Parameters replace any existing value for the same key. Call this
    /// before the first read: later pages follow the API's `next` URLs,
    /// which carry the parameters forward.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        for (key, value) in params.iter() {
            self.base.params.set(key, value);
        }
        if self.elements.is_empty() && self.total.is_none() {
            self.cursor = Some(self.base.clone());
        }
        self
    }

    /// Returns the path of the collection.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.base.path
    }

    /// Returns the items fetched so far.
    #[must_use]
    pub fn buffered(&self) -> &[T] {
        &self.elements
    }

    /// Returns `true` while more pages may exist.
    #[must_use]
    pub const fn could_grow(&self) -> bool {
        self.cursor.is_some()
    }

    /// Returns the total if it is already known, without any I/O.
    #[must_use]
    pub const fn known_total(&self) -> Option<usize> {
        self.total
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, ResourceError> {
        let mut options = MaterializeOptions::new().paginate(true);
        if let Some(parent) = &self.parent {
            options = options.parent(parent);
        }
        if let Some(kind) = self.type_hint {
            options = options.type_hint(kind);
        }

        self.client
            .request(
                HttpMethod::Get,
                &request.path,
                request.params.clone(),
                options,
            )
            .await?
            .into_page()
    }

    /// Fetches the next page and appends its items.
    ///
    /// Returns how many items were appended; `0` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns any transport, functional or materialization error. The
    /// sequence is left unchanged in that case.
    pub async fn grow(&mut self) -> Result<usize, ResourceError> {
        let Some(request) = self.cursor.clone() else {
            return Ok(0);
        };

        tracing::debug!(path = %request.path, buffered = self.elements.len(), "fetching next page");
        let page = self.fetch_page(&request).await?;

        let items = page
            .data
            .into_iter()
            .map(T::from_entity)
            .collect::<Result<Vec<_>, _>>()?;
        let cursor = page
            .next
            .as_deref()
            .map(PageRequest::from_next_url)
            .transpose()?;

        let appended = items.len();
        self.elements.extend(items);
        self.cursor = cursor;
        if page.total.is_some() {
            self.total = page.total;
        }
        Ok(appended)
    }

    /// Grows until at least `len` items are buffered or nothing is left.
    async fn fill_to(&mut self, len: usize) -> Result<(), ResourceError> {
        while self.elements.len() < len && self.could_grow() {
            self.grow().await?;
        }
        Ok(())
    }

    /// Fetches every remaining page.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while growing.
    pub async fn fetch_all(&mut self) -> Result<&[T], ResourceError> {
        while self.could_grow() {
            self.grow().await?;
        }
        Ok(&self.elements)
    }

    /// Returns the size of the remote collection.
    ///
    /// A total already observed on any page is reused. Otherwise one request
    /// for a single-item page is made purely to read the total; that probe's
    /// item is not buffered.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the probe.
    pub async fn total(&mut self) -> Result<usize, ResourceError> {
        if let Some(total) = self.total {
            return Ok(total);
        }
        if !self.could_grow() {
            self.total = Some(self.elements.len());
            return Ok(self.elements.len());
        }

        let probe = PageRequest::new(
            self.base.path.clone(),
            self.base.params.clone().with("limit", 1),
        );
        tracing::debug!(path = %probe.path, "probing collection size");
        let page = self.fetch_page(&probe).await?;

        if let Some(total) = page.total {
            self.total = Some(total);
            return Ok(total);
        }

        // No total in the envelope: count by walking the collection.
        self.fetch_all().await?;
        self.total = Some(self.elements.len());
        Ok(self.elements.len())
    }

    /// Same as [`total`](Self::total).
    ///
    /// # Errors
    ///
    /// Returns any error raised by the probe.
    pub async fn len(&mut self) -> Result<usize, ResourceError> {
        self.total().await
    }

    /// Returns `true` if the remote collection is empty.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the probe.
    pub async fn is_empty(&mut self) -> Result<bool, ResourceError> {
        Ok(self.total().await? == 0)
    }

    /// Returns the item at `index`, fetching pages up to it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::IndexOutOfRange`] if the collection ends
    /// before `index`, or any error raised while growing.
    pub async fn get(&mut self, index: usize) -> Result<T, ResourceError> {
        self.fill_to(index.saturating_add(1)).await?;
        self.elements
            .get(index)
            .cloned()
            .ok_or(ResourceError::IndexOutOfRange {
                index,
                available: self.elements.len(),
            })
    }

    /// Returns the items in `start..stop`, or `start..` when `stop` is `None`.
    ///
    /// Bounds past the end of the collection are clamped, like slicing a
    /// shorter sequence.
    ///
    /// # Errors
    ///
    /// Returns any error raised while growing.
    pub async fn slice(&mut self, start: usize, stop: Option<usize>) -> Result<Vec<T>, ResourceError> {
        match stop {
            Some(stop) => self.fill_to(stop).await?,
            None => {
                self.fetch_all().await?;
            }
        }

        let len = self.elements.len();
        let stop = stop.map_or(len, |stop| stop.min(len));
        let start = start.min(stop);
        Ok(self.elements[start..stop].to_vec())
    }

    /// Returns a cursor over the whole collection.
    ///
    /// Buffered items are yielded first; pages are fetched as the cursor
    /// passes the end of the buffer. Several cursors can be used in turn
    /// over the same sequence without refetching.
    pub fn iter(&mut self) -> Iter<'_, T> {
        Iter {
            list: self,
            position: 0,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PaginatedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: Vec<&T> = self.elements.iter().take(DEBUG_PREVIEW).collect();
        write!(f, "<PaginatedList {} {preview:?}", self.base.path)?;
        if self.elements.len() > DEBUG_PREVIEW || self.cursor.is_some() {
            f.write_str(" ...")?;
        }
        f.write_str(">")
    }
}

/// Cursor over a [`PaginatedList`].
///
/// This is an async cursor rather than a `Stream`: call
/// [`next`](Iter::next) in a loop.
pub struct Iter<'a, T> {
    list: &'a mut PaginatedList<T>,
    position: usize,
}

impl<T: FromEntity> Iter<'_, T> {
    /// Returns the next item, fetching the next page when needed.
    ///
    /// After an error the cursor stays in place; calling `next` again
    /// retries the same page.
    pub async fn next(&mut self) -> Option<Result<T, ResourceError>> {
        loop {
            if let Some(item) = self.list.elements.get(self.position) {
                self.position += 1;
                return Some(Ok(item.clone()));
            }
            if !self.list.could_grow() {
                return None;
            }
            if let Err(e) = self.list.grow().await {
                return Some(Err(e));
            }
        }
    }

    /// Returns how many items this cursor has yielded.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

// Verify PaginatedList is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PaginatedList<Entity>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpError, HttpRequest, HttpResponse, Transport};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Pages {
        bodies: Mutex<Vec<Value>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Pages {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.seen.lock().unwrap().push(request);
            let body = self.bodies.lock().unwrap().remove(0);
            Ok(HttpResponse::ok(body))
        }
    }

    fn tracks(ids: &[i64]) -> Value {
        Value::Array(ids.iter().map(|id| json!({"id": id, "type": "track"})).collect())
    }

    fn list_over(bodies: Vec<Value>) -> (Arc<Pages>, PaginatedList) {
        let pages = Arc::new(Pages {
            bodies: Mutex::new(bodies),
            seen: Mutex::default(),
        });
        let client = Client::from_transport(pages.clone());
        (pages, PaginatedList::new(client, "chart/0/tracks", QueryParams::new()))
    }

    #[tokio::test]
    async fn test_nothing_is_fetched_until_read() {
        let (pages, list) = list_over(vec![]);
        assert!(list.could_grow());
        assert!(list.buffered().is_empty());
        assert!(pages.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_follows_next_cursor() {
        let (pages, mut list) = list_over(vec![
            json!({"data": tracks(&[1, 2]), "next": "https://api.deezer.com/chart/0/tracks?index=2"}),
            json!({"data": tracks(&[3])}),
        ]);

        let third = list.get(2).await.unwrap();
        assert_eq!(third.id(), Some(3.into()));

        let seen = pages.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].query.get("index"), Some("2"));
        assert!(!list.could_grow());
    }

    #[tokio::test]
    async fn test_get_past_end_is_out_of_range() {
        let (_, mut list) = list_over(vec![json!({"data": tracks(&[1])})]);

        let error = list.get(4).await.unwrap_err();
        assert!(matches!(error, ResourceError::IndexOutOfRange { index: 4, available: 1 }));
    }

    #[tokio::test]
    async fn test_total_probe_uses_single_item_page() {
        let (pages, mut list) = list_over(vec![json!({"data": tracks(&[1]), "total": 42})]);

        assert_eq!(list.len().await.unwrap(), 42);
        assert_eq!(list.len().await.unwrap(), 42);

        let seen = pages.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query.get("limit"), Some("1"));
        assert!(list.buffered().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_list_counts_its_buffer() {
        let (pages, mut list) = list_over(vec![json!({"data": tracks(&[1, 2])})]);
        list.fetch_all().await.unwrap();

        assert_eq!(list.total().await.unwrap(), 2);
        assert_eq!(pages.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_slice_clamps_and_grows_only_as_needed() {
        let (pages, mut list) = list_over(vec![
            json!({"data": tracks(&[1, 2]), "next": "https://api.deezer.com/chart/0/tracks?index=2"}),
            json!({"data": tracks(&[3, 4]), "next": "https://api.deezer.com/chart/0/tracks?index=4"}),
            json!({"data": tracks(&[5])}),
        ]);

        let window = list.slice(1, Some(3)).await.unwrap();
        let ids: Vec<_> = window.iter().map(Entity::id).collect();
        assert_eq!(ids, vec![Some(2.into()), Some(3.into())]);
        assert_eq!(pages.seen.lock().unwrap().len(), 2);

        let rest = list.slice(3, None).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(list.slice(10, Some(20)).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_debug_previews_five_items() {
        let (_, mut list) = list_over(vec![json!({"data": tracks(&[1, 2, 3, 4, 5, 6])})]);
        list.grow().await.unwrap();

        let debug = format!("{list:?}");
        assert!(debug.starts_with("<PaginatedList chart/0/tracks ["));
        assert!(debug.ends_with(" ...>"));
        assert_eq!(debug.matches("Entity {").count(), 5);
    }

    #[tokio::test]
    async fn test_failed_grow_leaves_state_untouched() {
        #[derive(Debug)]
        struct Down;

        #[async_trait]
        impl Transport for Down {
            async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
                Err(HttpError::from_status(503, request.path, ""))
            }
        }

        let mut list: PaginatedList =
            PaginatedList::new(Client::with_transport(Down), "chart/0/tracks", QueryParams::new());

        let error = list.grow().await.unwrap_err();
        assert!(error.is_retryable());
        assert!(list.could_grow());
        assert!(list.buffered().is_empty());
        assert_eq!(list.known_total(), None);
    }
}
