//! The Deezer resource engine.
//!
//! This module turns raw JSON answers into live, navigable objects:
//!
//! - **[`TypeRegistry`]**: maps a record's `type` tag to the [`Shape`] of its kind
//! - **Materialization**: [`Client::materialize`] turns any payload into
//!   [`Entity`] values, lists, [`Page`]s or scalars, injecting parent
//!   back-references into nested records
//! - **[`PaginatedList`]**: a lazy, growable view over a remote collection
//! - **Lazy fields**: [`Entity::get_or_fetch`] loads the full record at most
//!   once when a declared field is missing
//! - **Typed views**: [`resources`] wraps entities of each kind and adds
//!   their relations
//!
//! # Example
//!
//! ```rust,ignore
//! use deezer::{Client, ClientConfig};
//!
//! let client = Client::new(&ClientConfig::default())?;
//!
//! let album = client.get_album(302127).await?;
//! let mut tracks = album.tracks()?;
//! println!("{} tracks", tracks.len().await?);
//!
//! let mut cursor = tracks.iter();
//! while let Some(track) = cursor.next().await {
//!     let track = track?;
//!     // The album field points back at `album` itself.
//!     println!("{track}");
//! }
//! ```
//!
//! # Key Types
//!
//! - [`Client`]: The entry point, holding the transport and the registry
//! - [`Entity`] and [`Field`]: A materialized record and its values
//! - [`Identity`]: An entity id (integer or string)
//! - [`PaginatedList`] and [`Iter`]: Lazy sequences over collections
//! - [`Search`] and [`SearchOrder`]: Search query construction
//! - [`ResourceError`]: Every error the engine reports

mod client;
mod dates;
mod entity;
mod errors;
mod materializer;
mod pagination;
mod path;
mod registry;
mod resource;
mod search;

pub mod resources;

// Public exports
pub use client::Client;
pub use dates::{format_date, format_datetime, parse_date, parse_datetime, DATETIME_FORMAT, DATE_FORMAT};
pub use entity::{Entity, Field, FromEntity, Identity, WeakEntity};
pub use errors::ResourceError;
pub use materializer::{MaterializeOptions, Materialized, Page};
pub use pagination::{Iter, PaginatedList};
pub use path::{build_path, entity_path, relation_path, PageRequest};
pub use registry::{Derivation, FieldParser, Kind, Shape, TypeRegistry};
pub use resource::Resource;
pub use search::{Search, SearchOrder};
