//! # Deezer API Rust Client
//!
//! A Rust client for the Deezer catalog API. Every answer is turned into
//! live objects that know where they came from: nested records point back at
//! their parent, collections are read lazily page by page, and a field the
//! API left out is loaded on first access.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - An async [`Client`] over a pluggable [`Transport`](clients::Transport)
//! - Entity materialization with parent back-references ([`rest::Entity`])
//! - Lazy paginated sequences ([`rest::PaginatedList`])
//! - On-demand field loading ([`rest::Entity::get_or_fetch`])
//! - Typed views with relation helpers ([`rest::resources`])
//! - A blocking facade ([`blocking::Client`])
//!
//! ## Quick Start
//!
//! ```rust
//! use deezer::{AccessToken, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .access_token(AccessToken::new("your-access-token").unwrap())
//!     .header("Accept-Language", "fr")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.deezer.com");
//! ```
//!
//! ## Reading the Catalog
//!
//! ```rust,ignore
//! use deezer::{Client, ClientConfig};
//!
//! let client = Client::new(&ClientConfig::default())?;
//!
//! let album = client.get_album(302127).await?;
//! let mut tracks = album.tracks()?;
//!
//! // One request for the first page; the total comes with it.
//! let first = tracks.get(0).await?;
//! println!("{first} of {} tracks", tracks.len().await?);
//!
//! // `bpm` is not part of the embedded record: this loads the full track once.
//! let bpm = first.get_or_fetch("bpm").await?;
//! ```
//!
//! ## Searching
//!
//! ```rust,ignore
//! use deezer::rest::{Search, SearchOrder};
//!
//! let search = Search::new("")
//!     .artist("Daft Punk")
//!     .ordering(SearchOrder::RatingDesc);
//! let mut albums = client.search_albums(&search);
//! let top_five = albums.slice(0, Some(5)).await?;
//! ```
//!
//! ## Blocking Usage
//!
//! ```rust,ignore
//! use deezer::blocking::Client;
//!
//! let client = Client::new(&deezer::ClientConfig::default())?;
//! let artist = client.get_artist(27)?;
//! for track in client.sequence(artist.top()?).iter().take(10) {
//!     println!("{}", track?);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: Clients and entities are `Send + Sync`
//! - **No hidden I/O**: Requests happen only when a sequence grows or a
//!   missing field is read
//! - **No retries**: Transport errors are classified, never retried

pub mod blocking;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, AppId, AppSecret, BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, QueryParams, Transport,
};

// Re-export the engine entry points
pub use rest::{Client, Entity, Field, Identity, Kind, PaginatedList, ResourceError};
