//! Zendesk Guide API client for help-center content.
//!
//! This module provides read-only access to the help-center endpoints that a
//! backup needs: articles (plain or with sideloaded sections and categories),
//! attachments, translations, locales, user segments and permission groups.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for API operations
//! - [`types`] - Typed records decoded from API envelopes
//! - [`client`] - Authenticated page fetching and list retrieval
//!
//! # Example
//!
//! ```ignore
//! use guidepost::zendesk::{Credentials, ZendeskClient, DEFAULT_TIMEOUT};
//!
//! let credentials = Credentials::new("agent@acme.com", "api-token")?;
//! let client = ZendeskClient::new("acme", credentials, DEFAULT_TIMEOUT)?;
//! let segments = client.retrieve_all_user_segments().await?;
//! ```

mod client;
mod error;
mod types;

pub use error::{ZendeskError, short_error_message};

pub use types::{
    Article, Attachment, Category, Locale, Page, PermissionGroup, Resource, SearchResult, Section,
    SideloadPage, Translation, UserSegment,
};

pub use client::{Credentials, DEFAULT_TIMEOUT, PER_PAGE, SEARCH_PER_PAGE, ZendeskClient};
