//! # Spindle SDK
//!
//! Client library for the Spindle LP catalog API.
//!
//! All requests go through one pipeline that attaches the stored bearer
//! token, detects authorization failures, refreshes the token pair with
//! single-flight coordination across concurrent requests, and replays the
//! failed request exactly once. An unrecoverable refresh clears both
//! stored tokens and flips the observable session state to signed-out.
//!
//! ```rust,no_run
//! use spindle_sdk::{LpClient, PageQuery};
//!
//! # async fn example() -> spindle_sdk::Result<()> {
//! let client = LpClient::builder()
//!     .base_url("https://api.spindle.example")
//!     .build()?;
//!
//! let page = client.list_lps(&PageQuery::default()).await?;
//! for lp in page.data {
//!     println!("{}", lp.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{
    FileTokenStore, MemoryTokenStore, RefreshError, SessionState, StorageError, TokenPair,
    TokenStorage, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
pub use client::{LpClient, LpClientBuilder};
pub use error::{ApiError, Result};
pub use types::{
    AuthTokens, Envelope, Like, Lp, LpPage, Order, PageQuery, SigninRequest, SignupRequest, Tag,
};
