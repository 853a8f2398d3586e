//! Network access and tile provider rules.
//!
//! [`HttpClient`] is the single seam through which the crate reaches the
//! network; [`TileSource`] knows how tile URLs are built and which hosts
//! serve tiles.

mod http;
mod tiles;
mod types;

pub use http::{HttpClient, OfflineClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, USER_AGENT};
pub use tiles::{
    TileSource, DEFAULT_DARK_STYLE, DEFAULT_LIGHT_STYLE, DEFAULT_TILE_HOSTS, DEFAULT_URL_TEMPLATE,
};
pub use types::{HttpResponse, NetworkError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
