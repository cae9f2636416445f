//! Best-effort client address for refresh token audit fields.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::state::AppState;

/// The client IP. Falls back to `0.0.0.0` when nothing usable is found.
///
/// `X-Forwarded-For` and `X-Real-IP` are client-controlled unless a proxy
/// rewrites them, so they are read only when `server.trust_proxy_headers`
/// is set. Otherwise the socket peer is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    /// Resolves the address from headers (when trusted) and the optional
    /// peer address.
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Self {
        let from_headers = if trust_proxy {
            Self::from_proxy_headers(headers)
        } else {
            None
        };

        let ip = from_headers
            .or_else(|| peer.map(|addr| addr.ip()))
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        Self(ip)
    }

    /// Resolves the address the way the extractor would for this request.
    pub fn from_parts(parts: &Parts, trust_proxy: bool) -> Self {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Self::resolve(&parts.headers, peer, trust_proxy)
    }

    fn from_proxy_headers(headers: &HeaderMap) -> Option<IpAddr> {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };

        forwarded.or_else(real_ip)
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(Self::from_parts(parts, state.server.trust_proxy_headers))
    }
}
