//! Resolve the peer address into a `ClientIp` request extension

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    response::Response,
    Router,
};

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(from_fn(middleware))
}

async fn middleware(mut request: Request, next: Next) -> Response {
    let client_ip = ClientIp(
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .unwrap()
            .ip(),
    );
    request.extensions_mut().insert(client_ip);
    next.run(request).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);
