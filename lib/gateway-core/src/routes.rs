//! Host route tables and the route descriptors published to the gateway

use crate::Result;
use async_trait::async_trait;
use gateway_api::RouteRequest;
use serde::{Deserialize, Serialize};

/// One entry of the host's HTTP route table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRoute {
    pub method: String,
    pub path: String,
}

impl HttpRoute {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
        }
    }
}

/// Exposes the live HTTP route table of the host framework
#[async_trait]
pub trait HttpRouteTable: Send + Sync {
    async fn http_routes(&self) -> Result<Vec<HttpRoute>>;
}

/// Exposes the RPC services and method names of the host framework
#[async_trait]
pub trait RpcServiceTable: Send + Sync {
    async fn rpc_services(&self) -> Result<Vec<crate::RpcServiceInfo>>;
}

/// Originating RPC service and method of an RPC-derived route
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcOrigin {
    pub service: String,
    pub method: String,
}

/// Route announced to the gateway. Built fresh for every publication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub service_name: String,
    pub path: String,
    pub method: String,
    pub rpc: Option<RpcOrigin>,
}

impl RouteDescriptor {
    pub fn is_rpc(&self) -> bool {
        self.rpc.is_some()
    }

    /// Label used for logs and metrics
    pub fn kind(&self) -> &'static str {
        if self.is_rpc() {
            "rpc"
        } else {
            "http"
        }
    }

    pub fn to_request(&self) -> RouteRequest {
        RouteRequest {
            service_name: self.service_name.clone(),
            path: self.path.clone(),
            method: self.method.clone(),
            grpc_service: self.rpc.as_ref().map(|rpc| rpc.service.clone()),
            grpc_method: self.rpc.as_ref().map(|rpc| rpc.method.clone()),
        }
    }
}

/// In-process HTTP route table with path and method matching
#[derive(Clone, Debug, Default)]
pub struct HttpRouter {
    routes: Vec<HttpRoute>,
}

impl HttpRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route; duplicates are ignored
    pub fn route(mut self, method: &str, path: &str) -> Self {
        let route = HttpRoute::new(method, path);
        if !self.routes.contains(&route) {
            self.routes.push(route);
        }
        self
    }

    pub fn routes(&self) -> &[HttpRoute] {
        &self.routes
    }

    /// Find the first route matching a request
    pub fn find(&self, method: &str, path: &str) -> Option<&HttpRoute> {
        self.routes
            .iter()
            .find(|r| self.match_method(method, &r.method) && self.match_path(path, &r.path))
    }

    /// Match a request path against a route pattern
    pub fn match_path(&self, path: &str, pattern: &str) -> bool {
        if pattern == path {
            return true;
        }

        // A trailing slash mounts the whole subtree
        if pattern.ends_with('/') && path.starts_with(pattern) {
            return true;
        }

        // `/*` also matches the mount point itself
        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path == prefix || path.starts_with(&format!("{}/", prefix));
        }

        // Segment match with `:param` placeholders
        if pattern.contains("/:") {
            let mut pattern_segments = pattern.split('/');
            let mut path_segments = path.split('/');
            loop {
                match (pattern_segments.next(), path_segments.next()) {
                    (None, None) => return true,
                    (Some(p), Some(s)) if p.starts_with(':') && !s.is_empty() => continue,
                    (Some(p), Some(s)) if p == s => continue,
                    _ => return false,
                }
            }
        }

        false
    }

    /// Match an HTTP method against a route method (`ANY` matches all)
    pub fn match_method(&self, method: &str, route_method: &str) -> bool {
        route_method == "ANY" || route_method.eq_ignore_ascii_case(method)
    }
}

#[async_trait]
impl HttpRouteTable for HttpRouter {
    async fn http_routes(&self) -> Result<Vec<HttpRoute>> {
        Ok(self.routes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_forum_paths() {
        let router = HttpRouter::new();
        assert!(router.match_path("/posts", "/posts"));
        assert!(!router.match_path("/post", "/posts"));
        assert!(!router.match_path("/posts/42", "/posts"));
    }

    #[test]
    fn test_trailing_slash_mounts_subtree() {
        let router = HttpRouter::new();
        assert!(router.match_path("/static/forum.css", "/static/"));
        assert!(router.match_path("/static/", "/static/"));
        assert!(!router.match_path("/static", "/static/"));
    }

    #[test]
    fn test_wildcard_covers_mount_point() {
        let router = HttpRouter::new();
        assert!(router.match_path("/debug/vars", "/debug/*"));
        assert!(router.match_path("/debug", "/debug/*"));
        assert!(!router.match_path("/debugger", "/debug/*"));
    }

    #[test]
    fn test_param_path_match() {
        let router = HttpRouter::new();
        assert!(router.match_path("/posts/42", "/posts/:id"));
        assert!(router.match_path("/posts/42/comments", "/posts/:id/comments"));
        assert!(!router.match_path("/posts/", "/posts/:id"));
        assert!(!router.match_path("/posts/42/likes", "/posts/:id/comments"));
    }

    #[test]
    fn test_find_by_method() {
        let router = HttpRouter::new()
            .route("get", "/posts")
            .route("POST", "/posts")
            .route("ANY", "/debug/*");
        assert_eq!(router.find("GET", "/posts").unwrap().method, "GET");
        assert_eq!(router.find("post", "/posts").unwrap().method, "POST");
        assert!(router.find("DELETE", "/posts").is_none());
        assert!(router.find("DELETE", "/debug/vars").is_some());
    }

    #[test]
    fn test_duplicate_routes_ignored() {
        let router = HttpRouter::new().route("GET", "/posts").route("get", "/posts");
        assert_eq!(router.routes().len(), 1);
    }

    #[test]
    fn test_descriptor_request_mapping() {
        let descriptor = RouteDescriptor {
            service_name: "forum".to_string(),
            path: "/say/hello".to_string(),
            method: "POST".to_string(),
            rpc: Some(RpcOrigin {
                service: "forum.Greeter".to_string(),
                method: "SayHello".to_string(),
            }),
        };
        let request = descriptor.to_request();
        assert_eq!(descriptor.kind(), "rpc");
        assert_eq!(request.grpc_service.as_deref(), Some("forum.Greeter"));
        assert_eq!(request.grpc_method.as_deref(), Some("SayHello"));
    }
}
