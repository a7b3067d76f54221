use serde::{Deserialize, Serialize};

/// Body of a route publication (`POST /gateway/api`)
///
/// HTTP routes leave the gRPC fields empty; RPC-derived routes carry the
/// originating service and method so the gateway can transcode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Name of the registered service that owns this route
    pub service_name: String,

    /// HTTP path template (e.g., "/posts/:id" or "/say/hello")
    pub path: String,

    /// HTTP method (GET, POST, etc)
    pub method: String,

    /// Fully-qualified gRPC service name (for RPC routes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_service: Option<String>,

    /// Unmangled gRPC method name (for RPC routes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_route_omits_grpc_fields() {
        let route = RouteRequest {
            service_name: "forum".to_string(),
            path: "/posts".to_string(),
            method: "GET".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&route).unwrap(),
            json!({"service_name": "forum", "path": "/posts", "method": "GET"})
        );
    }

    #[test]
    fn test_rpc_route_body() {
        let route = RouteRequest {
            service_name: "forum".to_string(),
            path: "/say/hello".to_string(),
            method: "POST".to_string(),
            grpc_service: Some("forum.Greeter".to_string()),
            grpc_method: Some("SayHello".to_string()),
        };
        let body = serde_json::to_value(&route).unwrap();
        assert_eq!(body["grpc_service"], "forum.Greeter");
        assert_eq!(body["grpc_method"], "SayHello");
    }
}
