//! Route discovery: host route tables mapped to gateway route descriptors

use crate::naming::rpc_method_to_http_path;
use crate::routes::{HttpRouteTable, RouteDescriptor, RpcOrigin, RpcServiceTable};
use crate::Result;
use tracing::debug;

/// Method every RPC-derived route is published with
pub const RPC_HTTP_METHOD: &str = "POST";

/// Map each HTTP route 1:1 to a descriptor
pub async fn discover_http_routes(
    service_name: &str,
    table: &dyn HttpRouteTable,
) -> Result<Vec<RouteDescriptor>> {
    let routes = table.http_routes().await?;
    debug!("Discovered {} HTTP routes for {}", routes.len(), service_name);

    Ok(routes
        .into_iter()
        .map(|route| RouteDescriptor {
            service_name: service_name.to_string(),
            path: route.path,
            method: route.method,
            rpc: None,
        })
        .collect())
}

/// Map every method of every RPC service to a `POST /<mangled/name>` descriptor
pub async fn discover_rpc_routes(
    service_name: &str,
    table: &dyn RpcServiceTable,
) -> Result<Vec<RouteDescriptor>> {
    let services = table.rpc_services().await?;
    let mut descriptors = Vec::new();

    for service in services {
        for method in service.methods {
            descriptors.push(RouteDescriptor {
                service_name: service_name.to_string(),
                path: format!("/{}", rpc_method_to_http_path(&method)),
                method: RPC_HTTP_METHOD.to_string(),
                rpc: Some(RpcOrigin {
                    service: service.name.clone(),
                    method,
                }),
            });
        }
    }

    debug!("Discovered {} RPC routes for {}", descriptors.len(), service_name);
    Ok(descriptors)
}
