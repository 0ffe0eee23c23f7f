pub mod cors;
pub mod tenant;

pub use cors::create_cors;
pub use tenant::{CurrentTenant, TenantMiddleware, client_ip, current_tenant};
