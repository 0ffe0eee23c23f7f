pub mod draw_engine;
pub mod lottery_service;
pub mod session_store;
pub mod tenant_session;

pub use draw_engine::*;
pub use lottery_service::*;
pub use session_store::*;
pub use tenant_session::*;
