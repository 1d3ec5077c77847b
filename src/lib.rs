pub mod compare;
pub mod fetch;
pub mod http_client;
pub mod provider;
pub mod table;
