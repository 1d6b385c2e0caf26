pub mod config;
pub mod declaration;
pub mod detect;
pub mod fetch;
pub mod pipeline;
pub mod store;
