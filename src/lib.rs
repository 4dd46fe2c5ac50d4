pub mod catalog;
pub mod config;
pub mod consts;
pub mod drive;
pub mod error;
pub mod optimizer;
pub mod oracle;
pub mod physics;
pub mod request;
pub mod util;
