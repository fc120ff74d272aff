pub mod import;
pub mod notify;
