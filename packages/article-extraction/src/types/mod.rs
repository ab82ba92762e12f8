pub mod classification;
pub mod config;
pub mod record;
pub mod reply;
pub mod vocabulary;
