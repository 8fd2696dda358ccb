pub mod aggregate;
pub mod charts;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod taxation;
