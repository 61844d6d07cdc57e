pub mod cli;
pub mod model;
pub mod retriever;
pub mod service;
