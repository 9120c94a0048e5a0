// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod routes;
