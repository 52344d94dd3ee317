pub mod app_config;
pub mod reference_repo;

pub use app_config::Config;
pub use reference_repo::InMemoryReferenceRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid reference seed: {0}")]
    InvalidSeed(String),
}
