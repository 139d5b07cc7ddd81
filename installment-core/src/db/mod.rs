pub mod factory;
pub mod file;
pub mod memory;
pub mod repository;
pub mod state;

pub use factory::{
    DEFAULT_NAMESPACE, DbConfig, FileRepositoryFactory, MemoryRepositoryFactory,
    RepositoryFactory, RepositoryRegistry,
};
pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use repository::{RepositoryError, SimulationRepository};
pub use state::{decode, encode};
