pub mod asset_repo;
pub mod lifecycle_repo;
pub mod lookup_repo;
pub mod maintenance_event_repo;

pub use asset_repo::AssetRepo;
pub use lifecycle_repo::LifecycleRepo;
pub use lookup_repo::LookupRepo;
pub use maintenance_event_repo::MaintenanceEventRepo;
