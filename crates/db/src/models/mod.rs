pub mod asset;
pub mod lookup;
pub mod maintenance_event;
