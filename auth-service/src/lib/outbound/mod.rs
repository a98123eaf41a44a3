pub mod clients;
pub mod notifiers;
pub mod repositories;
pub mod stores;
