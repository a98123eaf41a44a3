pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::authority;
pub use domain::recovery;
pub use domain::registration;
pub use domain::session;
pub use outbound::repositories;
