pub mod authority;
pub mod provisioning;

pub use authority::PostgresAuthorityRepository;
pub use provisioning::PostgresProvisioningLedger;
