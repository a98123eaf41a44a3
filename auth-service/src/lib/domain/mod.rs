pub mod authority;
pub mod recovery;
pub mod registration;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
