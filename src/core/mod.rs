pub mod distributor;
pub mod services;
