pub mod clinic_store;

pub use clinic_store::{ClinicStoreClient, StoreError};
