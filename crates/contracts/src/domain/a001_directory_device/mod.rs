pub mod aggregate;

pub use aggregate::{DirectoryDevice, ManagedDevicesResponse};
