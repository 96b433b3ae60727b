pub mod a001_directory_device;
pub mod a002_hardware_asset;
