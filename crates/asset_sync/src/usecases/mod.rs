pub mod u501_sync_devices;
