pub mod instance_lock;
pub mod process_manager;
