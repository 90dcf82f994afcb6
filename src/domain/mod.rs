pub mod entities;
pub mod escalation;
pub mod ports;
pub mod value_objects;
