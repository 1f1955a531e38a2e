pub mod console;
pub mod geocode;
pub mod map;
