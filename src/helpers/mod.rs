pub mod checksum;
pub mod directories;
pub mod processes;
pub mod replace;
pub mod version;
