pub mod oss;
pub mod path;
