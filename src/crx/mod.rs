pub mod archive;
pub mod constants;
pub mod crx3;
pub mod errors;
pub mod keys;
pub mod pack;
pub mod sign;
pub mod types;
