pub mod access;
pub mod jwt;
pub mod password;
