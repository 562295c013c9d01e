pub mod authenticate;
pub mod policy;
