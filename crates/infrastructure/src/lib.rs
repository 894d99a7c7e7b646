//! compactdenial Infrastructure Layer
pub mod dns;
