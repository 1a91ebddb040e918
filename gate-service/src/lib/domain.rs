pub mod account;
pub mod flow;
pub mod session;
