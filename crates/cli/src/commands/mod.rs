pub mod ask;
pub mod onboard;
pub mod route;
pub mod serve;
pub mod status;
