pub mod challenge;
pub mod company;
pub mod evaluation;
pub mod response;
pub mod user;
