pub mod posts;
pub mod response;
pub mod tags;
pub mod users;
