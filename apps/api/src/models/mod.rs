pub mod assessment;
pub mod course;
pub mod resume;
pub mod user;
pub mod voice;
