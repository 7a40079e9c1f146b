pub mod attendance;
pub mod audit;
pub mod enrollment;
pub mod fees;
pub mod grading;
pub mod notices;
pub mod security;
pub mod sessions;
