pub mod discrepancy;
pub mod profile;
pub mod question;
pub mod score;
pub mod transcript;
pub mod trend;
