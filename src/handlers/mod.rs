pub mod health;
pub mod inquiries;
