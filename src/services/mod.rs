pub mod user_service;
pub mod otp_service;
pub mod token_service;
