pub mod inquiry_service;

pub use inquiry_service::InquiryService;
