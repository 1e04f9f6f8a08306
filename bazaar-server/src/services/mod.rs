//! Business services

pub mod attribute_service;

pub use attribute_service::AttributeService;
