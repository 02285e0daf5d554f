pub mod keys;
pub mod storage;
pub mod upload_service;
