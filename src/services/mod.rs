pub mod chart_service;
pub mod convert_service;
pub mod rate_service;
