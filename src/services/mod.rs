pub mod case_service;
pub mod job_service;
pub mod prompt_service;
pub mod replicate_service;
