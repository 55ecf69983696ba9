pub mod case_record;
pub mod job;
