pub mod case_dto;
