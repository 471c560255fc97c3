pub mod memory_job_store;
pub mod sqlite_job_store;
pub mod postgres_job_store;
