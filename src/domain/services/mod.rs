pub mod clock;
pub mod email_templates;
pub mod job_processor;
pub mod job_producer;
pub mod job_queue;
pub mod job_reader;
