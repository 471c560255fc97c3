use std::sync::Arc;
use crate::background::Scheduler;
use crate::config::Config;
use crate::domain::services::{
    job_processor::JobProcessor, job_producer::JobProducer, job_reader::JobReader,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub producer: Arc<JobProducer>,
    pub reader: Arc<JobReader>,
    pub processor: Arc<JobProcessor>,
    pub scheduler: Arc<Scheduler>,
}
