pub mod worker_count;
