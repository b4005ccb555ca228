pub mod ssh;
pub mod tcp;
