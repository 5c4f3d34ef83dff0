pub mod mongo;
pub mod store;
