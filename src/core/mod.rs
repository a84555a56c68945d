pub mod channel;
pub mod constants;
pub mod correction;
pub mod error;
pub mod retriever;
pub mod signal;
pub mod trace;
pub mod window;
