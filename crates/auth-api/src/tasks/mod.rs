//! 백그라운드 태스크.

pub mod sweeper;

pub use sweeper::start_expired_token_sweeper;
