//! Repository implementations for the record store
//!
//! `videos` is the Postgres-backed repository, `memory` a process-local one used
//! for `memory://` connection strings and tests.

pub mod factory;
pub mod memory;
pub mod traits;
pub mod videos;

pub use factory::create_video_store;
pub use memory::MemoryVideoRepository;
pub use traits::VideoRecordStore;
pub use videos::PgVideoRepository;
