//! Vidshelf record store
//!
//! Persistent collection of `VideoRecord`s. The rest of the system only sees the
//! `VideoRecordStore` trait: list newest-first and create-once. There is no
//! update or delete.

pub mod db;

pub use db::{
    create_video_store, MemoryVideoRepository, PgVideoRepository, VideoRecordStore,
};
