pub mod bridge;
pub mod kv;

pub use bridge::PersistenceBridge;
pub use kv::KvStore;
