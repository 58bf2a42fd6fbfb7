pub mod tools;

pub use tools::JyotishServer;
