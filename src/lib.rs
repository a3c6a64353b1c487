pub mod descriptor;
pub mod error;
pub mod frame;
pub mod harness;
pub mod impls;
pub mod registry;
pub mod report;
pub mod sample;
pub mod schema;
pub mod stats;

pub use descriptor::{Descriptor, Transform};
pub use error::{BenchError, TransformError};
pub use frame::{ArrayImage, Frame, InputKind, Representation};
pub use harness::BenchConfig;
pub use registry::{Filter, Registry};
pub use report::OutputFormat;
pub use schema::StatisticsRecord;
