/// Derives the JSON Schema of CAP Operator chart values.
///
/// The serde model in [`values`] is reflected through schemars into a
/// draft document ([`reflect`]), corrected by a per-flavor rule list
/// ([`patch`], [`flavor`]) and written to the flavor's destinations
/// ([`pipeline`]).

pub mod config;
pub mod flavor;
pub mod output;
pub mod patch;
pub mod pipeline;
pub mod reflect;
pub mod schema;
pub mod values;

pub use config::{Config, ConfigError};
pub use flavor::Flavor;
pub use patch::{Edit, Keyword, PatchError, Rule};
pub use reflect::ReflectError;
pub use schema::{Document, InstanceType, Schema};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Reflect(#[from] ReflectError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize schema")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
