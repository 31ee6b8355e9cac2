pub mod site;
pub mod vocabulary;

pub use site::SiteMetadata;
pub use vocabulary::{StorageType, VariableDefinition, Vocabulary};
