pub mod enrichment;
pub mod metadata;

pub use metadata::{DisabledGateway, MetadataGateway, TmdbGateway};
