// Error types
pub mod error;

// Trait-based collaborator boundary (public API)
pub mod traits;

// Resource DTOs
pub mod models;

// In-memory implementation
pub mod mock;

pub use error::{Error, Result};
pub use mock::MockCloud;
pub use models::{
    Container, Credentials, DbInstance, DnsDomain, DnsRecord, Flavor, Image, LbNode, LoadBalancer,
    REGIONS, ScalingGroup, Server, ServerStatus, ServiceEndpoint, StoredObject,
};
pub use traits::{
    AutoscaleApi, ComputeApi, DatabaseApi, DnsApi, IdentityApi, LoadBalancerApi, ProviderClient,
    StorageApi,
};
