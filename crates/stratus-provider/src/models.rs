use serde::Serialize;

/// Regions the provider accepts for authentication and endpoint lookup.
pub const REGIONS: &[&str] = &["DFW", "ORD", "LON", "SYD"];

/// Authentication tuple assembled from CLI flags and/or the config file.
/// Every field is optional at this level; empty string means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
    pub token: String,
    pub tenant_id: String,
    pub region: String,
    pub identity_type: String,
}

impl Credentials {
    /// Username/api-key and token/tenant-id are the two accepted pairs.
    pub fn is_complete(&self) -> bool {
        (!self.username.is_empty() && !self.api_key.is_empty())
            || (!self.token.is_empty() && !self.tenant_id.is_empty())
    }
}

/// One entry of the provider's service catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoint {
    pub service: String,
    pub region: String,
    pub url: String,
}

/// Server lifecycle status as reported by the provider.
///
/// `Active`, `Error` and `Unknown` are terminal for provisioning: a build
/// watcher stops polling once one of them is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerStatus {
    Build,
    Active,
    Error,
    Unknown,
}

impl ServerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ServerStatus::Active | ServerStatus::Error | ServerStatus::Unknown
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Build => "BUILD",
            ServerStatus::Active => "ACTIVE",
            ServerStatus::Error => "ERROR",
            ServerStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub status: ServerStatus,
    pub flavor_id: String,
    pub image_id: String,
    /// Build progress percentage, 0-100.
    pub progress: u8,
    pub public_ip: String,
    pub private_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    pub ram_mb: u32,
    pub vcpus: u32,
    pub disk_gb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsDomain {
    pub id: String,
    pub name: String,
    pub email: String,
    pub ttl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    pub id: String,
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub ttl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LbNode {
    pub address: String,
    pub port: u16,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub port: u16,
    pub protocol: String,
    pub vip_type: String,
    pub status: String,
    pub nodes: Vec<LbNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbInstance {
    pub id: String,
    pub name: String,
    pub flavor_id: String,
    pub volume_size: u32,
    pub status: String,
    pub databases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalingGroup {
    pub id: String,
    pub name: String,
    pub min_entities: u32,
    pub max_entities: u32,
    pub cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub name: String,
    pub object_count: u64,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub name: String,
    pub container: String,
    pub bytes: u64,
}
