use crate::error::Result;
use crate::models::{
    Container, Credentials, DbInstance, DnsDomain, DnsRecord, Flavor, Image, LbNode, LoadBalancer,
    ScalingGroup, Server, ServiceEndpoint, StoredObject,
};

/// Identity and service-catalog operations
///
/// Responsibilities:
/// - Validate credentials against the provider
/// - Track whether the client holds a usable session
/// - Expose the endpoint catalog of the authenticated account
pub trait IdentityApi: Send + Sync {
    /// Authenticate with the given credentials; Ok(false) means the
    /// provider rejected them (wrong password, incomplete pair)
    fn authenticate(&self, credentials: &Credentials) -> Result<bool>;

    /// Whether a previous authenticate call succeeded
    fn is_authenticated(&self) -> bool;

    /// Identity summary for the current session (username or token owner)
    fn whoami(&self) -> Option<String>;

    /// Service endpoint catalog for the authenticated account
    fn endpoints(&self) -> Result<Vec<ServiceEndpoint>>;
}

/// Compute (server) operations
pub trait ComputeApi: Send + Sync {
    fn list_servers(&self) -> Result<Vec<Server>>;

    /// Current state of one server; build watchers poll this
    fn get_server(&self, id: &str) -> Result<Server>;

    /// Start building a server; returns it in BUILD status
    fn create_server(&self, name: &str, flavor_id: &str, image_id: &str) -> Result<Server>;

    fn delete_server(&self, id: &str) -> Result<()>;

    /// Soft reboot by default; hard power-cycles the instance
    fn reboot_server(&self, id: &str, hard: bool) -> Result<()>;

    fn list_flavors(&self) -> Result<Vec<Flavor>>;

    fn list_images(&self) -> Result<Vec<Image>>;
}

/// DNS domain and record operations
pub trait DnsApi: Send + Sync {
    fn list_domains(&self) -> Result<Vec<DnsDomain>>;

    fn create_domain(&self, name: &str, email: &str, ttl: u32) -> Result<DnsDomain>;

    fn delete_domain(&self, id: &str) -> Result<()>;

    fn list_records(&self, domain_id: &str) -> Result<Vec<DnsRecord>>;

    fn add_record(
        &self,
        domain_id: &str,
        record_type: &str,
        name: &str,
        data: &str,
        ttl: u32,
    ) -> Result<DnsRecord>;

    fn delete_record(&self, domain_id: &str, record_id: &str) -> Result<()>;
}

/// Load balancer operations
pub trait LoadBalancerApi: Send + Sync {
    fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>>;

    fn get_load_balancer(&self, id: &str) -> Result<LoadBalancer>;

    fn create_load_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        vip_type: &str,
        node: LbNode,
    ) -> Result<LoadBalancer>;

    fn delete_load_balancer(&self, id: &str) -> Result<()>;

    fn add_node(&self, lb_id: &str, node: LbNode) -> Result<LoadBalancer>;
}

/// Database instance operations
pub trait DatabaseApi: Send + Sync {
    fn list_instances(&self) -> Result<Vec<DbInstance>>;

    fn create_instance(&self, name: &str, flavor_id: &str, volume_size: u32) -> Result<DbInstance>;

    fn delete_instance(&self, id: &str) -> Result<()>;

    fn create_database(&self, instance_id: &str, name: &str) -> Result<()>;

    fn list_flavors(&self) -> Result<Vec<Flavor>>;
}

/// Autoscale group operations
pub trait AutoscaleApi: Send + Sync {
    fn list_groups(&self) -> Result<Vec<ScalingGroup>>;

    fn create_group(
        &self,
        name: &str,
        min_entities: u32,
        max_entities: u32,
        cooldown: u32,
    ) -> Result<ScalingGroup>;

    fn delete_group(&self, id: &str) -> Result<()>;
}

/// Object storage operations
pub trait StorageApi: Send + Sync {
    fn list_containers(&self) -> Result<Vec<Container>>;

    fn create_container(&self, name: &str) -> Result<Container>;

    /// Only empty containers can be deleted
    fn delete_container(&self, name: &str) -> Result<()>;

    fn list_objects(&self, container: &str) -> Result<Vec<StoredObject>>;

    /// Store the local file at `src` under the object name `dest`
    fn upload_object(&self, container: &str, src: &str, dest: &str) -> Result<StoredObject>;

    fn delete_object(&self, container: &str, name: &str) -> Result<()>;
}

// --- Client bundle ---

/// Bundles the per-domain trait implementations into one client object.
///
/// The shell only ever talks to this bundle; which concrete implementation
/// sits behind each field is invisible to command handlers.
pub struct ProviderClient {
    pub identity: Box<dyn IdentityApi>,
    pub compute: Box<dyn ComputeApi>,
    pub dns: Box<dyn DnsApi>,
    pub loadbalancers: Box<dyn LoadBalancerApi>,
    pub databases: Box<dyn DatabaseApi>,
    pub autoscale: Box<dyn AutoscaleApi>,
    pub storage: Box<dyn StorageApi>,
}

impl ProviderClient {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Box<dyn IdentityApi>,
        compute: Box<dyn ComputeApi>,
        dns: Box<dyn DnsApi>,
        loadbalancers: Box<dyn LoadBalancerApi>,
        databases: Box<dyn DatabaseApi>,
        autoscale: Box<dyn AutoscaleApi>,
        storage: Box<dyn StorageApi>,
    ) -> Self {
        Self {
            identity,
            compute,
            dns,
            loadbalancers,
            databases,
            autoscale,
            storage,
        }
    }

    /// Create a client backed by the in-memory implementation. All fields
    /// share one state, so a server created through `compute` shows up in
    /// the catalog the other handles see.
    pub fn mock() -> Self {
        let cloud = crate::mock::MockCloud::new();
        Self::new(
            Box::new(cloud.clone()),
            Box::new(cloud.clone()),
            Box::new(cloud.clone()),
            Box::new(cloud.clone()),
            Box::new(cloud.clone()),
            Box::new(cloud.clone()),
            Box::new(cloud),
        )
    }
}
