use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    Container, Credentials, DbInstance, DnsDomain, DnsRecord, Flavor, Image, LbNode, LoadBalancer,
    REGIONS, ScalingGroup, Server, ServerStatus, ServiceEndpoint, StoredObject,
};
use crate::traits::{
    AutoscaleApi, ComputeApi, DatabaseApi, DnsApi, IdentityApi, LoadBalancerApi, StorageApi,
};

const SERVICES: &[&str] = &[
    "compute",
    "dns",
    "loadbalancers",
    "databases",
    "autoscale",
    "object-store",
];

const RECORD_TYPES: &[&str] = &["A", "AAAA", "CNAME", "MX", "NS", "TXT", "SRV", "PTR"];

const LB_PROTOCOLS: &[&str] = &["HTTP", "HTTPS", "TCP"];

/// In-memory provider used offline and in tests.
///
/// One shared state backs every API handle cloned from the same instance.
/// Building servers advance deterministically: each `get_server` call on a
/// BUILD server adds 25 progress and flips it to ACTIVE at 100, so a fresh
/// server is ACTIVE after four polls.
#[derive(Clone)]
pub struct MockCloud {
    state: Arc<Mutex<State>>,
}

struct State {
    authenticated: bool,
    identity: Option<String>,
    servers: Vec<Server>,
    flavors: Vec<Flavor>,
    images: Vec<Image>,
    domains: Vec<DnsDomain>,
    records: HashMap<String, Vec<DnsRecord>>,
    loadbalancers: Vec<LoadBalancer>,
    instances: Vec<DbInstance>,
    groups: Vec<ScalingGroup>,
    containers: Vec<Container>,
    objects: HashMap<String, Vec<StoredObject>>,
    next_host: u8,
}

impl State {
    fn seeded() -> Self {
        let mut records = HashMap::new();
        records.insert(
            "d-2001".to_string(),
            vec![
                DnsRecord {
                    id: "r-2101".to_string(),
                    record_type: "A".to_string(),
                    name: "www.example.com".to_string(),
                    data: "203.0.113.10".to_string(),
                    ttl: 3600,
                },
                DnsRecord {
                    id: "r-2102".to_string(),
                    record_type: "MX".to_string(),
                    name: "example.com".to_string(),
                    data: "mail.example.com".to_string(),
                    ttl: 3600,
                },
            ],
        );
        let mut objects = HashMap::new();
        objects.insert(
            "backups".to_string(),
            vec![StoredObject {
                name: "weekly.tar.gz".to_string(),
                container: "backups".to_string(),
                bytes: 2048,
            }],
        );
        Self {
            authenticated: false,
            identity: None,
            servers: vec![Server {
                id: "s-1001".to_string(),
                name: "web01".to_string(),
                status: ServerStatus::Active,
                flavor_id: "2".to_string(),
                image_id: "ubuntu-2204".to_string(),
                progress: 100,
                public_ip: "203.0.113.2".to_string(),
                private_ip: "10.0.0.2".to_string(),
            }],
            flavors: vec![
                Flavor {
                    id: "2".to_string(),
                    name: "512MB Standard".to_string(),
                    ram_mb: 512,
                    vcpus: 1,
                    disk_gb: 20,
                },
                Flavor {
                    id: "3".to_string(),
                    name: "1GB Standard".to_string(),
                    ram_mb: 1024,
                    vcpus: 1,
                    disk_gb: 40,
                },
                Flavor {
                    id: "4".to_string(),
                    name: "2GB Standard".to_string(),
                    ram_mb: 2048,
                    vcpus: 2,
                    disk_gb: 80,
                },
            ],
            images: vec![
                Image {
                    id: "ubuntu-2204".to_string(),
                    name: "Ubuntu 22.04 LTS".to_string(),
                },
                Image {
                    id: "debian-12".to_string(),
                    name: "Debian 12".to_string(),
                },
                Image {
                    id: "centos-9".to_string(),
                    name: "CentOS Stream 9".to_string(),
                },
            ],
            domains: vec![DnsDomain {
                id: "d-2001".to_string(),
                name: "example.com".to_string(),
                email: "admin@example.com".to_string(),
                ttl: 3600,
            }],
            records,
            loadbalancers: vec![LoadBalancer {
                id: "lb-3001".to_string(),
                name: "web-lb".to_string(),
                port: 80,
                protocol: "HTTP".to_string(),
                vip_type: "PUBLIC".to_string(),
                status: "ACTIVE".to_string(),
                nodes: vec![LbNode {
                    address: "10.0.0.10".to_string(),
                    port: 8080,
                    condition: "ENABLED".to_string(),
                }],
            }],
            instances: vec![DbInstance {
                id: "db-4001".to_string(),
                name: "orders-db".to_string(),
                flavor_id: "2".to_string(),
                volume_size: 10,
                status: "ACTIVE".to_string(),
                databases: vec!["orders".to_string()],
            }],
            groups: vec![ScalingGroup {
                id: "as-5001".to_string(),
                name: "web-workers".to_string(),
                min_entities: 1,
                max_entities: 8,
                cooldown: 60,
            }],
            containers: vec![Container {
                name: "backups".to_string(),
                object_count: 1,
                bytes: 2048,
            }],
            objects,
            next_host: 3,
        }
    }
}

impl MockCloud {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::seeded())),
        }
    }

    fn ensure_auth(state: &State) -> Result<()> {
        if state.authenticated {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }
}

impl Default for MockCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityApi for MockCloud {
    fn authenticate(&self, credentials: &Credentials) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if !credentials.region.is_empty() && !REGIONS.contains(&credentials.region.as_str()) {
            return Err(Error::InvalidRequest(format!(
                "unknown region '{}'",
                credentials.region
            )));
        }
        if !credentials.is_complete() {
            return Ok(false);
        }
        state.authenticated = true;
        state.identity = Some(if credentials.username.is_empty() {
            format!("tenant {}", credentials.tenant_id)
        } else {
            credentials.username.clone()
        });
        Ok(true)
    }

    fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().authenticated
    }

    fn whoami(&self) -> Option<String> {
        self.state.lock().unwrap().identity.clone()
    }

    fn endpoints(&self) -> Result<Vec<ServiceEndpoint>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let mut catalog = Vec::new();
        for service in SERVICES {
            for region in REGIONS {
                catalog.push(ServiceEndpoint {
                    service: service.to_string(),
                    region: region.to_string(),
                    url: format!(
                        "https://{}.{}.mockcloud.test/v2",
                        service,
                        region.to_lowercase()
                    ),
                });
            }
        }
        Ok(catalog)
    }
}

impl ComputeApi for MockCloud {
    fn list_servers(&self) -> Result<Vec<Server>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.servers.clone())
    }

    fn get_server(&self, id: &str) -> Result<Server> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let next_host = state.next_host;
        let server = state
            .servers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound {
                kind: "server",
                id: id.to_string(),
            })?;
        if server.status == ServerStatus::Build {
            server.progress = server.progress.saturating_add(25);
            if server.progress >= 100 {
                server.progress = 100;
                server.status = ServerStatus::Active;
                server.public_ip = format!("203.0.113.{}", next_host);
            }
        }
        Ok(server.clone())
    }

    fn create_server(&self, name: &str, flavor_id: &str, image_id: &str) -> Result<Server> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if state.servers.iter().any(|s| s.name == name) {
            return Err(Error::Conflict(format!("server name '{}' is taken", name)));
        }
        if !state.flavors.iter().any(|f| f.id == flavor_id) {
            return Err(Error::NotFound {
                kind: "flavor",
                id: flavor_id.to_string(),
            });
        }
        if !state.images.iter().any(|i| i.id == image_id) {
            return Err(Error::NotFound {
                kind: "image",
                id: image_id.to_string(),
            });
        }
        let host = state.next_host;
        state.next_host = state.next_host.wrapping_add(1);
        let server = Server {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: ServerStatus::Build,
            flavor_id: flavor_id.to_string(),
            image_id: image_id.to_string(),
            progress: 0,
            public_ip: String::new(),
            private_ip: format!("10.0.0.{}", host),
        };
        state.servers.push(server.clone());
        Ok(server)
    }

    fn delete_server(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let before = state.servers.len();
        state.servers.retain(|s| s.id != id);
        if state.servers.len() == before {
            return Err(Error::NotFound {
                kind: "server",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn reboot_server(&self, id: &str, _hard: bool) -> Result<()> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if !state.servers.iter().any(|s| s.id == id) {
            return Err(Error::NotFound {
                kind: "server",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn list_flavors(&self) -> Result<Vec<Flavor>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.flavors.clone())
    }

    fn list_images(&self) -> Result<Vec<Image>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.images.clone())
    }
}

impl DnsApi for MockCloud {
    fn list_domains(&self) -> Result<Vec<DnsDomain>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.domains.clone())
    }

    fn create_domain(&self, name: &str, email: &str, ttl: u32) -> Result<DnsDomain> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if state.domains.iter().any(|d| d.name == name) {
            return Err(Error::Conflict(format!("domain '{}' already exists", name)));
        }
        let domain = DnsDomain {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            ttl,
        };
        state.domains.push(domain.clone());
        state.records.insert(domain.id.clone(), Vec::new());
        Ok(domain)
    }

    fn delete_domain(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let before = state.domains.len();
        state.domains.retain(|d| d.id != id);
        if state.domains.len() == before {
            return Err(Error::NotFound {
                kind: "domain",
                id: id.to_string(),
            });
        }
        state.records.remove(id);
        Ok(())
    }

    fn list_records(&self, domain_id: &str) -> Result<Vec<DnsRecord>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        state
            .records
            .get(domain_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "domain",
                id: domain_id.to_string(),
            })
    }

    fn add_record(
        &self,
        domain_id: &str,
        record_type: &str,
        name: &str,
        data: &str,
        ttl: u32,
    ) -> Result<DnsRecord> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let rtype = record_type.to_uppercase();
        if !RECORD_TYPES.contains(&rtype.as_str()) {
            return Err(Error::InvalidRequest(format!(
                "unsupported record type '{}'",
                record_type
            )));
        }
        let record = DnsRecord {
            id: Uuid::new_v4().to_string(),
            record_type: rtype,
            name: name.to_string(),
            data: data.to_string(),
            ttl,
        };
        let records = state
            .records
            .get_mut(domain_id)
            .ok_or_else(|| Error::NotFound {
                kind: "domain",
                id: domain_id.to_string(),
            })?;
        records.push(record.clone());
        Ok(record)
    }

    fn delete_record(&self, domain_id: &str, record_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let records = state
            .records
            .get_mut(domain_id)
            .ok_or_else(|| Error::NotFound {
                kind: "domain",
                id: domain_id.to_string(),
            })?;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::NotFound {
                kind: "record",
                id: record_id.to_string(),
            });
        }
        Ok(())
    }
}

impl LoadBalancerApi for MockCloud {
    fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.loadbalancers.clone())
    }

    fn get_load_balancer(&self, id: &str) -> Result<LoadBalancer> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        state
            .loadbalancers
            .iter()
            .find(|lb| lb.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "load balancer",
                id: id.to_string(),
            })
    }

    fn create_load_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        vip_type: &str,
        node: LbNode,
    ) -> Result<LoadBalancer> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let protocol = protocol.to_uppercase();
        if !LB_PROTOCOLS.contains(&protocol.as_str()) {
            return Err(Error::InvalidRequest(format!(
                "unsupported protocol '{}'",
                protocol
            )));
        }
        let vip_type = vip_type.to_uppercase();
        if vip_type != "PUBLIC" && vip_type != "SERVICENET" {
            return Err(Error::InvalidRequest(format!(
                "virtual ip type must be PUBLIC or SERVICENET, got '{}'",
                vip_type
            )));
        }
        let lb = LoadBalancer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            port,
            protocol,
            vip_type,
            status: "ACTIVE".to_string(),
            nodes: vec![node],
        };
        state.loadbalancers.push(lb.clone());
        Ok(lb)
    }

    fn delete_load_balancer(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let before = state.loadbalancers.len();
        state.loadbalancers.retain(|lb| lb.id != id);
        if state.loadbalancers.len() == before {
            return Err(Error::NotFound {
                kind: "load balancer",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn add_node(&self, lb_id: &str, node: LbNode) -> Result<LoadBalancer> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let lb = state
            .loadbalancers
            .iter_mut()
            .find(|lb| lb.id == lb_id)
            .ok_or_else(|| Error::NotFound {
                kind: "load balancer",
                id: lb_id.to_string(),
            })?;
        lb.nodes.push(node);
        Ok(lb.clone())
    }
}

impl DatabaseApi for MockCloud {
    fn list_instances(&self) -> Result<Vec<DbInstance>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.instances.clone())
    }

    fn create_instance(&self, name: &str, flavor_id: &str, volume_size: u32) -> Result<DbInstance> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if !state.flavors.iter().any(|f| f.id == flavor_id) {
            return Err(Error::NotFound {
                kind: "flavor",
                id: flavor_id.to_string(),
            });
        }
        let instance = DbInstance {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            flavor_id: flavor_id.to_string(),
            volume_size,
            status: "ACTIVE".to_string(),
            databases: Vec::new(),
        };
        state.instances.push(instance.clone());
        Ok(instance)
    }

    fn delete_instance(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let before = state.instances.len();
        state.instances.retain(|i| i.id != id);
        if state.instances.len() == before {
            return Err(Error::NotFound {
                kind: "database instance",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn create_database(&self, instance_id: &str, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let instance = state
            .instances
            .iter_mut()
            .find(|i| i.id == instance_id)
            .ok_or_else(|| Error::NotFound {
                kind: "database instance",
                id: instance_id.to_string(),
            })?;
        if instance.databases.iter().any(|d| d == name) {
            return Err(Error::Conflict(format!(
                "database '{}' already exists on instance '{}'",
                name, instance_id
            )));
        }
        instance.databases.push(name.to_string());
        Ok(())
    }

    fn list_flavors(&self) -> Result<Vec<Flavor>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.flavors.clone())
    }
}

impl AutoscaleApi for MockCloud {
    fn list_groups(&self) -> Result<Vec<ScalingGroup>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.groups.clone())
    }

    fn create_group(
        &self,
        name: &str,
        min_entities: u32,
        max_entities: u32,
        cooldown: u32,
    ) -> Result<ScalingGroup> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if min_entities > max_entities {
            return Err(Error::InvalidRequest(format!(
                "min_entities {} exceeds max_entities {}",
                min_entities, max_entities
            )));
        }
        let group = ScalingGroup {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            min_entities,
            max_entities,
            cooldown,
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    fn delete_group(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let before = state.groups.len();
        state.groups.retain(|g| g.id != id);
        if state.groups.len() == before {
            return Err(Error::NotFound {
                kind: "scaling group",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

impl StorageApi for MockCloud {
    fn list_containers(&self) -> Result<Vec<Container>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        Ok(state.containers.clone())
    }

    fn create_container(&self, name: &str) -> Result<Container> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if state.containers.iter().any(|c| c.name == name) {
            return Err(Error::Conflict(format!(
                "container '{}' already exists",
                name
            )));
        }
        let container = Container {
            name: name.to_string(),
            object_count: 0,
            bytes: 0,
        };
        state.containers.push(container.clone());
        state.objects.insert(name.to_string(), Vec::new());
        Ok(container)
    }

    fn delete_container(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        if !state.containers.iter().any(|c| c.name == name) {
            return Err(Error::NotFound {
                kind: "container",
                id: name.to_string(),
            });
        }
        if state.objects.get(name).is_some_and(|o| !o.is_empty()) {
            return Err(Error::Conflict(format!("container '{}' is not empty", name)));
        }
        state.containers.retain(|c| c.name != name);
        state.objects.remove(name);
        Ok(())
    }

    fn list_objects(&self, container: &str) -> Result<Vec<StoredObject>> {
        let state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        state
            .objects
            .get(container)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "container",
                id: container.to_string(),
            })
    }

    fn upload_object(&self, container: &str, src: &str, dest: &str) -> Result<StoredObject> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let bytes = std::fs::metadata(src)?.len();
        let object = StoredObject {
            name: dest.to_string(),
            container: container.to_string(),
            bytes,
        };
        let objects = state
            .objects
            .get_mut(container)
            .ok_or_else(|| Error::NotFound {
                kind: "container",
                id: container.to_string(),
            })?;
        // re-uploading an existing object name replaces it
        objects.retain(|o| o.name != dest);
        objects.push(object.clone());
        let object_count = objects.len() as u64;
        let total_bytes = objects.iter().map(|o| o.bytes).sum();
        if let Some(entry) = state.containers.iter_mut().find(|c| c.name == container) {
            entry.object_count = object_count;
            entry.bytes = total_bytes;
        }
        Ok(object)
    }

    fn delete_object(&self, container: &str, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_auth(&state)?;
        let objects = state
            .objects
            .get_mut(container)
            .ok_or_else(|| Error::NotFound {
                kind: "container",
                id: container.to_string(),
            })?;
        let before = objects.len();
        objects.retain(|o| o.name != name);
        if objects.len() == before {
            return Err(Error::NotFound {
                kind: "object",
                id: name.to_string(),
            });
        }
        let object_count = objects.len() as u64;
        let total_bytes = objects.iter().map(|o| o.bytes).sum();
        if let Some(entry) = state.containers.iter_mut().find(|c| c.name == container) {
            entry.object_count = object_count;
            entry.bytes = total_bytes;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authed() -> MockCloud {
        let cloud = MockCloud::new();
        let creds = Credentials {
            username: "ops".to_string(),
            api_key: "k3y".to_string(),
            region: "LON".to_string(),
            identity_type: "keystone".to_string(),
            ..Default::default()
        };
        assert!(cloud.authenticate(&creds).unwrap());
        cloud
    }

    #[test]
    fn test_operations_require_authentication() {
        let cloud = MockCloud::new();
        assert!(matches!(
            cloud.list_servers(),
            Err(Error::NotAuthenticated)
        ));
        assert!(matches!(cloud.endpoints(), Err(Error::NotAuthenticated)));
    }

    #[test]
    fn test_authenticate_rejects_incomplete_credentials() {
        let cloud = MockCloud::new();
        let creds = Credentials {
            username: "ops".to_string(),
            ..Default::default()
        };
        assert!(!cloud.authenticate(&creds).unwrap());
        assert!(!cloud.is_authenticated());
    }

    #[test]
    fn test_authenticate_rejects_unknown_region() {
        let cloud = MockCloud::new();
        let creds = Credentials {
            username: "ops".to_string(),
            api_key: "k3y".to_string(),
            region: "MARS".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            cloud.authenticate(&creds),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_token_pair_authenticates() {
        let cloud = MockCloud::new();
        let creds = Credentials {
            token: "t0k3n".to_string(),
            tenant_id: "900001".to_string(),
            ..Default::default()
        };
        assert!(cloud.authenticate(&creds).unwrap());
        assert_eq!(cloud.whoami().unwrap(), "tenant 900001");
    }

    #[test]
    fn test_server_build_reaches_active_in_four_polls() {
        let cloud = authed();
        let server = cloud.create_server("app01", "2", "debian-12").unwrap();
        assert_eq!(server.status, ServerStatus::Build);
        assert_eq!(server.progress, 0);

        let mut statuses = Vec::new();
        for _ in 0..4 {
            let polled = cloud.get_server(&server.id).unwrap();
            statuses.push((polled.progress, polled.status));
        }
        assert_eq!(statuses[0], (25, ServerStatus::Build));
        assert_eq!(statuses[3], (100, ServerStatus::Active));

        let done = cloud.get_server(&server.id).unwrap();
        assert_eq!(done.status, ServerStatus::Active);
        assert!(!done.public_ip.is_empty());
    }

    #[test]
    fn test_create_server_validates_flavor_and_image() {
        let cloud = authed();
        assert!(matches!(
            cloud.create_server("x", "99", "debian-12"),
            Err(Error::NotFound { kind: "flavor", .. })
        ));
        assert!(matches!(
            cloud.create_server("x", "2", "win95"),
            Err(Error::NotFound { kind: "image", .. })
        ));
    }

    #[test]
    fn test_create_server_rejects_taken_name() {
        let cloud = authed();
        assert!(matches!(
            cloud.create_server("web01", "2", "debian-12"),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_delete_server_unknown_id() {
        let cloud = authed();
        assert!(matches!(
            cloud.delete_server("nope"),
            Err(Error::NotFound { kind: "server", .. })
        ));
    }

    #[test]
    fn test_dns_record_type_validated() {
        let cloud = authed();
        let err = cloud
            .add_record("d-2001", "BOGUS", "x.example.com", "1.2.3.4", 300)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        let rec = cloud
            .add_record("d-2001", "txt", "x.example.com", "v=spf1", 300)
            .unwrap();
        assert_eq!(rec.record_type, "TXT");
    }

    #[test]
    fn test_domain_name_conflict() {
        let cloud = authed();
        assert!(matches!(
            cloud.create_domain("example.com", "a@b.c", 300),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_loadbalancer_protocol_validated() {
        let cloud = authed();
        let node = LbNode {
            address: "10.0.0.20".to_string(),
            port: 8080,
            condition: "ENABLED".to_string(),
        };
        assert!(matches!(
            cloud.create_load_balancer("lb", 80, "GOPHER", "PUBLIC", node),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_scaling_group_bounds_validated() {
        let cloud = authed();
        assert!(matches!(
            cloud.create_group("g", 5, 2, 60),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_container_conflict_and_non_empty_delete() {
        let cloud = authed();
        assert!(matches!(
            cloud.create_container("backups"),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            cloud.delete_container("backups"),
            Err(Error::Conflict(_))
        ));
        cloud.delete_object("backups", "weekly.tar.gz").unwrap();
        cloud.delete_container("backups").unwrap();
    }

    #[test]
    fn test_upload_object_reads_local_file() {
        let cloud = authed();
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("logo.png");
        std::fs::write(&src, b"png-bytes").unwrap();

        cloud.create_container("assets").unwrap();
        let object = cloud
            .upload_object("assets", src.to_str().unwrap(), "img/logo.png")
            .unwrap();
        assert_eq!(object.bytes, 9);

        let listed = cloud.list_objects("assets").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "img/logo.png");
    }

    #[test]
    fn test_upload_object_missing_source() {
        let cloud = authed();
        let err = cloud
            .upload_object("backups", "/no/such/file.bin", "x")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_endpoints_cover_all_regions() {
        let cloud = authed();
        let catalog = cloud.endpoints().unwrap();
        assert_eq!(catalog.len(), SERVICES.len() * REGIONS.len());
        assert!(
            catalog
                .iter()
                .any(|e| e.service == "compute" && e.region == "LON")
        );
    }

    #[test]
    fn test_shared_state_across_clones() {
        let cloud = authed();
        let other = cloud.clone();
        let created = cloud.create_server("app02", "3", "centos-9").unwrap();
        assert!(
            other
                .list_servers()
                .unwrap()
                .iter()
                .any(|s| s.id == created.id)
        );
    }
}
