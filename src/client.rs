//! Facade client bound to one application identity.

use std::collections::BTreeMap;
use std::net::IpAddr;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::model::{
    Application, Applications, DataCenterInfo, Instance, InstanceStatus, LeaseInfo, Port,
};
use crate::registry::RegistryClient;
use crate::{EurekaError, Result};

/// Handle to a registered instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceHandle {
    /// The instance identifier, `host:appID:port`.
    pub id: String,
}

/// Eureka client bound to one `{app ID, host, port}` identity.
///
/// Wraps a [`RegistryClient`] and hides the app-ID/instance-ID plumbing:
/// the instance ID is computed once at construction as `host:appID:port`
/// and used for every identity-scoped operation.
#[derive(Debug)]
pub struct EurekaClient {
    registry: RegistryClient,
    app_id: String,
    host: String,
    port: u16,
    instance_id: String,
}

impl EurekaClient {
    /// Create a client for the given registry servers and identity.
    pub fn new<I, S>(
        base_urls: I,
        app_id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(base_urls, app_id, host, port, RegistryConfig::new())
    }

    /// Create a client with explicit transport configuration.
    pub fn with_config<I, S>(
        base_urls: I,
        app_id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        config: RegistryConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = RegistryClient::with_config(base_urls, config)?;
        let app_id = app_id.into();
        let host = host.into();
        let instance_id = format!("{host}:{app_id}:{port}");
        Ok(Self {
            registry,
            app_id,
            host,
            port,
            instance_id,
        })
    }

    /// The application this client registers under.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The instance identifier, `host:appID:port`.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// The underlying transport client.
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Register this identity with the registry.
    ///
    /// `ttl_secs` is the lease eviction window the server uses to expire
    /// the instance absent heartbeats. Exactly one of the plain and
    /// secure ports is enabled, per `use_ssl`. The VIP and secure VIP
    /// addresses default to the application ID.
    pub async fn register(
        &self,
        ip: IpAddr,
        ttl_secs: u32,
        use_ssl: bool,
    ) -> Result<InstanceHandle> {
        let instance = self.build_instance(ip, ttl_secs, use_ssl);
        self.registry
            .register_instance(&self.app_id, &instance)
            .await
            .map_err(|source| EurekaError::Registration {
                app: self.app_id.clone(),
                source: Box::new(source),
            })?;
        Ok(InstanceHandle {
            id: self.instance_id.clone(),
        })
    }

    /// Renew this instance's lease.
    ///
    /// Fails with [`EurekaError::InstanceNotFound`] if the server no
    /// longer knows the instance; re-register and continue in that case.
    pub async fn heartbeat(&self) -> Result<()> {
        let exists = self
            .registry
            .heartbeat(&self.app_id, &self.instance_id)
            .await
            .map_err(|source| EurekaError::Heartbeat {
                instance: self.instance_id.clone(),
                source: Box::new(source),
            })?;
        if !exists {
            return Err(EurekaError::InstanceNotFound {
                instance: self.instance_id.clone(),
            });
        }
        debug!(instance = %self.instance_id, "lease renewed");
        Ok(())
    }

    /// De-register this instance.
    pub async fn unregister(&self) -> Result<()> {
        self.registry
            .unregister_instance(&self.app_id, &self.instance_id)
            .await
    }

    /// Override this instance's status (e.g. `OUT_OF_SERVICE`).
    pub async fn set_status(&self, status: InstanceStatus) -> Result<()> {
        self.registry
            .set_status(&self.app_id, &self.instance_id, status)
            .await
    }

    /// Remove a status override, suggesting a fallback status.
    pub async fn clear_status_override(&self, fallback: InstanceStatus) -> Result<()> {
        self.registry
            .clear_status_override(&self.app_id, &self.instance_id, fallback)
            .await
    }

    /// Replace metadata entries on this instance.
    pub async fn update_metadata(&self, metadata: &BTreeMap<String, String>) -> Result<()> {
        self.registry
            .update_metadata(&self.app_id, &self.instance_id, metadata)
            .await
    }

    /// Fetch the full registry snapshot.
    pub async fn get_all_applications(&self) -> Result<Applications> {
        self.registry.get_all_applications().await
    }

    /// Fetch one application by ID.
    pub async fn get_application(&self, app_id: &str) -> Result<Application> {
        self.registry.get_application(app_id).await
    }

    /// Fetch one instance of an application.
    pub async fn get_instance(&self, app_id: &str, instance_id: &str) -> Result<Instance> {
        self.registry.get_instance(app_id, instance_id).await
    }

    /// Query instances by virtual address.
    pub async fn get_by_vip(&self, vip: &str) -> Result<Applications> {
        self.registry.get_by_vip(vip).await
    }

    /// Query instances by secure virtual address.
    pub async fn get_by_secure_vip(&self, svip: &str) -> Result<Applications> {
        self.registry.get_by_secure_vip(svip).await
    }

    fn build_instance(&self, ip: IpAddr, ttl_secs: u32, use_ssl: bool) -> Instance {
        Instance {
            host_name: self.host.clone(),
            app: self.app_id.clone(),
            ip_addr: ip.to_string(),
            vip_address: Some(self.app_id.clone()),
            secure_vip_address: Some(self.app_id.clone()),
            status: InstanceStatus::Up,
            port: Some(Port {
                enabled: !use_ssl,
                value: self.port,
            }),
            secure_port: Some(Port {
                enabled: use_ssl,
                value: self.port,
            }),
            data_center_info: DataCenterInfo::default(),
            lease_info: Some(LeaseInfo {
                eviction_duration_in_secs: ttl_secs,
            }),
            instance_id: Some(self.instance_id.clone()),
            ..Default::default()
        }
    }
}
