//! Walkthrough of the device runtime: schema registration, connection with
//! sensitive sealing, device injection, and resource projection.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use device_primitives::{
    AttributeKind, AttributeSpec, ConnectionInfo, Environment, SchemaDescriptor,
    SealedConnectionInfo, TransportName,
};
use device_resource::{AttributeDef, Behavior, ResourceShim, ResourceValues};
use device_transport::{
    Transport, TransportContext, TransportError, TransportFactory, TransportRegistry,
    TransportResult,
};
use serde_json::{Value, json};
use tracing::info;

/// A pretend switch we can "connect" to without a lab.
struct DemoSwitch {
    host: String,
}

#[async_trait]
impl Transport for DemoSwitch {
    async fn verify(&self, context: &TransportContext) -> TransportResult<()> {
        info!(connection = %context.connection_id(), host = %self.host, "verified");
        Ok(())
    }

    async fn facts(&self, _context: &TransportContext) -> TransportResult<Value> {
        Ok(json!({
            "hostname": self.host,
            "model": "ds-9000",
            "uptime_seconds": 86_400,
        }))
    }

    async fn close(&self, context: &TransportContext) -> TransportResult<()> {
        info!(connection = %context.connection_id(), "closed");
        Ok(())
    }
}

struct DemoSwitchFactory;

impl TransportFactory for DemoSwitchFactory {
    fn build(
        &self,
        _context: TransportContext,
        connection_info: SealedConnectionInfo,
    ) -> TransportResult<Arc<dyn Transport>> {
        // The password is sealed; printing the info leaks nothing.
        info!(?connection_info, "building transport");
        let host = connection_info
            .get("host")
            .and_then(|value| value.expose().as_str())
            .ok_or_else(|| TransportError::failure("host missing"))?
            .to_owned();
        Ok(Arc::new(DemoSwitch { host }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let registry = TransportRegistry::new();
    let environment = Environment::new("demo")?;
    let name = TransportName::new("demo_switch")?;

    registry.register(
        &environment,
        SchemaDescriptor::new("demo_switch", "Manages the demo switch")
            .with_attribute(
                "host",
                AttributeSpec::new(AttributeKind::String).with_description("switch address"),
            )
            .with_attribute(
                "password",
                AttributeSpec::new(AttributeKind::String).sensitive(),
            ),
    )?;
    registry.register_factory(&name, Arc::new(DemoSwitchFactory))?;
    info!(transports = registry.list(&environment).len(), "registry ready");

    let connection_info: ConnectionInfo = [
        ("host".to_owned(), json!("demo-sw-01.example.com")),
        ("password".to_owned(), json!("correct horse battery staple")),
    ]
    .into_iter()
    .collect();

    let transport = registry.connect(&environment, "demo_switch", connection_info)?;
    let schema = registry.list(&environment)["demo_switch"].clone();
    let context = TransportContext::new(name.clone(), environment.clone(), schema);

    transport.verify(&context).await?;
    let facts = transport.facts(&context).await?;
    registry.inject_device(&name, Arc::clone(&transport));
    info!(device = %name, "current device set");

    // Project the device facts the way `resource` output would.
    let values: ResourceValues = [
        ("name".to_owned(), json!("demo-sw-01")),
        ("model".to_owned(), facts["model"].clone()),
        ("uptime_seconds".to_owned(), facts["uptime_seconds"].clone()),
    ]
    .into_iter()
    .collect();
    let attr_defs = [
        (
            "name".to_owned(),
            AttributeDef::new("String").with_behavior(Behavior::Namevar),
        ),
        ("model".to_owned(), AttributeDef::new("String")),
        (
            "uptime_seconds".to_owned(),
            AttributeDef::new("Integer").with_behavior(Behavior::ReadOnly),
        ),
    ]
    .into_iter()
    .collect();
    let shim = ResourceShim::new(values, "demo_device", vec!["name".to_owned()], attr_defs);

    info!("manifest:\n{}", shim.to_manifest());
    info!("json: {}", shim.to_json());
    info!("hiera yaml:\n{}", shim.to_hiera_yaml());

    transport.close(&context).await?;
    Ok(())
}
