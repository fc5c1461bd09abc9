//! Environment-scoped transport schema registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use device_primitives::{
    AttributeSpec, ConnectionInfo, ConnectionValue, Environment, SchemaDescriptor,
    SealedConnectionInfo, Sensitive, TransportName, TransportSchema,
};
use tracing::{debug, info, warn};

use crate::context::TransportContext;
use crate::device::DeviceHandle;
use crate::error::{TransportError, TransportResult};
use crate::traits::{SchemaSource, Transport, TransportFactory};

/// Fixed prefix carried by structural connection-info validation errors.
pub const CONNECTION_INFO_PREFIX: &str =
    "The connection info provided does not match the transport schema";

const POISONED: &str = "transport registry poisoned";

/// Registry mapping transport names to validated schemas, scoped by
/// environment, with an explicit factory table for construction and a
/// pluggable discovery seam.
///
/// The registry is an ordinary value: construct one per server or test and
/// pass it by reference. Both levels of the schema map are created lazily on
/// first access. Factories and sources are environment-independent, matching
/// code availability rather than configuration.
#[derive(Default)]
pub struct TransportRegistry {
    schemas: RwLock<HashMap<Environment, HashMap<String, TransportSchema>>>,
    factories: RwLock<HashMap<String, Arc<dyn TransportFactory>>>,
    sources: RwLock<Vec<Arc<dyn SchemaSource>>>,
    current_device: RwLock<Option<DeviceHandle>>,
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schemas = self.schemas.read().expect(POISONED);
        let registered: HashMap<&str, Vec<&String>> = schemas
            .iter()
            .map(|(env, entry)| (env.as_str(), entry.keys().collect()))
            .collect();
        let factories = self.factories.read().expect(POISONED);
        let factory_names: Vec<_> = factories.keys().cloned().collect();
        f.debug_struct("TransportRegistry")
            .field("schemas", &registered)
            .field("factories", &factory_names)
            .finish()
    }
}

impl TransportRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a descriptor and registers the resulting schema under the
    /// supplied environment, returning the registered name.
    ///
    /// Insertion is a single map assignment; a failed registration leaves no
    /// partial state behind.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Schema`] when the descriptor is missing
    /// required fields or mistyped, and
    /// [`TransportError::DuplicateTransport`] when the name is already
    /// registered in this environment.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register(
        &self,
        environment: &Environment,
        descriptor: SchemaDescriptor,
    ) -> TransportResult<TransportName> {
        let schema = TransportSchema::from_descriptor(descriptor)?;
        let name = schema.name().clone();

        let mut schemas = self.schemas.write().expect(POISONED);
        let entry = schemas.entry(environment.clone()).or_default();
        if entry.contains_key(name.as_str()) {
            return Err(TransportError::DuplicateTransport {
                name: name.to_string(),
                environment: environment.clone(),
            });
        }
        entry.insert(name.as_str().to_owned(), schema);
        drop(schemas);

        info!(transport = %name, environment = %environment, "transport schema registered");
        Ok(name)
    }

    /// Registers the factory that constructs transports for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::DuplicateFactory`] when a factory is already
    /// registered under the name.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register_factory(
        &self,
        name: &TransportName,
        factory: Arc<dyn TransportFactory>,
    ) -> TransportResult<()> {
        let mut factories = self.factories.write().expect(POISONED);
        if factories.contains_key(name.as_str()) {
            return Err(TransportError::DuplicateFactory {
                name: name.to_string(),
            });
        }
        factories.insert(name.as_str().to_owned(), factory);
        Ok(())
    }

    /// Adds a schema discovery source.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn add_source(&self, source: Arc<dyn SchemaSource>) {
        self.sources.write().expect(POISONED).push(source);
    }

    /// Returns independent copies of the schemas registered in the supplied
    /// environment, keyed by transport name.
    ///
    /// Only schemas already registered or discovered are included; mutating
    /// the returned map never affects the registry.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn list(&self, environment: &Environment) -> HashMap<String, TransportSchema> {
        let schemas = self.schemas.read().expect(POISONED);
        schemas.get(environment).cloned().unwrap_or_default()
    }

    /// Discovers every schema the registered sources can supply, then
    /// returns the same copy as [`list`](Self::list).
    ///
    /// Descriptors for already-registered names are skipped silently;
    /// malformed descriptors are logged and skipped. With no explicit
    /// environment, discovery and listing run under
    /// [`Environment::default`].
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn list_all(
        &self,
        environment: Option<&Environment>,
    ) -> HashMap<String, TransportSchema> {
        let fallback;
        let environment = match environment {
            Some(environment) => environment,
            None => {
                fallback = Environment::default();
                &fallback
            }
        };

        for source in self.sources_snapshot() {
            for descriptor in source.enumerate() {
                match self.register(environment, descriptor) {
                    Ok(name) => {
                        debug!(transport = %name, environment = %environment, "transport schema discovered");
                    }
                    Err(TransportError::DuplicateTransport { .. }) => {}
                    Err(err) => warn!(?err, "discovered transport schema rejected"),
                }
            }
        }

        self.list(environment)
    }

    /// Validates connection info against the named schema, seals sensitive
    /// attributes, and constructs a transport through the registered factory.
    ///
    /// When the schema is not yet registered, discovery sources are consulted
    /// before the lookup fails.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UnknownTransport`] when no schema or factory
    /// exists for the name, [`TransportError::Schema`] when the connection
    /// info fails the structural or semantic checks, and whatever the factory
    /// surfaces from construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn connect(
        &self,
        environment: &Environment,
        name: &str,
        connection_info: ConnectionInfo,
    ) -> TransportResult<Arc<dyn Transport>> {
        let schema = self.ensure_schema(environment, name)?;
        schema.check_connection_info(&connection_info, CONNECTION_INFO_PREFIX)?;

        let factory = self.factory(name).ok_or_else(|| {
            TransportError::UnknownTransport {
                name: name.to_owned(),
                environment: environment.clone(),
            }
        })?;
        factory.validate(&connection_info)?;

        let sealed = seal_connection_info(&schema, connection_info);
        let context =
            TransportContext::new(schema.name().clone(), environment.clone(), schema);
        debug!(transport = name, environment = %environment, connection = %context.connection_id(), "constructing transport");
        factory.build(context, sealed)
    }

    /// Wraps the supplied transport and installs it as the current device.
    ///
    /// Whatever host utility reads the current device afterwards sees this
    /// handle; the previous handle, if any, is replaced. Primarily a test and
    /// mocking side channel.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn inject_device(&self, name: &TransportName, transport: Arc<dyn Transport>) {
        let handle = DeviceHandle::new(name.clone(), transport);
        info!(transport = %name, "current device injected");
        *self.current_device.write().expect(POISONED) = Some(handle);
    }

    /// Returns the currently injected device, if any.
    #[must_use]
    pub fn current_device(&self) -> Option<DeviceHandle> {
        self.current_device
            .read()
            .ok()
            .and_then(|handle| handle.clone())
    }

    /// Returns the named schema, consulting discovery sources on a miss.
    fn ensure_schema(
        &self,
        environment: &Environment,
        name: &str,
    ) -> TransportResult<TransportSchema> {
        if let Some(schema) = self.lookup(environment, name) {
            return Ok(schema);
        }

        for source in self.sources_snapshot() {
            let Some(descriptor) = source.load(name) else {
                continue;
            };
            match self.register(environment, descriptor) {
                Ok(registered) if registered.as_str() == name => break,
                Ok(registered) => {
                    warn!(requested = name, loaded = %registered, "schema source returned a differently named schema");
                }
                Err(TransportError::DuplicateTransport { .. }) => break,
                Err(err) => warn!(?err, "loaded transport schema rejected"),
            }
        }

        self.lookup(environment, name)
            .ok_or_else(|| TransportError::UnknownTransport {
                name: name.to_owned(),
                environment: environment.clone(),
            })
    }

    fn lookup(&self, environment: &Environment, name: &str) -> Option<TransportSchema> {
        let schemas = self.schemas.read().ok()?;
        schemas.get(environment)?.get(name).cloned()
    }

    fn factory(&self, name: &str) -> Option<Arc<dyn TransportFactory>> {
        let factories = self.factories.read().ok()?;
        factories.get(name).cloned()
    }

    fn sources_snapshot(&self) -> Vec<Arc<dyn SchemaSource>> {
        self.sources.read().expect(POISONED).clone()
    }
}

/// Replaces the value of every schema attribute flagged sensitive that is
/// present in the supplied connection info with a sealed wrapper; everything
/// else passes through unchanged.
#[must_use]
pub fn seal_connection_info(
    schema: &TransportSchema,
    connection_info: ConnectionInfo,
) -> SealedConnectionInfo {
    connection_info
        .into_iter()
        .map(|(attr, value)| {
            let sealed = if schema
                .attribute(&attr)
                .is_some_and(AttributeSpec::is_sensitive)
            {
                ConnectionValue::Sensitive(Sensitive::new(value))
            } else {
                ConnectionValue::Plain(value)
            };
            (attr, sealed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use device_primitives::AttributeKind;
    use serde_json::{Value, json};

    struct NullTransport;

    #[async_trait]
    impl Transport for NullTransport {
        async fn verify(&self, _context: &TransportContext) -> TransportResult<()> {
            Ok(())
        }

        async fn facts(&self, _context: &TransportContext) -> TransportResult<Value> {
            Ok(json!({}))
        }

        async fn close(&self, _context: &TransportContext) -> TransportResult<()> {
            Ok(())
        }
    }

    struct NullFactory;

    impl TransportFactory for NullFactory {
        fn build(
            &self,
            _context: TransportContext,
            _connection_info: SealedConnectionInfo,
        ) -> TransportResult<Arc<dyn Transport>> {
            Ok(Arc::new(NullTransport))
        }
    }

    struct StaticSource {
        descriptors: Vec<SchemaDescriptor>,
    }

    impl SchemaSource for StaticSource {
        fn load(&self, name: &str) -> Option<SchemaDescriptor> {
            self.descriptors
                .iter()
                .find(|descriptor| descriptor.name() == Some(name))
                .cloned()
        }

        fn enumerate(&self) -> Vec<SchemaDescriptor> {
            self.descriptors.clone()
        }
    }

    fn descriptor(name: &str) -> SchemaDescriptor {
        SchemaDescriptor::new(name, "test transport")
            .with_attribute("host", AttributeSpec::new(AttributeKind::String))
            .with_attribute(
                "password",
                AttributeSpec::new(AttributeKind::String).sensitive().optional(),
            )
    }

    fn info() -> ConnectionInfo {
        [("host".to_owned(), json!("switch.example.com"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn register_then_list_returns_independent_copies() {
        let registry = TransportRegistry::new();
        let env = Environment::default();
        registry.register(&env, descriptor("net_ssh")).unwrap();

        let mut listed = registry.list(&env);
        assert_eq!(listed.len(), 1);
        assert!(listed.contains_key("net_ssh"));

        listed.remove("net_ssh");
        assert!(registry.list(&env).contains_key("net_ssh"));
    }

    #[test]
    fn duplicate_registration_fails_within_one_environment() {
        let registry = TransportRegistry::new();
        let env = Environment::default();
        registry.register(&env, descriptor("net_ssh")).unwrap();

        let err = registry
            .register(&env, descriptor("net_ssh"))
            .expect_err("duplicate registration should fail");
        assert!(matches!(
            err,
            TransportError::DuplicateTransport { name, .. } if name == "net_ssh"
        ));

        let other = Environment::new("staging").unwrap();
        registry
            .register(&other, descriptor("net_ssh"))
            .expect("independent environments");
        assert_eq!(registry.list(&other).len(), 1);
    }

    #[test]
    fn malformed_descriptor_is_rejected_without_partial_state() {
        let registry = TransportRegistry::new();
        let env = Environment::default();

        let err = registry
            .register(&env, SchemaDescriptor::default())
            .expect_err("empty descriptor");
        assert!(matches!(err, TransportError::Schema(_)));
        assert!(registry.list(&env).is_empty());
    }

    #[test]
    fn connect_fails_for_unregistered_transport() {
        let registry = TransportRegistry::new();
        let env = Environment::default();

        let err = registry
            .connect(&env, "missing", info())
            .err()
            .expect("unknown transport should fail");
        assert!(matches!(
            err,
            TransportError::UnknownTransport { name, .. } if name == "missing"
        ));
    }

    #[test]
    fn connect_loads_schema_lazily_from_sources() {
        let registry = TransportRegistry::new();
        let env = Environment::default();
        registry.add_source(Arc::new(StaticSource {
            descriptors: vec![descriptor("net_ssh")],
        }));
        let name = TransportName::new("net_ssh").unwrap();
        registry
            .register_factory(&name, Arc::new(NullFactory))
            .unwrap();

        registry
            .connect(&env, "net_ssh", info())
            .expect("schema loaded on demand");
        assert!(registry.list(&env).contains_key("net_ssh"));
    }

    #[test]
    fn connect_rejects_mismatching_connection_info() {
        let registry = TransportRegistry::new();
        let env = Environment::default();
        registry.register(&env, descriptor("net_ssh")).unwrap();
        let name = TransportName::new("net_ssh").unwrap();
        registry
            .register_factory(&name, Arc::new(NullFactory))
            .unwrap();

        let err = registry
            .connect(&env, "net_ssh", ConnectionInfo::new())
            .err()
            .expect("missing required attribute");
        assert!(matches!(
            err,
            TransportError::Schema(device_primitives::Error::InvalidConnectionInfo { message })
                if message.starts_with(CONNECTION_INFO_PREFIX)
        ));
    }

    #[test]
    fn list_all_discovers_and_skips_duplicates() {
        let registry = TransportRegistry::new();
        let env = Environment::default();
        registry.register(&env, descriptor("net_ssh")).unwrap();
        registry.add_source(Arc::new(StaticSource {
            descriptors: vec![descriptor("net_ssh"), descriptor("net_telnet")],
        }));

        let listed = registry.list_all(Some(&env));
        assert_eq!(listed.len(), 2);
        assert!(listed.contains_key("net_telnet"));

        let staging = Environment::new("staging").unwrap();
        let forced = registry.list_all(Some(&staging));
        assert_eq!(forced.len(), 2);
        assert!(registry.list(&env).contains_key("net_ssh"));
    }

    #[test]
    fn seal_wraps_only_present_sensitive_attributes() {
        let schema = TransportSchema::from_descriptor(descriptor("net_ssh")).unwrap();

        let mut connection_info = info();
        connection_info.insert("password".to_owned(), json!("hunter2"));
        let sealed = seal_connection_info(&schema, connection_info);

        assert!(!sealed["host"].is_sensitive());
        assert!(sealed["password"].is_sensitive());
        assert_eq!(sealed["password"].expose(), &json!("hunter2"));

        let sealed = seal_connection_info(&schema, info());
        assert!(!sealed.contains_key("password"));
    }

    #[tokio::test]
    async fn connect_builds_a_working_transport() {
        let registry = TransportRegistry::new();
        let env = Environment::default();
        registry.register(&env, descriptor("net_ssh")).unwrap();
        let name = TransportName::new("net_ssh").unwrap();
        registry
            .register_factory(&name, Arc::new(NullFactory))
            .unwrap();

        let transport = registry.connect(&env, "net_ssh", info()).unwrap();
        let context = TransportContext::new(
            name.clone(),
            env.clone(),
            TransportSchema::from_descriptor(descriptor("net_ssh")).unwrap(),
        );
        transport.verify(&context).await.unwrap();

        registry.inject_device(&name, transport);
        let device = registry.current_device().expect("injected device");
        assert_eq!(device.name(), &name);
        device.transport().close(&context).await.unwrap();
    }

    #[test]
    fn duplicate_factory_registration_fails() {
        let registry = TransportRegistry::new();
        let name = TransportName::new("net_ssh").unwrap();
        registry
            .register_factory(&name, Arc::new(NullFactory))
            .unwrap();
        let err = registry
            .register_factory(&name, Arc::new(NullFactory))
            .expect_err("duplicate factory");
        assert!(matches!(err, TransportError::DuplicateFactory { name } if name == "net_ssh"));
    }
}
