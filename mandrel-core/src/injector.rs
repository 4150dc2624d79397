// Name-keyed dependency registry with recursive resolution

use crate::handler::Shared;
use crate::Error;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// An argument handed to a constructor, factory, or class method: either a
/// literal JSON value or an already-resolved dependency instance.
#[derive(Clone)]
pub enum ArgValue {
    Value(Value),
    Instance(Shared),
}

impl ArgValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ArgValue::Value(v) => Some(v),
            ArgValue::Instance(_) => None,
        }
    }

    /// Downcast an instance argument to a concrete type
    pub fn instance<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            ArgValue::Instance(shared) => shared.clone().downcast::<T>().ok(),
            ArgValue::Value(_) => None,
        }
    }
}

impl std::fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ArgValue::Instance(_) => f.debug_tuple("Instance").field(&"..").finish(),
        }
    }
}

/// Statically typed constructor or factory closure
pub type FactoryFn = Arc<dyn Fn(&[ArgValue]) -> Result<Shared, Error> + Send + Sync>;

/// Method closure receiving an instance receiver
pub type InstanceMethodFn =
    Arc<dyn Fn(&Shared, &[ArgValue]) -> Result<Shared, Error> + Send + Sync>;

/// A named method on a registered class, either static or requiring a
/// no-argument-constructed receiver.
#[derive(Clone)]
pub enum ClassMethod {
    Static(FactoryFn),
    Instance(InstanceMethodFn),
}

/// The compile-time stand-in for a language-level class: a name, a typed
/// constructor, and a table of named methods. Replaces runtime class-name
/// reflection with an explicit registry.
#[derive(Clone)]
pub struct ClassRef {
    name: String,
    construct: FactoryFn,
    methods: HashMap<String, ClassMethod>,
}

impl ClassRef {
    pub fn new<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(&[ArgValue]) -> Result<Shared, Error> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            construct: Arc::new(construct),
            methods: HashMap::new(),
        }
    }

    pub fn with_static_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&[ArgValue]) -> Result<Shared, Error> + Send + Sync + 'static,
    {
        self.methods
            .insert(name.into(), ClassMethod::Static(Arc::new(method)));
        self
    }

    pub fn with_instance_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Shared, &[ArgValue]) -> Result<Shared, Error> + Send + Sync + 'static,
    {
        self.methods
            .insert(name.into(), ClassMethod::Instance(Arc::new(method)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRef")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// What a dependency descriptor produces its instance from
#[derive(Clone)]
pub enum DepTarget {
    /// A registered class, constructed with the resolved parameters
    Class(String),
    /// A named method on a registered class
    ClassMethod(String, String),
    /// A factory closure invoked with the resolved parameters
    Factory(FactoryFn),
}

/// A declared constructor/factory parameter: a literal passed as-is, or the
/// name of another registered dependency resolved first.
#[derive(Clone, Debug)]
pub enum DepArgument {
    Value(Value),
    Dependency(String),
}

/// The registered recipe for producing a named dependency instance.
#[derive(Clone)]
pub struct Dependency {
    target: DepTarget,
    parameters: Vec<DepArgument>,
}

impl Dependency {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            target: DepTarget::Class(name.into()),
            parameters: Vec::new(),
        }
    }

    pub fn class_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: DepTarget::ClassMethod(class.into(), method.into()),
            parameters: Vec::new(),
        }
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&[ArgValue]) -> Result<Shared, Error> + Send + Sync + 'static,
    {
        Self {
            target: DepTarget::Factory(Arc::new(factory)),
            parameters: Vec::new(),
        }
    }

    /// Append a literal parameter
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.parameters.push(DepArgument::Value(value.into()));
        self
    }

    /// Append a parameter naming another registered dependency
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(DepArgument::Dependency(name.into()));
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<DepArgument>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// The dependency registry.
///
/// Owns the descriptor map and the class table, and is the sole resolver of
/// dependency names. Mutated single-threaded during setup; pure reads after,
/// so concurrent `get` calls are safe once registration is done. Every `get`
/// re-runs the recipe: no instance caching.
#[derive(Default)]
pub struct Injector {
    classes: HashMap<String, ClassRef>,
    dependencies: HashMap<String, Dependency>,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class in the class table
    pub fn register_class(&mut self, class: ClassRef) -> Result<(), Error> {
        if self.classes.contains_key(class.name()) {
            return Err(Error::DuplicateDependency(format!(
                "class {} is already registered",
                class.name()
            )));
        }
        debug!(class = class.name(), "Class registered");
        self.classes.insert(class.name().to_string(), class);
        Ok(())
    }

    /// Register a named dependency descriptor. Re-registering a name is an
    /// error, never an overwrite.
    pub fn add(&mut self, name: impl Into<String>, dependency: Dependency) -> Result<(), Error> {
        let name = name.into();
        if self.dependencies.contains_key(&name) {
            return Err(Error::DuplicateDependency(name));
        }
        debug!(dependency = %name, "Dependency registered");
        self.dependencies.insert(name, dependency);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.dependencies.keys()
    }

    /// Resolve a named dependency into an instance
    pub fn get(&self, name: &str) -> Result<Shared, Error> {
        self.get_with(name, &[])
    }

    /// Resolve a named dependency, appending extra arguments after the
    /// declared parameters
    pub fn get_with(&self, name: &str, extra: &[ArgValue]) -> Result<Shared, Error> {
        let mut stack = Vec::new();
        self.resolve_named(name, extra, &mut stack)
    }

    /// Construct a registered class directly, bypassing the descriptor map.
    /// Used by engines for the bare-handler fallback.
    pub fn construct_class(&self, name: &str, extra: &[ArgValue]) -> Result<Shared, Error> {
        let class = self
            .classes
            .get(name)
            .ok_or_else(|| Error::ClassNotFound(name.to_string()))?;
        trace!(class = %name, "Constructing class directly");
        (class.construct)(extra)
    }

    fn resolve_named(
        &self,
        name: &str,
        extra: &[ArgValue],
        stack: &mut Vec<String>,
    ) -> Result<Shared, Error> {
        // The in-progress stack is the cycle guard: re-entering a name that
        // is still being resolved fails fast instead of recursing forever.
        if stack.iter().any(|n| n == name) {
            return Err(Error::CyclicDependency(format!(
                "{} -> {}",
                stack.join(" -> "),
                name
            )));
        }

        let dependency = self
            .dependencies
            .get(name)
            .ok_or_else(|| Error::DependencyNotFound(name.to_string()))?;

        trace!(dependency = %name, "Resolving dependency");
        stack.push(name.to_string());
        let result = self.produce(dependency, extra, stack);
        stack.pop();
        result
    }

    fn produce(
        &self,
        dependency: &Dependency,
        extra: &[ArgValue],
        stack: &mut Vec<String>,
    ) -> Result<Shared, Error> {
        match &dependency.target {
            DepTarget::Factory(factory) => {
                let mut args = self.resolve_arguments(&dependency.parameters, stack)?;
                args.extend_from_slice(extra);
                factory(&args)
            }
            DepTarget::ClassMethod(class_name, method_name) => {
                let class = self
                    .classes
                    .get(class_name)
                    .ok_or_else(|| Error::ClassNotFound(class_name.clone()))?;
                let method = class.methods.get(method_name).ok_or_else(|| {
                    Error::ClassNotFound(format!("{}::{}", class_name, method_name))
                })?;
                let mut args = self.resolve_arguments(&dependency.parameters, stack)?;
                args.extend_from_slice(extra);
                match method {
                    ClassMethod::Static(f) => f(&args),
                    ClassMethod::Instance(f) => {
                        // Instance methods need a no-argument receiver first
                        let receiver = (class.construct)(&[])?;
                        f(&receiver, &args)
                    }
                }
            }
            DepTarget::Class(class_name) => {
                let class = self
                    .classes
                    .get(class_name)
                    .ok_or_else(|| Error::ClassNotFound(class_name.clone()))?;
                if dependency.parameters.is_empty() {
                    (class.construct)(extra)
                } else {
                    let mut args = self.resolve_arguments(&dependency.parameters, stack)?;
                    args.extend_from_slice(extra);
                    (class.construct)(&args)
                }
            }
        }
    }

    fn resolve_arguments(
        &self,
        parameters: &[DepArgument],
        stack: &mut Vec<String>,
    ) -> Result<Vec<ArgValue>, Error> {
        let mut args = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            match parameter {
                DepArgument::Value(v) => args.push(ArgValue::Value(v.clone())),
                DepArgument::Dependency(name) => {
                    args.push(ArgValue::Instance(self.resolve_named(name, &[], stack)?))
                }
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Connection {
        dsn: String,
    }

    struct Repository {
        connection: Arc<Connection>,
    }

    fn connection_class() -> ClassRef {
        ClassRef::new("Connection", |args| {
            let dsn = args
                .first()
                .and_then(ArgValue::as_value)
                .and_then(Value::as_str)
                .unwrap_or("memory://")
                .to_string();
            Ok(Arc::new(Connection { dsn }) as Shared)
        })
    }

    #[test]
    fn test_duplicate_dependency_rejected() {
        let mut injector = Injector::new();
        injector.add("db", Dependency::class("Connection")).unwrap();
        let err = injector
            .add("db", Dependency::class("Connection"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateDependency(_)));
    }

    #[test]
    fn test_unknown_dependency() {
        let injector = Injector::new();
        assert!(matches!(
            injector.get("missing"),
            Err(Error::DependencyNotFound(_))
        ));
    }

    #[test]
    fn test_class_target_with_literal_parameter() {
        let mut injector = Injector::new();
        injector.register_class(connection_class()).unwrap();
        injector
            .add(
                "db",
                Dependency::class("Connection").with_value("postgres://localhost"),
            )
            .unwrap();

        let shared = injector.get("db").unwrap();
        let connection = shared.downcast::<Connection>().unwrap();
        assert_eq!(connection.dsn, "postgres://localhost");
    }

    #[test]
    fn test_class_target_unknown_class() {
        let mut injector = Injector::new();
        injector.add("db", Dependency::class("Connection")).unwrap();
        assert!(matches!(injector.get("db"), Err(Error::ClassNotFound(_))));
    }

    #[test]
    fn test_factory_target() {
        let mut injector = Injector::new();
        injector
            .add(
                "answer",
                Dependency::factory(|args| {
                    let base = args
                        .first()
                        .and_then(ArgValue::as_value)
                        .and_then(Value::as_i64)
                        .unwrap_or(0);
                    Ok(Arc::new(base * 2) as Shared)
                })
                .with_value(21),
            )
            .unwrap();

        let shared = injector.get("answer").unwrap();
        assert_eq!(*shared.downcast::<i64>().unwrap(), 42);
    }

    #[test]
    fn test_recursive_resolution() {
        let mut injector = Injector::new();
        injector.register_class(connection_class()).unwrap();
        injector
            .register_class(ClassRef::new("Repository", |args| {
                let connection = args
                    .first()
                    .and_then(|a| a.instance::<Connection>())
                    .ok_or_else(|| Error::DependencyNotFound("connection".into()))?;
                Ok(Arc::new(Repository { connection }) as Shared)
            }))
            .unwrap();

        injector
            .add(
                "db",
                Dependency::class("Connection").with_value("postgres://primary"),
            )
            .unwrap();
        injector
            .add("repo", Dependency::class("Repository").with_dependency("db"))
            .unwrap();

        let shared = injector.get("repo").unwrap();
        let repository = shared.downcast::<Repository>().unwrap();
        assert_eq!(repository.connection.dsn, "postgres://primary");
    }

    #[test]
    fn test_static_method_target() {
        let mut injector = Injector::new();
        injector
            .register_class(
                connection_class().with_static_method("open", |args| {
                    let dsn = args
                        .first()
                        .and_then(ArgValue::as_value)
                        .and_then(Value::as_str)
                        .unwrap_or("memory://")
                        .to_string();
                    Ok(Arc::new(Connection { dsn }) as Shared)
                }),
            )
            .unwrap();
        injector
            .add(
                "db",
                Dependency::class_method("Connection", "open").with_value("sqlite://file"),
            )
            .unwrap();

        let shared = injector.get("db").unwrap();
        assert_eq!(shared.downcast::<Connection>().unwrap().dsn, "sqlite://file");
    }

    #[test]
    fn test_instance_method_constructs_receiver() {
        let mut injector = Injector::new();
        injector
            .register_class(connection_class().with_instance_method(
                "clone_with_suffix",
                |receiver, args| {
                    let base = receiver
                        .downcast_ref::<Connection>()
                        .map(|c| c.dsn.clone())
                        .unwrap_or_default();
                    let suffix = args
                        .first()
                        .and_then(ArgValue::as_value)
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    Ok(Arc::new(Connection {
                        dsn: format!("{}{}", base, suffix),
                    }) as Shared)
                },
            ))
            .unwrap();
        injector
            .add(
                "db",
                Dependency::class_method("Connection", "clone_with_suffix")
                    .with_value("?replica"),
            )
            .unwrap();

        let shared = injector.get("db").unwrap();
        assert_eq!(
            shared.downcast::<Connection>().unwrap().dsn,
            "memory://?replica"
        );
    }

    #[test]
    fn test_unknown_method_target() {
        let mut injector = Injector::new();
        injector.register_class(connection_class()).unwrap();
        injector
            .add("db", Dependency::class_method("Connection", "nope"))
            .unwrap();
        match injector.get("db") {
            Err(Error::ClassNotFound(msg)) => assert_eq!(msg, "Connection::nope"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_cycle_detection() {
        let mut injector = Injector::new();
        injector
            .add(
                "a",
                Dependency::factory(|_| Ok(Arc::new(()) as Shared)).with_dependency("b"),
            )
            .unwrap();
        injector
            .add(
                "b",
                Dependency::factory(|_| Ok(Arc::new(()) as Shared)).with_dependency("a"),
            )
            .unwrap();

        match injector.get("a") {
            Err(Error::CyclicDependency(chain)) => assert_eq!(chain, "a -> b -> a"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_self_cycle() {
        let mut injector = Injector::new();
        injector
            .add(
                "a",
                Dependency::factory(|_| Ok(Arc::new(()) as Shared)).with_dependency("a"),
            )
            .unwrap();
        assert!(matches!(
            injector.get("a"),
            Err(Error::CyclicDependency(_))
        ));
    }

    #[test]
    fn test_extras_appended_after_declared() {
        let mut injector = Injector::new();
        injector
            .add(
                "sum",
                Dependency::factory(|args| {
                    let total: i64 = args
                        .iter()
                        .filter_map(ArgValue::as_value)
                        .filter_map(Value::as_i64)
                        .sum();
                    Ok(Arc::new(total) as Shared)
                })
                .with_value(1),
            )
            .unwrap();

        let shared = injector
            .get_with("sum", &[ArgValue::Value(json!(2)), ArgValue::Value(json!(3))])
            .unwrap();
        assert_eq!(*shared.downcast::<i64>().unwrap(), 6);
    }

    #[test]
    fn test_construct_class_direct() {
        let mut injector = Injector::new();
        injector.register_class(connection_class()).unwrap();

        let shared = injector.construct_class("Connection", &[]).unwrap();
        assert_eq!(shared.downcast::<Connection>().unwrap().dsn, "memory://");
        assert!(matches!(
            injector.construct_class("Nope", &[]),
            Err(Error::ClassNotFound(_))
        ));
    }
}
