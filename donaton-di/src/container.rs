//! Dependency Injection container and tools

use self::{
    binding::{Activation, ArcService, Binding, erase, make_constructor, make_factory},
    path::{PathKey, ResolutionPath},
};
use crate::{Abstraction, Inject, error::Error};
use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    fmt::{self, Debug},
    hash::{BuildHasherDefault, Hasher},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

pub use self::{
    factory::GenericFactory,
    from_container::FromContainer,
};

mod binding;
mod path;
pub mod factory;
pub mod from_container;

/// Inner HashMap keyed by the abstraction type
type ServiceMap<V> = HashMap<
    TypeId,
    V,
    BuildHasherDefault<TypeIdHasher>
>;

#[derive(Default)]
struct TypeIdHasher(u64);

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[cold]
    fn write(&mut self, _: &[u8]) {
        unreachable!("TypeId calls write_u64");
    }

    #[inline]
    fn write_u64(&mut self, id: u64) {
        self.0 = id;
    }
}

/// Binding table and singleton cache
#[derive(Default)]
struct Registry {
    bindings: ServiceMap<Binding>,
    singletons: ServiceMap<ArcService>,
    /// Incremented by `clear`, constructions started before it are not cached
    generation: u64,
}

/// Represents a DI container that binds abstractions to implementations
/// and resolves them into shared instances.
///
/// Cloning is cheap, all clones share the same bindings and singletons.
///
/// Resolution follows a fixed priority chain:
/// 1. a cached singleton
/// 2. an instance bound with [`Container::bind_instance`]
/// 3. a factory
/// 4. the implementation's [`Inject`] constructor
///
/// Singletons are constructed at most once, even if resolved concurrently.
#[derive(Clone, Default)]
pub struct Container {
    registry: Arc<RwLock<Registry>>,
}

impl Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.read();
        f.debug_struct("Container")
            .field("bindings", &registry.bindings.len())
            .field("singletons", &registry.singletons.len())
            .finish()
    }
}

impl Container {
    /// Creates a new empty container
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `A` to the implementation `T`, a new instance is constructed on each resolution
    ///
    /// # Example
    /// ```
    /// use donaton_di::Container;
    ///
    /// #[derive(Default)]
    /// struct RequestLog(Vec<String>);
    ///
    /// let container = Container::new();
    /// container.bind::<RequestLog, RequestLog>();
    /// ```
    pub fn bind<A, T>(&self)
    where
        A: ?Sized + Abstraction<T>,
        T: Inject + 'static
    {
        self.insert::<A>(Activation::Constructor(make_constructor::<A, T>()), false);
    }

    /// Binds `A` to the implementation `T`, the instance is constructed on first resolution
    /// and reused afterward
    pub fn bind_singleton<A, T>(&self)
    where
        A: ?Sized + Abstraction<T>,
        T: Inject + 'static
    {
        self.insert::<A>(Activation::Constructor(make_constructor::<A, T>()), true);
    }

    /// Binds `A` to a factory that is called on each resolution
    ///
    /// Factory arguments are resolved from the container.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use donaton_di::{Container, error::Error};
    ///
    /// struct Settings { retries: u32 }
    /// struct Client { retries: u32 }
    ///
    /// let container = Container::new();
    /// container.bind_instance(Arc::new(Settings { retries: 3 }));
    /// container.bind_factory::<Client, _, _>(|s: Arc<Settings>| -> Result<Client, Error> {
    ///     Ok(Client { retries: s.retries })
    /// });
    ///
    /// assert_eq!(container.resolve::<Client>().unwrap().retries, 3);
    /// ```
    pub fn bind_factory<A, F, Args>(&self, factory: F)
    where
        A: ?Sized + Abstraction<F::Output>,
        F: GenericFactory<Args>,
        Args: FromContainer
    {
        self.insert::<A>(Activation::Factory(make_factory::<A, F, Args>(factory)), false);
    }

    /// Binds `A` to a factory that is called once, on first resolution
    pub fn bind_singleton_factory<A, F, Args>(&self, factory: F)
    where
        A: ?Sized + Abstraction<F::Output>,
        F: GenericFactory<Args>,
        Args: FromContainer
    {
        self.insert::<A>(Activation::Factory(make_factory::<A, F, Args>(factory)), true);
    }

    /// Binds `A` to an already constructed instance that is returned on every resolution
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use donaton_di::Container;
    ///
    /// struct Config { name: &'static str }
    ///
    /// let config = Arc::new(Config { name: "donaton" });
    /// let container = Container::new();
    /// container.bind_instance(config.clone());
    ///
    /// let resolved = container.resolve::<Config>().unwrap();
    /// assert!(Arc::ptr_eq(&config, &resolved));
    /// ```
    pub fn bind_instance<A>(&self, instance: Arc<A>)
    where
        A: ?Sized + Send + Sync + 'static
    {
        self.insert::<A>(Activation::Instance(erase(instance)), true);
    }

    /// Resolves `A` into a shared instance
    ///
    /// # Errors
    /// - [`Error::UnboundAbstraction`] if `A` has no binding
    /// - [`Error::UnresolvableDependency`] if a dependency of the implementation has no binding
    /// - [`Error::CyclicDependency`] if the construction of `A` requires `A`
    /// - any error returned by a factory or a constructor
    #[inline]
    pub fn resolve<A>(&self) -> Result<Arc<A>, Error>
    where
        A: ?Sized + Send + Sync + 'static
    {
        let name = type_name::<A>();
        self.resolve_service(TypeId::of::<A>(), name)
            .and_then(|service| Self::downcast::<A>(&service, name))
    }

    /// Checks whether `A` has a binding
    #[inline]
    pub fn is_bound<A>(&self) -> bool
    where
        A: ?Sized + 'static
    {
        self.read().bindings.contains_key(&TypeId::of::<A>())
    }

    /// Returns the names of all bound abstractions, sorted
    pub fn bound_names(&self) -> Vec<&'static str> {
        let mut names = self.read()
            .bindings
            .values()
            .map(|binding| binding.name)
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Removes all bindings and cached singletons
    pub fn clear(&self) {
        let mut registry = self.write();
        registry.bindings.clear();
        registry.singletons.clear();
        registry.generation = registry.generation.wrapping_add(1);

        #[cfg(feature = "tracing")]
        tracing::debug!("container cleared");
    }

    /// Creates an independent container with the same bindings.
    ///
    /// Bound instances are shared with the child, singletons are constructed
    /// again on their first resolution from the child.
    pub fn create_child(&self) -> Self {
        let registry = self.read();
        let bindings = registry.bindings
            .iter()
            .map(|(key, binding)| (*key, binding.detached()))
            .collect::<ServiceMap<_>>();
        let singletons = bindings
            .iter()
            .filter_map(|(key, binding)| match &binding.activation {
                Activation::Instance(service) => Some((*key, service.clone())),
                _ => None
            })
            .collect::<ServiceMap<_>>();
        let child = Registry { bindings, singletons, generation: 0 };
        Self {
            registry: Arc::new(RwLock::new(child)),
        }
    }

    fn insert<A: ?Sized + 'static>(&self, activation: Activation, singleton: bool) {
        let key = TypeId::of::<A>();
        let name = type_name::<A>();
        let mut registry = self.write();

        #[cfg(feature = "tracing")]
        {
            let is_instance = matches!(activation, Activation::Instance(_));
            if !is_instance && registry.singletons.contains_key(&key) {
                tracing::warn!("{name} was bound again after its singleton was cached; the cached instance is kept");
            }
            tracing::trace!("bound {name} (singleton: {singleton})");
        }

        // A bound instance replaces whatever was cached
        if let Activation::Instance(service) = &activation {
            registry.singletons.insert(key, service.clone());
        }

        registry.bindings.insert(key, Binding::new(name, activation, singleton));
    }

    fn resolve_service(&self, key: TypeId, name: &'static str) -> Result<ArcService, Error> {
        let (binding, generation) = {
            let registry = self.read();
            if let Some(service) = registry.singletons.get(&key) {
                return Ok(service.clone());
            }
            let binding = registry.bindings
                .get(&key)
                .cloned()
                .ok_or(Error::UnboundAbstraction(name))?;
            (binding, registry.generation)
        };

        let provider = match &binding.activation {
            Activation::Instance(service) => return Ok(service.clone()),
            Activation::Factory(provider) | Activation::Constructor(provider) => provider
        };

        let registry_id = Arc::as_ptr(&self.registry) as usize;
        let _path = ResolutionPath::enter(PathKey { registry: registry_id, key }, name)?;

        if !binding.singleton {
            return provider(self);
        }

        // The guard protects no data, a panic in another constructor doesn't invalidate it
        let _guard = binding.init_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(service) = self.read().singletons.get(&key) {
            return Ok(service.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("constructing singleton {name}");

        let service = provider(self)?;
        let mut registry = self.write();
        if registry.generation != generation {
            return Ok(service);
        }
        // An instance bound during construction stays, the first cached service wins
        let cached = registry.singletons
            .entry(key)
            .or_insert(service);
        Ok(cached.clone())
    }

    #[inline]
    fn downcast<A>(service: &ArcService, name: &'static str) -> Result<Arc<A>, Error>
    where
        A: ?Sized + Send + Sync + 'static
    {
        service
            .downcast_ref::<Arc<A>>()
            .cloned()
            .ok_or(Error::ResolveFailed(name))
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().expect("container registry lock poisoned")
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().expect("container registry lock poisoned")
    }
}
