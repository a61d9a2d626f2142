//! Lazy loading and binding of dynamically created UI components.
//!
//! Host applications often need to place components whose type is only known at runtime:
//! sometimes it comes from an eagerly known registry, sometimes from a module that has not
//! been downloaded yet. `lazy_link` creates such components, attaches them into the view
//! tree and keeps a caller-supplied [`Context`] bound to their declared inputs and outputs.
//!
//! # Core Concepts
//!
//! - [`DynamicComponents`]: The binding engine. Creates a component from a type or from a
//! 	[`CompiledModule`], attaches its host view and wires the context onto it. Returns a
//! 	[`ComponentHandle`].
//!
//! - [`ComponentHandle`]: The caller's side of one created component. Push a new context
//! 	with [`ComponentHandle::next`], tear everything down with [`ComponentHandle::detach`].
//!
//! - [`Context`]: Named values matched against a component's declared bindings. Data entries
//! 	([`Value`]) feed inputs; handler entries ([`Handler`]) are subscribed to outputs.
//!
//! - [`ModuleLoader`]: Turns a string identifier into a [`CompiledModule`], asynchronously.
//! 	[`BundleLoader`] implements the `path#ExportName` convention on top of a
//! 	[`BundleFetcher`], either picking up precompiled factories or compiling declarations
//! 	(see [`LoadStrategy`]).
//!
//! - [`LazyLoader`]: A declarative placeholder. Given a module name and a "view ready"
//! 	signal, it loads the module, attaches the bootstrap component into its own
//! 	[`ViewContainer`] and reports the handle through [`LazyLoader::init`].
//!
//! The framework side is expressed as traits ([`ViewContainer`], [`ViewRegistry`],
//! [`MountPoint`], [`FactoryResolver`]) with in-memory implementations
//! ([`ViewContainerRef`], [`RootViews`], [`MountNode`], [`FactoryRegistry`]) that are
//! enough to drive the crate on their own.
//!
//! Everything here is single-threaded: shared state is `Rc`-based and asynchronous work runs
//! on a [`LocalSpawn`]( futures_util::task::LocalSpawn ) executor supplied by the host.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell ;
//! use std::rc::Rc ;
//! use futures_executor::LocalPool ;
//! use lazy_link::*;
//!
//! // A component exposes its declared inputs and outputs by name.
//! #[derive( Default )]
//! struct Greeting { name: String, clicked: EventEmitter<Value> }
//!
//! impl Component for Greeting {
//! 	fn set_input( &mut self, input: &str, value: &ContextValue ) {
//! 		if let ( "name", Some( Value::Str( name ))) = ( input, value.as_data() ) {
//! 			self.name = name.clone();
//! 		}
//! 	}
//! 	fn output( &self, output: &str ) -> Option<EventEmitter<Value>> {
//! 		( output == "clicked" ).then(|| self.clicked.clone() )
//! 	}
//! 	fn as_any( &self ) -> &dyn std::any::Any { self }
//! }
//!
//! // A module declares the component and bootstraps it. Bundles make it loadable by name.
//! let module = ModuleFactory::new( "GreetingModule" )
//! 	.declare( Factory::of::<Greeting>( "Greeting" ).with_inputs([ "name" ]).with_outputs([ "clicked" ]))
//! 	.bootstrap( "Greeting" );
//! let bundles = StaticBundles::new()
//! 	.with_bundle( "lazy/greeting", [( "GreetingModuleFactory", Export::Compiled( Rc::new( module )))]);
//!
//! let engine = Rc::new( DynamicComponents::new(
//! 	Rc::new( FactoryRegistry::new() ),
//! 	Rc::new( RootViews::new() ),
//! 	Injector::root(),
//! ));
//!
//! let mut pool = LocalPool::new();
//! let container = Rc::new( ViewContainerRef::new() );
//! let directive = LazyLoader::new(
//! 	Rc::clone( &engine ),
//! 	Rc::new( BundleLoader::new( bundles, LoadStrategy::precompiled() )),
//! 	container.clone(),
//! 	Injector::root(),
//! 	Rc::new( pool.spawner() ),
//! );
//!
//! // The consumer binds context once the component is there.
//! let clicks = Rc::new( RefCell::new( Vec::new() ));
//! let clicks_clone = Rc::clone( &clicks );
//! let _init = directive.init().subscribe( move | handle: &Option<ComponentHandle> | {
//! 	let Some( handle ) = handle else { return };
//! 	let clicks = Rc::clone( &clicks_clone );
//! 	handle.next( Context::new().with_input( "name", "world" ));
//! 	let emitter = handle.component_ref().instance().output( "clicked" ).unwrap();
//! 	let _ = emitter.subscribe( move | value: &Value | clicks.borrow_mut().push( value.clone() ));
//! });
//!
//! directive.set_module_name( "lazy/greeting#GreetingModule" );
//! directive.after_view_init();
//! pool.run_until_stalled();
//!
//! let handle = directive.handle().unwrap();
//! let name = handle.component_ref().with_instance(| greeting: &Greeting | {
//! 	greeting.clicked.emit( &Value::from( 1 ));
//! 	greeting.name.clone()
//! });
//! assert_eq!( name.as_deref(), Some( "world" ));
//! assert_eq!( *clicks.borrow(), vec![ Value::Int( 1 )]);
//!
//! directive.destroy();
//! assert!( handle.is_detached() );
//! assert!( container.is_empty() );
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber:
//! - `debug` for lifecycle steps (modules created, components attached and detached,
//! 	loads started, loads discarded after teardown)
//! - `warn` for recoverable misuse (no view container, no bootstrap component, a declared
//! 	output without an emitter)
//! - `error` when a [`LazyLoader`] fails to load or attach

mod context ;
mod subscription ;
mod emitter ;
mod replay ;
mod injector ;
mod component ;
mod view ;
mod resolver ;
mod module ;
mod loader ;
mod handle ;
mod dynamic_components ;
mod readiness ;
mod lazy_loader ;

pub use context::{ Context, ContextValue, Handler, Value };
pub use subscription::{ Subscription, SubscriptionSet };
pub use emitter::EventEmitter ;
pub use replay::ReplayCell ;
pub use injector::Injector ;
pub use component::{ Component, ComponentFactory, ComponentRef, ComponentType, Factory, HostView, InstanceRef, InstantiationError, ViewId };
pub use view::{ MountNode, MountPoint, RootViews, ViewContainer, ViewContainerRef, ViewRegistry };
pub use resolver::{ FactoryRegistry, FactoryResolver, ResolutionError };
pub use module::{ CompiledModule, ModuleFactory, ModuleRef };
pub use loader::{ Bundle, BundleFetcher, BundleLoader, Export, LoadError, LoadStrategy, ModuleCompiler, ModuleLoader, StaticBundles };
pub use handle::ComponentHandle ;
pub use dynamic_components::{ AttachError, AttachOptions, ComponentOptions, CreatedModule, DynamicComponents };
pub use readiness::Readiness ;
pub use lazy_loader::{ InitPayload, LazyLoader, LoadAttachError, LoaderState, SimpleChange, SimpleChanges, MODULE_NAME };
