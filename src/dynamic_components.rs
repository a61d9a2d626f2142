//! The binding engine.
//!
//! [`DynamicComponents`] creates component instances from a type or from a compiled
//! module, attaches their views into the view tree and wires the caller's [`Context`]
//! onto the component's declared bindings:
//!
//! - **Outputs** are wired once, at creation: every declared output whose context entry
//! 	is a [`ContextValue::Handler`]( crate::ContextValue::Handler ) gets that handler
//! 	subscribed to the instance's emitter.
//! - **Inputs** are wired continuously: the context lives in a [`ReplayCell`], and every
//! 	value pushed into it (including the initial one) assigns each declared input it
//! 	defines. See [`ComponentHandle::next`].

use std::rc::Rc ;
use futures_util::future::{ ready, Ready };
use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;

use crate::{
	ComponentFactory, ComponentHandle, ComponentRef, ComponentType, CompiledModule, Context,
	FactoryResolver, Injector, InstantiationError, ModuleRef, MountNode, MountPoint,
	ReplayCell, ResolutionError, Subscription, SubscriptionSet, ViewContainer, ViewRegistry,
};



/// Errors that can occur while creating and attaching a component.
#[derive( Debug, Error )]
pub enum AttachError {
	/// The component type could not be resolved to a factory.
	#[error( "Resolution Error: {0}" )] Resolution( #[from] ResolutionError ),
	/// The module or component failed to instantiate.
	#[error( "Instantiation Error: {0}" )] Instantiation( #[from] InstantiationError ),
}

/// Where and with what a module's bootstrap component is attached.
#[derive( Default, Clone, Copy )]
pub struct AttachOptions<'a> {
	container: Option<&'a dyn ViewContainer>,
	context: Option<&'a Context>,
}

impl<'a> AttachOptions<'a> {

	pub fn new() -> Self { Self::default() }

	/// Creates the component inside `container`. Without one, the component is mounted on
	/// the engine's fallback mount point.
	pub fn with_container( mut self, container: &'a dyn ViewContainer ) -> Self {
		self.container = Some( container );
		self
	}

	/// Context whose keys are matched against the component's bindings.
	pub fn with_context( mut self, context: &'a Context ) -> Self {
		self.context = Some( context );
		self
	}

}

impl std::fmt::Debug for AttachOptions<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "AttachOptions" )
			.field( "container", &self.container.map(| _ | "<container>" ))
			.field( "context", &self.context )
			.finish()
	}
}

/// [`AttachOptions`] plus the module whose resolver and injector should be used.
#[derive( Default, Clone, Copy, Debug )]
pub struct ComponentOptions<'a> {
	attach: AttachOptions<'a>,
	module: Option<&'a ModuleRef>,
}

impl<'a> ComponentOptions<'a> {

	pub fn new() -> Self { Self::default() }

	pub fn with_container( mut self, container: &'a dyn ViewContainer ) -> Self {
		self.attach = self.attach.with_container( container );
		self
	}

	pub fn with_context( mut self, context: &'a Context ) -> Self {
		self.attach = self.attach.with_context( context );
		self
	}

	/// Resolves the component through `module` and creates it against the module's injector.
	///
	/// Required for component types that arrived with a lazily loaded module.
	pub fn with_module( mut self, module: &'a ModuleRef ) -> Self {
		self.module = Some( module );
		self
	}

}

impl<'a> From<AttachOptions<'a>> for ComponentOptions<'a> {
	fn from( attach: AttachOptions<'a> ) -> Self { Self { attach, module: None }}
}

/// A module instance and, if one was attached, the handle of its bootstrap component.
#[derive( Debug, Clone )]
pub struct CreatedModule {
	pub module: ModuleRef,
	pub component: Option<ComponentHandle>,
}

/// Creates, attaches and binds dynamically loaded components.
///
/// # Example
///
/// ```
/// use std::cell::Cell ;
/// use std::rc::Rc ;
/// use lazy_link::*;
///
/// #[derive( Default )]
/// struct Counter { count: i64, changed: EventEmitter<Value> }
///
/// impl Component for Counter {
/// 	fn set_input( &mut self, name: &str, value: &ContextValue ) {
/// 		if let ( "count", Some( Value::Int( count ))) = ( name, value.as_data() ) {
/// 			self.count = *count ;
/// 		}
/// 	}
/// 	fn output( &self, name: &str ) -> Option<EventEmitter<Value>> {
/// 		( name == "changed" ).then(|| self.changed.clone() )
/// 	}
/// 	fn as_any( &self ) -> &dyn std::any::Any { self }
/// }
///
/// let module = ModuleFactory::new( "CounterModule" )
/// 	.declare( Factory::of::<Counter>( "Counter" ).with_inputs([ "count" ]).with_outputs([ "changed" ]))
/// 	.bootstrap( "Counter" );
///
/// let engine = DynamicComponents::new(
/// 	Rc::new( FactoryRegistry::new() ),
/// 	Rc::new( RootViews::new() ),
/// 	Injector::root(),
/// );
/// let container = ViewContainerRef::new();
///
/// let seen = Rc::new( Cell::new( 0 ));
/// let seen_clone = Rc::clone( &seen );
/// let context = Context::new()
/// 	.with_input( "count", 1 )
/// 	.with_handler( "changed", move | _ | seen_clone.set( seen_clone.get() + 1 ));
///
/// let created = engine.create_and_attach_module(
/// 	&module,
/// 	&Injector::root(),
/// 	AttachOptions::new().with_container( &container ).with_context( &context ),
/// ).unwrap();
/// let handle = created.component.unwrap();
///
/// handle.next( Context::new().with_input( "count", 2 ));
/// let count = handle.component_ref().with_instance(| counter: &Counter | {
/// 	counter.changed.emit( &Value::Null );
/// 	counter.count
/// });
/// assert_eq!( count, Some( 2 ));
/// assert_eq!( seen.get(), 1 );
///
/// handle.detach();
/// assert!( container.is_empty() );
/// ```
pub struct DynamicComponents {
	resolver: Rc<dyn FactoryResolver>,
	views: Rc<dyn ViewRegistry>,
	injector: Injector,
	mount_point: Rc<dyn MountPoint>,
}

impl DynamicComponents {

	/// Creates an engine.
	///
	/// - `resolver`: resolves statically known component types
	/// - `views`: registry that container-less views are attached to
	/// - `injector`: fallback injector for container-less components
	///
	/// The fallback mount point defaults to a fresh [`MountNode::root`].
	pub fn new( resolver: Rc<dyn FactoryResolver>, views: Rc<dyn ViewRegistry>, injector: Injector ) -> Self {
		Self { resolver, views, injector, mount_point: Rc::new( MountNode::root() )}
	}

	/// Sets the node container-less components are appended to.
	pub fn with_mount_point( mut self, mount_point: Rc<dyn MountPoint> ) -> Self {
		self.mount_point = mount_point ;
		self
	}

	#[inline] pub fn injector( &self ) -> &Injector { &self.injector }
	#[inline] pub fn mount_point( &self ) -> &Rc<dyn MountPoint> { &self.mount_point }

	/// Instantiates `compiled` against `injector`.
	///
	/// # Errors
	/// Propagates the module's [`InstantiationError`].
	pub fn create_module(
		&self,
		compiled: &dyn CompiledModule,
		injector: &Injector,
	) -> Result<CreatedModule, InstantiationError> {
		let module = compiled.create( injector )?;
		tracing::debug!( module = module.name(), "Created module" );
		Ok( CreatedModule { module, component: None })
	}

	/// [`create_module`]( Self::create_module ) as a future.
	pub fn create_module_async(
		&self,
		compiled: &dyn CompiledModule,
		injector: &Injector,
	) -> Ready<Result<CreatedModule, InstantiationError>> {
		ready( self.create_module( compiled, injector ))
	}

	/// Instantiates `compiled` and attaches its first bootstrap component.
	///
	/// The component is resolved through the module and created against the module's
	/// injector, so components the module declares locally are found.
	///
	/// # Errors
	/// A module without bootstrap components logs a warning and then fails with
	/// [`ResolutionError::MissingType`]. Other failures are as for
	/// [`create_and_attach_component`]( Self::create_and_attach_component ).
	pub fn create_and_attach_module(
		&self,
		compiled: &dyn CompiledModule,
		injector: &Injector,
		options: AttachOptions<'_>,
	) -> Result<CreatedModule, AttachError> {

		let CreatedModule { module, .. } = self.create_module( compiled, injector )?;

		let component_type = module.bootstrap_components().first().cloned();
		if component_type.is_none() {
			tracing::warn!(
				module = module.name(),
				"Module has no bootstrap component. You must fix this before calling `create_and_attach_module`."
			);
		}

		let options = ComponentOptions::from( options ).with_module( &module );
		let component = self.attach( component_type.as_ref(), options )?;

		Ok( CreatedModule { module, component: Some( component )})

	}

	/// [`create_and_attach_module`]( Self::create_and_attach_module ) as a future.
	///
	/// The work happens synchronously; the returned future is already complete and carries
	/// the original error on failure.
	pub fn create_and_attach_module_async(
		&self,
		compiled: &dyn CompiledModule,
		injector: &Injector,
		options: AttachOptions<'_>,
	) -> Ready<Result<CreatedModule, AttachError>> {
		ready( self.create_and_attach_module( compiled, injector, options ))
	}

	/// Single-call form that keeps only the component handle.
	///
	/// The module instance stays alive for as long as its component does.
	///
	/// # Errors
	/// As for [`create_and_attach_module`]( Self::create_and_attach_module ).
	pub fn create_component_from_module(
		&self,
		compiled: &dyn CompiledModule,
		injector: &Injector,
		options: AttachOptions<'_>,
	) -> Result<ComponentHandle, AttachError> {
		self.create_and_attach_module( compiled, injector, options )?
			.pipe(| CreatedModule { module, component } | component
				.ok_or( AttachError::Resolution( ResolutionError::MissingType ))
				.inspect(| handle | handle.component_ref().on_destroy( move | _ | module.destroy() ))
			)
	}

	/// Creates a component of `component_type`, attaches its view and binds `options`' context.
	///
	/// With a container, the component is created inside it. Without one, it is created
	/// against the engine's injector, attached to the view registry and appended to the
	/// fallback mount point, and a warning is logged.
	///
	/// # Errors
	/// - [`AttachError::Resolution`] if no factory is known for the type
	/// - [`AttachError::Instantiation`] if the factory fails
	pub fn create_and_attach_component(
		&self,
		component_type: &ComponentType,
		options: ComponentOptions<'_>,
	) -> Result<ComponentHandle, AttachError> {
		self.attach( Some( component_type ), options )
	}

	/// [`create_and_attach_component`]( Self::create_and_attach_component ) as a future.
	pub fn create_and_attach_component_async(
		&self,
		component_type: &ComponentType,
		options: ComponentOptions<'_>,
	) -> Ready<Result<ComponentHandle, AttachError>> {
		ready( self.create_and_attach_component( component_type, options ))
	}

	fn resolve_factory(
		&self,
		component_type: Option<&ComponentType>,
		module: Option<&ModuleRef>,
	) -> Result<Rc<dyn ComponentFactory>, ResolutionError> {
		let component_type = component_type.ok_or( ResolutionError::MissingType )?;
		match module {
			Some( module ) => module.resolver().resolve( component_type ),
			None => self.resolver.resolve( component_type ),
		}
	}

	fn attach(
		&self,
		component_type: Option<&ComponentType>,
		ComponentOptions { attach: AttachOptions { container, context }, module }: ComponentOptions<'_>,
	) -> Result<ComponentHandle, AttachError> {

		let factory = self.resolve_factory( component_type, module )?;
		let context = context.cloned().unwrap_or_default();

		let ( component, registry ) = match container {
			Some( container ) => {
				let injector = module.map_or( &self.injector, ModuleRef::injector );
				( container.create_component( factory.as_ref(), injector )?, None )
			},
			None => {
				let component = factory.create( &self.injector )?;
				self.views.attach_view( &component.host_view() );
				component.mount( Rc::clone( &self.mount_point ));
				tracing::warn!(
					component = %factory.component_type(),
					"No view container was provided to `create_and_attach_component`; the component is attached to the root mount point. This is not recommended."
				);
				( component, Some( Rc::clone( &self.views )))
			},
		};

		let subscriptions = SubscriptionSet::new();
		wire_outputs( factory.as_ref(), &component, &context ).into_iter()
			.for_each(| subscription | subscriptions.add( subscription ));

		let context = ReplayCell::new( context );
		subscriptions.add( wire_inputs( &factory, &component, &context ));

		tracing::debug!(
			component = %factory.component_type(),
			view = %component.host_view().id(),
			inputs = %factory.inputs().iter().join( ", " ),
			outputs = %factory.outputs().iter().join( ", " ),
			"Attached component"
		);

		Ok( ComponentHandle::new( component, context, subscriptions, registry ))

	}

}

impl std::fmt::Debug for DynamicComponents {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "DynamicComponents" )
			.field( "injector", &self.injector )
			.finish_non_exhaustive()
	}
}

/// Subscribes every handler in `context` whose name is a declared output.
fn wire_outputs( factory: &dyn ComponentFactory, component: &ComponentRef, context: &Context ) -> Vec<Subscription> {
	factory.outputs().iter()
		.filter_map(| name | context.get( name )
			.and_then( crate::ContextValue::as_handler )
			.map(| handler | ( name, Rc::clone( handler )))
		)
		.filter_map(|( name, handler )| {
			let emitter = component.instance().output( name );
			if emitter.is_none() {
				tracing::warn!( component = %factory.component_type(), output = %name, "Declared output has no emitter" );
			}
			emitter.map(| emitter | emitter.subscribe_shared( handler ))
		})
		.collect()
}

/// Assigns every declared input `context` defines, now and on every later context.
fn wire_inputs( factory: &Rc<dyn ComponentFactory>, component: &ComponentRef, context: &ReplayCell<Context> ) -> Subscription {
	let factory = Rc::clone( factory );
	let component = component.clone();
	context.subscribe( move | context: &Context | {
		if component.is_destroyed() { return }
		let factory = Rc::clone( &factory );
		let context = context.clone();
		component.update( move | instance | factory.inputs().iter()
			.filter_map(| name | context.get( name ).map(| value | ( name, value )))
			.for_each(|( name, value )| instance.set_input( name, value ))
		);
	})
}
