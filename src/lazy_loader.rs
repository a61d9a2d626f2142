//! Declarative lazy loading for a single placeholder.
//!
//! A [`LazyLoader`] sits on a placeholder in the host view. The framework feeds it two
//! things: attribute changes (through [`LazyLoader::on_changes`]) and the "view
//! initialised" lifecycle hook (through [`LazyLoader::after_view_init`]). Once both a
//! module name and a ready view have been seen, the loader loads the module, attaches its
//! bootstrap component into its own view container and emits the resulting
//! [`ComponentHandle`] on [`LazyLoader::init`]. It does this once per directive; later
//! attribute changes do not reload.
//!
//! Tearing the directive down with [`LazyLoader::destroy`] (or dropping it) detaches the
//! component. A load that completes after teardown is discarded without attaching.

use std::cell::{ Cell, RefCell };
use std::collections::HashMap ;
use std::rc::{ Rc, Weak };
use futures_util::task::{ LocalSpawn, LocalSpawnExt, SpawnError };
use thiserror::Error ;

use crate::{
	AttachError, AttachOptions, ComponentHandle, CreatedModule, DynamicComponents, EventEmitter,
	Injector, LoadError, ModuleLoader, Readiness, ReplayCell, ResolutionError, SubscriptionSet,
	ViewContainer,
};



/// Name of the module identifier attribute in [`SimpleChanges`].
pub const MODULE_NAME: &str = "module_name" ;

/// One attribute's change, as reported by the framework.
#[derive( Debug, Clone, PartialEq, Eq, Default )]
pub struct SimpleChange {
	pub previous_value: Option<String>,
	pub current_value: Option<String>,
	pub first_change: bool,
}

impl SimpleChange {
	pub fn new( previous_value: Option<String>, current_value: Option<String>, first_change: bool ) -> Self {
		Self { previous_value, current_value, first_change }
	}
}

/// The attribute changes of one change-detection pass, keyed by attribute name.
#[derive( Debug, Clone, PartialEq, Eq, Default )]
pub struct SimpleChanges( HashMap<String, SimpleChange> );

impl SimpleChanges {

	pub fn new() -> Self { Self::default() }

	pub fn with( mut self, attribute: impl Into<String>, change: SimpleChange ) -> Self {
		self.0.insert( attribute.into(), change );
		self
	}

	#[inline] pub fn get( &self, attribute: &str ) -> Option<&SimpleChange> { self.0.get( attribute )}

	/// The new module name, if this pass changed it.
	pub fn module_name( &self ) -> Option<Option<&str>> {
		self.get( MODULE_NAME ).map(| change | change.current_value.as_deref() )
	}

}

/// Where a [`LazyLoader`] is in its lifecycle.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum LoaderState {
	/// Neither a module name nor a ready view has been seen.
	Idle,
	/// One of the two has been seen.
	WaitingForBoth,
	/// The module is being loaded and attached.
	Loading,
	/// The component is attached.
	Attached,
	/// Loading or attaching failed; see [`LazyLoader::failed`].
	Failed,
	/// The directive was torn down.
	Destroyed,
}

/// What [`LazyLoader::init`] carries.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default )]
pub enum InitPayload {
	/// The created component's handle.
	#[default] Handle,
	/// Nothing; the handle is only kept internally for teardown.
	Silent,
}

/// Errors surfaced on [`LazyLoader::failed`].
#[derive( Debug, Error )]
pub enum LoadAttachError {
	/// The readiness trigger fired while the module name was empty.
	#[error( "No module name set" )] MissingModuleName,
	#[error( "Load Error: {0}" )] Load( #[from] LoadError ),
	#[error( "Attach Error: {0}" )] Attach( #[from] AttachError ),
	/// The load task could not be scheduled.
	#[error( "Spawn Error: {0}" )] Spawn( #[from] SpawnError ),
}

/// Loads a module and attaches its bootstrap component once the host view is ready.
///
/// # Example
///
/// ```
/// use std::rc::Rc ;
/// use futures_executor::LocalPool ;
/// use lazy_link::*;
/// # #[derive( Default )] struct Bar ;
/// # impl Component for Bar {
/// # 	fn set_input( &mut self, _: &str, _: &ContextValue ) {}
/// # 	fn output( &self, _: &str ) -> Option<EventEmitter<Value>> { None }
/// # 	fn as_any( &self ) -> &dyn std::any::Any { self }
/// # }
///
/// let bar_module = ModuleFactory::new( "BarModule" )
/// 	.declare( Factory::of::<Bar>( "Bar" ))
/// 	.bootstrap( "Bar" );
/// let loader = BundleLoader::new(
/// 	StaticBundles::new().with_bundle( "app/bar", [( "BarModuleFactory", Export::Compiled( Rc::new( bar_module )))]),
/// 	LoadStrategy::precompiled(),
/// );
///
/// let mut pool = LocalPool::new();
/// let container = Rc::new( ViewContainerRef::new() );
/// let directive = LazyLoader::new(
/// 	Rc::new( DynamicComponents::new( Rc::new( FactoryRegistry::new() ), Rc::new( RootViews::new() ), Injector::root() )),
/// 	Rc::new( loader ),
/// 	container.clone(),
/// 	Injector::root(),
/// 	Rc::new( pool.spawner() ),
/// );
///
/// directive.set_module_name( "app/bar#BarModule" );
/// directive.after_view_init();
/// pool.run_until_stalled();
///
/// assert_eq!( directive.state(), LoaderState::Attached );
/// assert_eq!( container.len(), 1 );
///
/// directive.destroy();
/// assert!( container.is_empty() );
/// ```
pub struct LazyLoader {
	inner: Rc<LoaderInner>,
}

struct LoaderInner {
	components: Rc<DynamicComponents>,
	loader: Rc<dyn ModuleLoader>,
	container: Rc<dyn ViewContainer>,
	injector: Injector,
	spawner: Rc<dyn LocalSpawn>,
	payload: Cell<InitPayload>,

	module_name: RefCell<Option<String>>,
	changes: ReplayCell<Option<SimpleChanges>>,
	view_ready: ReplayCell<bool>,
	readiness: Cell<Readiness>,
	subscriptions: SubscriptionSet,

	state: Cell<LoaderState>,
	destroyed: Cell<bool>,
	handle: RefCell<Option<ComponentHandle>>,

	init: EventEmitter<Option<ComponentHandle>>,
	failed: EventEmitter<LoadAttachError>,
}

impl LazyLoader {

	/// Creates a directive that attaches into `container`.
	///
	/// - `components`: the binding engine used to attach the loaded module
	/// - `loader`: resolves the module name
	/// - `injector`: parent injector the loaded module is instantiated against
	/// - `spawner`: runs the load on the host's event loop
	pub fn new(
		components: Rc<DynamicComponents>,
		loader: Rc<dyn ModuleLoader>,
		container: Rc<dyn ViewContainer>,
		injector: Injector,
		spawner: Rc<dyn LocalSpawn>,
	) -> Self {

		let inner = Rc::new_cyclic(| weak: &Weak<LoaderInner> | {

			let changes = ReplayCell::new( None );
			let view_ready = ReplayCell::new( false );
			let subscriptions = SubscriptionSet::new();

			let directive = Weak::clone( weak );
			subscriptions.add( changes.subscribe( move | changes: &Option<SimpleChanges> | {
				if let ( Some( directive ), Some( changes )) = ( directive.upgrade(), changes ) {
					directive.attribute_changed( changes );
				}
			}));

			let directive = Weak::clone( weak );
			subscriptions.add( view_ready.subscribe( move | ready: &bool | {
				if let ( Some( directive ), true ) = ( directive.upgrade(), *ready ) {
					directive.view_initialised();
				}
			}));

			LoaderInner {
				components,
				loader,
				container,
				injector,
				spawner,
				payload: Cell::new( InitPayload::default() ),
				module_name: RefCell::new( None ),
				changes,
				view_ready,
				readiness: Cell::new( Readiness::new() ),
				subscriptions,
				state: Cell::new( LoaderState::Idle ),
				destroyed: Cell::new( false ),
				handle: RefCell::new( None ),
				init: EventEmitter::new(),
				failed: EventEmitter::new(),
			}

		});

		Self { inner }

	}

	/// Chooses what [`init`]( Self::init ) carries.
	pub fn with_init_payload( self, payload: InitPayload ) -> Self {
		self.inner.payload.set( payload );
		self
	}

	/// Framework change notification.
	pub fn on_changes( &self, changes: SimpleChanges ) {
		self.inner.changes.next( Some( changes ));
	}

	/// Sets the module identifier attribute, reporting it as a change.
	pub fn set_module_name( &self, module_name: impl Into<String> ) {
		let previous_value = self.module_name();
		let first_change = self.inner.changes.value().is_none();
		self.on_changes( SimpleChanges::new().with( MODULE_NAME, SimpleChange::new(
			previous_value,
			Some( module_name.into() ),
			first_change,
		)));
	}

	/// Framework hook: the host view has been fully initialised.
	pub fn after_view_init( &self ) {
		self.inner.view_ready.next( true );
	}

	/// Tears the directive down: later loads are discarded, every internal subscription is
	/// closed and an attached component is detached. Safe to call more than once.
	pub fn destroy( &self ) { self.inner.destroy() }

	/// The module identifier attribute's latest value.
	pub fn module_name( &self ) -> Option<String> { self.inner.module_name.borrow().clone() }

	#[inline] pub fn state( &self ) -> LoaderState { self.inner.state.get() }
	#[inline] pub fn is_destroyed( &self ) -> bool { self.inner.destroyed.get() }

	/// The attached component, once there is one.
	pub fn handle( &self ) -> Option<ComponentHandle> { self.inner.handle.borrow().clone() }

	/// Fires once, after the component has been attached.
	#[inline] pub fn init( &self ) -> &EventEmitter<Option<ComponentHandle>> { &self.inner.init }

	/// Fires if loading or attaching fails.
	#[inline] pub fn failed( &self ) -> &EventEmitter<LoadAttachError> { &self.inner.failed }

}

impl Drop for LazyLoader {
	fn drop( &mut self ) { self.inner.destroy() }
}

impl std::fmt::Debug for LazyLoader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LazyLoader" )
			.field( "module_name", &self.module_name() )
			.field( "state", &self.state() )
			.field( "readiness", &self.inner.readiness.get() )
			.field( "handle", &self.handle() )
			.finish_non_exhaustive()
	}
}

impl LoaderInner {

	fn attribute_changed( self: &Rc<Self>, changes: &SimpleChanges ) {
		let Some( module_name ) = changes.module_name() else { return };
		*self.module_name.borrow_mut() = module_name.map( str::to_string );
		let mut readiness = self.readiness.get();
		let fire = readiness.attribute_changed( module_name );
		self.advance( readiness, fire );
	}

	fn view_initialised( self: &Rc<Self> ) {
		let mut readiness = self.readiness.get();
		let fire = readiness.view_initialised();
		self.advance( readiness, fire );
	}

	fn advance( self: &Rc<Self>, readiness: Readiness, fire: bool ) {
		self.readiness.set( readiness );
		if readiness.has_fired() && !fire { return }
		match fire {
			true => self.trigger(),
			false => self.state.set( match readiness.is_partial() {
				true => LoaderState::WaitingForBoth,
				false => LoaderState::Idle,
			}),
		}
	}

	fn trigger( self: &Rc<Self> ) {

		let module_name = self.module_name.borrow().clone().filter(| name | !name.is_empty() );
		let Some( module_name ) = module_name else {
			return self.fail( LoadAttachError::MissingModuleName );
		};

		self.state.set( LoaderState::Loading );
		tracing::debug!( module = %module_name, "Host view ready, loading module" );

		let task = load_and_attach( Rc::downgrade( self ), Rc::clone( &self.loader ), module_name );
		if let Err( err ) = self.spawner.spawn_local( task ) {
			self.fail( err.into() );
		}

	}

	fn attached( &self, handle: ComponentHandle ) {
		*self.handle.borrow_mut() = Some( handle.clone() );
		self.state.set( LoaderState::Attached );
		match self.payload.get() {
			InitPayload::Handle => self.init.emit( &Some( handle )),
			InitPayload::Silent => self.init.emit( &None ),
		}
	}

	fn fail( &self, error: LoadAttachError ) {
		tracing::error!( module = ?self.module_name.borrow(), %error, "Lazy loading failed" );
		self.state.set( LoaderState::Failed );
		self.failed.emit( &error );
	}

	fn destroy( &self ) {
		if self.destroyed.replace( true ) { return }
		self.state.set( LoaderState::Destroyed );
		self.subscriptions.unsubscribe_all();
		let handle = self.handle.borrow_mut().take();
		if let Some( handle ) = handle { handle.detach() }
	}

}

/// Loads `module_name` and attaches it into the directive, unless the directive was torn
/// down while the load was in flight.
async fn load_and_attach( directive: Weak<LoaderInner>, loader: Rc<dyn ModuleLoader>, module_name: String ) {

	let loaded = loader.load( &module_name ).await ;

	let Some( directive ) = directive.upgrade() else {
		tracing::debug!( module = %module_name, "Directive dropped while loading; not attaching" );
		return
	};
	if directive.destroyed.get() {
		tracing::debug!( module = %module_name, "Directive destroyed while loading; not attaching" );
		return
	}

	let compiled = match loaded {
		Ok( compiled ) => compiled,
		Err( err ) => return directive.fail( err.into() ),
	};

	let created = directive.components.create_and_attach_module_async(
		compiled.as_ref(),
		&directive.injector,
		AttachOptions::new().with_container( directive.container.as_ref() ),
	).await ;

	match created {
		Ok( CreatedModule { component: Some( handle ), .. }) => directive.attached( handle ),
		Ok( CreatedModule { component: None, .. }) => directive.fail( AttachError::from( ResolutionError::MissingType ).into() ),
		Err( err ) => directive.fail( err.into() ),
	}

}
