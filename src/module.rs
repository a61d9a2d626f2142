//! Compiled modules and their live instances.
//!
//! A [`CompiledModule`] is what a [`ModuleLoader`]( crate::ModuleLoader ) produces. It is
//! instantiated against a parent [`Injector`] into a [`ModuleRef`], which owns a child
//! injector and a resolver for the components the module declares. The module's
//! **bootstrap** components are the ones meant to be shown by default; the first of them
//! is what [`DynamicComponents::create_and_attach_module`]( crate::DynamicComponents::create_and_attach_module )
//! attaches.

use std::cell::{ Cell, RefCell };
use std::rc::Rc ;

use crate::{ ComponentFactory, ComponentType, FactoryRegistry, FactoryResolver, Injector, InstantiationError };



/// A module that has been loaded and compiled, ready to be instantiated.
pub trait CompiledModule {

	/// Module name for diagnostics.
	fn name( &self ) -> &str ;

	/// Instantiates the module against `parent`.
	///
	/// # Errors
	/// Fails if the module's own providers cannot be set up.
	fn create( &self, parent: &Injector ) -> Result<ModuleRef, InstantiationError> ;

}

type Providers = Rc<dyn Fn( Injector ) -> Result<Injector, InstantiationError>>;

/// A [`CompiledModule`] declaring a fixed set of component factories.
///
/// ```
/// use lazy_link::{ CompiledModule, Factory, Injector, ModuleFactory };
/// # use lazy_link::{ Component, ContextValue, EventEmitter, Value };
/// # #[derive( Default )] struct Panel ;
/// # impl Component for Panel {
/// # 	fn set_input( &mut self, _: &str, _: &ContextValue ) {}
/// # 	fn output( &self, _: &str ) -> Option<EventEmitter<Value>> { None }
/// # 	fn as_any( &self ) -> &dyn std::any::Any { self }
/// # }
///
/// let module = ModuleFactory::new( "PanelModule" )
/// 	.declare( Factory::of::<Panel>( "Panel" ))
/// 	.bootstrap( "Panel" );
///
/// let module_ref = module.create( &Injector::root() ).unwrap();
/// assert_eq!( module_ref.bootstrap_components()[0].name(), "Panel" );
/// assert!( module_ref.resolver().resolve( &"Panel".into() ).is_ok() );
/// ```
#[derive( Clone )]
pub struct ModuleFactory {
	name: String,
	registry: FactoryRegistry,
	bootstrap: Vec<ComponentType>,
	providers: Option<Providers>,
}

impl ModuleFactory {

	pub fn new( name: impl Into<String> ) -> Self {
		Self {
			name: name.into(),
			registry: FactoryRegistry::new(),
			bootstrap: Vec::with_capacity( 0 ),
			providers: None,
		}
	}

	/// Declares a component of this module, making it resolvable through the module.
	pub fn declare( mut self, factory: impl ComponentFactory + 'static ) -> Self {
		self.registry.register( factory );
		self
	}

	/// Appends a bootstrap component type.
	pub fn bootstrap( mut self, component_type: impl Into<ComponentType> ) -> Self {
		self.bootstrap.push( component_type.into() );
		self
	}

	/// Sets up the module's own services on the module injector at instantiation.
	pub fn with_providers(
		mut self,
		providers: impl Fn( Injector ) -> Result<Injector, InstantiationError> + 'static,
	) -> Self {
		self.providers = Some( Rc::new( providers ));
		self
	}

	#[inline] pub fn declarations( &self ) -> &FactoryRegistry { &self.registry }

}

impl CompiledModule for ModuleFactory {

	#[inline] fn name( &self ) -> &str { &self.name }

	fn create( &self, parent: &Injector ) -> Result<ModuleRef, InstantiationError> {
		let injector = parent.child().named( self.name.clone() );
		let injector = match &self.providers {
			Some( providers ) => providers( injector )?,
			None => injector,
		};
		Ok( ModuleRef::new(
			self.name.clone(),
			injector,
			Rc::new( self.registry.clone() ),
			self.bootstrap.clone(),
		))
	}

}

impl std::fmt::Debug for ModuleFactory {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ModuleFactory" )
			.field( "name", &self.name )
			.field( "registry", &self.registry )
			.field( "bootstrap", &self.bootstrap )
			.field( "providers", &self.providers.as_ref().map(| _ | "<closure>" ))
			.finish()
	}
}

/// A live module instance.
///
/// Never destroyed by this crate; whoever created it calls [`destroy`]( Self::destroy )
/// when the module is no longer needed.
#[derive( Clone )]
pub struct ModuleRef {
	inner: Rc<ModuleRefInner>,
}

struct ModuleRefInner {
	name: String,
	injector: Injector,
	resolver: Rc<dyn FactoryResolver>,
	bootstrap: Vec<ComponentType>,
	destroyed: Cell<bool>,
	on_destroy: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl ModuleRef {

	pub fn new(
		name: impl Into<String>,
		injector: Injector,
		resolver: Rc<dyn FactoryResolver>,
		bootstrap: Vec<ComponentType>,
	) -> Self {
		Self { inner: Rc::new( ModuleRefInner {
			name: name.into(),
			injector,
			resolver,
			bootstrap,
			destroyed: Cell::new( false ),
			on_destroy: RefCell::new( Vec::with_capacity( 0 )),
		})}
	}

	#[inline] pub fn name( &self ) -> &str { &self.inner.name }
	/// The module's own injector; components of this module are created against it.
	#[inline] pub fn injector( &self ) -> &Injector { &self.inner.injector }
	/// Resolves the components this module declares.
	#[inline] pub fn resolver( &self ) -> &Rc<dyn FactoryResolver> { &self.inner.resolver }
	#[inline] pub fn bootstrap_components( &self ) -> &[ComponentType] { &self.inner.bootstrap }
	#[inline] pub fn is_destroyed( &self ) -> bool { self.inner.destroyed.get() }

	/// Registers a callback run once when the module is destroyed.
	pub fn on_destroy( &self, callback: impl FnOnce() + 'static ) {
		match self.is_destroyed() {
			true => callback(),
			false => self.inner.on_destroy.borrow_mut().push( Box::new( callback )),
		}
	}

	/// Destroys the module, running its destroy callbacks. Later calls do nothing.
	pub fn destroy( &self ) {
		if self.inner.destroyed.replace( true ) { return }
		let callbacks = std::mem::take( &mut *self.inner.on_destroy.borrow_mut() );
		callbacks.into_iter().for_each(| callback | callback() );
	}

}

impl std::fmt::Debug for ModuleRef {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ModuleRef" )
			.field( "name", &self.inner.name )
			.field( "injector", &self.inner.injector )
			.field( "bootstrap", &self.inner.bootstrap )
			.field( "destroyed", &self.is_destroyed() )
			.finish_non_exhaustive()
	}
}
