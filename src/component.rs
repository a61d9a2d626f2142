//! Component instances, their factories and the references that own them.
//!
//! A component declares named **inputs** (settable properties) and **outputs**
//! (subscribable events) through its [`ComponentFactory`]. The factory is what the
//! binding engine inspects; the [`Component`] instance only has to accept inputs and hand
//! out its output emitters by name.

use std::any::Any ;
use std::cell::{ Cell, Ref, RefCell };
use std::collections::VecDeque ;
use std::ops::Deref ;
use std::rc::Rc ;
use std::sync::atomic::{ AtomicU64, Ordering };
use thiserror::Error ;

use crate::{ ContextValue, EventEmitter, Injector, Value };
use crate::view::MountPoint ;



/// Identifies a component type for factory resolution.
#[derive( Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct ComponentType( Rc<str> );

impl ComponentType {
	pub fn new( name: impl AsRef<str> ) -> Self { Self( Rc::from( name.as_ref() ))}
	#[inline] pub fn name( &self ) -> &str { &self.0 }
}

impl std::fmt::Display for ComponentType {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { f.write_str( &self.0 )}
}

impl From<&str> for ComponentType {
	fn from( name: &str ) -> Self { Self::new( name )}
}

impl From<String> for ComponentType {
	fn from( name: String ) -> Self { Self::new( name )}
}

/// A live component instance.
///
/// Implemented by the dynamically loaded code. Input names passed to
/// [`set_input`]( Self::set_input ) and output names passed to [`output`]( Self::output )
/// are always ones the component's factory declared.
pub trait Component: Any {

	/// Assigns a new value to a declared input.
	fn set_input( &mut self, name: &str, value: &ContextValue );

	/// Returns the emitter behind a declared output.
	fn output( &self, name: &str ) -> Option<EventEmitter<Value>> ;

	/// Called once when the owning [`ComponentRef`] is destroyed.
	fn on_destroy( &mut self ) {}

	/// Upcast used by [`ComponentRef::with_instance`] to reach the concrete type.
	fn as_any( &self ) -> &dyn Any ;

}

/// Failure raised while instantiating a module or component.
#[derive( Debug, Error )]
#[error( "Failed to instantiate {target}: {source}" )]
pub struct InstantiationError {
	target: String,
	#[source] source: Box<dyn std::error::Error>,
}

impl InstantiationError {
	pub fn new( target: impl Into<String>, source: impl Into<Box<dyn std::error::Error>> ) -> Self {
		Self { target: target.into(), source: source.into() }
	}
	/// What was being instantiated.
	#[inline] pub fn target( &self ) -> &str { &self.target }
}

/// Knows the bindings of a component type and how to create instances of it.
pub trait ComponentFactory {

	fn component_type( &self ) -> &ComponentType ;

	/// Declared input binding names.
	fn inputs( &self ) -> &[String] ;

	/// Declared output binding names.
	fn outputs( &self ) -> &[String] ;

	/// Creates a new instance against `injector`.
	///
	/// # Errors
	/// Fails if the component cannot be constructed, e.g. a required service is missing.
	fn create( &self, injector: &Injector ) -> Result<ComponentRef, InstantiationError> ;

}

type Constructor = Box<dyn Fn( &Injector ) -> Result<Box<dyn Component>, InstantiationError>>;

/// A [`ComponentFactory`] backed by a constructor closure.
///
/// ```
/// use std::any::Any ;
/// use lazy_link::{ Component, ComponentFactory, ContextValue, EventEmitter, Factory, Injector, Value };
///
/// #[derive( Default )]
/// struct Badge { text: String }
///
/// impl Component for Badge {
/// 	fn set_input( &mut self, name: &str, value: &ContextValue ) {
/// 		if let ( "text", Some( Value::Str( text ))) = ( name, value.as_data() ) {
/// 			self.text = text.clone();
/// 		}
/// 	}
/// 	fn output( &self, _name: &str ) -> Option<EventEmitter<Value>> { None }
/// 	fn as_any( &self ) -> &dyn Any { self }
/// }
///
/// let factory = Factory::of::<Badge>( "Badge" ).with_inputs([ "text" ]);
/// let component = factory.create( &Injector::root() ).unwrap();
/// assert_eq!( factory.inputs(), [ "text".to_string() ]);
/// assert!( component.with_instance(| badge: &Badge | badge.text.is_empty() ).unwrap() );
/// ```
pub struct Factory {
	component_type: ComponentType,
	inputs: Vec<String>,
	outputs: Vec<String>,
	constructor: Constructor,
}

impl Factory {

	/// Creates a factory for `component_type` that builds instances with `constructor`.
	pub fn new(
		component_type: impl Into<ComponentType>,
		constructor: impl Fn( &Injector ) -> Result<Box<dyn Component>, InstantiationError> + 'static,
	) -> Self {
		Self {
			component_type: component_type.into(),
			inputs: Vec::with_capacity( 0 ),
			outputs: Vec::with_capacity( 0 ),
			constructor: Box::new( constructor ),
		}
	}

	/// Shorthand for a component constructed through [`Default`].
	pub fn of<C: Component + Default>( component_type: impl Into<ComponentType> ) -> Self {
		Self::new( component_type, | _ | Ok( Box::new( C::default() ) as Box<dyn Component> ))
	}

	pub fn with_inputs( mut self, inputs: impl IntoIterator<Item = impl Into<String>> ) -> Self {
		self.inputs = inputs.into_iter().map( Into::into ).collect();
		self
	}

	pub fn with_outputs( mut self, outputs: impl IntoIterator<Item = impl Into<String>> ) -> Self {
		self.outputs = outputs.into_iter().map( Into::into ).collect();
		self
	}

}

impl ComponentFactory for Factory {
	#[inline] fn component_type( &self ) -> &ComponentType { &self.component_type }
	#[inline] fn inputs( &self ) -> &[String] { &self.inputs }
	#[inline] fn outputs( &self ) -> &[String] { &self.outputs }
	fn create( &self, injector: &Injector ) -> Result<ComponentRef, InstantiationError> {
		let instance = ( self.constructor )( injector )?;
		Ok( ComponentRef::new( self.component_type.clone(), instance ))
	}
}

impl std::fmt::Debug for Factory {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Factory" )
			.field( "component_type", &self.component_type )
			.field( "inputs", &self.inputs )
			.field( "outputs", &self.outputs )
			.finish_non_exhaustive()
	}
}

/// Unique id of a host view. Also identifies the view's root node on a mount point.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct ViewId( u64 );

impl ViewId {
	fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new( 1 );
		Self( NEXT.fetch_add( 1, Ordering::Relaxed ))
	}
}

impl std::fmt::Display for ViewId {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "view#{}", self.0 )}
}

/// The view hosting one component instance.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct HostView {
	id: ViewId,
}

impl HostView {
	#[inline] pub fn id( &self ) -> ViewId { self.id }
	/// The node inserted into the rendered surface for this view.
	#[inline] pub fn root_node( &self ) -> ViewId { self.id }
}

/// Owning reference to a live component instance and its host view.
///
/// Cloning yields another reference to the same instance. [`destroy`]( Self::destroy )
/// runs once; later calls do nothing.
#[derive( Clone )]
pub struct ComponentRef {
	inner: Rc<ComponentRefInner>,
}

struct ComponentRefInner {
	component_type: ComponentType,
	host_view: HostView,
	instance: RefCell<Box<dyn Component>>,
	pending: RefCell<VecDeque<Box<dyn FnOnce( &mut dyn Component )>>>,
	destroyed: Cell<bool>,
	mount: RefCell<Option<Rc<dyn MountPoint>>>,
	on_destroy: RefCell<Vec<Box<dyn FnOnce( &HostView )>>>,
}

impl ComponentRef {

	pub fn new( component_type: ComponentType, instance: Box<dyn Component> ) -> Self {
		Self { inner: Rc::new( ComponentRefInner {
			component_type,
			host_view: HostView { id: ViewId::next() },
			instance: RefCell::new( instance ),
			pending: RefCell::new( VecDeque::new() ),
			destroyed: Cell::new( false ),
			mount: RefCell::new( None ),
			on_destroy: RefCell::new( Vec::with_capacity( 0 )),
		})}
	}

	#[inline] pub fn component_type( &self ) -> &ComponentType { &self.inner.component_type }
	#[inline] pub fn host_view( &self ) -> HostView { self.inner.host_view }
	#[inline] pub fn is_destroyed( &self ) -> bool { self.inner.destroyed.get() }

	/// Borrows the instance.
	///
	/// Updates requested while the borrow is held, such as a detach issued from an output
	/// handler, are applied once it is released.
	///
	/// # Panics
	/// Panics if the instance is currently borrowed mutably, e.g. from inside one of its
	/// own `set_input` calls.
	pub fn instance( &self ) -> InstanceRef<'_> {
		InstanceRef { instance: self.inner.instance.borrow(), _flush: FlushPending( self )}
	}

	/// Runs `f` with the instance downcast to `C`, or returns `None` for another type.
	pub fn with_instance<C: Component, R>( &self, f: impl FnOnce( &C ) -> R ) -> Option<R> {
		self.instance().as_any().downcast_ref::<C>().map( f )
	}

	/// Applies `update` to the instance now, or as soon as the borrow currently held on it
	/// is released. Updates run in the order they were requested.
	pub(crate) fn update( &self, update: impl FnOnce( &mut dyn Component ) + 'static ) {
		self.inner.pending.borrow_mut().push_back( Box::new( update ));
		self.flush_pending();
	}

	fn flush_pending( &self ) {
		loop {
			let Ok( mut instance ) = self.inner.instance.try_borrow_mut() else { return };
			let next = self.inner.pending.borrow_mut().pop_front();
			let Some( update ) = next else { return };
			update( &mut **instance );
		}
	}

	/// Appends this view's root node to `mount_point`; it is removed again on destroy.
	pub(crate) fn mount( &self, mount_point: Rc<dyn MountPoint> ) {
		mount_point.append_child( self.inner.host_view.root_node() );
		*self.inner.mount.borrow_mut() = Some( mount_point );
	}

	/// Registers a callback run once when this component is destroyed.
	///
	/// Runs immediately if the component is already destroyed.
	pub fn on_destroy( &self, callback: impl FnOnce( &HostView ) + 'static ) {
		match self.is_destroyed() {
			true => callback( &self.inner.host_view ),
			false => self.inner.on_destroy.borrow_mut().push( Box::new( callback )),
		}
	}

	/// Destroys the instance, removes its root node if it was mounted manually and
	/// notifies destroy listeners.
	pub fn destroy( &self ) {
		if self.inner.destroyed.replace( true ) { return }
		self.update(| instance | instance.on_destroy() );
		if let Some( mount_point ) = self.inner.mount.borrow_mut().take() {
			mount_point.remove_child( self.inner.host_view.root_node() );
		}
		let callbacks = std::mem::take( &mut *self.inner.on_destroy.borrow_mut() );
		callbacks.into_iter().for_each(| callback | callback( &self.inner.host_view ));
	}

	/// Whether both references point at the same instance.
	#[inline] pub fn ptr_eq( &self, other: &ComponentRef ) -> bool { Rc::ptr_eq( &self.inner, &other.inner )}

}

impl std::fmt::Debug for ComponentRef {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ComponentRef" )
			.field( "component_type", &self.inner.component_type )
			.field( "host_view", &self.inner.host_view )
			.field( "destroyed", &self.is_destroyed() )
			.finish_non_exhaustive()
	}
}

/// Shared borrow of a component instance handed out by [`ComponentRef::instance`].
///
/// Dropping it applies any updates that were requested while it was held.
pub struct InstanceRef<'a> {
	instance: Ref<'a, Box<dyn Component>>,
	_flush: FlushPending<'a>,
}

impl Deref for InstanceRef<'_> {
	type Target = dyn Component ;
	fn deref( &self ) -> &Self::Target { &**self.instance }
}

impl std::fmt::Debug for InstanceRef<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "InstanceRef" ).finish_non_exhaustive()
	}
}

// Declared after the borrow so it drops once the borrow is released
struct FlushPending<'a>( &'a ComponentRef );

impl Drop for FlushPending<'_> {
	fn drop( &mut self ) { self.0.flush_pending(); }
}
