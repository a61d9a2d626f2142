//! Places in the live view tree where dynamically created components end up.
//!
//! - [`ViewContainer`]: a slot in the view tree that creates components into itself and
//! 	forgets them again when they are destroyed. This is the normal attach path.
//! - [`ViewRegistry`]: the application-wide registry of root views, used when a component
//! 	is attached without a container.
//! - [`MountPoint`]: the node of the rendered surface that container-less components are
//! 	appended to.
//!
//! Each trait comes with an in-memory implementation that keeps just enough state to be
//! observed from tests and demos.

use std::cell::RefCell ;
use std::rc::{ Rc, Weak };
use itertools::Itertools ;

use crate::{ ComponentFactory, ComponentRef, HostView, Injector, InstantiationError, ViewId };



/// A location in the view tree that can host dynamically created components.
pub trait ViewContainer {

	/// Creates a component from `factory` as a child of this container.
	///
	/// # Errors
	/// Propagates the factory's [`InstantiationError`].
	fn create_component(
		&self,
		factory: &dyn ComponentFactory,
		injector: &Injector,
	) -> Result<ComponentRef, InstantiationError> ;

}

/// Application-wide registry of views that have no parent container.
pub trait ViewRegistry {
	fn attach_view( &self, view: &HostView );
	fn detach_view( &self, view: &HostView );
}

/// A node of the rendered surface that view root nodes can be appended to.
pub trait MountPoint {
	fn append_child( &self, node: ViewId );
	fn remove_child( &self, node: ViewId );
}

/// In-memory [`ViewContainer`] keeping its children in insertion order.
#[derive( Clone, Default )]
pub struct ViewContainerRef {
	views: Rc<RefCell<Vec<ComponentRef>>>,
}

impl ViewContainerRef {

	pub fn new() -> Self { Self::default() }

	/// Number of live child views.
	pub fn len( &self ) -> usize { self.views.borrow().len() }
	pub fn is_empty( &self ) -> bool { self.views.borrow().is_empty() }

	/// Returns the child at `index`.
	pub fn get( &self, index: usize ) -> Option<ComponentRef> { self.views.borrow().get( index ).cloned() }

	/// Destroys every child view.
	pub fn clear( &self ) {
		let views = self.views.borrow().clone();
		views.iter().for_each( ComponentRef::destroy );
	}

}

impl ViewContainer for ViewContainerRef {
	fn create_component(
		&self,
		factory: &dyn ComponentFactory,
		injector: &Injector,
	) -> Result<ComponentRef, InstantiationError> {
		let component = factory.create( injector )?;
		self.views.borrow_mut().push( component.clone() );
		let views: Weak<RefCell<Vec<ComponentRef>>> = Rc::downgrade( &self.views );
		component.on_destroy( move | view | if let Some( views ) = views.upgrade() {
			views.borrow_mut().retain(| child | child.host_view() != *view );
		});
		Ok( component )
	}
}

impl std::fmt::Debug for ViewContainerRef {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ViewContainerRef" )
			.field( "views", &self.views.borrow().iter().map( ComponentRef::host_view ).collect_vec() )
			.finish()
	}
}

/// In-memory [`ViewRegistry`].
#[derive( Debug, Default )]
pub struct RootViews {
	views: RefCell<Vec<ViewId>>,
}

impl RootViews {
	pub fn new() -> Self { Self::default() }
	pub fn contains( &self, view: ViewId ) -> bool { self.views.borrow().contains( &view )}
	pub fn views( &self ) -> Vec<ViewId> { self.views.borrow().clone() }
}

impl ViewRegistry for RootViews {
	fn attach_view( &self, view: &HostView ) {
		let mut views = self.views.borrow_mut();
		if !views.contains( &view.id() ) { views.push( view.id() ) }
	}
	fn detach_view( &self, view: &HostView ) {
		self.views.borrow_mut().retain(| id | *id != view.id() );
	}
}

/// In-memory [`MountPoint`] recording its children in order.
#[derive( Debug, Default )]
pub struct MountNode {
	name: String,
	children: RefCell<Vec<ViewId>>,
}

impl MountNode {

	/// A mount node with the given name.
	pub fn new( name: impl Into<String> ) -> Self {
		Self { name: name.into(), children: RefCell::new( Vec::new() )}
	}

	/// The root of the rendered surface, the default fallback mount point.
	pub fn root() -> Self { Self::new( "body" )}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	pub fn children( &self ) -> Vec<ViewId> { self.children.borrow().clone() }
	pub fn contains( &self, node: ViewId ) -> bool { self.children.borrow().contains( &node )}

}

impl MountPoint for MountNode {
	fn append_child( &self, node: ViewId ) {
		let mut children = self.children.borrow_mut();
		children.retain(| child | *child != node );
		children.push( node );
	}
	fn remove_child( &self, node: ViewId ) {
		self.children.borrow_mut().retain(| child | *child != node );
	}
}
