//! Caller-facing handles to dynamically created components.

use std::cell::Cell ;
use std::rc::Rc ;

use crate::{ ComponentRef, Context, ReplayCell, SubscriptionSet, ViewRegistry };



/// Caller-facing lifecycle of one dynamically created component.
///
/// Returned by [`DynamicComponents::create_and_attach_component`]( crate::DynamicComponents::create_and_attach_component )
/// and friends. Cloning yields another handle to the same lifecycle, so the creator and
/// e.g. a [`LazyLoader`]( crate::LazyLoader ) consumer can both hold one.
#[derive( Clone )]
pub struct ComponentHandle {
	inner: Rc<HandleInner>,
}

struct HandleInner {
	component: ComponentRef,
	context: ReplayCell<Context>,
	subscriptions: SubscriptionSet,
	/// Set when the view was attached to the registry by hand rather than through a container.
	registry: Option<Rc<dyn ViewRegistry>>,
	detached: Cell<bool>,
}

impl ComponentHandle {

	pub(crate) fn new(
		component: ComponentRef,
		context: ReplayCell<Context>,
		subscriptions: SubscriptionSet,
		registry: Option<Rc<dyn ViewRegistry>>,
	) -> Self {
		Self { inner: Rc::new( HandleInner {
			component,
			context,
			subscriptions,
			registry,
			detached: Cell::new( false ),
		})}
	}

	/// Replaces the context and re-applies every declared input it defines.
	///
	/// This is a replacement, not a merge: inputs missing from `context` keep whatever
	/// value they last received. Outputs are not re-wired. Does nothing once detached.
	///
	/// Called from one of the component's own output handlers, the new context is applied
	/// after the one currently being applied.
	pub fn next( &self, context: Context ) {
		if self.inner.detached.get() {
			tracing::debug!( component = %self.inner.component.component_type(), "Ignoring context update on a detached component" );
			return
		}
		self.inner.context.next( context );
	}

	/// Destroys the component and closes every binding subscription.
	///
	/// Manually attached views are detached from the view registry first. Calling this
	/// more than once is harmless. Called while the instance is borrowed, e.g. from one of
	/// its output handlers, the instance's `on_destroy` runs once that borrow is released.
	pub fn detach( &self ) {
		if self.inner.detached.replace( true ) { return }
		let view = self.inner.component.host_view();
		if let Some( registry ) = &self.inner.registry { registry.detach_view( &view ) }
		self.inner.component.destroy();
		self.inner.subscriptions.unsubscribe_all();
		tracing::debug!( component = %self.inner.component.component_type(), view = %view.id(), "Detached component" );
	}

	/// The underlying component, for callers that need direct access.
	#[inline] pub fn component_ref( &self ) -> &ComponentRef { &self.inner.component }

	/// The context most recently passed in.
	pub fn context( &self ) -> Rc<Context> { self.inner.context.value() }

	#[inline] pub fn is_detached( &self ) -> bool { self.inner.detached.get() }

	/// Number of live binding subscriptions, one per wired output plus one for inputs.
	pub fn subscription_count( &self ) -> usize {
		match self.inner.subscriptions.is_closed() {
			true => 0,
			false => self.inner.subscriptions.len(),
		}
	}

	/// Whether both handles share the same lifecycle.
	#[inline] pub fn ptr_eq( &self, other: &ComponentHandle ) -> bool { Rc::ptr_eq( &self.inner, &other.inner )}

}

impl std::fmt::Debug for ComponentHandle {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ComponentHandle" )
			.field( "component", &self.inner.component )
			.field( "manually_attached", &self.inner.registry.is_some() )
			.field( "subscriptions", &self.subscription_count() )
			.field( "detached", &self.is_detached() )
			.finish_non_exhaustive()
	}
}
