//! Subscription handles and the sets that own them.

use std::cell::{ Cell, RefCell };
use std::rc::Rc ;



/// A live registration with an [`EventEmitter`]( crate::EventEmitter ) or
/// [`ReplayCell`]( crate::ReplayCell ).
///
/// Cloning yields another handle to the same registration. Unsubscribing is idempotent:
/// the teardown runs exactly once, no matter how many clones call it.
#[derive( Clone )]
pub struct Subscription {
	inner: Rc<SubscriptionInner>,
}

struct SubscriptionInner {
	closed: Cell<bool>,
	teardown: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {

	/// Creates a subscription that runs `teardown` when first unsubscribed.
	pub fn new( teardown: impl FnOnce() + 'static ) -> Self {
		Self { inner: Rc::new( SubscriptionInner {
			closed: Cell::new( false ),
			teardown: RefCell::new( Some( Box::new( teardown ))),
		})}
	}

	/// A subscription that is already closed.
	pub fn closed() -> Self {
		Self { inner: Rc::new( SubscriptionInner {
			closed: Cell::new( true ),
			teardown: RefCell::new( None ),
		})}
	}

	#[inline] pub fn is_closed( &self ) -> bool { self.inner.closed.get() }

	pub fn unsubscribe( &self ) {
		if self.inner.closed.replace( true ) { return }
		// NOTE: the teardown is taken out before running so it may re-enter this subscription
		let teardown = self.inner.teardown.borrow_mut().take();
		if let Some( teardown ) = teardown { teardown() }
	}

}

impl std::fmt::Debug for Subscription {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Subscription" )
			.field( "closed", &self.is_closed() )
			.finish_non_exhaustive()
	}
}

/// All subscriptions owned by one lifecycle, torn down together.
#[derive( Default, Debug )]
pub struct SubscriptionSet {
	subscriptions: RefCell<Vec<Subscription>>,
	closed: Cell<bool>,
}

impl SubscriptionSet {

	pub fn new() -> Self { Self::default() }

	/// Adds a subscription to the set.
	///
	/// If the set has already been torn down, the subscription is closed immediately.
	pub fn add( &self, subscription: Subscription ) {
		match self.closed.get() {
			true => subscription.unsubscribe(),
			false => self.subscriptions.borrow_mut().push( subscription ),
		}
	}

	/// Unsubscribes every member that is still open. Safe to call more than once.
	pub fn unsubscribe_all( &self ) {
		self.closed.set( true );
		let subscriptions = std::mem::take( &mut *self.subscriptions.borrow_mut() );
		subscriptions.iter()
			.filter(| subscription | !subscription.is_closed() )
			.for_each( Subscription::unsubscribe );
	}

	#[inline] pub fn is_closed( &self ) -> bool { self.closed.get() }
	#[inline] pub fn len( &self ) -> usize { self.subscriptions.borrow().len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.subscriptions.borrow().is_empty() }

}

impl Extend<Subscription> for SubscriptionSet {
	fn extend<I: IntoIterator<Item = Subscription>>( &mut self, iter: I ) {
		iter.into_iter().for_each(| subscription | self.add( subscription ));
	}
}
