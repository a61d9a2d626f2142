//! Synchronous event emitters.
//!
//! Components expose their outputs as [`EventEmitter<Value>`]( crate::Value )s; the
//! [`LazyLoader`]( crate::LazyLoader ) exposes its `init` and `failed` events the same way.
//! Emission is synchronous: every observer registered at the time of the call runs before
//! [`EventEmitter::emit`] returns.

use std::cell::{ Cell, RefCell };
use std::rc::{ Rc, Weak };

use crate::subscription::Subscription ;



type Observer<T> = Rc<dyn Fn( &T )>;

/// Observer list shared by [`EventEmitter`] and [`ReplayCell`]( crate::ReplayCell ).
pub(crate) struct Observers<T> {
	list: RefCell<Vec<( u64, Observer<T> )>>,
	next_id: Cell<u64>,
}

impl<T: 'static> Observers<T> {

	pub(crate) fn new() -> Rc<Self> {
		Rc::new( Self { list: RefCell::new( Vec::new() ), next_id: Cell::new( 0 )})
	}

	pub(crate) fn add( self: &Rc<Self>, observer: Observer<T> ) -> Subscription {
		let id = self.next_id.get();
		self.next_id.set( id + 1 );
		self.list.borrow_mut().push(( id, observer ));
		let weak: Weak<Self> = Rc::downgrade( self );
		Subscription::new( move || if let Some( observers ) = weak.upgrade() {
			observers.list.borrow_mut().retain(|( observer_id, _ )| *observer_id != id );
		})
	}

	/// Notifies a snapshot of the observers, so callbacks may (un)subscribe while running.
	pub(crate) fn notify( &self, value: &T ) {
		let snapshot = self.list.borrow().iter()
			.map(|( _, observer )| Rc::clone( observer ))
			.collect::<Vec<_>>();
		snapshot.iter().for_each(| observer | observer( value ));
	}

	pub(crate) fn len( &self ) -> usize { self.list.borrow().len() }

}

/// A multicast, synchronous event source.
///
/// Cloning yields another handle to the same emitter.
///
/// ```
/// use std::cell::Cell ;
/// use std::rc::Rc ;
/// use lazy_link::EventEmitter ;
///
/// let clicks = EventEmitter::<u32>::new();
/// let seen = Rc::new( Cell::new( 0 ));
/// let seen_clone = Rc::clone( &seen );
/// let subscription = clicks.subscribe( move | n | seen_clone.set( seen_clone.get() + n ));
///
/// clicks.emit( &2 );
/// subscription.unsubscribe();
/// clicks.emit( &5 );
/// assert_eq!( seen.get(), 2 );
/// ```
pub struct EventEmitter<T> {
	observers: Rc<Observers<T>>,
}

impl<T: 'static> EventEmitter<T> {

	pub fn new() -> Self { Self { observers: Observers::new() }}

	/// Registers `observer` for every future emission.
	pub fn subscribe( &self, observer: impl Fn( &T ) + 'static ) -> Subscription {
		self.observers.add( Rc::new( observer ))
	}

	/// Same as [`subscribe`]( Self::subscribe ) for an already shared callback.
	pub fn subscribe_shared( &self, observer: Rc<dyn Fn( &T )> ) -> Subscription {
		self.observers.add( observer )
	}

	pub fn emit( &self, value: &T ) { self.observers.notify( value ) }

	/// Number of live subscriptions.
	pub fn observer_count( &self ) -> usize { self.observers.len() }

}

impl<T: 'static> Default for EventEmitter<T> {
	fn default() -> Self { Self::new() }
}

impl<T> Clone for EventEmitter<T> {
	fn clone( &self ) -> Self { Self { observers: Rc::clone( &self.observers )}}
}

impl<T: 'static> std::fmt::Debug for EventEmitter<T> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "EventEmitter" )
			.field( "observers", &self.observer_count() )
			.finish()
	}
}
