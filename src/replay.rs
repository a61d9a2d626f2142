//! Single-slot replay cell.

use std::cell::{ Cell, RefCell };
use std::collections::VecDeque ;
use std::rc::Rc ;

use crate::emitter::Observers ;
use crate::subscription::Subscription ;



/// Holds the latest value and pushes every new one synchronously to its observers.
///
/// A new subscriber is called with the current value before [`subscribe`]( Self::subscribe )
/// returns, and with every later value in the order [`next`]( Self::next ) was called.
/// A value pushed from inside an observer is delivered once every observer has seen the
/// value being delivered.
///
/// ```
/// use std::cell::{ Cell, RefCell };
/// use std::collections::VecDeque ;
/// use std::rc::Rc ;
/// use lazy_link::ReplayCell ;
///
/// let cell = ReplayCell::new( 1 );
/// let seen = Rc::new( RefCell::new( Vec::new() ));
/// let seen_clone = Rc::clone( &seen );
/// let _subscription = cell.subscribe( move | value | seen_clone.borrow_mut().push( *value ));
///
/// cell.next( 2 );
/// assert_eq!( *seen.borrow(), vec![ 1, 2 ]);
/// assert_eq!( *cell.value(), 2 );
/// ```
pub struct ReplayCell<T> {
	current: RefCell<Rc<T>>,
	queued: RefCell<VecDeque<T>>,
	notifying: Cell<bool>,
	observers: Rc<Observers<T>>,
}

impl<T: 'static> ReplayCell<T> {

	pub fn new( initial: T ) -> Self {
		Self {
			current: RefCell::new( Rc::new( initial )),
			queued: RefCell::new( VecDeque::new() ),
			notifying: Cell::new( false ),
			observers: Observers::new(),
		}
	}

	/// The latest value.
	pub fn value( &self ) -> Rc<T> { Rc::clone( &self.current.borrow() )}

	/// Replaces the current value and notifies every observer with it.
	pub fn next( &self, value: T ) {
		self.queued.borrow_mut().push_back( value );
		if self.notifying.replace( true ) { return }
		loop {
			let next = self.queued.borrow_mut().pop_front();
			let Some( value ) = next else { break };
			let value = Rc::new( value );
			*self.current.borrow_mut() = Rc::clone( &value );
			self.observers.notify( &*value );
		}
		self.notifying.set( false );
	}

	/// Registers `observer`, replaying the current value to it immediately.
	pub fn subscribe( &self, observer: impl Fn( &T ) + 'static ) -> Subscription {
		let observer: Rc<dyn Fn( &T )> = Rc::new( observer );
		let subscription = self.observers.add( Rc::clone( &observer ));
		observer( &*self.value() );
		subscription
	}

	pub fn observer_count( &self ) -> usize { self.observers.len() }

}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ReplayCell<T> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ReplayCell" )
			.field( "current", &self.value() )
			.field( "observers", &self.observer_count() )
			.finish()
	}
}
