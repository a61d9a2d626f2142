//! Context values passed to dynamically created components.
//!
//! A [`Context`] is a plain mapping from binding name to [`ContextValue`]. Which keys are
//! treated as inputs and which as outputs is decided by the component's declared binding
//! names, not by the shape of the value. The one exception is outputs: a value supplied
//! for an output name is only wired if it is a [`ContextValue::Handler`].

use std::collections::HashMap ;
use std::rc::Rc ;
use itertools::Itertools ;



/// Callback invoked with every value a component emits on one of its outputs.
pub type Handler = Rc<dyn Fn( &Value )>;

/// A dynamic property value.
#[derive( Debug, Clone, PartialEq, Default )]
pub enum Value {
	/// An explicitly empty value. Unlike a missing key this is still assigned to inputs.
	#[default] Null,
	Bool( bool ),
	Int( i64 ),
	Float( f64 ),
	Str( String ),
	List( Vec<Value> ),
	Map( HashMap<String, Value> ),
}

impl Value {
	#[inline] pub fn as_bool( &self ) -> Option<bool> { match self { Self::Bool( b ) => Some( *b ), _ => None }}
	#[inline] pub fn as_int( &self ) -> Option<i64> { match self { Self::Int( i ) => Some( *i ), _ => None }}
	#[inline] pub fn as_float( &self ) -> Option<f64> { match self { Self::Float( f ) => Some( *f ), _ => None }}
	#[inline] pub fn as_str( &self ) -> Option<&str> { match self { Self::Str( s ) => Some( s ), _ => None }}
	#[inline] pub fn is_null( &self ) -> bool { matches!( self, Self::Null )}
}

impl From<bool> for Value { fn from( value: bool ) -> Self { Self::Bool( value )}}
impl From<i64> for Value { fn from( value: i64 ) -> Self { Self::Int( value )}}
impl From<i32> for Value { fn from( value: i32 ) -> Self { Self::Int( i64::from( value ))}}
impl From<f64> for Value { fn from( value: f64 ) -> Self { Self::Float( value )}}
impl From<&str> for Value { fn from( value: &str ) -> Self { Self::Str( value.to_string() )}}
impl From<String> for Value { fn from( value: String ) -> Self { Self::Str( value )}}
impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from( value: Vec<T> ) -> Self { Self::List( value.into_iter().map( Into::into ).collect() )}
}

impl std::fmt::Display for Value {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match self {
			Self::Null => write!( f, "null" ),
			Self::Bool( b ) => write!( f, "{}", b ),
			Self::Int( i ) => write!( f, "{}", i ),
			Self::Float( x ) => write!( f, "{}", x ),
			Self::Str( s ) => write!( f, "{:?}", s ),
			Self::List( items ) => write!( f, "[{}]", items.iter().join( ", " )),
			Self::Map( map ) => write!( f, "{{{}}}", map.iter()
				.sorted_by(|( a, _ ), ( b, _ )| a.cmp( b ))
				.map(|( key, value )| format!( "{}: {}", key, value ))
				.join( ", " )
			),
		}
	}
}

/// A single entry of a [`Context`].
#[derive( Clone )]
pub enum ContextValue {
	/// Plain data. Assigned to a matching input.
	Data( Value ),
	/// A callback. Subscribed to a matching output, or assigned as-is to a matching input.
	Handler( Handler ),
}

impl ContextValue {
	/// Returns the data if this entry is not a handler.
	#[inline] pub fn as_data( &self ) -> Option<&Value> {
		match self { Self::Data( value ) => Some( value ), Self::Handler( _ ) => None }
	}
	/// Returns the handler if this entry is one.
	#[inline] pub fn as_handler( &self ) -> Option<&Handler> {
		match self { Self::Handler( handler ) => Some( handler ), Self::Data( _ ) => None }
	}
}

impl std::fmt::Debug for ContextValue {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Data( value ) => f.debug_tuple( "Data" ).field( value ).finish(),
			Self::Handler( _ ) => f.debug_tuple( "Handler" ).field( &"<closure>" ).finish(),
		}
	}
}

macro_rules! data_from {( $( $ty:ty ),* ) => { $(
	impl From<$ty> for ContextValue {
		fn from( value: $ty ) -> Self { Self::Data( value.into() )}
	}
)* }}
data_from!( Value, bool, i32, i64, f64, &str, String );

impl From<Handler> for ContextValue {
	fn from( handler: Handler ) -> Self { Self::Handler( handler )}
}

/// A plain mapping from binding name to value.
///
/// An absent key means "undefined": inputs whose name is missing keep their current value.
///
/// ```
/// use lazy_link::{ Context, Value };
///
/// let context = Context::new()
/// 	.with_input( "label", "hi" )
/// 	.with_handler( "click", | value: &Value | println!( "clicked: {}", value ));
/// assert!( context.get( "label" ).is_some());
/// assert!( context.get( "missing" ).is_none());
/// ```
#[derive( Clone, Default, Debug )]
pub struct Context {
	entries: HashMap<String, ContextValue>,
}

impl Context {

	/// Creates an empty context.
	pub fn new() -> Self { Self::default() }

	/// Adds a data entry.
	pub fn with_input( mut self, name: impl Into<String>, value: impl Into<Value> ) -> Self {
		self.entries.insert( name.into(), ContextValue::Data( value.into() ));
		self
	}

	/// Adds a callback entry.
	pub fn with_handler( mut self, name: impl Into<String>, handler: impl Fn( &Value ) + 'static ) -> Self {
		self.entries.insert( name.into(), ContextValue::Handler( Rc::new( handler )));
		self
	}

	/// Inserts an entry, returning the previous one under the same name.
	pub fn insert( &mut self, name: impl Into<String>, value: impl Into<ContextValue> ) -> Option<ContextValue> {
		self.entries.insert( name.into(), value.into() )
	}

	#[inline] pub fn get( &self, name: &str ) -> Option<&ContextValue> { self.entries.get( name )}
	#[inline] pub fn contains( &self, name: &str ) -> bool { self.entries.contains_key( name )}
	#[inline] pub fn len( &self ) -> usize { self.entries.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.entries.is_empty() }

	/// Iterates over the binding names in sorted order.
	pub fn names( &self ) -> impl Iterator<Item = &str> {
		self.entries.keys().map( String::as_str ).sorted()
	}

}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<( K, V )> for Context {
	fn from_iter<I: IntoIterator<Item = ( K, V )>>( iter: I ) -> Self {
		Self { entries: iter.into_iter().map(|( name, value )| ( name.into(), value.into() )).collect() }
	}
}
