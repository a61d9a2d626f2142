//! Hierarchical dependency-injection context.
//!
//! The loading core never looks inside an [`Injector`]; it only forwards one to the
//! module and component factories that do.

use std::any::{ Any, TypeId };
use std::collections::HashMap ;
use std::rc::Rc ;



/// A type-keyed map of shared services with an optional parent.
///
/// Lookups fall through to the parent when the type is not provided locally.
/// Cloning yields another handle to the same injector.
///
/// ```
/// use lazy_link::Injector ;
///
/// struct Theme( &'static str );
///
/// let root = Injector::root().provide( Theme( "dark" ));
/// let child = root.child().provide( 42_u32 );
/// assert_eq!( child.get::<Theme>().map(| theme | theme.0 ), Some( "dark" ));
/// assert_eq!( root.get::<u32>(), None );
/// ```
#[derive( Clone, Default )]
pub struct Injector {
	inner: Rc<InjectorInner>,
}

#[derive( Default )]
struct InjectorInner {
	name: Option<String>,
	services: HashMap<TypeId, Rc<dyn Any>>,
	parent: Option<Injector>,
}

impl Injector {

	/// An empty injector without a parent.
	pub fn root() -> Self { Self::default() }

	/// An empty injector whose lookups fall through to `self`.
	pub fn child( &self ) -> Self {
		Self { inner: Rc::new( InjectorInner {
			name: None,
			services: HashMap::with_capacity( 0 ),
			parent: Some( self.clone() ),
		})}
	}

	/// Names this injector for diagnostics.
	pub fn named( self, name: impl Into<String> ) -> Self {
		let inner = Rc::try_unwrap( self.inner ).unwrap_or_else(| shared | InjectorInner {
			name: None,
			services: shared.services.clone(),
			parent: shared.parent.clone(),
		});
		Self { inner: Rc::new( InjectorInner { name: Some( name.into() ), ..inner })}
	}

	/// Returns an injector that additionally provides `service`.
	///
	/// Other handles to the original injector are not affected.
	pub fn provide<T: 'static>( self, service: T ) -> Self {
		let mut inner = Rc::try_unwrap( self.inner ).unwrap_or_else(| shared | InjectorInner {
			name: shared.name.clone(),
			services: shared.services.clone(),
			parent: shared.parent.clone(),
		});
		inner.services.insert( TypeId::of::<T>(), Rc::new( service ));
		Self { inner: Rc::new( inner )}
	}

	/// Looks up a service, walking up the parent chain.
	pub fn get<T: 'static>( &self ) -> Option<Rc<T>> {
		match self.inner.services.get( &TypeId::of::<T>() ) {
			Some( service ) => Rc::clone( service ).downcast::<T>().ok(),
			None => self.inner.parent.as_ref().and_then( Injector::get::<T> ),
		}
	}

	#[inline] pub fn name( &self ) -> Option<&str> { self.inner.name.as_deref() }
	#[inline] pub fn parent( &self ) -> Option<&Injector> { self.inner.parent.as_ref() }

	/// Whether both handles point at the same injector.
	#[inline] pub fn ptr_eq( &self, other: &Injector ) -> bool { Rc::ptr_eq( &self.inner, &other.inner )}

}

impl std::fmt::Debug for Injector {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Injector" )
			.field( "name", &self.name() )
			.field( "services", &self.inner.services.len() )
			.field( "parent", &self.parent() )
			.finish()
	}
}
