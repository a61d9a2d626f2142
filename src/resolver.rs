//! Factory resolution.
//!
//! Statically known component types resolve through the application's global resolver.
//! Types that arrived with a lazily loaded module only resolve through that module's own
//! resolver, which is why the binding engine accepts either.

use std::collections::HashMap ;
use std::rc::Rc ;
use itertools::Itertools ;
use thiserror::Error ;

use crate::{ ComponentFactory, ComponentType };



/// A component type could not be mapped to a factory.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum ResolutionError {
	/// No component type was supplied, typically because a module declares no bootstrap component.
	#[error( "No component type given" )] MissingType,
	/// The resolver knows no factory for this type.
	#[error( "No component factory found for {0}" )] NoFactory( ComponentType ),
}

/// Maps a component type to the factory able to instantiate it.
pub trait FactoryResolver {
	/// # Errors
	/// Returns [`ResolutionError::NoFactory`] if the type is unknown to this resolver.
	fn resolve( &self, component_type: &ComponentType ) -> Result<Rc<dyn ComponentFactory>, ResolutionError> ;
}

/// A [`FactoryResolver`] over an explicit set of factories.
#[derive( Clone, Default )]
pub struct FactoryRegistry {
	factories: HashMap<ComponentType, Rc<dyn ComponentFactory>>,
}

impl FactoryRegistry {

	pub fn new() -> Self { Self::default() }

	/// Registers `factory` under its own component type, replacing any previous one.
	pub fn register( &mut self, factory: impl ComponentFactory + 'static ) -> &mut Self {
		self.register_shared( Rc::new( factory ))
	}

	pub fn register_shared( &mut self, factory: Rc<dyn ComponentFactory> ) -> &mut Self {
		self.factories.insert( factory.component_type().clone(), factory );
		self
	}

	/// Builder form of [`register`]( Self::register ).
	pub fn with( mut self, factory: impl ComponentFactory + 'static ) -> Self {
		self.register( factory );
		self
	}

	#[inline] pub fn contains( &self, component_type: &ComponentType ) -> bool { self.factories.contains_key( component_type )}
	#[inline] pub fn len( &self ) -> usize { self.factories.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.factories.is_empty() }

}

impl FactoryResolver for FactoryRegistry {
	fn resolve( &self, component_type: &ComponentType ) -> Result<Rc<dyn ComponentFactory>, ResolutionError> {
		self.factories.get( component_type )
			.cloned()
			.ok_or_else(|| ResolutionError::NoFactory( component_type.clone() ))
	}
}

impl FromIterator<Rc<dyn ComponentFactory>> for FactoryRegistry {
	fn from_iter<I: IntoIterator<Item = Rc<dyn ComponentFactory>>>( iter: I ) -> Self {
		let mut registry = Self::new();
		iter.into_iter().for_each(| factory | { registry.register_shared( factory ); });
		registry
	}
}

impl std::fmt::Debug for FactoryRegistry {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "FactoryRegistry" )
			.field( "factories", &self.factories.keys().sorted().collect_vec() )
			.finish()
	}
}
