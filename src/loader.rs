//! Module loading.
//!
//! [`ModuleLoader`] is the single contract the rest of the crate depends on: turn a string
//! identifier into a [`CompiledModule`], asynchronously. [`BundleLoader`] is the stock
//! implementation for identifiers of the form `path#ExportName`:
//!
//! 1. the bundle at `path` is fetched through a [`BundleFetcher`]
//! 2. the export is picked out of the bundle according to the [`LoadStrategy`]:
//! 	- [`LoadStrategy::Precompiled`] looks up `ExportName` + factory suffix, which must
//! 		already be a compiled module
//! 	- [`LoadStrategy::Compile`] looks up `ExportName` and compiles it with a [`ModuleCompiler`]
//!
//! An identifier without `#` refers to the bundle's `default` export (with no suffix
//! appended in precompiled mode).

use std::any::Any ;
use std::collections::HashMap ;
use std::rc::Rc ;
use futures_util::future::{ FutureExt, LocalBoxFuture };
use thiserror::Error ;

use crate::CompiledModule ;



/// Errors that can occur while loading a module.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum LoadError {
	/// No bundle exists at the given path.
	#[error( "Cannot find module '{0}'" )] ModuleNotFound( String ),
	/// The bundle has no export under the requested name.
	#[error( "Cannot find '{0}'" )] ExportNotFound( String ),
	/// A precompiled export was requested but the export is not compiled.
	#[error( "Export '{0}' is not a compiled module" )] NotCompiled( String ),
	/// The export could not be compiled.
	#[error( "Failed to compile '{export}': {reason}" )] Compile { export: String, reason: String },
}

/// Resolves a module identifier to a compiled module.
pub trait ModuleLoader {
	/// Loads and, if needed, compiles the module named by `identifier`.
	///
	/// The returned future must fail if the identifier cannot be resolved.
	fn load( &self, identifier: &str ) -> LocalBoxFuture<'static, Result<Rc<dyn CompiledModule>, LoadError>> ;
}

/// One named export of a bundle.
#[derive( Clone )]
pub enum Export {
	/// A module compiled ahead of time.
	Compiled( Rc<dyn CompiledModule> ),
	/// A module declaration that still needs a [`ModuleCompiler`].
	Declaration( Rc<dyn Any> ),
}

impl std::fmt::Debug for Export {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Compiled( module ) => f.debug_tuple( "Compiled" ).field( &module.name() ).finish(),
			Self::Declaration( _ ) => f.debug_tuple( "Declaration" ).field( &"<declaration>" ).finish(),
		}
	}
}

/// The exports of one fetched bundle, keyed by export name.
pub type Bundle = HashMap<String, Export>;

/// Fetches bundles by path.
pub trait BundleFetcher {
	/// # Errors
	/// Implementations fail with [`LoadError::ModuleNotFound`] for unknown paths.
	fn fetch( &self, path: &str ) -> LocalBoxFuture<'static, Result<Rc<Bundle>, LoadError>> ;
}

/// Compiles module declarations at load time.
pub trait ModuleCompiler {
	/// # Errors
	/// Fails with [`LoadError::Compile`] if `declaration` is not something this compiler understands.
	fn compile( &self, export: &str, declaration: Rc<dyn Any> ) -> LocalBoxFuture<'static, Result<Rc<dyn CompiledModule>, LoadError>> ;
}

/// How [`BundleLoader`] turns an export into a compiled module.
#[derive( Clone )]
pub enum LoadStrategy {
	/// Exports are compiled ahead of time and found under `ExportName` + `factory_suffix`.
	Precompiled { factory_suffix: String },
	/// Exports are declarations compiled on load.
	Compile( Rc<dyn ModuleCompiler> ),
}

impl LoadStrategy {

	/// Suffix appended to export names in precompiled mode, unless overridden.
	pub const DEFAULT_FACTORY_SUFFIX: &'static str = "Factory" ;

	pub fn precompiled() -> Self {
		Self::Precompiled { factory_suffix: Self::DEFAULT_FACTORY_SUFFIX.to_string() }
	}

	pub fn compile( compiler: impl ModuleCompiler + 'static ) -> Self { Self::Compile( Rc::new( compiler ))}

	/// Replaces the factory suffix. Does nothing in compile mode.
	pub fn with_factory_suffix( self, suffix: impl Into<String> ) -> Self {
		match self {
			Self::Precompiled { .. } => Self::Precompiled { factory_suffix: suffix.into() },
			compile => compile,
		}
	}

}

impl std::fmt::Debug for LoadStrategy {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Precompiled { factory_suffix } => f.debug_struct( "Precompiled" ).field( "factory_suffix", factory_suffix ).finish(),
			Self::Compile( _ ) => f.debug_tuple( "Compile" ).field( &"<compiler>" ).finish(),
		}
	}
}

/// [`ModuleLoader`] for `path#ExportName` identifiers.
///
/// ```
/// use std::rc::Rc ;
/// use lazy_link::{ BundleLoader, Export, LoadError, LoadStrategy, ModuleFactory, ModuleLoader, StaticBundles };
///
/// let bundles = StaticBundles::new()
/// 	.with_bundle( "app/bar", [( "BarModuleFactory", Export::Compiled( Rc::new( ModuleFactory::new( "BarModule" ))))]);
/// let loader = BundleLoader::new( bundles, LoadStrategy::precompiled() );
///
/// let module = futures_executor::block_on( loader.load( "app/bar#BarModule" )).unwrap();
/// assert_eq!( module.name(), "BarModule" );
///
/// let missing = futures_executor::block_on( loader.load( "app/bar#FooModule" ));
/// assert!( matches!( missing, Err( LoadError::ExportNotFound( name )) if name == "FooModule" ));
/// ```
pub struct BundleLoader<F> {
	fetcher: Rc<F>,
	strategy: LoadStrategy,
	default_export: String,
}

impl<F: BundleFetcher + 'static> BundleLoader<F> {

	/// Export used when the identifier has no `#ExportName` part.
	pub const DEFAULT_EXPORT: &'static str = "default" ;

	pub fn new( fetcher: F, strategy: LoadStrategy ) -> Self {
		Self { fetcher: Rc::new( fetcher ), strategy, default_export: Self::DEFAULT_EXPORT.to_string() }
	}

	/// Overrides the export used for identifiers without `#ExportName`.
	pub fn with_default_export( mut self, export: impl Into<String> ) -> Self {
		self.default_export = export.into();
		self
	}

	#[inline] pub fn strategy( &self ) -> &LoadStrategy { &self.strategy }
	#[inline] pub fn fetcher( &self ) -> &F { &self.fetcher }

}

/// Splits an identifier into its path and export name.
fn split_identifier( identifier: &str ) -> ( &str, Option<&str> ) {
	match identifier.split_once( '#' ) {
		Some(( path, export )) => ( path, Some( export )),
		None => ( identifier, None ),
	}
}

impl<F: BundleFetcher + 'static> ModuleLoader for BundleLoader<F> {
	fn load( &self, identifier: &str ) -> LocalBoxFuture<'static, Result<Rc<dyn CompiledModule>, LoadError>> {

		let ( path, export ) = split_identifier( identifier );
		let fetched = self.fetcher.fetch( path );
		tracing::debug!( identifier, strategy = ?self.strategy, "Loading module" );

		match self.strategy.clone() {
			LoadStrategy::Precompiled { factory_suffix } => {
				// The default export is looked up as-is, without the factory suffix
				let ( export, lookup ) = match export {
					Some( export ) => ( export.to_string(), format!( "{}{}", export, factory_suffix )),
					None => ( self.default_export.clone(), self.default_export.clone() ),
				};
				async move {
					match fetched.await?.get( &lookup ) {
						Some( Export::Compiled( module )) => Ok( Rc::clone( module )),
						Some( Export::Declaration( _ )) => Err( LoadError::NotCompiled( lookup )),
						None => Err( LoadError::ExportNotFound( export )),
					}
				}.boxed_local()
			},
			LoadStrategy::Compile( compiler ) => {
				let export = export.map_or_else(|| self.default_export.clone(), str::to_string );
				async move {
					let declaration = match fetched.await?.get( &export ) {
						Some( Export::Declaration( declaration )) => Rc::clone( declaration ),
						Some( Export::Compiled( module )) => return Ok( Rc::clone( module )),
						None => return Err( LoadError::ExportNotFound( export )),
					};
					compiler.compile( &export, declaration ).await
				}.boxed_local()
			},
		}

	}
}

impl<F> std::fmt::Debug for BundleLoader<F> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "BundleLoader" )
			.field( "strategy", &self.strategy )
			.field( "default_export", &self.default_export )
			.finish_non_exhaustive()
	}
}

/// In-memory [`BundleFetcher`]; every fetch resolves immediately.
#[derive( Debug, Clone, Default )]
pub struct StaticBundles {
	bundles: HashMap<String, Rc<Bundle>>,
}

impl StaticBundles {

	pub fn new() -> Self { Self::default() }

	pub fn with_bundle(
		mut self,
		path: impl Into<String>,
		exports: impl IntoIterator<Item = ( impl Into<String>, Export )>,
	) -> Self {
		let bundle = exports.into_iter().map(|( name, export )| ( name.into(), export )).collect();
		self.bundles.insert( path.into(), Rc::new( bundle ));
		self
	}

}

impl BundleFetcher for StaticBundles {
	fn fetch( &self, path: &str ) -> LocalBoxFuture<'static, Result<Rc<Bundle>, LoadError>> {
		let bundle = self.bundles.get( path )
			.cloned()
			.ok_or_else(|| LoadError::ModuleNotFound( path.to_string() ));
		futures_util::future::ready( bundle ).boxed_local()
	}
}
