use futures_executor::block_on ;
use lazy_link::{ BundleLoader, LoadError, LoadStrategy, ModuleLoader, StaticBundles };
use crate::fixtures::{ widget_bundles, widget_loader, NamedCompiler, Probe };

#[test]
fn unknown_bundle_path() {

	let probe = Probe::new();
	let result = block_on( widget_loader( &probe ).load( "elsewhere#Widget" ));

	assert_eq!( result.err(), Some( LoadError::ModuleNotFound( "elsewhere".to_string() )));

}

#[test]
fn unknown_export_names_the_export() {

	let probe = Probe::new();
	let result = block_on( widget_loader( &probe ).load( "mod#Gadget" ));

	match result {
		Err( err @ LoadError::ExportNotFound( _ )) => assert_eq!( err.to_string(), "Cannot find 'Gadget'" ),
		Err( err ) => panic!( "Expected ExportNotFound, found: {}", err ),
		Ok( module ) => panic!( "Expected ExportNotFound, found module {}", module.name() ),
	}

}

#[test]
fn unknown_export_in_compile_mode() {

	let probe = Probe::new();
	let loader = BundleLoader::new( widget_bundles( &probe ), LoadStrategy::compile( NamedCompiler::default() ));

	// Compile mode looks up the bare export name, without the factory suffix
	assert_eq!( block_on( loader.load( "mod#Widget" )).err(), Some( LoadError::ExportNotFound( "Widget".to_string() )));

}

#[test]
fn empty_bundles_fail_every_load() {

	let loader = BundleLoader::new( StaticBundles::new(), LoadStrategy::precompiled() );

	assert_eq!( block_on( loader.load( "" )).err(), Some( LoadError::ModuleNotFound( String::new() )));

}
