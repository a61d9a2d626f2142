use std::rc::Rc ;
use futures_executor::block_on ;
use lazy_link::{ BundleLoader, Export, LoadError, LoadStrategy, ModuleFactory, ModuleLoader, StaticBundles };
use crate::fixtures::{ widget_loader, widget_module, Probe, WIDGET_MODULE };

#[test]
fn export_name_gets_the_factory_suffix() {

	let probe = Probe::new();
	let module = block_on( widget_loader( &probe ).load( "mod#Widget" )).unwrap();
	assert_eq!( module.name(), WIDGET_MODULE );

}

#[test]
fn custom_factory_suffix() {

	let probe = Probe::new();
	let bundles = StaticBundles::new()
		.with_bundle( "mod", [( "WidgetNgFactory", Export::Compiled( Rc::new( widget_module( &probe ))))]);
	let loader = BundleLoader::new( bundles, LoadStrategy::precompiled().with_factory_suffix( "NgFactory" ));

	assert_eq!( block_on( loader.load( "mod#Widget" )).map(| module | module.name().to_string() ), Ok( WIDGET_MODULE.to_string() ));
	assert!( matches!( loader.strategy(), LoadStrategy::Precompiled { factory_suffix } if factory_suffix == "NgFactory" ));

}

#[test]
fn identifier_without_export_uses_the_default_export() {

	let bundles = StaticBundles::new()
		.with_bundle( "app/home", [( "default", Export::Compiled( Rc::new( ModuleFactory::new( "HomeModule" ))))])
		.with_bundle( "app/admin", [( "main", Export::Compiled( Rc::new( ModuleFactory::new( "AdminModule" ))))]);
	let loader = BundleLoader::new( bundles, LoadStrategy::precompiled() );

	let home = block_on( loader.load( "app/home" )).unwrap();
	assert_eq!( home.name(), "HomeModule" );

	let loader = loader.with_default_export( "main" );
	let admin = block_on( loader.load( "app/admin" )).unwrap();
	assert_eq!( admin.name(), "AdminModule" );
	assert_eq!( block_on( loader.load( "app/home" )).err(), Some( LoadError::ExportNotFound( "main".to_string() )));

}

#[test]
fn declarations_are_not_loaded_as_precompiled() {

	let bundles = StaticBundles::new()
		.with_bundle( "mod", [( "WidgetFactory", Export::Declaration( Rc::new( "not compiled" )))]);
	let loader = BundleLoader::new( bundles, LoadStrategy::precompiled() );

	assert_eq!( block_on( loader.load( "mod#Widget" )).err(), Some( LoadError::NotCompiled( "WidgetFactory".to_string() )));

}
