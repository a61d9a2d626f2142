use std::cell::Cell ;
use std::rc::Rc ;
use lazy_link::{ AttachOptions, CompiledModule, Context, FactoryRegistry, Injector, InstantiationError, ModuleFactory, ModuleRef, ViewContainerRef };
use crate::fixtures::{ harness, widget_module, Probe, WIDGET, WIDGET_MODULE };

struct ApiUrl( &'static str );

/// Flags when the module instance it creates is destroyed.
struct Tracked {
	inner: ModuleFactory,
	destroyed: Rc<Cell<bool>>,
}

impl CompiledModule for Tracked {
	fn name( &self ) -> &str { self.inner.name() }
	fn create( &self, parent: &Injector ) -> Result<ModuleRef, InstantiationError> {
		let module = self.inner.create( parent )?;
		let destroyed = Rc::clone( &self.destroyed );
		module.on_destroy( move || destroyed.set( true ));
		Ok( module )
	}
}

#[test]
fn create_module_does_not_attach_anything() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new() );
	let parent = Injector::root().provide( ApiUrl( "https://example.test" ));

	let module = widget_module( &probe );
	assert_eq!( module.declarations().len(), 1 );
	assert!( module.declarations().contains( &WIDGET.into() ));

	let created = harness.engine.create_module( &module, &parent ).unwrap();

	assert!( created.component.is_none() );
	assert_eq!( created.module.name(), WIDGET_MODULE );
	assert_eq!( created.module.injector().name(), Some( WIDGET_MODULE ));
	assert!( created.module.injector().parent().is_some_and(| injector | injector.ptr_eq( &parent )));
	assert_eq!( created.module.injector().get::<ApiUrl>().map(| url | url.0 ), Some( "https://example.test" ));
	assert_eq!( probe.created.get(), 0 );

}

#[test]
fn providers_run_on_the_module_injector() {

	let module = ModuleFactory::new( "ApiModule" )
		.with_providers(| injector | Ok( injector.provide( ApiUrl( "https://api.test" ))));

	let module_ref = module.create( &Injector::root() ).unwrap();

	assert_eq!( module_ref.injector().get::<ApiUrl>().map(| url | url.0 ), Some( "https://api.test" ));
	assert!( module_ref.bootstrap_components().is_empty() );

}

#[test]
fn failing_providers_fail_instantiation() {

	let harness = harness( FactoryRegistry::new() );
	let module = ModuleFactory::new( "BrokenModule" )
		.with_providers(| _ | Err( InstantiationError::new( "BrokenModule", "missing configuration" )));

	match harness.engine.create_module( &module, &Injector::root() ) {
		Err( err ) => assert_eq!( err.target(), "BrokenModule" ),
		Ok( created ) => panic!( "Expected InstantiationError, found: {:#?}", created ),
	}

}

#[test]
fn component_from_module_destroys_the_module_with_the_component() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new() );
	let container = ViewContainerRef::new();
	let module = Tracked { inner: widget_module( &probe ), destroyed: Rc::new( Cell::new( false ))};

	let handle = harness.engine.create_component_from_module(
		&module,
		&Injector::root(),
		AttachOptions::new().with_container( &container ).with_context( &Context::new().with_input( "label", "hi" )),
	).unwrap();
	assert_eq!( probe.assigned( "label" ).len(), 1 );
	assert!( !module.destroyed.get() );

	handle.detach();
	assert!( module.destroyed.get() );
	assert!( container.is_empty() );

}

#[test]
fn module_destroy_runs_callbacks_once() {

	let probe = Probe::new();
	let module_ref = widget_module( &probe ).create( &Injector::root() ).unwrap();
	let calls = Rc::new( Cell::new( 0 ));

	let counter = Rc::clone( &calls );
	module_ref.on_destroy( move || counter.set( counter.get() + 1 ));
	module_ref.destroy();
	module_ref.destroy();

	// Registering after destruction runs immediately
	let counter = Rc::clone( &calls );
	module_ref.on_destroy( move || counter.set( counter.get() + 1 ));

	assert!( module_ref.is_destroyed() );
	assert_eq!( calls.get(), 2 );

}
