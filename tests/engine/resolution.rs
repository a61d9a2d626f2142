use std::rc::Rc ;
use lazy_link::{
	AttachError, AttachOptions, ComponentOptions, ComponentType, CompiledModule, Factory,
	FactoryRegistry, Injector, InstantiationError, ModuleFactory, ResolutionError, ViewContainerRef,
};
use crate::fixtures::{ harness, widget, widget_module, Probe, WIDGET };

/// Service a component demands from its injector.
struct Locale( &'static str );

/// A widget factory that only succeeds when a [`Locale`] is injectable.
fn localised_factory( probe: &Rc<Probe> ) -> Factory {
	let probe = Rc::clone( probe );
	Factory::new( "Localised", move | injector | match injector.get::<Locale>() {
		Some( locale ) if !locale.0.is_empty() => Ok( widget( &probe )),
		_ => Err( InstantiationError::new( "Localised", "no locale provided" )),
	})
}

#[test]
fn unknown_type_fails_to_resolve() {

	let harness = harness( FactoryRegistry::new() );
	let container = ViewContainerRef::new();

	match harness.engine.create_and_attach_component( &WIDGET.into(), ComponentOptions::new().with_container( &container )) {
		Err( AttachError::Resolution( ResolutionError::NoFactory( component_type ))) if component_type.name() == WIDGET => {},
		result => panic!( "Expected NoFactory, found: {:#?}", result ),
	}
	assert!( container.is_empty() );

}

#[test]
fn module_declarations_resolve_through_the_module() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new() );
	let container = ViewContainerRef::new();
	let module = widget_module( &probe ).create( &Injector::root() ).unwrap();

	let handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ).with_module( &module ),
	).unwrap();

	assert_eq!( handle.component_ref().component_type(), &ComponentType::from( WIDGET ));
	assert_eq!( probe.created.get(), 1 );

}

#[test]
fn failing_factory_surfaces_instantiation_error() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( localised_factory( &probe )));
	let container = ViewContainerRef::new();

	match harness.engine.create_and_attach_component( &"Localised".into(), ComponentOptions::new().with_container( &container )) {
		Err( AttachError::Instantiation( err )) if err.target() == "Localised" => {},
		result => panic!( "Expected InstantiationError, found: {:#?}", result ),
	}

}

#[test]
fn containers_create_against_the_module_injector() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new() );
	let container = ViewContainerRef::new();
	let module = ModuleFactory::new( "LocalisedModule" )
		.declare( localised_factory( &probe ))
		.bootstrap( "Localised" )
		.with_providers(| injector | Ok( injector.provide( Locale( "en-GB" ))));

	let created = harness.engine.create_and_attach_module(
		&module,
		&Injector::root(),
		AttachOptions::new().with_container( &container ),
	).unwrap();
	assert!( created.component.is_some() );
	assert_eq!( container.len(), 1 );

	// Without a container the engine injector is used, which has no locale
	let fallback = harness.engine.create_and_attach_module( &module, &Injector::root(), AttachOptions::new() );
	assert!( matches!( fallback, Err( AttachError::Instantiation( _ ))));
	assert!( harness.body.children().is_empty() );

}
