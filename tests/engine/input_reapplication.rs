use std::any::Any ;
use std::cell::RefCell ;
use std::rc::Rc ;
use lazy_link::{ Component, ComponentHandle, ComponentOptions, Context, ContextValue, EventEmitter, Factory, FactoryRegistry, Value, ViewContainerRef };
use crate::fixtures::{ harness, widget_factory, Probe, Widget, WIDGET };

/// Announces every value it receives on `changed`.
#[derive( Default )]
struct Echo {
	received: Vec<Value>,
	changed: EventEmitter<Value>,
}

impl Component for Echo {
	fn set_input( &mut self, name: &str, value: &ContextValue ) {
		if let ( "value", Some( value )) = ( name, value.as_data() ) {
			self.received.push( value.clone() );
			self.changed.emit( value );
		}
	}
	fn output( &self, name: &str ) -> Option<EventEmitter<Value>> {
		( name == "changed" ).then(|| self.changed.clone() )
	}
	fn as_any( &self ) -> &dyn Any { self }
}

#[test]
fn inputs_follow_the_latest_context() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));
	let container = ViewContainerRef::new();

	let context = Context::new().with_input( "value", 1 );
	let handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ).with_context( &context ),
	).unwrap();
	let value = || handle.component_ref().with_instance(| widget: &Widget | widget.value.clone() ).unwrap();
	assert_eq!( value(), Some( Value::Int( 1 )));

	handle.next( Context::new().with_input( "value", 2 ));
	assert_eq!( value(), Some( Value::Int( 2 )));

	// Missing entries are skipped, not cleared
	handle.next( Context::new() );
	assert_eq!( value(), Some( Value::Int( 2 )));
	assert_eq!( probe.assigned( "value" ), vec![ Value::Int( 1 ), Value::Int( 2 )]);

}

#[test]
fn null_is_assigned_like_any_other_value() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));
	let container = ViewContainerRef::new();

	let context = Context::new().with_input( "label", "hi" );
	let handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ).with_context( &context ),
	).unwrap();

	handle.next( Context::new().with_input( "label", Value::Null ));
	assert_eq!( probe.assigned( "label" ), vec![ Value::from( "hi" ), Value::Null ]);

}

#[test]
fn undeclared_inputs_are_never_assigned() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));
	let container = ViewContainerRef::new();

	let context = Context::new()
		.with_input( "label", "hi" )
		.with_input( "colour", "red" );
	let handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ).with_context( &context ),
	).unwrap();
	handle.next( Context::new().with_input( "colour", "blue" ));

	let assigned = probe.assignments.borrow().iter().map(|( name, _ )| name.clone() ).collect::<Vec<_>>();
	assert_eq!( assigned, vec![ "label".to_string() ]);

}

#[test]
fn handlers_under_input_names_are_passed_through() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));
	let container = ViewContainerRef::new();

	let context = Context::new().with_handler( "label", | _ | {} );
	let _handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ).with_context( &context ),
	).unwrap();

	let assignments = probe.assignments.borrow();
	assert_eq!( assignments.len(), 1 );
	assert!( matches!( &assignments[0], ( name, ContextValue::Handler( _ )) if name == "label" ));

}

#[test]
fn next_after_detach_is_ignored() {

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));
	let container = ViewContainerRef::new();

	let context = Context::new().with_input( "value", 1 );
	let handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ).with_context( &context ),
	).unwrap();

	handle.detach();
	handle.next( Context::new().with_input( "value", 2 ));

	assert_eq!( probe.assigned( "value" ), vec![ Value::Int( 1 )]);
	assert_eq!( handle.context().get( "value" ).and_then( ContextValue::as_data ), Some( &Value::Int( 1 )));

}

#[test]
fn output_handler_may_push_a_new_context() {

	let registry = FactoryRegistry::new().with( Factory::of::<Echo>( "Echo" ).with_inputs([ "value" ]).with_outputs([ "changed" ]));
	let harness = harness( registry );
	let container = ViewContainerRef::new();

	// Clamps anything above ten by pushing a corrected context from the handler
	let slot: Rc<RefCell<Option<ComponentHandle>>> = Rc::default();
	let slot_clone = Rc::clone( &slot );
	let context = Context::new()
		.with_input( "value", 1 )
		.with_handler( "changed", move | value | {
			if value.as_int().is_some_and(| value | value > 10 ) {
				if let Some( handle ) = slot_clone.borrow().as_ref() { handle.next( Context::new().with_input( "value", 10 )) }
			}
		});
	let handle = harness.engine.create_and_attach_component(
		&"Echo".into(),
		ComponentOptions::new().with_container( &container ).with_context( &context ),
	).unwrap();
	*slot.borrow_mut() = Some( handle.clone() );

	handle.next( Context::new().with_input( "value", 20 ));

	let received = handle.component_ref().with_instance(| echo: &Echo | echo.received.clone() ).unwrap();
	assert_eq!( received, vec![ Value::Int( 1 ), Value::Int( 20 ), Value::Int( 10 )]);
	assert_eq!( handle.context().get( "value" ).and_then( ContextValue::as_data ), Some( &Value::Int( 10 )));

	slot.borrow_mut().take();

}
